use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
};

use anyhow::Context as _;

use crate::{
    data_structures::{
        animation::{AnimationClip, Channel, Keyframes, merge_channels},
        scene_graph::{MeshData, Node},
        transform::Transform,
    },
    engine::assets::{AssetLoader, AudioData, LoadedModel},
};

/**
 * This module contains all logic for fetching asset bytes and decoding models
 * from external files. Audio stays compressed here; the audio engine decodes.
 */

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/assets/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name);
        reqwest::get(url).await?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

/// Loads and decodes a glTF/GLB model into the CPU scene graph.
pub async fn load_model_gltf(file_name: &str) -> anyhow::Result<LoadedModel> {
    let bytes = load_binary(file_name).await?;
    let gltf_cursor = Cursor::new(bytes);
    let gltf_reader = BufReader::new(gltf_cursor);
    let gltf = gltf::Gltf::from_reader(gltf_reader)
        .with_context(|| format!("decoding {}", file_name))?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.into());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    build_model(&gltf, &buffer_data)
}

/// Builds the node tree and animation clips from a parsed document. Split from
/// [`load_model_gltf`] so decoding is testable without asset files.
pub fn build_model(gltf: &gltf::Gltf, buffer_data: &[Vec<u8>]) -> anyhow::Result<LoadedModel> {
    // Animations: collect raw channels per target node, remembering clip order.
    let mut channels: HashMap<usize, Vec<Channel>> = HashMap::new();
    let mut clip_order: Vec<String> = Vec::new();
    for animation in gltf.animations() {
        let clip_name = animation.name().unwrap_or("Default").to_string();
        if !clip_order.contains(&clip_name) {
            clip_order.push(clip_name.clone());
        }
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let timestamps = match reader.read_inputs() {
                Some(gltf::accessor::Iter::Standard(times)) => times.collect(),
                Some(gltf::accessor::Iter::Sparse(_)) | None => {
                    log::warn!("no timestamps in animation channel {}", channel.index());
                    Vec::new()
                }
            };
            let keyframes = match reader.read_outputs() {
                Some(gltf::animation::util::ReadOutputs::Translations(translations)) => {
                    Keyframes::Translation(translations.map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::Rotations(rotations)) => {
                    Keyframes::Rotation(rotations.into_f32().map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::Scales(scales)) => {
                    Keyframes::Scale(scales.map(Into::into).collect())
                }
                // Morph targets are not animated here.
                Some(gltf::animation::util::ReadOutputs::MorphTargetWeights(_)) | None => {
                    Keyframes::Other
                }
            };
            channels
                .entry(channel.target().node().index())
                .or_default()
                .push(Channel {
                    clip_name: clip_name.clone(),
                    keyframes,
                    timestamps,
                });
        }
    }

    // Node tree. The wrapper container keeps the embedder-owned placement
    // transform away from any animated node.
    let mut rest_transforms: HashMap<usize, Transform> = HashMap::new();
    let wrapper_id = gltf.nodes().len();
    let mut root = Node::container(wrapper_id);
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            root.add_child(to_scene_node(node, buffer_data, &mut rest_transforms));
        }
    }

    // Clips: one merged track per animated node, grouped by clip name.
    let mut node_ids: Vec<usize> = channels.keys().copied().collect();
    node_ids.sort_unstable();
    let mut clips = Vec::new();
    for clip_name in clip_order {
        let mut tracks = Vec::new();
        for &node_id in &node_ids {
            let base = rest_transforms.get(&node_id).cloned().unwrap_or_default();
            if let Some(track) = merge_channels(&clip_name, node_id, &base, &channels[&node_id]) {
                tracks.push(track);
            }
        }
        if !tracks.is_empty() {
            clips.push(AnimationClip {
                name: clip_name,
                tracks,
            });
        }
    }

    Ok(LoadedModel { root, clips })
}

fn to_scene_node(
    node: gltf::scene::Node,
    buf: &[Vec<u8>],
    rest_transforms: &mut HashMap<usize, Transform>,
) -> Node {
    let mesh = node.mesh().map(|mesh| {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));
            let base = positions.len() as u32;
            if let Some(vertex_attribute) = reader.read_positions() {
                positions.extend(vertex_attribute);
            }
            if let Some(indices_raw) = reader.read_indices() {
                indices.extend(indices_raw.into_u32().map(|i| i + base));
            }
        }
        MeshData {
            name: mesh.name().unwrap_or("unknown_mesh").to_string(),
            positions,
            indices,
        }
    });

    let (position, rotation, scale) = node.transform().decomposed();
    let local = Transform {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    rest_transforms.insert(node.index(), local.clone());

    let mut scene_node = Node {
        id: node.index(),
        name: node.name().unwrap_or("").to_string(),
        local,
        mesh,
        children: Vec::new(),
    };
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buf, rest_transforms));
    }
    scene_node
}

/// Fetches a compressed audio asset, leaving decoding to the audio engine.
pub async fn load_audio(file_name: &str) -> anyhow::Result<AudioData> {
    let bytes = load_binary(file_name)
        .await
        .with_context(|| format!("loading audio {}", file_name))?;
    if bytes.is_empty() {
        anyhow::bail!("audio file {} is empty", file_name);
    }
    Ok(AudioData { bytes })
}

/// The crate's stock [`AssetLoader`]: relative paths under `assets/`, read from
/// disk natively and fetched from the page origin on wasm.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

impl AssetLoader for FileLoader {
    async fn load_model(&self, path: &str) -> anyhow::Result<LoadedModel> {
        load_model_gltf(path).await
    }

    async fn load_audio(&self, path: &str) -> anyhow::Result<AudioData> {
        load_audio(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    const MINIMAL_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [
            {"name": "stage", "translation": [1.0, 2.0, 3.0], "children": [1]},
            {"name": "prop"}
        ]
    }"#;

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn load_string_reads_relative_to_assets() {
        let dir = std::path::Path::new("assets");
        std::fs::create_dir_all(dir).unwrap();
        let name = format!("load-string-{}.txt", std::process::id());
        std::fs::write(dir.join(&name), "river story").unwrap();

        let text = load_string(&name).await.unwrap();
        std::fs::remove_file(dir.join(&name)).unwrap();
        assert_eq!(text, "river story");

        let missing = load_string("no-such-file.txt").await;
        assert!(missing.is_err());
    }

    #[test]
    fn build_model_wraps_scene_roots() {
        let gltf = gltf::Gltf::from_reader(Cursor::new(MINIMAL_GLTF.as_bytes())).unwrap();
        let model = build_model(&gltf, &[]).unwrap();

        // Wrapper id sits past the document's node indices and is identity.
        assert_eq!(model.root.id, 2);
        assert_eq!(model.root.local, Transform::new());
        assert!(model.clips.is_empty());

        assert_eq!(model.root.children.len(), 1);
        let stage = &model.root.children[0];
        assert_eq!(stage.name, "stage");
        assert_eq!(stage.local.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(stage.children.len(), 1);
        assert_eq!(stage.children[0].name, "prop");
    }
}
