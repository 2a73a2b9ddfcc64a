use anyhow::Result;

use crate::data_structures::{animation::AnimationClip, scene_graph::Node};

/// A decoded model: its scene graph plus any embedded animation clips.
///
/// `root` is always a loader-created wrapper container with identity transform;
/// the embedder owns `root.local` (scene descriptors write their placement
/// there) and animation tracks never target the wrapper.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    pub root: Node,
    pub clips: Vec<AnimationClip>,
}

/// Compressed audio bytes as fetched; decoding is the audio engine's concern.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub bytes: Vec<u8>,
}

/// Asynchronous asset source. Fails when an asset is missing or malformed.
pub trait AssetLoader {
    async fn load_model(&self, path: &str) -> Result<LoadedModel>;
    async fn load_audio(&self, path: &str) -> Result<AudioData>;
}
