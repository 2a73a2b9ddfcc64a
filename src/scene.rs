//! Scene descriptors, assembly and runtime slots.
//!
//! Each of the experience's scenes is described by a static [`SceneDescriptor`]
//! and assembled independently: load the model, place it under a tracking
//! anchor, attach its looping positional audio, start its first animation
//! clip. Assembly is best-effort: a failing scene becomes a
//! [`SceneSlot::Failed`] and never disturbs its neighbours.

use anyhow::{Context as _, Result};
use cgmath::Vector3;

use crate::{
    data_structures::{animation::Mixer, scene_graph::Node, transform::Transform},
    engine::{
        assets::AssetLoader,
        audio::{AudioEngine, SourceId, SpatialTuning},
        tracking::{AnchorId, TrackingEngine},
    },
};

/// Precompiled image-feature file the tracking engine consumes.
pub const IMAGE_TARGET_SRC: &str = "targets/melodieverglade.mind";

/// Attenuation starts far enough out that anchored audio is effectively
/// constant-volume across the room.
pub const AUDIO_REF_DISTANCE: f32 = 10_000.0;

/// Static per-scene configuration. Transform components are applied to the
/// loaded model verbatim; rotation is Euler radians.
#[derive(Clone, Debug)]
pub struct SceneDescriptor {
    pub index: usize,
    pub model_path: &'static str,
    pub audio_path: &'static str,
    pub scale: Vector3<f32>,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

fn descriptor(
    index: usize,
    model_path: &'static str,
    audio_path: &'static str,
    scale: [f32; 3],
    position: [f32; 3],
    rotation: [f32; 3],
) -> SceneDescriptor {
    SceneDescriptor {
        index,
        model_path,
        audio_path,
        scale: Vector3::new(scale[0], scale[1], scale[2]),
        position: Vector3::new(position[0], position[1], position[2]),
        rotation: Vector3::new(rotation[0], rotation[1], rotation[2]),
    }
}

/// The ten scenes of the river-story experience, in assembly order.
pub fn builtin_descriptors() -> [SceneDescriptor; 10] {
    [
        descriptor(0, "models/group2/scene1.glb", "sounds/bahasasungai/bs1.mp3", [0.030, 0.030, 0.030], [0.0, -0.2, 0.0], [0.0, -1.0, 0.0]),
        descriptor(1, "models/group2/scene2.glb", "sounds/bahasasungai/bs2.mp3", [0.030, 0.030, 0.030], [0.0, -0.4, 0.0], [0.0, -1.0, 0.0]),
        descriptor(2, "models/group2/scene3.glb", "sounds/bahasasungai/bs3.mp3", [0.2, 0.2, 0.2], [0.0, -0.2, 0.0], [0.0, -0.7, 0.0]),
        descriptor(3, "models/group2/scene4.glb", "sounds/bahasasungai/bs4.mp3", [0.030, 0.030, 0.030], [0.0, -0.4, 0.0], [0.0, -1.0, 0.0]),
        descriptor(4, "models/group2/scene5.glb", "sounds/bahasasungai/bs5.mp3", [0.2, 0.2, 0.2], [0.0, -0.2, 0.0], [0.0, -0.7, 0.0]),
        descriptor(5, "models/group2/scene6.glb", "sounds/bahasasungai/bs6.mp3", [0.4, 0.4, 0.4], [0.0, -2.3, 0.0], [0.0, -1.2, 0.0]),
        descriptor(6, "models/group2/scene7.glb", "sounds/bahasasungai/bs7.mp3", [0.4, 0.4, 0.4], [-1.2, -0.8, 0.0], [0.2, -1.0, 0.0]),
        descriptor(7, "models/group2/scene8.glb", "sounds/bahasasungai/bs8.mp3", [0.4, 0.4, 0.4], [-2.0, -1.0, 0.0], [0.0, -1.3, 0.0]),
        descriptor(8, "models/group2/scene9.glb", "sounds/bahasasungai/bs9.mp3", [0.2, 0.2, 0.2], [-1.0, -0.4, 0.0], [0.0, 0.0, 0.0]),
        descriptor(9, "models/group2/scene10.glb", "sounds/bahasasungai/bs10.mp3", [0.05, 0.05, 0.05], [0.0, -0.4, 0.0], [0.0, 0.0, 0.0]),
    ]
}

/// The runtime objects behind one successfully assembled descriptor.
#[derive(Debug)]
pub struct SceneInstance {
    pub anchor: AnchorId,
    pub root: Node,
    pub mixer: Mixer,
    pub audio: SourceId,
}

/// Outcome of assembling one descriptor. Consumers pattern-match; a `Failed`
/// slot is skipped by rendering, animation and interaction alike.
#[derive(Debug)]
pub enum SceneSlot {
    Loaded(SceneInstance),
    Failed(String),
}

impl SceneSlot {
    pub fn instance(&self) -> Option<&SceneInstance> {
        match self {
            SceneSlot::Loaded(instance) => Some(instance),
            SceneSlot::Failed(_) => None,
        }
    }

    pub fn instance_mut(&mut self) -> Option<&mut SceneInstance> {
        match self {
            SceneSlot::Loaded(instance) => Some(instance),
            SceneSlot::Failed(_) => None,
        }
    }
}

/// Assembles one scene. Any failure is logged with the scene index and
/// recorded as `Failed`; assembly of the remaining scenes is unaffected.
pub async fn assemble<L, T, A>(
    descriptor: &SceneDescriptor,
    loader: &L,
    tracking: &mut T,
    audio: &mut A,
) -> SceneSlot
where
    L: AssetLoader,
    T: TrackingEngine,
    A: AudioEngine,
{
    match try_assemble(descriptor, loader, tracking, audio).await {
        Ok(instance) => SceneSlot::Loaded(instance),
        Err(e) => {
            log::error!("error setting up scene {}: {:#}", descriptor.index + 1, e);
            SceneSlot::Failed(format!("{e:#}"))
        }
    }
}

async fn try_assemble<L, T, A>(
    descriptor: &SceneDescriptor,
    loader: &L,
    tracking: &mut T,
    audio: &mut A,
) -> Result<SceneInstance>
where
    L: AssetLoader,
    T: TrackingEngine,
    A: AudioEngine,
{
    log::info!("loading model from {}", descriptor.model_path);
    let model = loader
        .load_model(descriptor.model_path)
        .await
        .with_context(|| format!("loading model {}", descriptor.model_path))?;

    // The descriptor transform is trusted verbatim; the loader guarantees the
    // root is a wrapper node whose local transform is ours to own.
    let mut root = model.root;
    root.local = Transform::from_trs(descriptor.position, descriptor.rotation, descriptor.scale);

    let anchor = tracking.add_anchor(descriptor.index);

    log::info!("loading audio from {}", descriptor.audio_path);
    let clip = loader
        .load_audio(descriptor.audio_path)
        .await
        .with_context(|| format!("loading audio {}", descriptor.audio_path))?;
    let audio_source = audio
        .create_source(
            clip,
            SpatialTuning {
                ref_distance: AUDIO_REF_DISTANCE,
                looping: true,
            },
        )
        .await
        .context("creating positional audio source")?;

    let mut mixer = Mixer::new(model.clips);
    if mixer.clip_count() > 0 {
        log::info!("animations for scene {} loaded", descriptor.index + 1);
        mixer.play(0);
    } else {
        log::warn!("no animations found for scene {}", descriptor.index + 1);
    }

    Ok(SceneInstance {
        anchor,
        root,
        mixer,
        audio: audio_source,
    })
}
