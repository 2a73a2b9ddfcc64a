//! Animation clips and the per-scene mixer.
//!
//! glTF delivers animation as one channel per transform component per node.
//! The loader hands those raw [`Channel`]s to [`merge_channels`], which folds
//! them into [`Track`]s of whole transforms so sampling is a single lerp/slerp
//! per node per frame.

use cgmath::{Quaternion, Vector3};

use crate::data_structures::{
    scene_graph::{Node, NodeId},
    transform::Transform,
};

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<Vector3<f32>>),
    Rotation(Vec<Quaternion<f32>>),
    Scale(Vec<Vector3<f32>>),
    Other,
}

/// One raw animation channel as read from the model file, before merging.
#[derive(Clone, Debug)]
pub struct Channel {
    pub clip_name: String,
    pub keyframes: Keyframes,
    pub timestamps: Vec<f32>,
}

/// A merged keyframe track: full transforms for one target node.
#[derive(Clone, Debug)]
pub struct Track {
    pub target: NodeId,
    pub timestamps: Vec<f32>,
    pub frames: Vec<Transform>,
}

/// A named animation with one track per animated node.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub tracks: Vec<Track>,
}

impl Track {
    pub fn duration(&self) -> f32 {
        self.timestamps.last().copied().unwrap_or(0.0)
    }

    /// Samples the track at `t`, looping over the clip duration. Returns
    /// `None` when the track carries no usable keyframes.
    pub fn sample(&self, t: f32) -> Option<Transform> {
        if self.frames.is_empty() || self.timestamps.is_empty() {
            return None;
        }
        let duration = self.duration();
        let t = if duration > 0.0 { t % duration } else { 0.0 };
        if t <= self.timestamps[0] {
            return self.frames.first().cloned();
        }
        let last = self.frames.len().min(self.timestamps.len()) - 1;
        for i in 0..last {
            let (t0, t1) = (self.timestamps[i], self.timestamps[i + 1]);
            if t <= t1 {
                let span = t1 - t0;
                let alpha = if span > 0.0 { (t - t0) / span } else { 0.0 };
                return Some(lerp_transform(&self.frames[i], &self.frames[i + 1], alpha));
            }
        }
        self.frames.get(last).cloned()
    }
}

fn lerp_transform(a: &Transform, b: &Transform, alpha: f32) -> Transform {
    Transform {
        position: a.position + (b.position - a.position) * alpha,
        rotation: a.rotation.slerp(b.rotation, alpha),
        scale: a.scale + (b.scale - a.scale) * alpha,
    }
}

/// Merges the raw channels of one node that belong to the clip `clip_name`
/// into a single track. Components without keyframes fall back to the node's
/// rest transform `base`, so a rotation-only clip does not snap position and
/// scale to identity.
pub fn merge_channels(
    clip_name: &str,
    target: NodeId,
    base: &Transform,
    channels: &[Channel],
) -> Option<Track> {
    let mut translations: Vec<Vector3<f32>> = Vec::new();
    let mut rotations: Vec<Quaternion<f32>> = Vec::new();
    let mut scales: Vec<Vector3<f32>> = Vec::new();
    let mut timestamps: Vec<f32> = Vec::new();

    for channel in channels.iter().filter(|c| c.clip_name == clip_name) {
        match &channel.keyframes {
            Keyframes::Translation(values) => translations = values.clone(),
            Keyframes::Rotation(values) => rotations = values.clone(),
            Keyframes::Scale(values) => scales = values.clone(),
            Keyframes::Other => continue,
        }
        // Some tracks have fewer steps than others; keep the densest set of
        // timestamps for smooth sampling.
        if channel.timestamps.len() > timestamps.len() {
            timestamps = channel.timestamps.clone();
        }
    }

    let frame_count = translations.len().max(rotations.len()).max(scales.len());
    if frame_count == 0 || timestamps.is_empty() {
        return None;
    }

    let mut frames = Vec::with_capacity(frame_count);
    for i in 0..frame_count {
        frames.push(Transform {
            position: translations.get(i).copied().unwrap_or(base.position),
            rotation: rotations.get(i).copied().unwrap_or(base.rotation),
            scale: scales.get(i).copied().unwrap_or(base.scale),
        });
    }

    Some(Track {
        target,
        timestamps,
        frames,
    })
}

/// Drives the animation clips of one scene.
///
/// At most one clip is active at a time; `update` samples it at the elapsed
/// time and writes the sampled transforms into the targeted nodes. Targets are
/// always below the scene root, so the root's descriptor-supplied transform is
/// never overwritten by animation.
#[derive(Clone, Debug)]
pub struct Mixer {
    clips: Vec<AnimationClip>,
    active: Option<usize>,
    elapsed: f32,
}

impl Mixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            active: None,
            elapsed: 0.0,
        }
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Resets and starts the clip at `index`. Out-of-range indices are ignored.
    pub fn play(&mut self, index: usize) {
        if index < self.clips.len() {
            self.active = Some(index);
            self.elapsed = 0.0;
        }
    }

    /// Hard cut: no cross-fade, the next `play` starts from the clip's head.
    pub fn stop_all(&mut self) {
        self.active = None;
        self.elapsed = 0.0;
    }

    /// Advances the active clip by `dt` seconds and applies it to `root`'s
    /// subtree. A no-op when nothing is playing.
    pub fn update(&mut self, dt: f32, root: &mut Node) {
        let Some(index) = self.active else {
            return;
        };
        self.elapsed += dt;
        let Some(clip) = self.clips.get(index) else {
            return;
        };
        for track in &clip.tracks {
            let Some(sampled) = track.sample(self.elapsed) else {
                continue;
            };
            if let Some(node) = root.find_mut(track.target) {
                node.local = sampled;
            }
        }
    }
}
