//! Positional-audio seam. One shared listener (tied to the camera) and one
//! spatialized source per scene, attached to that scene's anchor.

use anyhow::Result;

use crate::{data_structures::transform::Transform, engine::assets::AudioData};

/// Handle to a created positional source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

/// Spatialization settings for a positional source.
#[derive(Clone, Copy, Debug)]
pub struct SpatialTuning {
    /// Distance at which volume attenuation begins.
    pub ref_distance: f32,
    pub looping: bool,
}

impl Default for SpatialTuning {
    fn default() -> Self {
        Self {
            ref_distance: 1.0,
            looping: false,
        }
    }
}

/// The audio engine: decodes buffers, mixes sources, spatializes against the
/// listener. `play` and `stop` must be idempotent: playing an already playing
/// source or stopping a stopped one is a safe no-op.
pub trait AudioEngine {
    async fn create_source(&mut self, data: AudioData, tuning: SpatialTuning) -> Result<SourceId>;

    fn play(&mut self, source: SourceId);

    fn stop(&mut self, source: SourceId);

    /// Moves a source with its anchor.
    fn set_source_pose(&mut self, source: SourceId, pose: &Transform);

    /// Moves the shared listener with the camera.
    fn set_listener_pose(&mut self, pose: &Transform);
}
