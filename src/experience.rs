//! The experience orchestrator: bootstraps all scenes against the engine
//! seams and drives them frame by frame.
//!
//! Per frame the experience drains tracking events, advances the active
//! animation mixers, keeps audio sources glued to their anchors and the
//! listener glued to the camera, then hands the visible scenes to the
//! renderer. Pointer-down events are forwarded to the interaction controller.

use anyhow::{Context as _, Result};
use cgmath::Deg;
use instant::Instant;

use crate::{
    camera::Camera,
    engine::{
        assets::AssetLoader,
        audio::AudioEngine,
        render::{DrawItem, SceneRenderer},
        tracking::{TargetState, TrackingEngine},
    },
    pick::Interaction,
    scene::{SceneDescriptor, SceneInstance, SceneSlot, assemble},
};

/// Narrowed vertical FOV applied once bootstrap completes.
pub const CAMERA_FOV_DEG: f32 = 30.0;

/// Monotonic per-frame timer. The first delta is pinned to zero so a long
/// bootstrap never registers as one giant animation step.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; `0.0` on the first call.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

/// Top-level state tying the engine seams together. Fields are public in the
/// same spirit as the render context: embedders reach in to resize the camera
/// or poke their engine backends directly.
pub struct Experience<L, T, A, R>
where
    L: AssetLoader,
    T: TrackingEngine,
    A: AudioEngine,
    R: SceneRenderer,
{
    pub loader: L,
    pub tracking: T,
    pub audio: A,
    pub renderer: R,
    pub camera: Camera,
    scenes: Vec<SceneSlot>,
    targets: Vec<TargetState>,
    interaction: Interaction,
    clock: FrameClock,
}

impl<L, T, A, R> Experience<L, T, A, R>
where
    L: AssetLoader,
    T: TrackingEngine,
    A: AudioEngine,
    R: SceneRenderer,
{
    pub fn new(loader: L, tracking: T, audio: A, renderer: R, camera: Camera) -> Self {
        Self {
            loader,
            tracking,
            audio,
            renderer,
            camera,
            scenes: Vec::new(),
            targets: Vec::new(),
            interaction: Interaction::new(),
            clock: FrameClock::new(),
        }
    }

    pub fn scenes(&self) -> &[SceneSlot] {
        &self.scenes
    }

    /// Index of the clip the next successful tap on scene 1 will play.
    pub fn clip_cursor(&self) -> usize {
        self.interaction.cursor()
    }

    /// Assembles every descriptor in order, then narrows the camera FOV and
    /// starts the tracking session. Individual scene failures are recorded in
    /// their slots; only a failure to start tracking aborts.
    pub async fn bootstrap(&mut self, descriptors: &[SceneDescriptor]) -> Result<()> {
        for descriptor in descriptors {
            let slot = assemble(descriptor, &self.loader, &mut self.tracking, &mut self.audio).await;
            self.scenes.push(slot);
            self.targets.push(TargetState::Lost);
        }
        self.camera.set_fov(Deg(CAMERA_FOV_DEG));
        self.tracking
            .start()
            .await
            .context("starting tracking session")?;
        log::info!("experience ready with {} scenes", self.scenes.len());
        Ok(())
    }

    /// Handles a pointer-down at device pixels `(px, py)`. Returns whether a
    /// clip transition happened.
    pub fn pointer_down(&mut self, px: f32, py: f32) -> bool {
        self.interaction
            .tap(&mut self.scenes, &self.tracking, &self.camera, px, py)
    }

    /// Advances one frame: tracking events, animation, audio poses, render.
    pub fn frame(&mut self) {
        let dt = self.clock.delta();
        self.route_target_events();

        for slot in &mut self.scenes {
            if let Some(SceneInstance { root, mixer, .. }) = slot.instance_mut() {
                mixer.update(dt, root);
            }
        }

        self.audio.set_listener_pose(&self.camera.pose);
        for slot in &self.scenes {
            let Some(instance) = slot.instance() else {
                continue;
            };
            if let Some(pose) = self.tracking.anchor_pose(instance.anchor) {
                self.audio.set_source_pose(instance.audio, &pose);
            }
        }

        let mut items = Vec::with_capacity(self.scenes.len());
        for slot in &self.scenes {
            let Some(instance) = slot.instance() else {
                continue;
            };
            let Some(anchor_pose) = self.tracking.anchor_pose(instance.anchor) else {
                continue;
            };
            items.push(DrawItem {
                root: &instance.root,
                anchor_pose,
            });
        }
        if let Err(e) = self.renderer.render(&items, &self.camera) {
            log::error!("unable to render: {}", e);
        }
    }

    /// Drains tracking events and fires audio triggers on actual transitions
    /// only; engines may repeat found/lost events freely.
    fn route_target_events(&mut self) {
        for event in self.tracking.drain_events() {
            let anchor = event.anchor();
            let Some(index) = self.scenes.iter().position(|slot| {
                matches!(slot.instance(), Some(instance) if instance.anchor == anchor)
            }) else {
                continue;
            };
            let Some(transition) = self.targets[index].apply(&event) else {
                continue;
            };
            let Some(instance) = self.scenes[index].instance() else {
                continue;
            };
            match transition {
                TargetState::Found => {
                    log::info!("target found for scene {}", index + 1);
                    self.audio.play(instance.audio);
                }
                TargetState::Lost => {
                    log::info!("target lost for scene {}", index + 1);
                    self.audio.stop(instance.audio);
                }
            }
        }
    }
}

/// Convenience for native embedders without their own runtime.
#[cfg(not(target_arch = "wasm32"))]
pub fn bootstrap_blocking<L, T, A, R>(
    experience: &mut Experience<L, T, A, R>,
    descriptors: &[SceneDescriptor],
) -> Result<()>
where
    L: AssetLoader,
    T: TrackingEngine,
    A: AudioEngine,
    R: SceneRenderer,
{
    tokio::runtime::Runtime::new()?.block_on(experience.bootstrap(descriptors))
}

pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::UnwrapThrowExt as _;
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }
    #[cfg(not(target_arch = "wasm32"))]
    if let Err(e) = env_logger::try_init() {
        eprintln!("unable to initialize logging: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_delta_is_zero() {
        let mut clock = FrameClock::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.delta(), 0.0);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.delta() > 0.0);
    }
}
