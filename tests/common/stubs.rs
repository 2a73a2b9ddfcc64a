//! In-memory engine backends for integration tests. Each stub records the
//! calls it receives so tests can assert on orchestration behaviour without
//! a browser, a camera or a GPU.

use std::collections::HashMap;

use anyhow::{Result, bail};
use cgmath::Vector3;

use verglade::{
    Transform,
    camera::Camera,
    data_structures::{
        animation::{AnimationClip, Track},
        scene_graph::{MeshData, Node},
    },
    engine::{
        assets::{AssetLoader, AudioData, LoadedModel},
        audio::{AudioEngine, SourceId, SpatialTuning},
        render::{DrawItem, SceneRenderer},
        tracking::{AnchorId, TargetEvent, TrackingEngine},
    },
};

/// A model in the loader's shape: a wrapper container (id past the content
/// nodes) over one child carrying a 2x2 quad at z = 0, plus `clip_count`
/// translation clips targeting the child.
pub fn unit_quad_model(clip_count: usize) -> LoadedModel {
    let mesh = MeshData {
        name: "quad".into(),
        positions: vec![
            [-1.0, -1.0, 0.0],
            [1.0, -1.0, 0.0],
            [1.0, 1.0, 0.0],
            [-1.0, 1.0, 0.0],
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    };
    let mut root = Node::container(1);
    root.add_child(Node::with_mesh(0, mesh));

    let clips = (0..clip_count)
        .map(|i| AnimationClip {
            name: format!("clip{}", i),
            tracks: vec![Track {
                target: 0,
                timestamps: vec![0.0, 1.0],
                frames: vec![
                    Transform::new(),
                    Transform {
                        position: Vector3::new(1.0, 0.0, 0.0),
                        ..Transform::new()
                    },
                ],
            }],
        })
        .collect();

    LoadedModel { root, clips }
}

#[derive(Default)]
pub struct StubLoader {
    pub models: HashMap<String, LoadedModel>,
    pub audio: HashMap<String, AudioData>,
}

impl StubLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, path: &str, model: LoadedModel) -> Self {
        self.models.insert(path.to_string(), model);
        self
    }

    pub fn audio(mut self, path: &str) -> Self {
        self.audio
            .insert(path.to_string(), AudioData { bytes: vec![0; 16] });
        self
    }
}

impl AssetLoader for StubLoader {
    async fn load_model(&self, path: &str) -> Result<LoadedModel> {
        match self.models.get(path) {
            Some(model) => Ok(model.clone()),
            None => bail!("no such model: {}", path),
        }
    }

    async fn load_audio(&self, path: &str) -> Result<AudioData> {
        match self.audio.get(path) {
            Some(data) => Ok(data.clone()),
            None => bail!("no such audio: {}", path),
        }
    }
}

#[derive(Default)]
pub struct StubTracking {
    pub anchors: Vec<usize>,
    pub poses: HashMap<AnchorId, Transform>,
    pub queued: Vec<TargetEvent>,
    pub started: bool,
    pub fail_start: bool,
}

impl StubTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: TargetEvent) {
        self.queued.push(event);
    }
}

impl TrackingEngine for StubTracking {
    fn add_anchor(&mut self, target_index: usize) -> AnchorId {
        self.anchors.push(target_index);
        AnchorId(self.anchors.len() - 1)
    }

    async fn start(&mut self) -> Result<()> {
        if self.fail_start {
            bail!("camera permission denied");
        }
        self.started = true;
        Ok(())
    }

    fn anchor_pose(&self, anchor: AnchorId) -> Option<Transform> {
        self.poses.get(&anchor).cloned()
    }

    fn drain_events(&mut self) -> Vec<TargetEvent> {
        std::mem::take(&mut self.queued)
    }
}

#[derive(Default)]
pub struct StubAudio {
    pub tunings: Vec<SpatialTuning>,
    pub playing: Vec<bool>,
    pub play_calls: usize,
    pub stop_calls: usize,
    pub listener_updates: usize,
    pub source_poses: HashMap<usize, Transform>,
}

impl StubAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioEngine for StubAudio {
    async fn create_source(&mut self, _data: AudioData, tuning: SpatialTuning) -> Result<SourceId> {
        self.tunings.push(tuning);
        self.playing.push(false);
        Ok(SourceId(self.playing.len() - 1))
    }

    fn play(&mut self, source: SourceId) {
        self.play_calls += 1;
        if let Some(flag) = self.playing.get_mut(source.0) {
            *flag = true;
        }
    }

    fn stop(&mut self, source: SourceId) {
        self.stop_calls += 1;
        if let Some(flag) = self.playing.get_mut(source.0) {
            *flag = false;
        }
    }

    fn set_source_pose(&mut self, source: SourceId, pose: &Transform) {
        self.source_poses.insert(source.0, pose.clone());
    }

    fn set_listener_pose(&mut self, _pose: &Transform) {
        self.listener_updates += 1;
    }
}

#[derive(Default)]
pub struct StubRenderer {
    pub frames: usize,
    pub last_item_count: usize,
    pub last_anchor_poses: Vec<Transform>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneRenderer for StubRenderer {
    fn render(&mut self, items: &[DrawItem<'_>], _camera: &Camera) -> Result<()> {
        self.frames += 1;
        self.last_item_count = items.len();
        self.last_anchor_poses = items.iter().map(|item| item.anchor_pose.clone()).collect();
        Ok(())
    }
}
