use anyhow::Result;

use crate::{camera::Camera, data_structures::scene_graph::Node, data_structures::transform::Transform};

/// One anchored subtree to draw this frame: a scene root and the world pose of
/// the anchor it hangs from.
#[derive(Debug)]
pub struct DrawItem<'a> {
    pub root: &'a Node,
    pub anchor_pose: Transform,
}

/// The renderer: issues one composed render per frame. Lost or failed scenes
/// never appear in `items`.
pub trait SceneRenderer {
    fn render(&mut self, items: &[DrawItem<'_>], camera: &Camera) -> Result<()>;
}
