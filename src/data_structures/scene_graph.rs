//! CPU-side scene graph.
//!
//! A hierarchical representation of one loaded model: nodes with local
//! transforms and optional triangle meshes. Unlike a render-side graph this one
//! carries no GPU resources; it exists so the orchestration layer can place
//! content under tracking anchors, retarget animation and hit-test geometry.
//! The renderer consumes it read-only each frame.

use crate::data_structures::transform::Transform;

/// Node identifiers follow the source document's node indices; wrapper nodes
/// added by the loader use ids past that range.
pub type NodeId = usize;

/// Triangle geometry for one node: positions plus an index list, enough for
/// ray intersection. Materials and textures are the renderer's business.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub local: Transform,
    pub mesh: Option<MeshData>,
    pub children: Vec<Node>,
}

impl Node {
    /// A mesh-less grouping node with identity transform.
    pub fn container(id: NodeId) -> Self {
        Self {
            id,
            name: String::new(),
            local: Transform::new(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(id: NodeId, mesh: MeshData) -> Self {
        Self {
            id,
            name: String::new(),
            local: Transform::new(),
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Depth-first search for a node by id.
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        for child in &mut self.children {
            if let Some(found) = child.find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Walks the subtree depth-first, handing each node its world transform
    /// (composed down from `parent`).
    pub fn visit(&self, parent: &Transform, f: &mut impl FnMut(&Node, &Transform)) {
        let world = parent * &self.local;
        f(self, &world);
        for child in &self.children {
            child.visit(&world, f);
        }
    }
}
