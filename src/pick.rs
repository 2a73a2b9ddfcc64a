//! Pointer hit-testing and the tap-to-cycle interaction controller.
//!
//! Picking here is a CPU raycast: the pointer position is unprojected into a
//! world-space ray which is intersected against the first scene's geometry
//! subtree (all other scenes are excluded from hit-testing by design).
//!
//! The flow on pointer-down:
//! 1. Convert device pixels to NDC and unproject to a ray through the camera
//! 2. Intersect the ray with scene 0 under its anchor's current pose
//! 3. On a hit, cut to the next animation clip in round-robin order
//!
//! Misses, an absent scene 0, a lost target and clip-less models are all
//! no-ops; the clip cursor only ever moves on a successful transition.

use cgmath::{InnerSpace, Matrix4, Point3, Vector3, Vector4};

use crate::{
    camera::Camera,
    data_structures::{scene_graph::Node, transform::Transform},
    engine::tracking::TrackingEngine,
    scene::SceneSlot,
};

const RAY_EPSILON: f32 = 1e-7;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub dir: Vector3<f32>,
}

/// Möller–Trumbore ray/triangle intersection. Returns the distance along the
/// ray, front and back faces alike.
pub fn intersect_triangle(
    ray: &Ray,
    a: Point3<f32>,
    b: Point3<f32>,
    c: Point3<f32>,
) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = ray.dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = ray.dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    (t > RAY_EPSILON).then_some(t)
}

fn transform_point(matrix: &Matrix4<f32>, p: [f32; 3]) -> Point3<f32> {
    let v = matrix * Vector4::new(p[0], p[1], p[2], 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Intersects a ray with a node subtree placed under `parent`. Returns the
/// nearest hit distance across all meshes in the subtree.
pub fn intersect_subtree(node: &Node, parent: &Transform, ray: &Ray) -> Option<f32> {
    let mut nearest: Option<f32> = None;
    node.visit(parent, &mut |node, world| {
        let Some(mesh) = &node.mesh else {
            return;
        };
        let matrix = world.to_matrix();
        for triangle in mesh.indices.chunks_exact(3) {
            let verts: Option<Vec<_>> = triangle
                .iter()
                .map(|&i| mesh.positions.get(i as usize).copied())
                .collect();
            let Some(verts) = verts else {
                log::warn!("mesh {} has out-of-range indices", mesh.name);
                continue;
            };
            let hit = intersect_triangle(
                ray,
                transform_point(&matrix, verts[0]),
                transform_point(&matrix, verts[1]),
                transform_point(&matrix, verts[2]),
            );
            if let Some(t) = hit {
                nearest = Some(nearest.map_or(t, |n: f32| n.min(t)));
            }
        }
    });
    nearest
}

/// Owns the clip cursor and resolves pointer-down events against scene 0.
#[derive(Debug, Default)]
pub struct Interaction {
    cursor: usize,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the clip the next successful tap will play.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handles one pointer-down at device pixel `(px, py)`. Performs at most
    /// one hit-test and at most one clip transition; returns whether a
    /// transition happened.
    pub fn tap<T: TrackingEngine>(
        &mut self,
        scenes: &mut [SceneSlot],
        tracking: &T,
        camera: &Camera,
        px: f32,
        py: f32,
    ) -> bool {
        // Only scene 0 is tappable; a failed slot 0 makes taps a no-op.
        let Some(SceneSlot::Loaded(scene)) = scenes.first_mut() else {
            return false;
        };
        let Some(ray) = camera.pointer_ray(px, py) else {
            return false;
        };
        // No pose means the target is lost and nothing is on screen to hit.
        let Some(pose) = tracking.anchor_pose(scene.anchor) else {
            return false;
        };
        if intersect_subtree(&scene.root, &pose, &ray).is_none() {
            return false;
        }
        let clip_count = scene.mixer.clip_count();
        if clip_count == 0 {
            return false;
        }

        scene.mixer.stop_all();
        scene.mixer.play(self.cursor);
        log::info!("playing clip {} of {}", self.cursor + 1, clip_count);
        self.cursor = (self.cursor + 1) % clip_count;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::scene_graph::MeshData;

    fn quad_mesh() -> MeshData {
        MeshData {
            name: "quad".into(),
            positions: vec![
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    fn ray_down_z() -> Ray {
        Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            dir: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    #[test]
    fn triangle_hit_and_miss() {
        let ray = ray_down_z();
        let hit = intersect_triangle(
            &ray,
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!((hit.unwrap() - 5.0).abs() < 1e-5);

        let miss = intersect_triangle(
            &ray,
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(3.0, 2.0, 0.0),
            Point3::new(2.5, 3.0, 0.0),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn subtree_hit_respects_world_transform() {
        let node = Node::with_mesh(0, quad_mesh());
        let centered = Transform::new();
        assert!(intersect_subtree(&node, &centered, &ray_down_z()).is_some());

        let shifted = Transform {
            position: Vector3::new(10.0, 0.0, 0.0),
            ..Transform::new()
        };
        assert!(intersect_subtree(&node, &shifted, &ray_down_z()).is_none());
    }

    #[test]
    fn nearest_of_stacked_meshes_wins() {
        let mut root = Node::container(2);
        let mut near = Node::with_mesh(0, quad_mesh());
        near.local.position = Vector3::new(0.0, 0.0, 2.0);
        let mut far = Node::with_mesh(1, quad_mesh());
        far.local.position = Vector3::new(0.0, 0.0, -2.0);
        root.add_child(far);
        root.add_child(near);

        let t = intersect_subtree(&root, &Transform::new(), &ray_down_z()).unwrap();
        assert!((t - 3.0).abs() < 1e-5);
    }
}
