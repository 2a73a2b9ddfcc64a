//! Perspective camera and pointer unprojection.
//!
//! The tracking engine drives the camera pose; this module owns the projection
//! parameters (the experience narrows the FOV after load for a zoom effect)
//! and converts device pixel coordinates into world-space rays for picking.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector4, perspective};

use crate::{data_structures::transform::Transform, pick::Ray};

#[derive(Clone, Debug)]
pub struct Camera {
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub width: u32,
    pub height: u32,
    /// World pose; view matrix is its inverse.
    pub pose: Transform,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 500.0,
            width,
            height,
            pose: Transform::new(),
        }
    }

    pub fn set_fov(&mut self, fovy: Deg<f32>) {
        self.fovy = fovy;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect(), self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Option<Matrix4<f32>> {
        self.pose.to_matrix().invert()
    }

    /// Device pixels to normalized device coordinates in [-1, 1], y up.
    pub fn ndc(&self, px: f32, py: f32) -> (f32, f32) {
        (
            (px / self.width.max(1) as f32) * 2.0 - 1.0,
            1.0 - (py / self.height.max(1) as f32) * 2.0,
        )
    }

    /// Casts a world-space ray from the camera through the given pixel by
    /// unprojecting the near and far NDC points. `None` when the camera
    /// matrices are degenerate (e.g. a zero-scale pose).
    pub fn pointer_ray(&self, px: f32, py: f32) -> Option<Ray> {
        let (x, y) = self.ndc(px, py);
        let view = self.view_matrix()?;
        let inverse_view_proj = (self.projection_matrix() * view).invert()?;

        let near = inverse_view_proj * Vector4::new(x, y, -1.0, 1.0);
        let far = inverse_view_proj * Vector4::new(x, y, 1.0, 1.0);
        if near.w.abs() <= f32::EPSILON || far.w.abs() <= f32::EPSILON {
            return None;
        }
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        let dir = far - near;
        if dir.magnitude2() <= f32::EPSILON {
            return None;
        }

        Some(Ray {
            origin: Point3::from_vec(near),
            dir: dir.normalize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn ndc_maps_corners_and_center() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.ndc(400.0, 300.0), (0.0, 0.0));
        assert_eq!(camera.ndc(0.0, 0.0), (-1.0, 1.0));
        assert_eq!(camera.ndc(800.0, 600.0), (1.0, -1.0));
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let camera = Camera::new(800, 600);
        let ray = camera.pointer_ray(400.0, 300.0).expect("ray");
        assert!((ray.dir - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-4);
        assert!(ray.origin.z < 0.0 && ray.origin.z > -1.0);
    }

    #[test]
    fn degenerate_pose_yields_no_ray() {
        let mut camera = Camera::new(800, 600);
        camera.pose.scale = Vector3::new(0.0, 0.0, 0.0);
        assert!(camera.pointer_ray(400.0, 300.0).is_none());
    }
}
