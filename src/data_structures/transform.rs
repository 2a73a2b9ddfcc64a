//! Local/world transform data for scene composition.
//!
//! Every scene-graph node carries a `Transform` as its local placement; world
//! placement is the composition of all ancestors (`parent * local`), with the
//! tracking anchor's pose as the outermost parent.

use std::ops::Mul;

use cgmath::{Euler, Matrix4, One, Rad, Vector3};

/// Position, rotation (as quaternion) and scale of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Builds a transform from a position, Euler rotation (radians, XYZ order)
    /// and a per-axis scale, exactly as scene descriptors specify them.
    pub fn from_trs(
        position: Vector3<f32>,
        rotation: Vector3<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        let rotation = Euler::new(Rad(rotation.x), Rad(rotation.y), Rad(rotation.z)).into();
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Transform {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Quaternion, Rotation};

    #[test]
    fn identity_composition_is_neutral() {
        let t = Transform::from_trs(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 2.0),
        );
        let composed = &Transform::new() * &t;
        assert_eq!(composed, t);
    }

    #[test]
    fn parent_scale_applies_to_child_position() {
        let parent = Transform {
            position: Vector3::new(10.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(2.0, 2.0, 2.0),
        };
        let child = Transform {
            position: Vector3::new(1.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        };
        let world = &parent * &child;
        assert_eq!(world.position, Vector3::new(12.0, 0.0, 0.0));
        assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn from_trs_builds_euler_rotation() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let t = Transform::from_trs(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, half_pi, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        // Rotating +X by 90 degrees around Y lands on -Z.
        let rotated = t.rotation.rotate_vector(Vector3::new(1.0, 0.0, 0.0));
        assert!((rotated - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }
}
