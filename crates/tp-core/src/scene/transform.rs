//! Local transforms (position, XYZ Euler rotation, scale)

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local transform of a scene node, composed as translation * rotation * scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    /// Euler angles in radians, applied in XYZ order
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        rotation: [0.0; 3],
        scale: [1.0; 3],
    };

    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = [scale; 3];
        self
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation[0],
            self.rotation[1],
            self.rotation[2],
        )
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from(self.scale),
            self.to_quat(),
            Vec3::from(self.position),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(Transform::default().to_mat4(), Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let t = Transform::from_position([1.0, 2.0, 3.0])
            .with_rotation([0.0, FRAC_PI_2, 0.0])
            .with_uniform_scale(0.1);
        let p = t.to_mat4().transform_point3(Vec3::X);
        // +X scaled to 0.1, rotated a quarter turn about Y lands on -Z
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 2.9, epsilon = 1e-6);
    }
}
