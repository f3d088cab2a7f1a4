//! Camera matrices and world/NDC conversion

use glam::{Mat4, Vec3};

use crate::raycast::Ray;

/// Snapshot of a camera used for projection and picking.
///
/// Projection matrices use a [0, 1] depth range (`Mat4::perspective_rh`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraView {
    pub fn new(position: Vec3, view: Mat4, projection: Mat4) -> Self {
        Self {
            position,
            view,
            projection,
        }
    }

    /// Perspective camera at `position` looking at `target`, Y up
    pub fn look_at(
        position: Vec3,
        target: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            view: Mat4::look_at_rh(position, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y_radians, aspect, near, far),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World point to normalized device coordinates. Points outside the
    /// view volume are returned as-is, not clipped.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// NDC point back to world space
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Ray from the camera position through an NDC xy location
    pub fn ray_through_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let through = self.unproject(Vec3::new(ndc_x, ndc_y, 0.5));
        Ray::new(self.position, through - self.position)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    fn forward_camera() -> CameraView {
        CameraView::look_at(Vec3::ZERO, Vec3::NEG_Z, FRAC_PI_2, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_project_center_and_edge() {
        let camera = forward_camera();
        let center = camera.project(Vec3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);

        // 90 degree fov: x == -z maps to the right edge
        let edge = camera.project(Vec3::new(2.0, 0.0, -2.0));
        assert_relative_eq!(edge.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_out_of_view_point_is_not_clipped() {
        let ndc = forward_camera().project(Vec3::new(3.0, 0.0, -1.0));
        assert_relative_eq!(ndc.x, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_through_ndc_passes_through_projected_point() {
        let camera = CameraView::look_at(
            Vec3::new(3.595, 1.118, -1.75),
            Vec3::ZERO,
            75f32.to_radians(),
            16.0 / 9.0,
            0.1,
            100.0,
        );
        let anchor = Vec3::new(1.9, 0.4, -0.06);
        let ndc = camera.project(anchor);
        let ray = camera.ray_through_ndc(ndc.x, ndc.y);

        assert_eq!(ray.origin, camera.position);
        let expected = (anchor - camera.position).normalize();
        assert_relative_eq!(ray.direction.dot(expected), 1.0, epsilon = 1e-4);
    }
}
