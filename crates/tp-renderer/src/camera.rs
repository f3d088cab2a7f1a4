//! Orbit camera for the 3D viewport
//!
//! Y-up orbit around a target with damped rotation and panning. Input
//! accumulates into pending deltas; [`OrbitCamera::update`] applies a
//! frame-rate independent share of them each frame and decays the rest.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use tp_core::config::CameraConfig;
use tp_core::{CameraControls, CameraView};

use crate::config::ControlsConfig;
use crate::constants::camera::{POLAR_EPSILON, REFERENCE_FPS, REST_THRESHOLD, ZOOM_STEP};

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection times view
    pub view_proj: [[f32; 4]; 4],
    /// World to view
    pub view: [[f32; 4]; 4],
    /// View to clip
    pub proj: [[f32; 4]; 4],
    /// Camera position, w = 1
    pub eye: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            view: identity,
            proj: identity,
            eye: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Spherical coordinates around the orbit target, Y up.
///
/// `theta` is measured around Y from +Z, `phi` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Damped orbit camera
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Share of pending motion applied per frame at 60 fps
    pub damping: f32,
    controls: ControlsConfig,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    pending_scale: f32,
}

impl OrbitCamera {
    /// Camera posed as described by the scene configuration
    pub fn from_config(config: &CameraConfig, controls: ControlsConfig) -> Self {
        let target = Vec3::from_array(config.target);
        Self {
            target,
            fov: config.fov_degrees.to_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
            damping: config.damping.clamp(0.0, 1.0),
            controls,
            spherical: Spherical::from_offset(Vec3::from_array(config.position) - target),
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    /// Current eye position
    pub fn position(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    /// Distance from the eye to the target
    pub fn distance(&self) -> f32 {
        self.spherical.radius
    }

    /// Move the eye, keeping the target. Pending motion is dropped.
    pub fn set_position(&mut self, position: Vec3) {
        self.spherical = Spherical::from_offset(position - self.target);
        self.stop();
    }

    /// Discard any motion still being damped out
    pub fn stop(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_offset = Vec3::ZERO;
        self.pending_scale = 1.0;
    }

    /// Whether motion is still pending
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > REST_THRESHOLD
            || self.delta_phi.abs() > REST_THRESHOLD
            || self.pan_offset.length_squared() > REST_THRESHOLD * REST_THRESHOLD
            || (self.pending_scale - 1.0).abs() > REST_THRESHOLD
    }

    /// Rotate from a pointer drag of `dx, dy` pixels in a viewport of
    /// `height` pixels. A drag across the full height turns one revolution.
    pub fn orbit(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let speed = self.controls.orbit_sensitivity;
        self.delta_theta -= TAU * dx / height * speed;
        self.delta_phi -= TAU * dy / height * speed;
    }

    /// Pan in screen space from a pointer drag of `dx, dy` pixels.
    /// The point under the cursor stays under the cursor at the target depth.
    pub fn pan(&mut self, dx: f32, dy: f32, height: f32) {
        if height <= 0.0 {
            return;
        }
        let target_distance = self.spherical.radius * (self.fov / 2.0).tan();
        let scale = 2.0 * target_distance / height * self.controls.pan_sensitivity;

        let camera_to_world = self.view_matrix().inverse();
        let right = camera_to_world.x_axis.truncate();
        let up = camera_to_world.y_axis.truncate();
        self.pan_offset += right * (-dx * scale) + up * (dy * scale);
    }

    /// Dolly towards the target by `steps` scroll steps (negative moves away)
    pub fn dolly(&mut self, steps: f32) {
        self.pending_scale *= ZOOM_STEP.powf(steps * self.controls.zoom_sensitivity);
    }

    /// World to view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// View to clip matrix, depth in [0, 1]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Snapshot for projection and picking
    pub fn view(&self) -> CameraView {
        CameraView::new(self.position(), self.view_matrix(), self.projection_matrix())
    }

    /// Get camera uniform data
    pub fn uniform(&self) -> CameraUniform {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        let view_proj = proj * view;
        let eye = self.position();

        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
        }
    }

    /// Share of pending motion applied over `dt` seconds
    fn damping_factor(&self, dt: f32) -> f32 {
        if self.damping >= 1.0 {
            return 1.0;
        }
        1.0 - (1.0 - self.damping).powf(dt.max(0.0) * REFERENCE_FPS)
    }

    fn step(&mut self, dt: f32) {
        let factor = self.damping_factor(dt);

        self.spherical.theta += self.delta_theta * factor;
        self.spherical.phi = (self.spherical.phi + self.delta_phi * factor)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.target += self.pan_offset * factor;

        self.spherical.radius = (self.spherical.radius * self.pending_scale)
            .clamp(self.controls.min_distance, self.controls.max_distance);
        self.pending_scale = 1.0;

        let keep = 1.0 - factor;
        self.delta_theta *= keep;
        self.delta_phi *= keep;
        self.pan_offset *= keep;
        if !self.is_moving() {
            self.stop();
        }
    }
}

impl CameraControls for OrbitCamera {
    fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    fn update(&mut self, dt: f32) -> CameraView {
        self.step(dt);
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_config(&CameraConfig::default(), ControlsConfig::default())
    }

    #[test]
    fn test_initial_pose_matches_config() {
        let config = CameraConfig::default();
        let camera = camera();
        let position = camera.position();
        assert_relative_eq!(position.x, config.position[0], epsilon = 1e-5);
        assert_relative_eq!(position.y, config.position[1], epsilon = 1e-5);
        assert_relative_eq!(position.z, config.position[2], epsilon = 1e-5);
        assert_relative_eq!(camera.fov, 75f32.to_radians());
    }

    #[test]
    fn test_update_without_input_keeps_pose() {
        let mut camera = camera();
        let before = camera.position();
        let view = camera.update(FRAME);
        assert_relative_eq!(view.position.x, before.x, epsilon = 1e-6);
        assert_relative_eq!(view.position.y, before.y, epsilon = 1e-6);
        assert_relative_eq!(view.position.z, before.z, epsilon = 1e-6);
    }

    #[test]
    fn test_damping_decays_and_converges() {
        let mut camera = camera();
        let start_theta = camera.spherical.theta;
        camera.orbit(100.0, 0.0, 720.0);
        let total = camera.delta_theta;

        let mut previous_remaining = total.abs();
        for _ in 0..600 {
            camera.update(FRAME);
            let remaining = camera.delta_theta.abs();
            assert!(remaining <= previous_remaining);
            previous_remaining = remaining;
        }

        assert!(!camera.is_moving());
        assert_relative_eq!(camera.spherical.theta, start_theta + total, epsilon = 1e-3);
    }

    #[test]
    fn test_damping_is_frame_rate_independent() {
        let mut fast = camera();
        let mut slow = camera();
        fast.orbit(50.0, 20.0, 720.0);
        slow.orbit(50.0, 20.0, 720.0);

        for _ in 0..4 {
            fast.update(FRAME);
        }
        slow.update(4.0 * FRAME);

        assert_relative_eq!(fast.spherical.theta, slow.spherical.theta, epsilon = 1e-5);
        assert_relative_eq!(fast.spherical.phi, slow.spherical.phi, epsilon = 1e-5);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut camera = camera();
        camera.orbit(0.0, -100_000.0, 720.0);
        for _ in 0..600 {
            camera.update(FRAME);
        }
        assert!(camera.spherical.phi <= PI - POLAR_EPSILON);
        assert!(camera.position().is_finite());
    }

    #[test]
    fn test_dolly_changes_distance_immediately() {
        let mut camera = camera();
        let before = camera.distance();
        camera.dolly(1.0);
        camera.update(FRAME);
        assert_relative_eq!(camera.distance(), before * ZOOM_STEP, epsilon = 1e-5);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut camera = camera();
        let offset_before = camera.position() - camera.target;
        camera.pan(40.0, 0.0, 720.0);
        for _ in 0..600 {
            camera.update(FRAME);
        }
        assert!(camera.target.length() > 0.0);
        let offset_after = camera.position() - camera.target;
        assert_relative_eq!(offset_before.x, offset_after.x, epsilon = 1e-4);
        assert_relative_eq!(offset_before.z, offset_after.z, epsilon = 1e-4);
    }

    #[test]
    fn test_set_position_drops_pending_motion() {
        let mut camera = camera();
        camera.orbit(100.0, 100.0, 720.0);
        camera.set_position(Vec3::new(0.0, 2.0, 4.0));
        assert!(!camera.is_moving());
        let view = camera.update(FRAME);
        assert_relative_eq!(view.position.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(view.position.z, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_set_aspect_ignores_degenerate_values() {
        let mut camera = camera();
        camera.set_aspect(16.0 / 9.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_relative_eq!(camera.aspect, 16.0 / 9.0);
    }
}
