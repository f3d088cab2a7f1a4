//! Per-frame lighting uniforms.

use bytemuck::{Pod, Zeroable};

use tp_core::DirectionalLight;

use crate::buffers::{UniformBuffer, uniform_bind_group_layout};
use crate::config::LightingConfig;
use crate::pipeline::create_uniform_bind_group;

/// Frame uniform, mirrors `Frame` in `scene.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    /// Direction the light travels (xyz)
    pub light_direction: [f32; 4],
    /// Light color scaled by intensity (rgb)
    pub light_color: [f32; 4],
    /// Ambient color scaled by strength (rgb)
    pub ambient: [f32; 4],
    /// Tone mapping exposure
    pub exposure: f32,
    _pad: [f32; 3],
}

impl FrameUniform {
    /// Build the uniform from the scene light and ambient settings.
    pub fn new(light: &DirectionalLight, lighting: &LightingConfig, exposure: f32) -> Self {
        let direction = light.direction();
        let [r, g, b] = light.color;
        let [ar, ag, ab] = lighting.ambient_color;
        let ambient = lighting.ambient_strength;

        Self {
            light_direction: [direction.x, direction.y, direction.z, 0.0],
            light_color: [r * light.intensity, g * light.intensity, b * light.intensity, 1.0],
            ambient: [ar * ambient, ag * ambient, ab * ambient, 1.0],
            exposure,
            _pad: [0.0; 3],
        }
    }
}

/// Owns the frame uniform buffer and its bind group.
pub struct LightingSystem {
    uniform: UniformBuffer<FrameUniform>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl LightingSystem {
    /// Create the lighting system with a neutral light.
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = uniform_bind_group_layout(device, "Frame");
        let initial = FrameUniform {
            light_direction: [0.0, -1.0, 0.0, 0.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            ambient: [0.0, 0.0, 0.0, 1.0],
            exposure: 1.0,
            _pad: [0.0; 3],
        };
        let uniform = UniformBuffer::new(device, "Frame", initial);
        let bind_group = create_uniform_bind_group(device, &layout, uniform.buffer(), "Frame");

        Self {
            uniform,
            layout,
            bind_group,
        }
    }

    /// Upload the current light, ambient and exposure.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        light: &DirectionalLight,
        lighting: &LightingConfig,
        exposure: f32,
    ) {
        self.uniform.set(queue, FrameUniform::new(light, lighting, exposure));
    }

    /// Current uniform contents.
    pub fn uniform(&self) -> &FrameUniform {
        self.uniform.value()
    }

    /// Bind group layout for group 1 of the scene pipelines.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group for the main pass.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn test_frame_uniform_size() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 64);
    }

    #[test]
    fn test_frame_uniform_scales_light_and_ambient() {
        let light = DirectionalLight {
            color: [1.0, 0.5, 0.25],
            intensity: 2.0,
            position: Vec3::new(0.0, 4.0, 0.0),
        };
        let lighting = LightingConfig {
            ambient_color: [1.0, 1.0, 0.5],
            ambient_strength: 0.5,
        };
        let uniform = FrameUniform::new(&light, &lighting, 1.2);

        assert_eq!(uniform.light_color, [2.0, 1.0, 0.5, 1.0]);
        assert_eq!(uniform.ambient, [0.5, 0.5, 0.25, 1.0]);
        assert_relative_eq!(uniform.light_direction[1], -1.0);
        assert_relative_eq!(uniform.exposure, 1.2);
    }
}
