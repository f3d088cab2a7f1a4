//! Fullscreen loading overlay
//!
//! A black quad over the whole viewport whose alpha follows the scripted
//! fade. Nothing is drawn once the alpha reaches zero.

use bytemuck::{Pod, Zeroable};

use crate::buffers::{UniformBuffer, uniform_bind_group_layout};
use crate::pipeline::{PipelineConfig, create_uniform_bind_group};

/// Overlay uniform, mirrors `Overlay` in `overlay.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverlayUniform {
    /// Overlay color (RGB)
    pub color: [f32; 3],
    /// `uAlpha`
    pub alpha: f32,
}

impl Default for OverlayUniform {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0],
            alpha: 1.0,
        }
    }
}

/// Renderer for the loading overlay
pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform: UniformBuffer<OverlayUniform>,
    bind_group: wgpu::BindGroup,
}

impl OverlayRenderer {
    /// Creates the overlay pipeline, initially opaque.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let layout = uniform_bind_group_layout(device, "Overlay");
        let uniform = UniformBuffer::new(device, "Overlay", OverlayUniform::default());
        let bind_group = create_uniform_bind_group(device, &layout, uniform.buffer(), "Overlay");

        let pipeline = PipelineConfig::new(
            "Overlay",
            include_str!("../shaders/overlay.wgsl"),
            format,
            depth_format,
            &[&layout],
        )
        .without_depth_test()
        .with_sample_count(sample_count)
        .build(device);

        Self {
            pipeline,
            uniform,
            bind_group,
        }
    }

    /// Set the overlay alpha, clamped to [0, 1]
    pub fn set_alpha(&mut self, queue: &wgpu::Queue, alpha: f32) {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        self.uniform.set(
            queue,
            OverlayUniform {
                alpha,
                ..*self.uniform.value()
            },
        );
    }

    /// Current alpha
    pub fn alpha(&self) -> f32 {
        self.uniform.value().alpha
    }

    /// Draw the overlay on top of everything
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.alpha() <= 0.0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_uniform_layout() {
        assert_eq!(std::mem::size_of::<OverlayUniform>(), 16);
        assert_eq!(OverlayUniform::default().alpha, 1.0);
    }
}
