//! Main render pass execution.

use crate::sub_renderers::{AxisRenderer, OverlayRenderer, SceneRenderer};

/// Main pass parameters.
pub struct MainPassParams<'a> {
    /// Scene-graph meshes.
    pub scene: &'a SceneRenderer,
    /// Axes helper.
    pub axes: &'a AxisRenderer,
    /// Loading overlay.
    pub overlay: &'a OverlayRenderer,
    /// Light and exposure uniforms.
    pub frame_bind_group: &'a wgpu::BindGroup,
    /// Depth view.
    pub depth_view: &'a wgpu::TextureView,
    /// MSAA view (if MSAA is enabled).
    pub msaa_view: Option<&'a wgpu::TextureView>,
    /// Clear color.
    pub clear_color: wgpu::Color,
}

/// Execute the main render pass: scene, then helper lines, then the overlay.
pub fn render_main_pass(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    params: &MainPassParams<'_>,
) {
    let (target, resolve_target) = match params.msaa_view {
        Some(msaa_view) => (msaa_view, Some(view)),
        None => (view, None),
    };

    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Main Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(params.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: params.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    params.scene.render(&mut render_pass, params.frame_bind_group);
    params.axes.render(&mut render_pass);
    params.overlay.render(&mut render_pass);
}
