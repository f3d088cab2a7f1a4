//! Main renderer combining all sub-renderers.
//!
//! The [`Renderer`] owns the shared GPU state (camera and frame uniforms,
//! textures, depth and MSAA targets) and drives the sub-renderers:
//! - [`SceneRenderer`]: scene-graph meshes in opaque and blended passes
//! - [`AxisRenderer`]: the axes helper
//! - [`OverlayRenderer`]: the fullscreen loading overlay
//!
//! Each frame the caller uploads pending textures, calls
//! [`Renderer::prepare`] with a [`FrameInputs`] snapshot and then
//! [`Renderer::render`] into its target view.

mod gpu_resources;
mod lighting_system;
mod mesh_cache;
mod render_pass;

pub use lighting_system::{FrameUniform, LightingSystem};
pub use mesh_cache::{GpuMesh, MeshCache};

use glam::Mat4;

use tp_core::{DirectionalLight, NodeId, SceneGraph, SessionContext, TextureUpload, UniformDriver};

use crate::buffers::{UniformBuffer, uniform_bind_group_layout};
use crate::camera::{CameraUniform, OrbitCamera};
use crate::config::RendererConfig;
use crate::constants::viewport::DEPTH_FORMAT;
use crate::sub_renderers::{AxisRenderer, OverlayRenderer, SceneRenderer};
use crate::textures::TextureStore;

use render_pass::{MainPassParams, render_main_pass};

/// Everything the renderer reads from the session for one frame.
pub struct FrameInputs<'a> {
    /// Camera matrices
    pub camera: CameraUniform,
    /// Scene graph with current world transforms
    pub scene: &'a SceneGraph,
    /// Published animated uniforms
    pub uniforms: &'a UniformDriver,
    /// Directional light
    pub light: &'a DirectionalLight,
    /// Axes helper world transform, `None` when hidden
    pub axes: Option<Mat4>,
    /// Tone mapping exposure
    pub exposure: f32,
    /// Loading overlay alpha
    pub overlay_alpha: f32,
}

impl<'a> FrameInputs<'a> {
    /// Snapshot the session after its frame update.
    pub fn from_session(session: &'a SessionContext, camera: &OrbitCamera, overlay_alpha: f32) -> Self {
        Self {
            camera: camera.uniform(),
            scene: &session.scene,
            uniforms: &session.uniforms,
            light: &session.light,
            axes: session
                .handles
                .axes
                .and_then(|id| helper_transform(&session.scene, id)),
            exposure: session.config.tone_mapping_exposure,
            overlay_alpha,
        }
    }
}

fn helper_transform(scene: &SceneGraph, id: NodeId) -> Option<Mat4> {
    if !scene.is_visible_in_tree(id) {
        return None;
    }
    scene.world_transform(id)
}

/// Main renderer
pub struct Renderer {
    config: RendererConfig,
    camera_buffer: UniformBuffer<CameraUniform>,
    #[allow(dead_code)] // Held for pipeline layout lifetime
    camera_bind_group_layout: wgpu::BindGroupLayout,
    lighting: LightingSystem,
    textures: TextureStore,
    scene_renderer: SceneRenderer,
    axis_renderer: AxisRenderer,
    overlay_renderer: OverlayRenderer,
    #[allow(dead_code)] // Held for GPU resource lifetime
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    #[allow(dead_code)] // Held for GPU resource lifetime
    msaa_texture: Option<wgpu::Texture>,
    msaa_view: Option<wgpu::TextureView>,
    sample_count: u32,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Create a renderer drawing into `format` targets of the given size.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: RendererConfig,
    ) -> Self {
        let sample_count = config.viewport.sample_count();

        let camera_bind_group_layout = uniform_bind_group_layout(device, "Camera");
        let camera_buffer = UniformBuffer::new(device, "Camera", CameraUniform::default());
        let lighting = LightingSystem::new(device);
        let textures = TextureStore::new(device, queue);

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, DEPTH_FORMAT, width, height, sample_count);
        let (msaa_texture, msaa_view) =
            match gpu_resources::create_msaa_texture(device, format, width, height, sample_count) {
                Some((tex, view)) => (Some(tex), Some(view)),
                None => (None, None),
            };

        let scene_renderer = SceneRenderer::new(
            device,
            format,
            DEPTH_FORMAT,
            sample_count,
            &camera_bind_group_layout,
            camera_buffer.buffer(),
            lighting.layout(),
        );

        let axis_renderer = AxisRenderer::new(
            device,
            format,
            DEPTH_FORMAT,
            sample_count,
            &camera_bind_group_layout,
            camera_buffer.buffer(),
        );

        let overlay_renderer = OverlayRenderer::new(device, format, DEPTH_FORMAT, sample_count);

        tracing::info!(
            "Renderer created: {}x{} {:?}, {}x MSAA",
            width,
            height,
            format,
            sample_count
        );

        Self {
            config,
            camera_buffer,
            camera_bind_group_layout,
            lighting,
            textures,
            scene_renderer,
            axis_renderer,
            overlay_renderer,
            depth_texture,
            depth_view,
            msaa_texture,
            msaa_view,
            sample_count,
            format,
            width,
            height,
        }
    }

    /// Resize the render targets.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        let (depth_texture, depth_view) =
            gpu_resources::create_depth_texture(device, DEPTH_FORMAT, width, height, self.sample_count);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        let msaa_result =
            gpu_resources::create_msaa_texture(device, self.format, width, height, self.sample_count);
        let (msaa_texture, msaa_view) = match msaa_result {
            Some((tex, view)) => (Some(tex), Some(view)),
            None => (None, None),
        };
        self.msaa_texture = msaa_texture;
        self.msaa_view = msaa_view;
    }

    /// Returns the texture format used by the renderer.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Current render target size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Renderer settings in use.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Number of scene draws in the last prepared frame.
    pub fn draw_count(&self) -> usize {
        self.scene_renderer.draw_count()
    }

    /// Upload decoded images into their texture slots.
    pub fn upload_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uploads: &[TextureUpload],
    ) {
        for upload in uploads {
            self.textures.upload(device, queue, upload);
        }
    }

    /// Write this frame's uniforms and queue draws.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &FrameInputs<'_>) {
        self.camera_buffer.set(queue, frame.camera);
        self.lighting
            .update(queue, frame.light, &self.config.lighting, frame.exposure);

        let view = Mat4::from_cols_array_2d(&frame.camera.view);
        self.scene_renderer.prepare(
            device,
            queue,
            frame.scene,
            frame.uniforms,
            &self.textures,
            view,
        );
        self.axis_renderer.set_helper(queue, frame.axes);
        self.overlay_renderer.set_alpha(queue, frame.overlay_alpha);
    }

    /// Record the main pass into `encoder`, targeting `view`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let params = MainPassParams {
            scene: &self.scene_renderer,
            axes: &self.axis_renderer,
            overlay: &self.overlay_renderer,
            frame_bind_group: self.lighting.bind_group(),
            depth_view: &self.depth_view,
            msaa_view: self.msaa_view.as_ref(),
            clear_color: self.config.viewport.clear_color(),
        };
        render_main_pass(encoder, view, &params);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tp_core::SceneConfig;

    use super::*;
    use crate::config::ControlsConfig;

    #[test]
    fn test_frame_inputs_track_axes_visibility() {
        let config = SceneConfig {
            axes_visible: true,
            ..SceneConfig::default()
        };
        let mut session = SessionContext::new(config);
        session.scene.update_world_transforms();
        let camera = OrbitCamera::from_config(&session.config.camera, ControlsConfig::default());

        let inputs = FrameInputs::from_session(&session, &camera, 1.0);
        let axes = inputs.axes.expect("axes helper shown");
        let scale = axes.to_scale_rotation_translation().0;
        assert!((scale - Vec3::splat(session.config.axes_size)).length() < 1e-5);
        assert_eq!(inputs.exposure, session.config.tone_mapping_exposure);

        let axes_id = session.handles.axes.expect("axes node");
        if let Some(node) = session.scene.get_mut(axes_id) {
            node.visible = false;
        }
        let inputs = FrameInputs::from_session(&session, &camera, 1.0);
        assert!(inputs.axes.is_none());
    }
}
