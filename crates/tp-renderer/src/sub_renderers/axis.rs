//! Axes helper renderer
//!
//! Red, green and blue unit lines along X, Y and Z, drawn at the helper
//! node's world transform while it is visible.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::buffers::InstanceBuffer;
use crate::constants::instances;
use crate::pipeline::{PipelineConfig, create_uniform_bind_group};
use crate::vertex::{PositionColorVertex, mat4_instance_attributes};

/// Axis instance data - passed as vertex instance
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct AxisInstance {
    /// World transform of the helper
    pub transform: [[f32; 4]; 4],
    /// Extra length scale on top of the transform
    pub scale: f32,
    /// Padding to 16 bytes
    pub _pad: [f32; 3],
}

impl Default for AxisInstance {
    fn default() -> Self {
        Self {
            transform: Mat4::IDENTITY.to_cols_array_2d(),
            scale: 1.0,
            _pad: [0.0; 3],
        }
    }
}

/// Axes helper renderer
pub struct AxisRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instances: InstanceBuffer<AxisInstance>,
    bind_group: wgpu::BindGroup,
}

impl AxisRenderer {
    /// Creates the line pipeline and unit axes geometry.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
    ) -> Self {
        let bind_group =
            create_uniform_bind_group(device, camera_bind_group_layout, camera_buffer, "Axis Camera");

        // Instance buffer layout: Mat4 (4 x Float32x4) + scale + padding (Float32x4)
        let mat4_attrs = mat4_instance_attributes(2);
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<AxisInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                mat4_attrs[0],
                mat4_attrs[1],
                mat4_attrs[2],
                mat4_attrs[3],
                wgpu::VertexAttribute {
                    offset: 64,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        };

        let pipeline = PipelineConfig::new(
            "Axis",
            include_str!("../shaders/axis.wgsl"),
            format,
            depth_format,
            &[camera_bind_group_layout],
        )
        .with_vertex_layouts(vec![PositionColorVertex::layout(), instance_layout])
        .with_topology(wgpu::PrimitiveTopology::LineList)
        .with_sample_count(sample_count)
        .build(device);

        let vertices = generate_axis_vertices();
        let vertex_count = vertices.len() as u32;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axis Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instances = InstanceBuffer::new(device, "Axis", instances::MAX_AXES);

        Self {
            pipeline,
            vertex_buffer,
            vertex_count,
            instances,
            bind_group,
        }
    }

    /// Show the helper at `transform`, or hide it with `None`
    pub fn set_helper(&mut self, queue: &wgpu::Queue, transform: Option<Mat4>) {
        match transform {
            Some(transform) => {
                let instance = AxisInstance {
                    transform: transform.to_cols_array_2d(),
                    ..AxisInstance::default()
                };
                self.instances.update(queue, &[instance]);
            }
            None => self.instances.update(queue, &[]),
        }
    }

    /// Whether the helper will be drawn
    pub fn is_visible(&self) -> bool {
        !self.instances.is_empty()
    }

    /// Draw the helper lines
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.instances.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.slice());
        render_pass.draw(0..self.vertex_count, 0..self.instances.count());
    }
}

fn generate_axis_vertices() -> Vec<PositionColorVertex> {
    vec![
        // X axis (red)
        PositionColorVertex {
            position: [0.0, 0.0, 0.0],
            color: [1.0, 0.0, 0.0],
        },
        PositionColorVertex {
            position: [1.0, 0.0, 0.0],
            color: [1.0, 0.0, 0.0],
        },
        // Y axis (green)
        PositionColorVertex {
            position: [0.0, 0.0, 0.0],
            color: [0.0, 1.0, 0.0],
        },
        PositionColorVertex {
            position: [0.0, 1.0, 0.0],
            color: [0.0, 1.0, 0.0],
        },
        // Z axis (blue)
        PositionColorVertex {
            position: [0.0, 0.0, 0.0],
            color: [0.0, 0.0, 1.0],
        },
        PositionColorVertex {
            position: [0.0, 0.0, 1.0],
            color: [0.0, 0.0, 1.0],
        },
    ]
}
