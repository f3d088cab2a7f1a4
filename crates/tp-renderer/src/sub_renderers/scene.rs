//! Scene mesh renderer
//!
//! Draws every visible, drawable scene-graph node. Opaque nodes go first,
//! then blended nodes sorted back to front.

use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use uuid::Uuid;

use tp_core::{
    AnimatedMaterial, MaterialKind, NodeId, SceneGraph, SceneNode, TextureSlot, UniformDriver,
};

use crate::buffers::{UniformBuffer, uniform_bind_group_layout};
use crate::constants::material_mode;
use crate::pipeline::{PipelineConfig, create_uniform_bind_group};
use crate::renderer::MeshCache;
use crate::textures::TextureStore;
use crate::vertex::SceneVertex;

/// Per-node uniform block, mirrors `Node` in `scene.wgsl`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct NodeUniform {
    /// Local to world
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`
    pub normal_matrix: [[f32; 4]; 4],
    /// Base color for lit and glass materials
    pub base_color: [f32; 4],
    /// `uColorStart`, w unused
    pub color_start: [f32; 4],
    /// `uColorEnd`, w unused
    pub color_end: [f32; 4],
    /// One of [`material_mode`]
    pub mode: u32,
    /// `uTime`
    pub time: f32,
    /// Environment-map intensity
    pub env_intensity: f32,
    /// Glass roughness
    pub roughness: f32,
    /// Glass transmission
    pub transmission: f32,
    /// Glass thickness
    pub thickness: f32,
    /// Padding to 16 bytes
    pub _pad: [f32; 2],
}

impl NodeUniform {
    /// Uniform block for a node at a world transform.
    ///
    /// `None` for materials the scene pipeline does not draw.
    pub fn for_node(node: &SceneNode, world: Mat4, uniforms: &UniformDriver) -> Option<Self> {
        let mode = material_mode_of(&node.material)?;

        let mut uniform = Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            color_start: [0.0; 4],
            color_end: [0.0; 4],
            mode,
            time: 0.0,
            env_intensity: node.env_map_intensity,
            roughness: 0.0,
            transmission: 0.0,
            thickness: 0.0,
            _pad: [0.0; 2],
        };

        match node.material {
            MaterialKind::Standard { base_color } => uniform.base_color = base_color,
            MaterialKind::Glass(glass) => {
                uniform.roughness = glass.roughness;
                uniform.transmission = glass.transmission;
                uniform.thickness = glass.thickness;
            }
            _ => {}
        }

        if let Some(animated) = AnimatedMaterial::for_material(&node.material)
            && let Some(values) = uniforms.get(animated)
        {
            uniform.time = values.time;
            if let Some([r, g, b]) = values.color_start {
                uniform.color_start = [r, g, b, 1.0];
            }
            if let Some([r, g, b]) = values.color_end {
                uniform.color_end = [r, g, b, 1.0];
            }
        }

        Some(uniform)
    }
}

/// Shader mode for a material, `None` when the scene pipeline skips it
pub fn material_mode_of(kind: &MaterialKind) -> Option<u32> {
    match kind {
        MaterialKind::None | MaterialKind::Lines => None,
        MaterialKind::Baked => Some(material_mode::BAKED),
        MaterialKind::Standard { .. } => Some(material_mode::STANDARD),
        MaterialKind::ProjectorLight => Some(material_mode::PROJECTOR_LIGHT),
        MaterialKind::GlassBrickLight => Some(material_mode::GLASS_BRICK_LIGHT),
        MaterialKind::Glass(_) => Some(material_mode::GLASS),
        MaterialKind::Screen(_) => Some(material_mode::SCREEN),
        MaterialKind::Matcap => Some(material_mode::MATCAP),
        MaterialKind::Normal => Some(material_mode::NORMAL),
    }
}

/// Texture slots bound for a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialTextures {
    /// Sampled color (white when empty)
    pub color: Option<TextureSlot>,
    /// Alpha mask (white when empty)
    pub mask: Option<TextureSlot>,
}

impl MaterialTextures {
    /// Slots read by a material
    pub fn for_material(kind: &MaterialKind) -> Self {
        match kind {
            MaterialKind::Baked => Self {
                color: Some(TextureSlot::Baked),
                mask: None,
            },
            MaterialKind::Screen(video) => Self {
                color: Some(TextureSlot::Video(*video)),
                mask: None,
            },
            MaterialKind::Matcap => Self {
                color: Some(TextureSlot::Matcap),
                mask: Some(TextureSlot::Title),
            },
            _ => Self::default(),
        }
    }
}

/// Which pipeline variant draws a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Back-face culled, depth written
    Opaque,
    /// No culling, depth written
    DoubleSided,
    /// Alpha blended, no culling, depth tested but not written
    Blended,
}

impl PipelineKind {
    /// Variant for a node's material and sidedness
    pub fn for_node(node: &SceneNode) -> Self {
        if node.material.is_transparent() || node.material == MaterialKind::Matcap {
            Self::Blended
        } else if node.double_sided {
            Self::DoubleSided
        } else {
            Self::Opaque
        }
    }
}

/// One queued draw
#[derive(Debug, Clone, Copy)]
pub struct DrawItem {
    /// Node whose uniforms are bound
    pub node: NodeId,
    /// Mesh drawn
    pub mesh: Uuid,
    /// Texture set bound
    pub textures: MaterialTextures,
    /// Pipeline variant
    pub pipeline: PipelineKind,
    /// View-space depth of the mesh center (more negative is farther)
    pub view_depth: f32,
}

/// Opaque first in submission order, then blended back to front
pub fn sort_draws(draws: &mut [DrawItem]) {
    draws.sort_by(|a, b| {
        let a_blended = a.pipeline == PipelineKind::Blended;
        let b_blended = b.pipeline == PipelineKind::Blended;
        a_blended.cmp(&b_blended).then_with(|| {
            if a_blended {
                a.view_depth.total_cmp(&b.view_depth)
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
}

struct NodeEntry {
    uniform: UniformBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
}

/// Renderer for scene-graph meshes
pub struct SceneRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    blended_pipeline: wgpu::RenderPipeline,
    camera_bind_group: wgpu::BindGroup,
    node_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    color_sampler: wgpu::Sampler,
    environment_sampler: wgpu::Sampler,
    meshes: MeshCache,
    nodes: HashMap<NodeId, NodeEntry>,
    texture_groups: HashMap<MaterialTextures, wgpu::BindGroup>,
    texture_generation: Option<u64>,
    draws: Vec<DrawItem>,
}

impl SceneRenderer {
    /// Creates the scene pipelines.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        frame_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let camera_bind_group =
            create_uniform_bind_group(device, camera_bind_group_layout, camera_buffer, "Scene Camera");
        let node_layout = uniform_bind_group_layout(device, "Scene Node");
        let texture_layout = create_texture_layout(device);

        let layouts = [
            camera_bind_group_layout,
            frame_bind_group_layout,
            &node_layout,
            &texture_layout,
        ];
        let shader = include_str!("../shaders/scene.wgsl");
        let base = || {
            PipelineConfig::new("Scene", shader, format, depth_format, &layouts)
                .with_vertex_layouts(vec![SceneVertex::layout()])
                .with_sample_count(sample_count)
        };

        let opaque_pipeline = base()
            .with_cull_mode(Some(wgpu::Face::Back))
            .with_blend(None)
            .build(device);
        let double_sided_pipeline = base().with_blend(None).build(device);
        let blended_pipeline = base()
            .with_depth(false, wgpu::CompareFunction::Less)
            .build(device);

        let color_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Color Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let environment_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Environment Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            opaque_pipeline,
            double_sided_pipeline,
            blended_pipeline,
            camera_bind_group,
            node_layout,
            texture_layout,
            color_sampler,
            environment_sampler,
            meshes: MeshCache::new(),
            nodes: HashMap::new(),
            texture_groups: HashMap::new(),
            texture_generation: None,
            draws: Vec::new(),
        }
    }

    /// Number of draws queued by the last [`prepare`](Self::prepare)
    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Sync GPU state with the scene graph and queue this frame's draws.
    ///
    /// World transforms must be current.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneGraph,
        uniforms: &UniformDriver,
        textures: &TextureStore,
        view: Mat4,
    ) {
        if self.texture_generation != Some(textures.generation()) {
            self.texture_groups.clear();
            self.texture_generation = Some(textures.generation());
        }

        self.draws.clear();
        let mut live_meshes = HashSet::new();

        for (node, world) in scene.visible_drawables() {
            let Some(mesh) = node.mesh.as_ref() else {
                continue;
            };
            let Some(uniform) = NodeUniform::for_node(node, world, uniforms) else {
                continue;
            };
            if mesh.indices.is_empty() {
                continue;
            }

            live_meshes.insert(mesh.id);
            self.meshes.ensure(device, mesh);

            match self.nodes.get_mut(&node.id) {
                Some(entry) => {
                    entry.uniform.set(queue, uniform);
                }
                None => {
                    let buffer = UniformBuffer::new(device, &node.name, uniform);
                    let bind_group =
                        create_uniform_bind_group(device, &self.node_layout, buffer.buffer(), &node.name);
                    self.nodes.insert(
                        node.id,
                        NodeEntry {
                            uniform: buffer,
                            bind_group,
                        },
                    );
                }
            }

            let material_textures = MaterialTextures::for_material(&node.material);
            if !self.texture_groups.contains_key(&material_textures) {
                let group = self.create_texture_group(device, textures, material_textures);
                self.texture_groups.insert(material_textures, group);
            }

            self.draws.push(DrawItem {
                node: node.id,
                mesh: mesh.id,
                textures: material_textures,
                pipeline: PipelineKind::for_node(node),
                view_depth: view_depth(view, world, mesh.bounds().center().extend(1.0)),
            });
        }

        self.meshes.retain(&live_meshes);
        sort_draws(&mut self.draws);
    }

    fn create_texture_group(
        &self,
        device: &wgpu::Device,
        textures: &TextureStore,
        material: MaterialTextures,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(textures.color_view(material.color)),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(textures.color_view(material.mask)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.color_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(textures.environment_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.environment_sampler),
                },
            ],
        })
    }

    fn pipeline(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Opaque => &self.opaque_pipeline,
            PipelineKind::DoubleSided => &self.double_sided_pipeline,
            PipelineKind::Blended => &self.blended_pipeline,
        }
    }

    /// Render the queued draws
    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        frame_bind_group: &'a wgpu::BindGroup,
    ) {
        let mut bound: Option<PipelineKind> = None;

        for draw in &self.draws {
            let (Some(mesh), Some(node), Some(texture_group)) = (
                self.meshes.get(draw.mesh),
                self.nodes.get(&draw.node),
                self.texture_groups.get(&draw.textures),
            ) else {
                continue;
            };

            if bound != Some(draw.pipeline) {
                render_pass.set_pipeline(self.pipeline(draw.pipeline));
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_bind_group(1, frame_bind_group, &[]);
                bound = Some(draw.pipeline);
            }

            render_pass.set_bind_group(2, &node.bind_group, &[]);
            render_pass.set_bind_group(3, texture_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

fn create_texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture = |binding, filterable| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };
    let sampler = |binding, ty| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(ty),
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Texture Bind Group Layout"),
        entries: &[
            texture(0, true),
            texture(1, true),
            sampler(2, wgpu::SamplerBindingType::Filtering),
            // Rgba32Float is not filterable without an optional feature
            texture(3, false),
            sampler(4, wgpu::SamplerBindingType::NonFiltering),
        ],
    })
}

/// Transform of a point into view space, used for blended draw ordering
pub fn view_depth(view: Mat4, world: Mat4, local: Vec4) -> f32 {
    (view * world * local).z
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tp_core::primitive::generate_box_mesh;
    use tp_core::{AnimatedUniform, GlassParams, Transform};

    use super::*;

    fn draw(pipeline: PipelineKind, view_depth: f32) -> DrawItem {
        DrawItem {
            node: Uuid::new_v4(),
            mesh: Uuid::new_v4(),
            textures: MaterialTextures::default(),
            pipeline,
            view_depth,
        }
    }

    #[test]
    fn test_sort_puts_blended_last_back_to_front() {
        let mut draws = vec![
            draw(PipelineKind::Blended, -1.0),
            draw(PipelineKind::Opaque, -2.0),
            draw(PipelineKind::Blended, -5.0),
            draw(PipelineKind::DoubleSided, -3.0),
        ];
        sort_draws(&mut draws);

        assert_eq!(draws[0].pipeline, PipelineKind::Opaque);
        assert_eq!(draws[1].pipeline, PipelineKind::DoubleSided);
        assert_eq!(draws[2].view_depth, -5.0);
        assert_eq!(draws[3].view_depth, -1.0);
    }

    #[test]
    fn test_pipeline_kind_for_materials() {
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let glass = SceneNode::mesh("brick", mesh.clone(), MaterialKind::Glass(GlassParams::default()))
            .double_sided();
        let baked = SceneNode::mesh("baked", mesh.clone(), MaterialKind::Baked);
        let marker = SceneNode::mesh("marker", mesh.clone(), MaterialKind::Normal).double_sided();
        let title = SceneNode::mesh("title", mesh, MaterialKind::Matcap);

        assert_eq!(PipelineKind::for_node(&glass), PipelineKind::Blended);
        assert_eq!(PipelineKind::for_node(&baked), PipelineKind::Opaque);
        assert_eq!(PipelineKind::for_node(&marker), PipelineKind::DoubleSided);
        assert_eq!(PipelineKind::for_node(&title), PipelineKind::Blended);
    }

    #[test]
    fn test_node_uniform_reads_animated_values() {
        let mut driver = UniformDriver::new();
        driver.register(
            AnimatedMaterial::GlassBrickLight,
            AnimatedUniform::timed().with_colors([0.1, 0.2, 0.3], [0.4, 0.5, 0.6]),
        );
        driver.publish(7.5);

        let mesh = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let node = SceneNode::mesh("glassBrickLight_00", mesh, MaterialKind::GlassBrickLight);
        let uniform = NodeUniform::for_node(&node, Mat4::IDENTITY, &driver).expect("drawable");

        assert_eq!(uniform.mode, material_mode::GLASS_BRICK_LIGHT);
        assert_eq!(uniform.time, 7.5);
        assert_eq!(uniform.color_start, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(uniform.color_end, [0.4, 0.5, 0.6, 1.0]);
    }

    #[test]
    fn test_node_uniform_glass_and_env_intensity() {
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let mut node = SceneNode::mesh("brick", mesh, MaterialKind::Glass(GlassParams::default()));
        node.env_map_intensity = 2.5;
        let world = Transform::from_position([1.0, 2.0, 3.0]).to_mat4();
        let uniform = NodeUniform::for_node(&node, world, &UniformDriver::new()).expect("drawable");

        assert_eq!(uniform.mode, material_mode::GLASS);
        assert_eq!(uniform.env_intensity, 2.5);
        assert_eq!(uniform.roughness, 0.15);
        assert_eq!(uniform.transmission, 1.0);
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.time, 0.0);
    }

    #[test]
    fn test_lines_and_groups_are_not_drawn() {
        assert!(material_mode_of(&MaterialKind::Lines).is_none());
        assert!(material_mode_of(&MaterialKind::None).is_none());
        assert_eq!(material_mode_of(&MaterialKind::Screen(1)), Some(material_mode::SCREEN));
    }

    #[test]
    fn test_material_textures() {
        let title = MaterialTextures::for_material(&MaterialKind::Matcap);
        assert_eq!(title.color, Some(TextureSlot::Matcap));
        assert_eq!(title.mask, Some(TextureSlot::Title));
        let screen = MaterialTextures::for_material(&MaterialKind::Screen(1));
        assert_eq!(screen.color, Some(TextureSlot::Video(1)));
        assert_eq!(
            MaterialTextures::for_material(&MaterialKind::Normal),
            MaterialTextures::default()
        );
    }

    #[test]
    fn test_view_depth_is_negative_in_front_of_camera() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let depth = view_depth(view, Mat4::IDENTITY, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!((depth + 5.0).abs() < 1e-5);
    }
}
