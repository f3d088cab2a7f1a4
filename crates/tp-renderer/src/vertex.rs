//! Vertex attribute utilities
//!
//! This module provides utilities for defining vertex attributes with
//! type-safe offset calculation using `std::mem::offset_of!`.

use tp_core::CpuMesh;

/// Creates a vertex attribute with the offset calculated from the struct field.
///
/// This macro uses `std::mem::offset_of!` to ensure that the offset is always
/// correct, even if the struct layout changes.
///
/// # Example
///
/// ```ignore
/// #[repr(C)]
/// struct MyVertex {
///     position: [f32; 3],
///     normal: [f32; 3],
///     color: [f32; 4],
/// }
///
/// const VERTEX_ATTRIBUTES: &[wgpu::VertexAttribute] = &[
///     vertex_attr!(MyVertex, position, 0, Float32x3),
///     vertex_attr!(MyVertex, normal, 1, Float32x3),
///     vertex_attr!(MyVertex, color, 2, Float32x4),
/// ];
/// ```
#[macro_export]
macro_rules! vertex_attr {
    ($struct:ty, $field:ident, $location:expr, $format:ident) => {
        wgpu::VertexAttribute {
            offset: std::mem::offset_of!($struct, $field) as u64,
            shader_location: $location,
            format: wgpu::VertexFormat::$format,
        }
    };
}

/// Creates a vertex buffer layout from attributes.
///
/// # Type Parameters
///
/// * `T` - The vertex struct type, used to calculate the array stride.
///
/// # Arguments
///
/// * `attributes` - Slice of vertex attributes.
/// * `step_mode` - Whether this buffer is per-vertex or per-instance.
pub fn vertex_buffer_layout<T>(
    attributes: &[wgpu::VertexAttribute],
    step_mode: wgpu::VertexStepMode,
) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<T>() as u64,
        step_mode,
        attributes,
    }
}

/// Common vertex format for position + color vertices (used by the axes helper).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PositionColorVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Vertex color (RGB).
    pub color: [f32; 3],
}

impl PositionColorVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as u64,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Helper to create instance buffer layout for Mat4 transform.
///
/// Many renderers use a transform matrix as instance data. This helper
/// creates the vertex attributes for a Mat4 stored as 4 consecutive Float32x4.
pub fn mat4_instance_attributes(start_location: u32) -> [wgpu::VertexAttribute; 4] {
    [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: start_location,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 16,
            shader_location: start_location + 1,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 32,
            shader_location: start_location + 2,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 48,
            shader_location: start_location + 3,
            format: wgpu::VertexFormat::Float32x4,
        },
    ]
}

/// Vertex for scene meshes: position, normal and texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    /// Vertex position in local space.
    pub position: [f32; 3],
    /// Vertex normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates, origin at the bottom-left as in glTF/three.js.
    pub uv: [f32; 2],
}

impl SceneVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        vertex_attr!(SceneVertex, position, 0, Float32x3),
        vertex_attr!(SceneVertex, normal, 1, Float32x3),
        vertex_attr!(SceneVertex, uv, 2, Float32x2),
    ];

    /// Returns the vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        vertex_buffer_layout::<Self>(Self::ATTRIBUTES, wgpu::VertexStepMode::Vertex)
    }

    /// Interleave the attribute streams of a CPU mesh
    pub fn from_mesh(mesh: &CpuMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.uvs)
            .map(|((position, normal), uv)| Self {
                position: *position,
                normal: *normal,
                uv: *uv,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tp_core::primitive::generate_plane_mesh;

    use super::*;

    #[test]
    fn test_scene_vertex_layout_offsets() {
        let attrs = SceneVertex::ATTRIBUTES;
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[2].offset, 24);
        assert_eq!(SceneVertex::layout().array_stride, 32);
    }

    #[test]
    fn test_from_mesh_interleaves_every_vertex() {
        let mesh = generate_plane_mesh(2.0, 1.0);
        let vertices = SceneVertex::from_mesh(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert_eq!(vertices[0].position, mesh.positions[0]);
        assert_eq!(vertices[2].uv, mesh.uvs[2]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0]);
    }
}
