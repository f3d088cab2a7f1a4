//! GPU mesh storage keyed by CPU mesh id.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;
use wgpu::util::DeviceExt;

use tp_core::CpuMesh;

use crate::vertex::SceneVertex;

/// Vertex and index buffers of one uploaded mesh.
pub struct GpuMesh {
    /// Interleaved [`SceneVertex`] data.
    pub vertex_buffer: wgpu::Buffer,
    /// `u32` indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &CpuMesh) -> Self {
        let vertices = SceneVertex::from_mesh(mesh);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Uploads each shared mesh once; many nodes may reference the same entry.
#[derive(Default)]
pub struct MeshCache {
    meshes: HashMap<Uuid, GpuMesh>,
}

impl MeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `mesh` unless it is already resident.
    pub fn ensure(&mut self, device: &wgpu::Device, mesh: &CpuMesh) -> &GpuMesh {
        self.meshes.entry(mesh.id).or_insert_with(|| {
            tracing::debug!(
                "Uploading mesh {} ({} vertices, {} triangles)",
                mesh.id,
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            GpuMesh::upload(device, mesh)
        })
    }

    /// Get an uploaded mesh.
    pub fn get(&self, id: Uuid) -> Option<&GpuMesh> {
        self.meshes.get(&id)
    }

    /// Drop meshes no node references any more.
    pub fn retain(&mut self, live: &HashSet<Uuid>) {
        let before = self.meshes.len();
        self.meshes.retain(|id, _| live.contains(id));
        let dropped = before - self.meshes.len();
        if dropped > 0 {
            tracing::debug!("Released {} unused meshes", dropped);
        }
    }

    /// Number of resident meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Check if no mesh is resident.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
