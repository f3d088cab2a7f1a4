//! CPU-side triangle meshes shared between the scene graph, the raycaster and the renderer

use std::sync::Arc;

use glam::{Mat4, Vec3};
use uuid::Uuid;

use crate::scene::BoundingBox;

/// Indexed triangle mesh with per-vertex normals and texture coordinates.
///
/// Meshes are immutable once built and shared through [`SharedMesh`], so one
/// geometry can back many nodes (the glass bricks use a single box).
#[derive(Debug, Clone)]
pub struct CpuMesh {
    /// Stable identity used by the renderer to cache GPU buffers
    pub id: Uuid,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    bounds: BoundingBox,
}

/// Reference-counted mesh handle
pub type SharedMesh = Arc<CpuMesh>;

impl CpuMesh {
    /// Build a mesh, filling missing normals/uvs so every attribute has one entry per vertex.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        uvs: Vec<[f32; 2]>,
        indices: Vec<u32>,
    ) -> Self {
        let vertex_count = positions.len();
        let normals = if normals.len() == vertex_count {
            normals
        } else {
            compute_vertex_normals(&positions, &indices)
        };
        let uvs = if uvs.len() == vertex_count {
            uvs
        } else {
            vec![[0.0, 0.0]; vertex_count]
        };
        let bounds = BoundingBox::from_points(positions.iter().map(|p| Vec3::from_array(*p)));

        Self {
            id: Uuid::new_v4(),
            positions,
            normals,
            uvs,
            indices,
            bounds,
        }
    }

    /// Wrap into a shared handle
    pub fn shared(self) -> SharedMesh {
        Arc::new(self)
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles transformed into world space
    pub fn world_triangles(&self, world: Mat4) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let fetch = |i: u32| {
                self.positions
                    .get(i as usize)
                    .map(|p| world.transform_point3(Vec3::from_array(*p)))
            };
            Some([fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?])
        })
    }
}

/// Area-weighted vertex normals for meshes that ship without them
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let p0 = Vec3::from_array(positions[a]);
        let p1 = Vec3::from_array(positions[b]);
        let p2 = Vec3::from_array(positions[c]);
        let face = (p1 - p0).cross(p2 - p0);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}
