//! Plane mesh generation

use crate::mesh::CpuMesh;

/// Generate a single-quad plane in the XY plane, facing +Z
///
/// Texture coordinates put the top of the image at +Y.
pub fn generate_plane_mesh(width: f32, height: f32) -> CpuMesh {
    let hw = width / 2.0;
    let hh = height / 2.0;

    let vertices = vec![[-hw, -hh, 0.0], [hw, -hh, 0.0], [hw, hh, 0.0], [-hw, hh, 0.0]];
    let normals = vec![[0.0, 0.0, 1.0]; 4];
    let uvs = vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    let indices = vec![0, 1, 2, 0, 2, 3];

    CpuMesh::new(vertices, normals, uvs, indices)
}
