//! Sphere mesh generation (UV sphere)

use std::f32::consts::PI;

use crate::mesh::CpuMesh;

/// Generate a UV sphere mesh
///
/// # Arguments
/// * `radius` - Sphere radius
pub fn generate_sphere_mesh(radius: f32) -> CpuMesh {
    use crate::constants::{SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS};
    generate_sphere_mesh_with_segments(radius, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS)
}

/// Generate a UV sphere mesh with custom resolution
///
/// The poles lie on the Y axis.
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `lat_segments` - Number of latitude bands
/// * `lon_segments` - Number of longitude segments
pub fn generate_sphere_mesh_with_segments(
    radius: f32,
    lat_segments: u32,
    lon_segments: u32,
) -> CpuMesh {
    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for lat in 0..=lat_segments {
        let v = lat as f32 / lat_segments as f32;
        let theta = v * PI; // 0 at +Y, PI at -Y
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for lon in 0..=lon_segments {
            let u = lon as f32 / lon_segments as f32;
            let phi = u * 2.0 * PI;

            let x = -phi.cos() * sin_theta;
            let y = cos_theta;
            let z = phi.sin() * sin_theta;

            vertices.push([radius * x, radius * y, radius * z]);
            normals.push([x, y, z]);
            uvs.push([u, v]);
        }
    }

    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let current = lat * (lon_segments + 1) + lon;
            let next = current + lon_segments + 1;

            // Degenerate triangles at the poles are skipped
            if lat != 0 {
                indices.extend_from_slice(&[current, next, current + 1]);
            }
            if lat != lat_segments - 1 {
                indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }
    }

    CpuMesh::new(vertices, normals, uvs, indices)
}
