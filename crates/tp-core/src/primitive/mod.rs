//! Primitive mesh generation for scene geometry
//!
//! Generates vertices, normals, uvs and indices for basic shapes:
//! - Box (glass bricks)
//! - Sphere (point-of-interest markers)
//! - Plane (laptop screens, title)

mod box_mesh;
mod plane;
mod sphere;

pub use box_mesh::generate_box_mesh;
pub use plane::generate_plane_mesh;
pub use sphere::{generate_sphere_mesh, generate_sphere_mesh_with_segments};

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn outward_facing(mesh: &crate::mesh::CpuMesh) -> bool {
        let center = mesh.bounds().center();
        mesh.indices.chunks_exact(3).all(|tri| {
            let p = |i: u32| Vec3::from_array(mesh.positions[i as usize]);
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            normal.length_squared() < 1e-12 || normal.dot(centroid - center) > 0.0
        })
    }

    #[test]
    fn test_box_mesh() {
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]);
        assert_eq!(mesh.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(mesh.normals.len(), 24);
        assert_eq!(mesh.uvs.len(), 24);
        assert_eq!(mesh.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
    }

    #[test]
    fn test_box_dimensions() {
        let mesh = generate_box_mesh([0.8, 1.9, 0.9]);
        let size = mesh.bounds().size();
        assert!((size.x - 0.8).abs() < 0.001);
        assert!((size.y - 1.9).abs() < 0.001);
        assert!((size.z - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_box_winding_is_counter_clockwise_outward() {
        assert!(outward_facing(&generate_box_mesh([2.0, 4.0, 6.0])));
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = generate_sphere_mesh(1.0);
        assert!(mesh.vertex_count() > 0);
        assert_eq!(mesh.vertex_count(), mesh.normals.len());
        assert!(mesh.indices.len() % 3 == 0);
        assert!(outward_facing(&mesh));
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let mesh = generate_plane_mesh(2.53, 1.65);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        let p = |i: usize| Vec3::from_array(mesh.positions[mesh.indices[i] as usize]);
        let normal = (p(1) - p(0)).cross(p(2) - p(0));
        assert!(normal.z > 0.0);
        let size = mesh.bounds().size();
        assert!((size.x - 2.53).abs() < 1e-5);
        assert!((size.y - 1.65).abs() < 1e-5);
    }
}
