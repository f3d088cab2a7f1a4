//! Ray casting against the scene graph
//!
//! Occlusion rays are tested against the world-space triangles of every
//! visible, raycastable mesh node. An AABB slab test on each node's
//! world bounds rejects most nodes before any triangle is touched.

use glam::{Mat4, Vec3};

use crate::constants::RAY_EPSILON;
use crate::scene::{NodeId, SceneGraph, SceneNode};

/// A half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One ray/mesh hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    pub point: Vec3,
    pub node: NodeId,
}

/// Ray-triangle intersection test (Möller–Trumbore).
///
/// With `cull_back_faces` set, triangles whose counter-clockwise winding
/// faces away from the ray are ignored.
///
/// # Returns
///
/// * `Some(t)` - The ray parameter of the hit, `t >= 0`.
/// * `None` - If the ray misses, runs parallel to the triangle, or hits it from behind while culling.
pub fn ray_triangle_intersection(
    ray: &Ray,
    [v0, v1, v2]: [Vec3; 3],
    cull_back_faces: bool,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // a > 0 when the ray hits the front face
    if cull_back_faces {
        if a < RAY_EPSILON {
            return None;
        }
    } else if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t >= 0.0).then_some(t)
}

/// Nearest hit of a ray against one mesh node
fn intersect_node(ray: &Ray, node: &SceneNode, world: Mat4) -> Option<Intersection> {
    let mesh = node.mesh.as_ref()?;
    mesh.bounds().transform(&world).ray_entry(ray.origin, ray.direction)?;

    mesh.world_triangles(world)
        .filter_map(|tri| ray_triangle_intersection(ray, tri, !node.double_sided))
        .min_by(|a, b| a.total_cmp(b))
        .map(|t| {
            let point = ray.at(t);
            Intersection {
                distance: ray.origin.distance(point),
                point,
                node: node.id,
            }
        })
}

/// Intersect a ray with every visible, raycastable mesh in the scene.
///
/// Returns at most one hit per node, sorted nearest first. World
/// matrices must be current (see [`SceneGraph::update_world_transforms`]).
pub fn intersect_scene(ray: &Ray, scene: &SceneGraph) -> Vec<Intersection> {
    let mut hits: Vec<Intersection> = scene
        .visible_drawables()
        .filter(|(node, _)| node.raycastable)
        .filter_map(|(node, world)| intersect_node(ray, node, world))
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::primitive::{generate_box_mesh, generate_plane_mesh};
    use crate::scene::{MaterialKind, Transform};

    const TRI: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn test_front_face_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray_triangle_intersection(&ray, TRI, true).unwrap();
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn test_back_face_culling() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(ray_triangle_intersection(&ray, TRI, true).is_none());
        assert!(ray_triangle_intersection(&ray, TRI, false).is_some());
    }

    #[test]
    fn test_miss_and_behind() {
        let beside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersection(&beside, TRI, false).is_none());
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray_triangle_intersection(&away, TRI, false).is_none());
    }

    #[test]
    fn test_scene_hits_sorted_nearest_first() {
        let mut scene = SceneGraph::new();
        let cube = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let far = scene.add(
            SceneNode::mesh("far", cube.clone(), MaterialKind::Normal)
                .with_transform(Transform::from_position([0.0, 0.0, -10.0])),
        );
        let near = scene.add(
            SceneNode::mesh("near", cube, MaterialKind::Normal)
                .with_transform(Transform::from_position([0.0, 0.0, -4.0])),
        );
        scene.update_world_transforms();

        let hits = intersect_scene(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_relative_eq!(hits[0].distance, 3.5, epsilon = 1e-5);
        assert_eq!(hits[1].node, far);
        assert_relative_eq!(hits[1].distance, 9.5, epsilon = 1e-5);
    }

    #[test]
    fn test_hidden_and_helper_nodes_are_skipped() {
        let mut scene = SceneGraph::new();
        let cube = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        scene.add(
            SceneNode::mesh("hidden", cube.clone(), MaterialKind::Normal)
                .with_transform(Transform::from_position([0.0, 0.0, -4.0]))
                .hidden(),
        );
        scene.add(
            SceneNode::mesh("overlay", cube, MaterialKind::Normal)
                .with_transform(Transform::from_position([0.0, 0.0, -2.0]))
                .not_raycastable(),
        );
        scene.update_world_transforms();
        assert!(intersect_scene(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &scene).is_empty());
    }

    #[test]
    fn test_single_sided_plane_seen_from_behind() {
        let mut scene = SceneGraph::new();
        let plane = generate_plane_mesh(2.0, 2.0).shared();
        scene.add(SceneNode::mesh("screen", plane.clone(), MaterialKind::Screen(0)));
        scene.update_world_transforms();

        // The plane faces +Z; a ray travelling +Z sees its back
        let from_behind = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        assert!(intersect_scene(&from_behind, &scene).is_empty());
        let from_front = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        assert_eq!(intersect_scene(&from_front, &scene).len(), 1);

        let mut double = SceneGraph::new();
        double.add(SceneNode::mesh("glass", plane, MaterialKind::Normal).double_sided());
        double.update_world_transforms();
        assert_eq!(intersect_scene(&from_behind, &double).len(), 1);
    }
}
