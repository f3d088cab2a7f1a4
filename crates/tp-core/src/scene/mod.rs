//! Retained-mode scene graph
//!
//! Nodes are stored in insertion order and parents are always inserted
//! before their children, so world matrices resolve in one forward pass.

mod bounds;
pub mod build;
mod node;
mod transform;

use std::collections::HashMap;

use glam::Mat4;

pub use bounds::BoundingBox;
pub use node::{GlassParams, MaterialKind, NodeId, SceneNode};
pub use transform::Transform;

/// Scene graph owning every node
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    index: HashMap<NodeId, usize>,
    world: Vec<Mat4>,
    world_dirty: bool,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node
    pub fn add(&mut self, mut node: SceneNode) -> NodeId {
        node.parent = None;
        self.insert(node)
    }

    /// Add a node under an existing parent. Returns None if the parent is unknown.
    pub fn add_child(&mut self, parent: NodeId, mut node: SceneNode) -> Option<NodeId> {
        if !self.index.contains_key(&parent) {
            tracing::warn!("Parent {} not found, dropping node '{}'", parent, node.name);
            return None;
        }
        node.parent = Some(parent);
        Some(self.insert(node))
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = node.id;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        self.world.push(Mat4::IDENTITY);
        self.world_dirty = true;
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Mutable access; marks world matrices stale
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let i = *self.index.get(&id)?;
        self.world_dirty = true;
        Some(&mut self.nodes[i])
    }

    /// First node with the given name, in insertion order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Direct children of a node
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(move |n| n.parent == Some(parent))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    /// Recompute world matrices if any node changed since the last call
    pub fn update_world_transforms(&mut self) {
        if !self.world_dirty {
            return;
        }
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].transform.to_mat4();
            let parent_world = self.nodes[i]
                .parent
                .and_then(|p| self.index.get(&p))
                .map(|&pi| self.world[pi])
                .unwrap_or(Mat4::IDENTITY);
            self.world[i] = parent_world * local;
        }
        self.world_dirty = false;
    }

    /// World matrix of a node as of the last [`Self::update_world_transforms`]
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        self.index.get(&id).map(|&i| self.world[i])
    }

    /// A node is shown only if it and all of its ancestors are visible
    pub fn is_visible_in_tree(&self, id: NodeId) -> bool {
        let mut current = self.get(id);
        while let Some(node) = current {
            if !node.visible {
                return false;
            }
            current = node.parent.and_then(|p| self.get(p));
        }
        true
    }

    /// Iterate drawable nodes shown in the tree together with their world matrices
    pub fn visible_drawables(&self) -> impl Iterator<Item = (&SceneNode, Mat4)> {
        self.nodes
            .iter()
            .zip(self.world.iter())
            .filter(|(n, _)| n.mesh.is_some() && n.material.is_drawable())
            .filter(|(n, _)| self.is_visible_in_tree(n.id))
            .map(|(n, w)| (n, *w))
    }

    /// Set the environment-map intensity on every tagged node.
    /// Returns the number of nodes touched.
    pub fn apply_env_map_intensity(&mut self, intensity: f32) -> usize {
        let mut touched = 0;
        for node in self.nodes.iter_mut().filter(|n| n.env_intensity_target) {
            node.env_map_intensity = intensity;
            touched += 1;
        }
        tracing::debug!("Applied env map intensity {} to {} nodes", intensity, touched);
        touched
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;
    use crate::primitive::generate_box_mesh;

    #[test]
    fn test_world_transform_composes_parents() {
        let mut graph = SceneGraph::new();
        let group = graph.add(
            SceneNode::group("group").with_transform(Transform::from_position([1.0, 0.0, 0.0])),
        );
        let child = graph
            .add_child(
                group,
                SceneNode::group("child").with_transform(Transform::from_position([0.0, 2.0, 0.0])),
            )
            .unwrap();
        graph.update_world_transforms();

        let p = graph
            .world_transform(child)
            .unwrap()
            .transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn test_edit_marks_world_stale() {
        let mut graph = SceneGraph::new();
        let id = graph.add(SceneNode::group("a"));
        graph.update_world_transforms();
        graph.get_mut(id).unwrap().transform.position = [0.0, 0.0, 5.0];
        graph.update_world_transforms();
        let p = graph.world_transform(id).unwrap().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.z, 5.0);
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut graph = SceneGraph::new();
        assert!(graph.add_child(uuid::Uuid::new_v4(), SceneNode::group("orphan")).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let mut graph = SceneGraph::new();
        let group = graph.add(SceneNode::group("group").hidden());
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let child = graph
            .add_child(group, SceneNode::mesh("box", mesh, MaterialKind::Normal))
            .unwrap();
        graph.update_world_transforms();
        assert!(!graph.is_visible_in_tree(child));
        assert_eq!(graph.visible_drawables().count(), 0);
    }

    #[test]
    fn test_env_intensity_touches_tagged_nodes_only() {
        let mut graph = SceneGraph::new();
        let mesh = generate_box_mesh([1.0, 1.0, 1.0]).shared();
        let glass = graph.add(
            SceneNode::mesh("glass", mesh.clone(), MaterialKind::Glass(GlassParams::default()))
                .env_intensity_target(),
        );
        let screen = graph.add(SceneNode::mesh("screen", mesh, MaterialKind::Screen(0)));

        assert_eq!(graph.apply_env_map_intensity(2.5), 1);
        assert_eq!(graph.get(glass).unwrap().env_map_intensity, 2.5);
        assert_eq!(graph.get(screen).unwrap().env_map_intensity, 1.0);
    }

    #[test]
    fn test_find_by_name_and_children() {
        let mut graph = SceneGraph::new();
        let root = graph.add(SceneNode::group("model"));
        graph.add_child(root, SceneNode::group("baked")).unwrap();
        graph.add_child(root, SceneNode::group("projectorLightA")).unwrap();
        assert!(graph.find_by_name("baked").is_some());
        assert_eq!(graph.children(root).count(), 2);
    }
}
