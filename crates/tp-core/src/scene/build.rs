//! Builds the scene graph from a [`SceneConfig`]

use glam::Vec3;

use super::{MaterialKind, NodeId, SceneGraph, SceneNode, Transform};
use crate::anchor::AnchorSet;
use crate::config::{ModelConfig, SceneConfig, hex_to_rgb};
use crate::loading::ModelData;
use crate::primitive::{generate_box_mesh, generate_plane_mesh, generate_sphere_mesh};

/// Node ids the session and the debug panel address directly
#[derive(Debug, Clone, Default)]
pub struct SceneHandles {
    pub axes: Option<NodeId>,
    pub title: Option<NodeId>,
    pub screens: Vec<NodeId>,
    pub brick_groups: Vec<NodeId>,
    pub markers: Vec<NodeId>,
    pub model: Option<NodeId>,
}

/// Single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Direction the light travels, towards the origin
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// Everything produced by [`build_scene`]
#[derive(Debug, Clone)]
pub struct BuiltScene {
    pub graph: SceneGraph,
    pub handles: SceneHandles,
    pub anchors: AnchorSet,
    pub light: DirectionalLight,
}

/// Build all synchronously available content. The room model and the title
/// mesh arrive later through the loading join point.
pub fn build_scene(config: &SceneConfig) -> BuiltScene {
    let mut graph = SceneGraph::new();
    let mut handles = SceneHandles::default();

    let mut axes = SceneNode::group("axesHelper").not_raycastable();
    axes.material = MaterialKind::Lines;
    axes.transform = Transform::IDENTITY.with_uniform_scale(config.axes_size);
    axes.visible = config.axes_visible;
    handles.axes = Some(graph.add(axes));

    // Mesh is attached once the font is rasterized
    let mut title = SceneNode::group("title").with_transform(config.title.transform);
    title.material = MaterialKind::Matcap;
    title.double_sided = true;
    title.raycastable = true;
    handles.title = Some(graph.add(title));

    for (i, screen) in config.laptop_screens.iter().enumerate() {
        let plane = generate_plane_mesh(screen.size[0], screen.size[1]).shared();
        let id = graph.add(
            SceneNode::mesh(
                format!("laptopScreen_{:02}", i),
                plane,
                MaterialKind::Screen(screen.video),
            )
            .with_transform(screen.transform),
        );
        handles.screens.push(id);
    }

    let bricks = &config.glass_bricks;
    let brick_mesh = generate_box_mesh(bricks.size).shared();
    let pitch = bricks.pitch();
    for (g, group_transform) in bricks.groups.iter().enumerate() {
        let group = graph.add(
            SceneNode::group(format!("glassBricks_{:02}", g)).with_transform(*group_transform),
        );
        for i in 0..bricks.count {
            let brick = SceneNode::mesh(
                format!("glassBrick_{:02}_{:02}", g, i),
                brick_mesh.clone(),
                MaterialKind::Glass(bricks.material),
            )
            .with_transform(
                Transform::from_position([0.0, i as f32 * pitch, 0.0])
                    .with_uniform_scale(bricks.scale),
            )
            .double_sided()
            .env_intensity_target();
            graph.add_child(group, brick);
        }
        handles.brick_groups.push(group);
    }

    let mut anchors = AnchorSet::from_config(&config.points_of_interest);
    let marker_mesh = generate_sphere_mesh(config.points_of_interest.marker_radius).shared();
    for (i, point) in config.points_of_interest.points.iter().enumerate() {
        let id = graph.add(
            SceneNode::mesh(
                format!("pointOfInterest_{:02}", i),
                marker_mesh.clone(),
                MaterialKind::Normal,
            )
            .with_transform(Transform::from_position(point.position)),
        );
        anchors.set_marker(i, id);
        handles.markers.push(id);
    }

    graph.apply_env_map_intensity(config.env_map_intensity);
    graph.update_world_transforms();

    tracing::info!(
        "Built scene: {} nodes, {} anchors",
        graph.len(),
        anchors.len()
    );

    BuiltScene {
        graph,
        handles,
        anchors,
        light: DirectionalLight {
            color: hex_to_rgb(config.light.color),
            intensity: config.light.intensity,
            position: Vec3::from(config.light.position),
        },
    }
}

/// Material a model child receives, chosen by name
pub fn model_material(config: &ModelConfig, name: &str, base_color: [f32; 4]) -> MaterialKind {
    if name == config.baked_node {
        MaterialKind::Baked
    } else if config.projector_nodes.iter().any(|n| n == name) {
        MaterialKind::ProjectorLight
    } else if !config.glass_brick_light_prefix.is_empty()
        && name.starts_with(&config.glass_brick_light_prefix)
    {
        MaterialKind::GlassBrickLight
    } else {
        MaterialKind::Standard { base_color }
    }
}

/// Insert a loaded room model under a new root node
pub fn insert_model(graph: &mut SceneGraph, config: &ModelConfig, model: ModelData) -> NodeId {
    let root = graph.add(SceneNode::group("model").with_transform(config.transform));

    for part in model.parts {
        let material = model_material(config, &part.name, part.base_color);
        let mut node = SceneNode::mesh(part.name, part.mesh.shared(), material);
        // Only the lit fallback material reads the environment map
        if matches!(material, MaterialKind::Standard { .. }) {
            node = node.env_intensity_target();
        }
        graph.add_child(root, node);
    }

    for expected in std::iter::once(&config.baked_node).chain(&config.projector_nodes) {
        if graph.children(root).all(|n| &n.name != expected) {
            tracing::warn!("Model has no child named '{}'", expected);
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::loading::ModelPart;

    #[test]
    fn test_default_scene_contents() {
        let config = SceneConfig::default();
        let built = build_scene(&config);

        assert_eq!(built.handles.screens.len(), 2);
        assert_eq!(built.handles.brick_groups.len(), 2);
        assert_eq!(built.handles.markers.len(), 5);
        assert_eq!(built.anchors.len(), 5);
        for group in &built.handles.brick_groups {
            assert_eq!(built.graph.children(*group).count(), 10);
        }
        let axes = built.handles.axes.unwrap();
        assert!(!built.graph.get(axes).unwrap().visible);
        assert_eq!(built.light.intensity, 3.0);
    }

    #[test]
    fn test_glass_bricks_stack_with_pitch() {
        let config = SceneConfig::default();
        let built = build_scene(&config);
        let group = built.handles.brick_groups[0];
        let heights: Vec<f32> = built
            .graph
            .children(group)
            .map(|n| n.transform.position[1])
            .collect();
        let pitch = 1.9 * 1.03 * 0.099;
        for (i, y) in heights.iter().enumerate() {
            assert_relative_eq!(*y, i as f32 * pitch, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_markers_sit_below_anchors() {
        let built = build_scene(&SceneConfig::default());
        let anchor = built.anchors.get(1).unwrap();
        let marker = built.graph.get(anchor.marker.unwrap()).unwrap();
        let marker_pos = Vec3::from(marker.transform.position);
        assert!((anchor.position - marker_pos - Vec3::splat(0.1)).length() < 1e-6);
    }

    #[test]
    fn test_model_materials_by_name() {
        let config = SceneConfig::default();
        let mut built = build_scene(&config);
        let mesh = crate::primitive::generate_box_mesh([1.0, 1.0, 1.0]);
        let part = |name: &str| ModelPart {
            name: name.to_string(),
            mesh: mesh.clone(),
            base_color: [1.0; 4],
        };
        let model = ModelData {
            parts: vec![
                part("baked"),
                part("projectorLightA"),
                part("projectorLightB"),
                part("glassBrickLight_01"),
                part("chair"),
            ],
        };
        let root = insert_model(&mut built.graph, &config.model, model);
        let kinds: Vec<MaterialKind> = built.graph.children(root).map(|n| n.material).collect();
        assert_eq!(kinds[0], MaterialKind::Baked);
        assert_eq!(kinds[1], MaterialKind::ProjectorLight);
        assert_eq!(kinds[2], MaterialKind::ProjectorLight);
        assert_eq!(kinds[3], MaterialKind::GlassBrickLight);
        assert!(matches!(kinds[4], MaterialKind::Standard { .. }));

        let tagged = built
            .graph
            .children(root)
            .filter(|n| n.env_intensity_target)
            .count();
        assert_eq!(tagged, 1);
    }
}
