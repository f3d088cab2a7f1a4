//! Point-of-interest label visibility
//!
//! Each anchor is projected to NDC, an occlusion ray is cast from the camera
//! through that NDC location, and the nearest hit decides whether the label
//! shows. The label is translated from the viewport center regardless.

use glam::{Vec2, Vec3};

use crate::anchor::{Anchor, AnchorSet};
use crate::projection::CameraView;
use crate::raycast::intersect_scene;
use crate::scene::SceneGraph;
use crate::viewport::Viewport;

/// Receiver of label state changes
pub trait LabelSink {
    fn set_visible(&mut self, index: usize, visible: bool);

    /// Pixel offset of the label from the viewport center, +y down
    fn set_translation(&mut self, index: usize, x: f32, y: f32);
}

/// Outcome for one anchor in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelUpdate {
    pub index: usize,
    pub visible: bool,
    pub translation: Vec2,
    pub ndc: Vec3,
    /// Nearest occlusion hit, if any
    pub nearest_hit: Option<f32>,
    pub anchor_distance: f32,
}

/// Hidden only when something is strictly nearer than the anchor
pub fn is_unoccluded(nearest_hit: Option<f32>, anchor_distance: f32) -> bool {
    match nearest_hit {
        None => true,
        Some(hit) => hit >= anchor_distance,
    }
}

/// Pixel translation for an NDC point; NDC y up maps to screen y down
pub fn label_translation(ndc: Vec3, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        ndc.x * viewport.width * 0.5,
        -ndc.y * viewport.height * 0.5,
    )
}

/// Resolve one anchor against the current scene and camera
pub fn resolve_anchor(
    anchor: &Anchor,
    camera: &CameraView,
    scene: &SceneGraph,
    viewport: &Viewport,
) -> LabelUpdate {
    let ndc = camera.project(anchor.position);
    let ray = camera.ray_through_ndc(ndc.x, ndc.y);
    let nearest_hit = intersect_scene(&ray, scene).first().map(|hit| hit.distance);
    let anchor_distance = anchor.position.distance(camera.position);

    LabelUpdate {
        index: anchor.index,
        visible: is_unoccluded(nearest_hit, anchor_distance),
        translation: label_translation(ndc, viewport),
        ndc,
        nearest_hit,
        anchor_distance,
    }
}

/// Resolve every anchor and push the result into `sink`
pub fn resolve_labels(
    anchors: &AnchorSet,
    camera: &CameraView,
    scene: &SceneGraph,
    viewport: &Viewport,
    sink: &mut dyn LabelSink,
) -> Vec<LabelUpdate> {
    anchors
        .iter()
        .map(|anchor| {
            let update = resolve_anchor(anchor, camera, scene, viewport);
            sink.set_visible(update.index, update.visible);
            sink.set_translation(update.index, update.translation.x, update.translation.y);
            update
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::config::{PointOfInterest, PointsOfInterestConfig};
    use crate::primitive::generate_box_mesh;
    use crate::scene::{MaterialKind, SceneNode, Transform};

    /// Records every label mutation
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub visible: Vec<(usize, bool)>,
        pub translations: Vec<(usize, f32, f32)>,
    }

    impl RecordingSink {
        pub fn mutation_count(&self) -> usize {
            self.visible.len() + self.translations.len()
        }
    }

    impl LabelSink for RecordingSink {
        fn set_visible(&mut self, index: usize, visible: bool) {
            self.visible.push((index, visible));
        }

        fn set_translation(&mut self, index: usize, x: f32, y: f32) {
            self.translations.push((index, x, y));
        }
    }

    fn forward_camera() -> CameraView {
        CameraView::look_at(Vec3::ZERO, Vec3::NEG_Z, FRAC_PI_2, 1.0, 0.1, 100.0)
    }

    fn anchors_at(points: &[[f32; 3]]) -> AnchorSet {
        AnchorSet::from_config(&PointsOfInterestConfig {
            offset: 0.0,
            marker_radius: 0.03,
            points: points
                .iter()
                .map(|&position| PointOfInterest {
                    position,
                    label: String::new(),
                })
                .collect(),
        })
    }

    fn wall_at(z: f32) -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.add(
            SceneNode::mesh(
                "wall",
                generate_box_mesh([10.0, 10.0, 0.1]).shared(),
                MaterialKind::Normal,
            )
            .with_transform(Transform::from_position([0.0, 0.0, z])),
        );
        scene.update_world_transforms();
        scene
    }

    #[test]
    fn test_tie_break() {
        assert!(is_unoccluded(None, 5.0));
        assert!(!is_unoccluded(Some(4.999), 5.0));
        assert!(is_unoccluded(Some(5.0), 5.0));
        assert!(is_unoccluded(Some(7.0), 5.0));
    }

    #[test]
    fn test_golden_translation() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let anchors = anchors_at(&[[0.5, 0.25, -1.0]]);
        let mut sink = RecordingSink::default();
        let updates = resolve_labels(
            &anchors,
            &forward_camera(),
            &SceneGraph::new(),
            &viewport,
            &mut sink,
        );

        assert_relative_eq!(updates[0].translation.x, 200.0, epsilon = 1e-3);
        assert_relative_eq!(updates[0].translation.y, -75.0, epsilon = 1e-3);
        assert_eq!(sink.visible, vec![(0, true)]);
        assert_eq!(sink.translations.len(), 1);
    }

    #[test]
    fn test_repeated_resolution_is_deterministic() {
        let viewport = Viewport::new(1280.0, 720.0, 1.0);
        let anchors = anchors_at(&[[0.3, -0.2, -2.0], [5.0, 0.0, -1.0]]);
        let scene = wall_at(-6.0);
        let camera = forward_camera();
        let a = resolve_labels(&anchors, &camera, &scene, &viewport, &mut RecordingSink::default());
        let b = resolve_labels(&anchors, &camera, &scene, &viewport, &mut RecordingSink::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_occluder_in_front_hides_label() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let anchors = anchors_at(&[[0.0, 0.0, -5.0]]);
        let mut sink = RecordingSink::default();
        let updates = resolve_labels(&anchors, &forward_camera(), &wall_at(-2.0), &viewport, &mut sink);
        assert!(!updates[0].visible);
        assert_eq!(sink.visible, vec![(0, false)]);
        // Hidden labels are still positioned
        assert_eq!(sink.translations.len(), 1);
    }

    #[test]
    fn test_geometry_behind_anchor_keeps_label_visible() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let anchors = anchors_at(&[[0.0, 0.0, -2.0]]);
        let updates = resolve_labels(
            &anchors,
            &forward_camera(),
            &wall_at(-8.0),
            &viewport,
            &mut RecordingSink::default(),
        );
        assert!(updates[0].nearest_hit.is_some());
        assert!(updates[0].visible);
    }

    #[test]
    fn test_off_screen_anchor_still_translated() {
        let viewport = Viewport::new(800.0, 600.0, 1.0);
        let anchors = anchors_at(&[[3.0, 0.0, -1.0]]);
        let updates = resolve_labels(
            &anchors,
            &forward_camera(),
            &SceneGraph::new(),
            &viewport,
            &mut RecordingSink::default(),
        );
        assert!(updates[0].ndc.x > 1.0);
        assert_relative_eq!(updates[0].translation.x, 1200.0, epsilon = 1e-2);
        assert!(updates[0].visible);
    }
}
