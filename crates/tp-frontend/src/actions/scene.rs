//! Scene edits from the debug panel and keyboard

use tp_core::{NodeId, SessionContext, Transform};

use crate::state::SceneAction;

fn set_transform(session: &mut SessionContext, node: Option<NodeId>, transform: Transform) -> bool {
    let Some(node) = node.and_then(|id| session.scene.get_mut(id)) else {
        return false;
    };
    node.transform = transform;
    true
}

/// Apply an action to the session. Returns false if its target does not exist.
///
/// Camera moves are not session state and are rejected here.
pub fn apply_scene_action(session: &mut SessionContext, action: &SceneAction) -> bool {
    match action {
        SceneAction::SetAxesVisible(visible) => {
            let Some(node) = session.handles.axes.and_then(|id| session.scene.get_mut(id)) else {
                return false;
            };
            node.visible = *visible;
            true
        }
        SceneAction::SetTitleTransform(transform) => {
            let node = session.handles.title;
            set_transform(session, node, *transform)
        }
        SceneAction::SetScreenTransform { index, transform } => {
            let node = session.handles.screens.get(*index).copied();
            set_transform(session, node, *transform)
        }
        SceneAction::SetBrickGroupTransform { index, transform } => {
            let node = session.handles.brick_groups.get(*index).copied();
            set_transform(session, node, *transform)
        }
        SceneAction::SetPointOfInterest { index, location } => {
            if *index >= session.anchors.len() {
                return false;
            }
            session.set_anchor_location(*index, *location);
            true
        }
        SceneAction::SetEnvMapIntensity(intensity) => {
            session.set_env_map_intensity(*intensity);
            true
        }
        SceneAction::CycleMatcap { forward } => {
            session.cycle_matcap(*forward);
            true
        }
        SceneAction::SetCameraPosition(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;
    use tp_core::SceneConfig;

    use super::*;

    fn session() -> SessionContext {
        SessionContext::new(SceneConfig::default())
    }

    #[test]
    fn test_axes_toggle() {
        let mut session = session();
        let axes = session.handles.axes.expect("axes helper");
        assert!(apply_scene_action(&mut session, &SceneAction::SetAxesVisible(true)));
        assert!(session.scene.get(axes).is_some_and(|n| n.visible));
        assert!(apply_scene_action(&mut session, &SceneAction::SetAxesVisible(false)));
        assert!(session.scene.get(axes).is_some_and(|n| !n.visible));
    }

    #[test]
    fn test_screen_transform_moves_world_matrix() {
        let mut session = session();
        let transform = Transform::from_position([1.0, 2.0, 3.0]);
        let action = SceneAction::SetScreenTransform {
            index: 1,
            transform,
        };
        assert!(apply_scene_action(&mut session, &action));

        session.scene.update_world_transforms();
        let screen = session.handles.screens[1];
        let world = session.scene.world_transform(screen).expect("screen node");
        let translation = world.to_scale_rotation_translation().2;
        assert_relative_eq!(translation.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(translation.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(translation.z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_missing_targets_are_rejected() {
        let mut session = session();
        let screen = SceneAction::SetScreenTransform {
            index: 7,
            transform: Transform::IDENTITY,
        };
        let point = SceneAction::SetPointOfInterest {
            index: 5,
            location: Vec3::ZERO,
        };
        assert!(!apply_scene_action(&mut session, &screen));
        assert!(!apply_scene_action(&mut session, &point));
        assert!(!apply_scene_action(
            &mut session,
            &SceneAction::SetCameraPosition(Vec3::ONE)
        ));
    }

    #[test]
    fn test_point_of_interest_moves_anchor_with_offset() {
        let mut session = session();
        let location = Vec3::new(0.5, 0.25, -1.0);
        let action = SceneAction::SetPointOfInterest { index: 0, location };
        assert!(apply_scene_action(&mut session, &action));

        let anchor = session.anchors.get(0).expect("anchor");
        let expected = location + Vec3::splat(session.anchors.offset());
        assert!((anchor.position - expected).length() < 1e-6);
    }

    #[test]
    fn test_env_intensity_is_recorded() {
        let mut session = session();
        assert!(apply_scene_action(&mut session, &SceneAction::SetEnvMapIntensity(2.5)));
        assert_relative_eq!(session.env_map_intensity, 2.5);
    }
}
