//! Debug-parameter panel
//!
//! Collapsible folders for the tweakable scene parameters. Widgets edit a
//! copy of the current value and queue a [`SceneAction`] when it changes.

use std::f32::consts::PI;

use glam::Vec3;

use tp_core::{NodeId, SessionContext, Transform};

use crate::panels::Panel;
use crate::panels::helpers::{slider_row, vector3_sliders};
use crate::state::{AppState, SceneAction, SharedAppState};
use crate::theme::palette;

const POSITION_RANGE: f32 = 10.0;
const FINE_STEP: f64 = 0.001;

/// Debug-parameter panel
#[derive(Default)]
pub struct DebugPanel;

impl DebugPanel {
    pub fn new() -> Self {
        Self
    }
}

fn node_transform(session: &SessionContext, node: Option<NodeId>) -> Option<Transform> {
    node.and_then(|id| session.scene.get(id)).map(|n| n.transform)
}

fn helper_folder(ui: &mut egui::Ui, app: &mut AppState) {
    let visible = app
        .session
        .handles
        .axes
        .and_then(|id| app.session.scene.get(id))
        .is_some_and(|n| n.visible);
    let mut checked = visible;
    if ui.checkbox(&mut checked, "axes visible").changed() {
        app.queue_action(SceneAction::SetAxesVisible(checked));
    }
}

fn title_folder(ui: &mut egui::Ui, app: &mut AppState) {
    let Some(mut transform) = node_transform(&app.session, app.session.handles.title) else {
        return;
    };
    let mut changed = vector3_sliders(
        ui,
        "position",
        &mut transform.position,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    );
    changed |= vector3_sliders(ui, "rotation", &mut transform.rotation, -PI..=PI, FINE_STEP);
    if changed {
        app.queue_action(SceneAction::SetTitleTransform(transform));
    }
}

fn laptop_folder(ui: &mut egui::Ui, app: &mut AppState, index: usize) {
    let node = app.session.handles.screens.get(index).copied();
    let Some(mut transform) = node_transform(&app.session, node) else {
        return;
    };
    let mut changed = vector3_sliders(ui, "scale", &mut transform.scale, 0.0..=1.0, FINE_STEP);
    changed |= vector3_sliders(
        ui,
        "position",
        &mut transform.position,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    );
    changed |= vector3_sliders(
        ui,
        "rotation",
        &mut transform.rotation,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    );
    if changed {
        app.queue_action(SceneAction::SetScreenTransform { index, transform });
    }
}

fn glass_bricks_folder(ui: &mut egui::Ui, app: &mut AppState, index: usize) {
    let node = app.session.handles.brick_groups.get(index).copied();
    let Some(mut transform) = node_transform(&app.session, node) else {
        return;
    };
    let mut changed = vector3_sliders(
        ui,
        "position",
        &mut transform.position,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    );
    changed |= slider_row(ui, "rotation.y", &mut transform.rotation[1], 0.0..=PI, FINE_STEP);
    if changed {
        app.queue_action(SceneAction::SetBrickGroupTransform { index, transform });
    }
}

fn point_of_interest_folder(ui: &mut egui::Ui, app: &mut AppState, index: usize) {
    let Some(location) = app.session.anchors.location(index) else {
        return;
    };
    let mut values = location.to_array();
    if vector3_sliders(
        ui,
        "position",
        &mut values,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    ) {
        app.queue_action(SceneAction::SetPointOfInterest {
            index,
            location: Vec3::from_array(values),
        });
    }
}

fn camera_folder(ui: &mut egui::Ui, app: &mut AppState) {
    let mut values = app.camera_position.to_array();
    if vector3_sliders(
        ui,
        "position",
        &mut values,
        -POSITION_RANGE..=POSITION_RANGE,
        FINE_STEP,
    ) {
        app.queue_action(SceneAction::SetCameraPosition(Vec3::from_array(values)));
    }
}

fn materials_folder(ui: &mut egui::Ui, app: &mut AppState) {
    let mut intensity = app.session.env_map_intensity;
    if slider_row(ui, "envMapIntensity", &mut intensity, 0.0..=10.0, FINE_STEP) {
        app.queue_action(SceneAction::SetEnvMapIntensity(intensity));
    }
}

fn stats_folder(ui: &mut egui::Ui, app: &AppState) {
    let stats = app.stats;
    ui.colored_label(palette::TEXT_SECONDARY, format!("FPS: {:.0}", stats.fps));
    ui.colored_label(
        palette::TEXT_SECONDARY,
        format!("Frame: {:.2} ms", stats.frame_time_ms),
    );
    ui.colored_label(palette::TEXT_SECONDARY, format!("Draws: {}", stats.draw_count));
    ui.colored_label(
        palette::TEXT_SECONDARY,
        format!("State: {:?}", app.session.state()),
    );
}

impl Panel for DebugPanel {
    fn name(&self) -> &str {
        "Debug"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        let mut app = app_state.lock();

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::CollapsingHeader::new("Helper").show(ui, |ui| helper_folder(ui, &mut app));
            egui::CollapsingHeader::new("3D Text").show(ui, |ui| title_folder(ui, &mut app));

            for index in 0..app.session.handles.screens.len() {
                egui::CollapsingHeader::new(format!("laptop_{:02}", index))
                    .show(ui, |ui| laptop_folder(ui, &mut app, index));
            }
            for index in 0..app.session.handles.brick_groups.len() {
                egui::CollapsingHeader::new(format!("glassBricks_{:02}", index))
                    .show(ui, |ui| glass_bricks_folder(ui, &mut app, index));
            }
            for index in 0..app.session.anchors.len() {
                egui::CollapsingHeader::new(format!("pointsOfInterest_{:02}", index))
                    .show(ui, |ui| point_of_interest_folder(ui, &mut app, index));
            }

            egui::CollapsingHeader::new("camera").show(ui, |ui| camera_folder(ui, &mut app));
            egui::CollapsingHeader::new("materials").show(ui, |ui| materials_folder(ui, &mut app));
            egui::CollapsingHeader::new("stats")
                .default_open(true)
                .show(ui, |ui| stats_folder(ui, &app));
        });
    }
}
