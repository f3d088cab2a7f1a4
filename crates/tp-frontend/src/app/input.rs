//! Keyboard shortcuts

use crate::state::SceneAction;

/// Matcap cycling: A / Left go back, D / Right go forward
pub fn keyboard_actions(events: &[egui::Event]) -> Vec<SceneAction> {
    let mut actions = Vec::new();
    for event in events {
        let egui::Event::Key {
            key,
            pressed: true,
            repeat: false,
            ..
        } = event
        else {
            continue;
        };
        match key {
            egui::Key::A | egui::Key::ArrowLeft => {
                actions.push(SceneAction::CycleMatcap { forward: false });
            }
            egui::Key::D | egui::Key::ArrowRight => {
                actions.push(SceneAction::CycleMatcap { forward: true });
            }
            _ => {}
        }
    }
    actions
}
