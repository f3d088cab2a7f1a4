//! UI panels

mod debug;
mod helpers;
mod viewport;

pub use debug::DebugPanel;
pub use viewport::ViewportPanel;

use crate::state::{SharedAppState, SharedViewportState};

/// Panel trait for the application's UI areas
pub trait Panel {
    /// Panel name
    fn name(&self) -> &str;

    /// Draw the panel UI
    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState);

    /// Draw with render context (for the 3D viewport)
    fn ui_with_render_context(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        render_state: &egui_wgpu::RenderState,
        viewport_state: &SharedViewportState,
    ) {
        // Default: just call ui()
        let _ = (render_state, viewport_state);
        self.ui(ui, app_state);
    }
}
