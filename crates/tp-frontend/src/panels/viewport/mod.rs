//! 3D Viewport panel
//!
//! Runs the session's frame update, renders into the offscreen texture and
//! draws the label and loading overlays on top of it.

mod overlay;

use std::time::Instant;

use crate::panels::Panel;
use crate::state::{FrameStats, SharedAppState, SharedViewportState};

use overlay::{draw_labels, draw_loading_bar};

/// Scroll distance in points that counts as one dolly step
const SCROLL_POINTS_PER_STEP: f32 = 50.0;

/// 3D viewport panel
pub struct ViewportPanel {
    last_size: egui::Vec2,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            last_size: egui::Vec2::ZERO,
        }
    }

    fn handle_input(
        &self,
        ui: &egui::Ui,
        response: &egui::Response,
        viewport_state: &SharedViewportState,
    ) {
        let height = response.rect.height();
        let shift = ui.input(|i| i.modifiers.shift);
        let mut vp_state = viewport_state.lock();

        let panning = response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
            || (shift && response.dragged_by(egui::PointerButton::Primary));

        if panning {
            let delta = response.drag_delta();
            vp_state.camera.pan(delta.x, delta.y, height);
        } else if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            vp_state.camera.orbit(delta.x, delta.y, height);
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll_delta != 0.0 {
                vp_state.camera.dolly(scroll_delta / SCROLL_POINTS_PER_STEP);
            }
        }
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for ViewportPanel {
    fn name(&self) -> &str {
        "3D Viewport"
    }

    fn ui(&mut self, ui: &mut egui::Ui, _app_state: &SharedAppState) {
        // Fallback when no render context
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::hover());

        painter.rect_filled(response.rect, 0.0, egui::Color32::BLACK);
        painter.text(
            response.rect.center(),
            egui::Align2::CENTER_CENTER,
            "3D Viewport\n(wgpu not available)",
            egui::FontId::proportional(16.0),
            egui::Color32::GRAY,
        );

        self.last_size = available_size;
    }

    fn ui_with_render_context(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        render_state: &egui_wgpu::RenderState,
        viewport_state: &SharedViewportState,
    ) {
        let available_size = ui.available_size();
        if available_size.x < 1.0 || available_size.y < 1.0 {
            return;
        }
        if available_size != self.last_size {
            tracing::debug!(
                "Viewport panel {}x{}",
                available_size.x,
                available_size.y
            );
        }

        let pixels_per_point = ui.ctx().pixels_per_point();
        let now = Instant::now();

        // Frame update, then render with the resulting state
        let texture_id = {
            let mut app_guard = app_state.lock();
            let mut vp_guard = viewport_state.lock();
            let app = &mut *app_guard;
            let vp_state = &mut *vp_guard;

            app.session
                .resize(available_size.x, available_size.y, pixels_per_point);
            let (width, height) = app.session.viewport.physical_size();

            let texture_id = {
                let mut egui_renderer = render_state.renderer.write();
                vp_state.ensure_texture(width, height, &mut egui_renderer)
            };

            let report = app
                .session
                .update_frame(now, &mut vp_state.camera, &mut app.labels);
            vp_state.upload_textures(&app.session.take_uploads());
            vp_state.render(&app.session, report.overlay_alpha);

            app.camera_position = report.camera.position;
            app.stats = FrameStats {
                fps: app.session.fps(),
                frame_time_ms: app.session.frame_time_ms(),
                draw_count: vp_state.renderer.draw_count(),
            };

            texture_id
        };

        let response = ui.add(
            egui::Image::new(egui::load::SizedTexture::new(texture_id, available_size))
                .sense(egui::Sense::click_and_drag()),
        );

        self.handle_input(ui, &response, viewport_state);

        let app = app_state.lock();
        draw_labels(ui, response.rect, &app.labels);
        if !app.session.loading_bar_ended() {
            draw_loading_bar(ui, response.rect, app.session.loading_progress());
        }

        self.last_size = available_size;
    }
}
