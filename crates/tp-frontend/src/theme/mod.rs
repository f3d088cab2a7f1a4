//! Theme module for UI styling

pub mod palette;

use egui::{CornerRadius, Stroke, Visuals};

/// Dark visuals used by the debug panel
pub fn visuals() -> Visuals {
    let mut v = Visuals::dark();

    v.panel_fill = palette::BG_PANEL;
    v.window_fill = palette::BG_ELEVATED;
    v.faint_bg_color = palette::BG_INPUT;
    v.override_text_color = Some(palette::TEXT_PRIMARY);
    v.selection.stroke = Stroke::new(1.0, palette::ACCENT_PRIMARY);

    v.widgets.inactive.bg_fill = palette::BG_INPUT;
    v.widgets.inactive.bg_stroke = Stroke::new(1.0, palette::BORDER_SUBTLE);
    v.widgets.inactive.corner_radius = CornerRadius::same(4);

    v.widgets.hovered.bg_fill = palette::BG_HOVER;
    v.widgets.hovered.corner_radius = CornerRadius::same(4);

    v.widgets.active.bg_fill = palette::ACCENT_PRIMARY;
    v.widgets.active.corner_radius = CornerRadius::same(4);

    v
}

/// Apply the theme to the egui context
pub fn apply_theme(ctx: &egui::Context) {
    ctx.set_visuals(visuals());
}
