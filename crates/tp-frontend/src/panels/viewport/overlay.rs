//! 2D overlays drawn over the viewport image

use egui::{Align2, FontId, Pos2, Rect, Stroke, vec2};

use crate::state::LabelOverlay;
use crate::theme::palette;

/// Radius of a point-of-interest badge
const BADGE_RADIUS: f32 = 20.0;
/// Width of the description shown on hover
const TEXT_WIDTH: f32 = 200.0;
/// Loading bar thickness
const LOADING_BAR_HEIGHT: f32 = 2.0;

/// Whether the pointer is over a badge centered at `center`
pub fn badge_hovered(pointer: Option<Pos2>, center: Pos2) -> bool {
    pointer.is_some_and(|p| p.distance(center) <= BADGE_RADIUS)
}

/// Bar across the vertical middle of `rect`, filled from the left
pub fn loading_bar_rect(rect: Rect, progress: f32) -> Rect {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let top = rect.center().y - LOADING_BAR_HEIGHT * 0.5;
    Rect::from_min_size(
        Pos2::new(rect.left(), top),
        vec2(rect.width() * progress, LOADING_BAR_HEIGHT),
    )
}

/// Draw numbered badges for visible labels; hovering one shows its text.
pub fn draw_labels(ui: &egui::Ui, rect: Rect, labels: &LabelOverlay) {
    let painter = ui.painter_at(rect);
    let pointer = ui.ctx().pointer_hover_pos();

    for (index, label) in labels.visible() {
        let Some(center) = labels.position(index, rect.center()) else {
            continue;
        };

        painter.circle(
            center,
            BADGE_RADIUS,
            palette::LABEL_BADGE,
            Stroke::new(1.0, palette::LABEL_FOREGROUND),
        );
        painter.text(
            center,
            Align2::CENTER_CENTER,
            (index + 1).to_string(),
            FontId::proportional(14.0),
            palette::LABEL_FOREGROUND,
        );

        if badge_hovered(pointer, center) && !label.text.is_empty() {
            let galley = painter.layout(
                label.text.clone(),
                FontId::proportional(13.0),
                palette::TEXT_PRIMARY,
                TEXT_WIDTH,
            );
            let origin = center + vec2(-galley.size().x * 0.5, BADGE_RADIUS + 10.0);
            let background = Rect::from_min_size(origin, galley.size()).expand(8.0);
            painter.rect_filled(background, 4.0, palette::LABEL_TEXT_BG);
            painter.galley(origin, galley, palette::TEXT_PRIMARY);
        }
    }
}

/// Draw the loading progress bar
pub fn draw_loading_bar(ui: &egui::Ui, rect: Rect, progress: f32) {
    let bar = loading_bar_rect(rect, progress);
    if bar.width() <= 0.0 {
        return;
    }
    ui.painter_at(rect).rect_filled(bar, 0.0, palette::LOADING_BAR);
}
