//! Color palette for the UI theme

use egui::Color32;

/// Panel background
pub const BG_PANEL: Color32 = Color32::from_rgb(22, 22, 26);
/// Elevated surfaces (popups, label text boxes)
pub const BG_ELEVATED: Color32 = Color32::from_rgb(34, 34, 40);
/// Input field background
pub const BG_INPUT: Color32 = Color32::from_rgb(45, 45, 52);
/// Hover state background
pub const BG_HOVER: Color32 = Color32::from_rgb(55, 55, 65);

/// Subtle panel boundary
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(50, 50, 58);

/// Primary text color
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 230, 235);
/// Secondary text (stats, hints)
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 170);

/// Primary accent (sliders, active widgets)
pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(66, 150, 250);

/// Point-of-interest badge fill
pub const LABEL_BADGE: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 196);
/// Point-of-interest badge outline and number
pub const LABEL_FOREGROUND: Color32 = Color32::WHITE;
/// Point-of-interest description box
pub const LABEL_TEXT_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 196);

/// Loading bar fill
pub const LOADING_BAR: Color32 = Color32::WHITE;
