//! Common slider rows for the debug panel

use std::ops::RangeInclusive;

use egui::{Slider, Ui};

/// Render one labeled slider.
/// Returns true if the value was changed
pub fn slider_row(
    ui: &mut Ui,
    label: &str,
    value: &mut f32,
    range: RangeInclusive<f32>,
    step: f64,
) -> bool {
    ui.add(Slider::new(value, range).step_by(step).text(label))
        .changed()
}

/// Render x/y/z sliders under a heading.
/// Returns true if any value was changed
pub fn vector3_sliders(
    ui: &mut Ui,
    label: &str,
    values: &mut [f32; 3],
    range: RangeInclusive<f32>,
    step: f64,
) -> bool {
    ui.label(label);
    let mut changed = false;
    for (axis, value) in ["x", "y", "z"].into_iter().zip(values.iter_mut()) {
        changed |= slider_row(ui, axis, value, range.clone(), step);
    }
    changed
}
