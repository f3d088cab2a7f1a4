//! Point-of-interest label overlay state

use tp_core::{AnchorSet, LabelSink};

/// One on-screen label
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub visible: bool,
    /// Offset from the viewport center in logical pixels, +y down
    pub translation: egui::Vec2,
}

/// Labels indexed like their anchors. All start hidden.
#[derive(Debug, Clone, Default)]
pub struct LabelOverlay {
    labels: Vec<Label>,
}

impl LabelOverlay {
    pub fn from_anchors(anchors: &AnchorSet) -> Self {
        let labels = anchors
            .iter()
            .map(|anchor| Label {
                text: anchor.label.clone(),
                visible: false,
                translation: egui::Vec2::ZERO,
            })
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Visible labels with their index
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Label)> {
        self.labels.iter().enumerate().filter(|(_, l)| l.visible)
    }

    /// Screen position of a label inside a viewport centered at `center`
    pub fn position(&self, index: usize, center: egui::Pos2) -> Option<egui::Pos2> {
        self.labels.get(index).map(|l| center + l.translation)
    }
}

impl LabelSink for LabelOverlay {
    fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(label) = self.labels.get_mut(index) {
            label.visible = visible;
        }
    }

    fn set_translation(&mut self, index: usize, x: f32, y: f32) {
        if let Some(label) = self.labels.get_mut(index) {
            label.translation = egui::vec2(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use tp_core::config::PointsOfInterestConfig;

    use super::*;

    fn overlay() -> LabelOverlay {
        LabelOverlay::from_anchors(&AnchorSet::from_config(&PointsOfInterestConfig::default()))
    }

    #[test]
    fn test_labels_start_hidden() {
        let labels = overlay();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels.visible().count(), 0);
        assert_eq!(labels.get(0).map(|l| l.text.as_str()), Some("Glass bricks"));
    }

    #[test]
    fn test_sink_updates_label() {
        let mut labels = overlay();
        labels.set_visible(2, true);
        labels.set_translation(2, 40.0, -12.5);

        let visible: Vec<usize> = labels.visible().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![2]);
        assert_eq!(
            labels.position(2, egui::pos2(640.0, 360.0)),
            Some(egui::pos2(680.0, 347.5))
        );
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut labels = overlay();
        labels.set_visible(9, true);
        labels.set_translation(9, 1.0, 1.0);
        assert_eq!(labels.visible().count(), 0);
        assert!(labels.position(9, egui::Pos2::ZERO).is_none());
    }
}
