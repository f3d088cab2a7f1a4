//! Points of interest: 3D anchors with on-screen labels

use glam::Vec3;

use crate::config::PointsOfInterestConfig;
use crate::constants::LABEL_SELECTOR_PREFIX;
use crate::scene::NodeId;

/// A fixed 3D point with a label. Identity is its index.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub index: usize,
    /// Label anchor in world space (marker location + offset)
    pub position: Vec3,
    pub label: String,
    /// Marker sphere drawn at the un-offset location
    pub marker: Option<NodeId>,
}

impl Anchor {
    /// Stable label key, `.point-<index>`
    pub fn selector(&self) -> String {
        format!("{}{}", LABEL_SELECTOR_PREFIX, self.index)
    }
}

/// Ordered anchors sharing one offset from their marker locations
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
    offset: f32,
}

impl AnchorSet {
    pub fn from_config(config: &PointsOfInterestConfig) -> Self {
        let offset = config.offset;
        let anchors = config
            .points
            .iter()
            .enumerate()
            .map(|(index, point)| Anchor {
                index,
                position: Vec3::from(point.position) + Vec3::splat(offset),
                label: point.label.clone(),
                marker: None,
            })
            .collect();
        Self { anchors, offset }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub(crate) fn set_marker(&mut self, index: usize, marker: NodeId) {
        if let Some(anchor) = self.anchors.get_mut(index) {
            anchor.marker = Some(marker);
        }
    }

    /// Marker location of an anchor (position minus offset)
    pub fn location(&self, index: usize) -> Option<Vec3> {
        self.anchors
            .get(index)
            .map(|a| a.position - Vec3::splat(self.offset))
    }

    /// Move an anchor so its marker sits at `location`.
    /// Returns the marker node to move along with it.
    pub fn set_location(&mut self, index: usize, location: Vec3) -> Option<NodeId> {
        let offset = self.offset;
        let anchor = self.anchors.get_mut(index)?;
        anchor.position = location + Vec3::splat(offset);
        anchor.marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors_are_offset_from_markers() {
        let anchors = AnchorSet::from_config(&PointsOfInterestConfig::default());
        assert_eq!(anchors.len(), 5);
        let first = anchors.get(0).unwrap();
        assert!((first.position - Vec3::new(1.9, 0.4, -0.06)).length() < 1e-6);
        assert_eq!(first.selector(), ".point-0");
        assert_eq!(anchors.get(4).unwrap().selector(), ".point-4");
    }

    #[test]
    fn test_set_location_keeps_offset() {
        let mut anchors = AnchorSet::from_config(&PointsOfInterestConfig::default());
        anchors.set_location(2, Vec3::new(1.0, 2.0, 3.0));
        assert!((anchors.get(2).unwrap().position - Vec3::new(1.1, 2.1, 3.1)).length() < 1e-6);
        assert!((anchors.location(2).unwrap() - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
        assert!(anchors.set_location(9, Vec3::ZERO).is_none());
    }
}
