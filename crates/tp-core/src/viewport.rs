//! Output surface dimensions

use crate::constants::MAX_PIXEL_RATIO;

/// Logical viewport size and device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            device_pixel_ratio,
        }
    }

    /// Apply a resize. Returns true if anything changed.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> bool {
        let next = Self::new(width, height, device_pixel_ratio);
        let changed = next != *self;
        *self = next;
        changed
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Device pixel ratio capped at 2
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.clamp(f32::MIN_POSITIVE, MAX_PIXEL_RATIO)
    }

    /// Render target size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            (self.width * ratio).round().max(1.0) as u32,
            (self.height * ratio).round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let viewport = Viewport::new(800.0, 600.0, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.physical_size(), (1600, 1200));
        assert_eq!(Viewport::new(800.0, 600.0, 1.5).physical_size(), (1200, 900));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut viewport = Viewport::default();
        assert!(viewport.resize(1000.0, 500.0, 1.0));
        assert_eq!(viewport.aspect(), 2.0);
        assert!(!viewport.resize(1000.0, 500.0, 1.0));
    }
}
