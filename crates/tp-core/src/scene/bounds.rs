//! Axis-aligned bounds used for mesh extents and raycast broadphase.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: Vec3,
    /// Maximum corner of the bounding box.
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox = bbox.expand_to_include(point);
        }
        bbox
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the half-extents of the bounding box.
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Returns the size (full extents) of the bounding box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the union of two bounding boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Transforms the bounding box by the given matrix.
    ///
    /// Note: This returns an axis-aligned bounding box that contains
    /// the transformed corners, which may be larger than optimal.
    pub fn transform(&self, transform: &Mat4) -> BoundingBox {
        if !self.is_valid() {
            return *self;
        }
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed_corners = corners.map(|c| transform.transform_point3(c));
        BoundingBox::from_points(transformed_corners)
    }

    /// Returns true if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Slab test. Returns the entry distance along `dir`, clamped to 0 when
    /// the origin is inside the box.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        if !self.is_valid() {
            return None;
        }
        let inv = dir.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();

        // min/max_element skip the NaN lanes produced by 0 * inf
        (far >= near.max(0.0)).then(|| near.max(0.0))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_center() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.center(), Vec3::ZERO);
    }

    #[test]
    fn test_bounding_box_half_extents() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.half_extents(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(0.0, 0.0, 0.0));
        let b = BoundingBox::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(u.max, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_box_is_invalid_and_survives_transform() {
        let empty = BoundingBox::empty();
        assert!(!empty.is_valid());
        assert!(!empty.transform(&Mat4::from_scale(Vec3::splat(2.0))).is_valid());
    }

    #[test]
    fn test_transform_rotated_box() {
        let bbox = BoundingBox::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        let rotated = bbox.transform(&Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((rotated.size() - Vec3::new(6.0, 4.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn test_ray_entry() {
        let bbox = BoundingBox::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let hit = bbox.ray_entry(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_eq!(hit, Some(4.0));
        assert_eq!(bbox.ray_entry(Vec3::new(0.0, 0.0, 5.0), Vec3::Z), None);
        assert_eq!(bbox.ray_entry(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z), None);
        assert_eq!(bbox.ray_entry(Vec3::ZERO, Vec3::X), Some(0.0));
    }
}
