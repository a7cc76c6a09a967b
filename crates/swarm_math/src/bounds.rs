//! Axis-aligned boxes used for broad-phase cell lookup and box bodies

use crate::vector::Vec3;

/// Axis-aligned box between `min` and `max`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Inverted box; growing it by any point yields that point
    pub const EMPTY: Self = Self {
        min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
        max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box holding `self` and `point`
    pub fn expand_to_include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grows_to_segment() {
        let segment = AABB::EMPTY
            .expand_to_include(Vec3::new(1.0, 0.0, -2.0))
            .expand_to_include(Vec3::new(-1.0, 0.0, 3.0));
        assert_eq!(segment.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(segment.max, Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_from_center_half_extents() {
        let aabb = AABB::from_center_half_extents(Vec3::X, Vec3::splat(0.5));
        assert_eq!(aabb, AABB::new(Vec3::new(0.5, -0.5, -0.5), Vec3::new(1.5, 0.5, 0.5)));
    }
}
