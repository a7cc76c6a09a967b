//! Geometry helpers shared by sensors and steering behaviors

use crate::quaternion::Quat;
use crate::vector::Vec3;
use crate::radians;

/// Limit the length of `v` to `max`.
///
/// Vectors already within the limit are returned unchanged; a non-positive
/// limit yields the zero vector.
#[inline]
pub fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    if max <= 0.0 {
        return Vec3::ZERO;
    }
    let len_sq = v.length_squared();
    if len_sq > max * max {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Angle between two vectors in radians. Zero if either vector is zero.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let mag = a.length() * b.length();
    if mag == 0.0 {
        return 0.0;
    }
    (a.dot(b) / mag).clamp(-1.0, 1.0).acos()
}

/// Signed yaw angles (degrees) of a fan of `num_rays` directions.
///
/// A half-angle of 180 spreads the rays around the full circle starting at
/// forward; smaller half-angles spread them evenly from `-half` to `+half`.
/// Angles are ordered by distance from forward, positive first on ties.
pub fn fan_angles(num_rays: usize, max_half_angle: f32) -> Vec<f32> {
    if num_rays == 0 {
        return Vec::new();
    }

    let half = if max_half_angle.is_finite() {
        max_half_angle.clamp(0.0, 180.0)
    } else {
        180.0
    };

    let mut angles: Vec<f32> = if half >= 180.0 {
        let step = 360.0 / num_rays as f32;
        (0..num_rays)
            .map(|i| {
                let angle = i as f32 * step;
                if angle > 180.0 { angle - 360.0 } else { angle }
            })
            .collect()
    } else if num_rays == 1 {
        vec![0.0]
    } else {
        // centred indices keep mirrored rays exactly symmetric
        let step = 2.0 * half / (num_rays - 1) as f32;
        let mid = (num_rays - 1) as f32 * 0.5;
        (0..num_rays).map(|i| (i as f32 - mid) * step).collect()
    };

    angles.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(b.total_cmp(a)));
    angles
}

/// Fan of unit directions in the agent's local frame (forward = +Z, yaw
/// about +Y). See [`fan_angles`] for the spread and ordering.
pub fn directions_in_fan(num_rays: usize, max_half_angle: f32) -> Vec<Vec3> {
    fan_angles(num_rays, max_half_angle)
        .into_iter()
        .map(|deg| Quat::from_rotation_y(radians(deg)) * Vec3::FORWARD)
        .collect()
}

/// Wrap a scalar periodically into `[min, max)`.
#[inline]
pub fn wrap_scalar(value: f32, min: f32, max: f32) -> f32 {
    let size = max - min;
    if size.is_nan() || size <= 0.0 || !value.is_finite() {
        return min;
    }
    let wrapped = min + (value - min).rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative offsets
    if wrapped >= max { min } else { wrapped }
}

fn clamp_scalar(value: f32, min: f32, max: f32) -> f32 {
    if !(min <= max) || !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

/// Wrap every axis of `position` into the box `[min, max)`.
pub fn wrap_to_bounds(position: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        wrap_scalar(position.x, min.x, max.x),
        wrap_scalar(position.y, min.y, max.y),
        wrap_scalar(position.z, min.z, max.z),
    )
}

/// Wrap X and Z into the box, clamping Y to `[min.y, max.y]`.
pub fn wrap_xz(position: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        wrap_scalar(position.x, min.x, max.x),
        clamp_scalar(position.y, min.y, max.y),
        wrap_scalar(position.z, min.z, max.z),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_magnitude() {
        let v = clamp_magnitude(Vec3::new(3.0, 0.0, 4.0), 1.0);
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x, 0.6, epsilon = 1e-6);

        let short = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(clamp_magnitude(short, 1.0), short);
        assert_eq!(clamp_magnitude(short, 0.0), Vec3::ZERO);
        assert_eq!(clamp_magnitude(short, -2.0), Vec3::ZERO);
    }

    #[test]
    fn test_fan_full_circle_four_rays() {
        let dirs = directions_in_fan(4, 180.0);
        assert_eq!(dirs.len(), 4);
        assert!((dirs[0] - Vec3::Z).length() < 1e-5);
        assert!((dirs[1] - Vec3::X).length() < 1e-5);
        assert!((dirs[2] - Vec3::NEG_X).length() < 1e-5);
        assert!((dirs[3] - Vec3::NEG_Z).length() < 1e-5);

        for i in 0..4 {
            for j in (i + 1)..4 {
                let angle = angle_between(dirs[i], dirs[j]).to_degrees();
                assert!(angle > 89.9, "rays {i} and {j} only {angle} degrees apart");
            }
        }
    }

    #[test]
    fn test_fan_zero_rays() {
        assert!(directions_in_fan(0, 180.0).is_empty());
        assert!(directions_in_fan(0, 45.0).is_empty());
    }

    #[test]
    fn test_fan_single_ray_is_forward() {
        let dirs = directions_in_fan(1, 30.0);
        assert_eq!(dirs.len(), 1);
        assert!((dirs[0] - Vec3::Z).length() < 1e-6);
        assert!((directions_in_fan(1, 180.0)[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_fan_cone_is_symmetric() {
        let angles = fan_angles(5, 60.0);
        assert_eq!(angles, vec![0.0, 30.0, -30.0, 60.0, -60.0]);

        let even = fan_angles(4, 45.0);
        assert_eq!(even.len(), 4);
        assert_relative_eq!(even[0], 15.0, epsilon = 1e-5);
        assert_relative_eq!(even[1], -15.0, epsilon = 1e-5);
        assert_relative_eq!(even[3], -45.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fan_clamps_half_angle() {
        assert_eq!(fan_angles(2, 400.0), vec![0.0, 180.0]);
        assert_eq!(fan_angles(3, -10.0), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_wrap_scalar() {
        assert_relative_eq!(wrap_scalar(11.0, -10.0, 10.0), -9.0, epsilon = 1e-5);
        assert_relative_eq!(wrap_scalar(-10.5, -10.0, 10.0), 9.5, epsilon = 1e-5);
        assert_relative_eq!(wrap_scalar(3.0, -10.0, 10.0), 3.0, epsilon = 1e-6);
        assert_eq!(wrap_scalar(3.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_wrap_xz_clamps_height() {
        let min = Vec3::new(-10.0, 0.5, -10.0);
        let max = Vec3::new(10.0, 1.5, 10.0);
        let p = wrap_xz(Vec3::new(12.0, 4.0, -11.0), min, max);
        assert_relative_eq!(p.x, -8.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.5, epsilon = 1e-6);
        assert_relative_eq!(p.z, 9.0, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_between() {
        assert_relative_eq!(angle_between(Vec3::X, Vec3::Z), core::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);
    }
}
