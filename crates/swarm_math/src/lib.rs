//! # swarm_math - Steering Math Primitives
//!
//! Small, dependency-free math types for the swarm steering engine:
//! vectors, orientations, rays, axis-aligned boxes and the geometry helpers
//! sensors and behaviors share (direction fans, magnitude clamping, world
//! wrapping).

pub mod vector;
pub mod quaternion;
pub mod ray;
pub mod bounds;
pub mod intersect;
pub mod geometry;

pub use vector::*;
pub use quaternion::*;
pub use ray::*;
pub use bounds::*;
pub use intersect::*;
pub use geometry::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

pub mod prelude {
    pub use crate::vector::Vec3;
    pub use crate::quaternion::Quat;
    pub use crate::ray::Ray;
    pub use crate::bounds::AABB;
    pub use crate::intersect::{ray_aabb, ray_sphere_at};
    pub use crate::geometry::{
        angle_between, clamp_magnitude, directions_in_fan, fan_angles, wrap_to_bounds, wrap_xz,
    };
    pub use crate::{degrees, radians};
}
