//! Quaternion for agent orientation

use crate::vector::Vec3;
use core::ops::Mul;

/// Quaternion representing a 3D rotation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a new quaternion
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from rotation around the Y (up) axis
    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    /// Orientation whose forward (+Z) axis points along `forward`, keeping
    /// `up` as the reference up vector.
    ///
    /// Returns identity for a zero `forward`. When `forward` is parallel to
    /// `up` another reference axis is picked so the result stays valid.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let z = forward.normalize_or_zero();
        if z == Vec3::ZERO {
            return Self::IDENTITY;
        }

        let mut x = up.cross(z);
        if x.length_squared() < 1e-8 {
            x = if z.x.abs() < 0.9 { Vec3::X.cross(z) } else { Vec3::Z.cross(z) };
        }
        let x = x.normalize();
        let y = z.cross(x);

        Self::from_basis(x, y, z)
    }

    /// Build from orthonormal basis columns
    fn from_basis(x: Vec3, y: Vec3, z: Vec3) -> Self {
        let trace = x.x + y.y + z.z;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((y.z - z.y) / s, (z.x - x.z) / s, (x.y - y.x) / s, 0.25 * s)
        } else if x.x > y.y && x.x > z.z {
            let s = (1.0 + x.x - y.y - z.z).sqrt() * 2.0;
            Self::new(0.25 * s, (x.y + y.x) / s, (z.x + x.z) / s, (y.z - z.y) / s)
        } else if y.y > z.z {
            let s = (1.0 + y.y - x.x - z.z).sqrt() * 2.0;
            Self::new((x.y + y.x) / s, 0.25 * s, (y.z + z.y) / s, (z.x - x.z) / s)
        } else {
            let s = (1.0 + z.z - x.x - y.y).sqrt() * 2.0;
            Self::new((z.x + x.z) / s, (y.z + z.y) / s, 0.25 * s, (x.y - y.x) / s)
        }
        .normalize()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize the quaternion; a zero quaternion becomes identity
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Rotated forward (+Z) axis, normalized
    #[inline]
    pub fn forward(self) -> Vec3 {
        self.rotate(Vec3::FORWARD).normalize()
    }

    /// Rotated up (+Y) axis, normalized
    #[inline]
    pub fn up(self) -> Vec3 {
        self.rotate(Vec3::UP).normalize()
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate(rhs)
    }
}
