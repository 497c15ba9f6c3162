//! Vector capability required by the filter, plus a plain [`Vec3`] impl.
//!
//! The filter only needs vector add/subtract, scalar multiply/divide, and a
//! Euclidean magnitude, so it is generic over [`MotionVector`] rather than
//! tied to any particular math library. Implement the trait for your engine's
//! vector type to smooth it directly; [`Vec3`] and `f32` impls are provided.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Capability the filter requires of a smoothed value.
pub trait MotionVector:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
{
    /// Additive identity, used to zero the internal velocity.
    const ZERO: Self;

    /// Euclidean magnitude.
    fn magnitude(self) -> f32;
}

/// Plain 3-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn magnitude(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).magnitude()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        rhs * self
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl MotionVector for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    #[inline]
    fn magnitude(self) -> f32 {
        Vec3::magnitude(self)
    }
}

impl MotionVector for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn magnitude(self) -> f32 {
        self.abs()
    }
}
