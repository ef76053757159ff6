//! 2D translation vector.

use serde::{Deserialize, Serialize};

use super::Rotation2D;

/// A displacement in the plane.
///
/// Immutable value type; every operation returns a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation2D {
    pub x: f64,
    pub y: f64,
}

impl Translation2D {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Vector from `start` to `end`.
    #[inline]
    pub fn delta(start: &Self, end: &Self) -> Self {
        Self::new(end.x - start.x, end.y - start.y)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        Self::delta(self, other).norm()
    }

    #[inline]
    pub fn translate_by(&self, other: &Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Rotate this vector by a rotation (standard 2D rotation matrix).
    #[inline]
    pub fn rotate_by(&self, rotation: &Rotation2D) -> Self {
        Self::new(
            self.x * rotation.cos - self.y * rotation.sin,
            self.x * rotation.sin + self.y * rotation.cos,
        )
    }

    /// Direction of this vector as a unit rotation.
    ///
    /// The zero vector normalizes to the identity rotation.
    #[inline]
    pub fn direction(&self) -> Rotation2D {
        Rotation2D::from_vector(self.x, self.y)
    }

    #[inline]
    pub fn inverse(&self) -> Self {
        Self::new(-self.x, -self.y)
    }

    #[inline]
    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Interpolate toward `other`, clamped to the segment endpoints.
    pub fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            self.extrapolate(other, x)
        }
    }

    /// Unclamped linear interpolation toward `other`.
    #[inline]
    pub fn extrapolate(&self, other: &Self, x: f64) -> Self {
        Self::new(self.x + x * (other.x - self.x), self.y + x * (other.y - self.y))
    }

    #[inline]
    pub fn dot(a: &Self, b: &Self) -> f64 {
        a.x * b.x + a.y * b.y
    }

    #[inline]
    pub fn cross(a: &Self, b: &Self) -> f64 {
        a.x * b.y - a.y * b.x
    }

    /// Unsigned angle between two vectors.
    ///
    /// Undefined when either vector has zero length; returns the identity
    /// rotation in that case rather than failing.
    pub fn angle_between(a: &Self, b: &Self) -> Rotation2D {
        let cos = Self::dot(a, b) / (a.norm() * b.norm());
        if cos.is_nan() {
            Rotation2D::identity()
        } else {
            Rotation2D::from_radians(cos.clamp(-1.0, 1.0).acos())
        }
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (other.x - self.x).abs() <= epsilon && (other.y - self.y).abs() <= epsilon
    }
}

impl Default for Translation2D {
    fn default() -> Self {
        Self::zero()
    }
}
