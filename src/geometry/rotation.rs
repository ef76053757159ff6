//! 2D rotation stored as a unit vector.

use serde::{Deserialize, Serialize};

use super::{Translation2D, EPSILON};

/// A planar rotation represented as `(cos, sin)`, never as a bare angle.
///
/// The vector form avoids wrap-around discontinuities when composing or
/// interpolating headings. Invariant after normalization: `cos² + sin² ≈ 1`;
/// degenerate inputs with near-zero magnitude normalize to the identity
/// `(1, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation2D {
    pub cos: f64,
    pub sin: f64,
}

impl Rotation2D {
    /// Build from raw `(cos, sin)` components without normalizing.
    ///
    /// The exp/log maps rely on this to carry scratch values that are not
    /// unit vectors; everything else should use [`Rotation2D::from_vector`]
    /// or the angle constructors.
    #[inline]
    pub fn new(cos: f64, sin: f64) -> Self {
        Self { cos, sin }
    }

    /// Build from an arbitrary vector, normalizing to unit length.
    pub fn from_vector(x: f64, y: f64) -> Self {
        let magnitude = x.hypot(y);
        if magnitude > EPSILON {
            Self { cos: x / magnitude, sin: y / magnitude }
        } else {
            Self { cos: 1.0, sin: 0.0 }
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self { cos: 1.0, sin: 0.0 }
    }

    #[inline]
    pub fn from_radians(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { cos, sin }
    }

    #[inline]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(crate::units::degrees_to_radians(degrees))
    }

    #[inline]
    pub fn radians(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    #[inline]
    pub fn degrees(&self) -> f64 {
        crate::units::radians_to_degrees(self.radians())
    }

    /// Tangent of the angle; signed infinity at ±90 degrees.
    pub fn tan(&self) -> f64 {
        if self.cos.abs() < EPSILON {
            if self.sin >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }
        } else {
            self.sin / self.cos
        }
    }

    /// Compose with another rotation (angle addition).
    #[inline]
    pub fn rotate_by(&self, other: &Self) -> Self {
        Self::from_vector(
            self.cos * other.cos - self.sin * other.sin,
            self.cos * other.sin + self.sin * other.cos,
        )
    }

    /// The rotation 90 degrees counterclockwise from this one.
    #[inline]
    pub fn normal(&self) -> Self {
        Self { cos: -self.sin, sin: self.cos }
    }

    #[inline]
    pub fn inverse(&self) -> Self {
        Self { cos: self.cos, sin: -self.sin }
    }

    /// This heading rotated by 180 degrees.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self { cos: -self.cos, sin: -self.sin }
    }

    /// True when the headings point the same way (assumes both normalized).
    pub fn is_parallel(&self, other: &Self) -> bool {
        (other.cos - self.cos).abs() <= EPSILON && (other.sin - self.sin).abs() <= EPSILON
    }

    #[inline]
    pub fn to_translation(&self) -> Translation2D {
        Translation2D::new(self.cos, self.sin)
    }

    /// Interpolate along the shorter arc toward `other`, clamped at the
    /// endpoints.
    pub fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            let dtheta = self.inverse().rotate_by(other).radians();
            self.rotate_by(&Self::from_radians(dtheta * x))
        }
    }

    /// Signed angular distance to `other` in radians.
    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        self.inverse().rotate_by(other).radians()
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (other.cos - self.cos).abs() <= epsilon && (other.sin - self.sin).abs() <= epsilon
    }
}

impl Default for Rotation2D {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_from_vector_normalizes() {
        let r = Rotation2D::from_vector(3.0, 4.0);
        assert_relative_eq!(r.cos, 0.6);
        assert_relative_eq!(r.sin, 0.8);
        assert_relative_eq!(r.cos * r.cos + r.sin * r.sin, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_vector_is_identity() {
        let r = Rotation2D::from_vector(1e-12, -1e-12);
        assert_eq!(r.cos, 1.0);
        assert_eq!(r.sin, 0.0);
    }

    #[test]
    fn test_rotate_by_adds_angles() {
        let r = Rotation2D::from_radians(FRAC_PI_4).rotate_by(&Rotation2D::from_radians(FRAC_PI_4));
        assert_relative_eq!(r.radians(), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_and_distance() {
        let a = Rotation2D::from_degrees(30.0);
        let b = Rotation2D::from_degrees(75.0);
        assert_relative_eq!(a.distance(&b), FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(b.distance(&a), -FRAC_PI_4, epsilon = 1e-12);
        let round = a.rotate_by(&a.inverse());
        assert_relative_eq!(round.radians(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_shorter_arc() {
        let a = Rotation2D::from_degrees(170.0);
        let b = Rotation2D::from_degrees(-170.0);
        let mid = a.interpolate(&b, 0.5);
        assert_relative_eq!(mid.degrees().abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reversed_flips_heading() {
        let r = Rotation2D::from_degrees(45.0);
        let flipped = r.reversed();
        assert_relative_eq!(flipped.radians().abs(), PI - FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(flipped.cos, -r.cos);
        assert_relative_eq!(flipped.sin, -r.sin);
    }

    #[test]
    fn test_tan_at_vertical() {
        assert_eq!(Rotation2D::from_degrees(90.0).tan(), f64::INFINITY);
        assert_eq!(Rotation2D::from_degrees(-90.0).tan(), f64::NEG_INFINITY);
        assert_relative_eq!(Rotation2D::from_degrees(45.0).tan(), 1.0, epsilon = 1e-12);
    }
}
