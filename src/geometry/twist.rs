//! Velocity-space element of SE(2).

use serde::{Deserialize, Serialize};

use super::EPSILON;

/// A movement along an arc of constant curvature: forward, sideways, and
/// angular components. Integrated into a [`super::Pose2D`] by the
/// exponential map.
///
/// For a differential drive `dy` is always zero; it is carried so the
/// logarithm map of an arbitrary transform stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twist2D {
    pub dx: f64,
    pub dy: f64,
    pub dtheta: f64,
}

impl Twist2D {
    #[inline]
    pub fn new(dx: f64, dy: f64, dtheta: f64) -> Self {
        Self { dx, dy, dtheta }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.dx * scale, self.dy * scale, self.dtheta * scale)
    }

    /// Translational magnitude. The common nonholonomic case short-circuits
    /// the hypot.
    #[inline]
    pub fn norm(&self) -> f64 {
        if self.dy == 0.0 {
            self.dx.abs()
        } else {
            self.dx.hypot(self.dy)
        }
    }

    /// Curvature of the arc this twist sweeps, zero for a pure translation.
    #[inline]
    pub fn curvature(&self) -> f64 {
        if self.dtheta.abs() < EPSILON {
            0.0
        } else {
            self.dtheta / self.norm()
        }
    }
}

impl Default for Twist2D {
    fn default() -> Self {
        Self::zero()
    }
}
