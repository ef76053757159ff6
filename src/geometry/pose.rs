//! Rigid 2D transforms and the SE(2) exponential/logarithm maps.

use serde::{Deserialize, Serialize};

use super::{lerp, Rotation2D, Translation2D, Twist2D, EPSILON};

/// A rigid transform in the plane: translation plus heading.
///
/// `Pose2D` is the SE(2) group element; [`Twist2D`] is the corresponding
/// Lie-algebra element. [`Pose2D::exp`] and [`Pose2D::log`] map between
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    pub translation: Translation2D,
    pub rotation: Rotation2D,
}

impl Pose2D {
    #[inline]
    pub fn new(translation: Translation2D, rotation: Rotation2D) -> Self {
        Self { translation, rotation }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Translation2D::zero(), Rotation2D::identity())
    }

    #[inline]
    pub fn from_xy_radians(x: f64, y: f64, radians: f64) -> Self {
        Self::new(Translation2D::new(x, y), Rotation2D::from_radians(radians))
    }

    /// Boundary constructor: headings arrive in degrees at the crate edge.
    #[inline]
    pub fn from_xy_degrees(x: f64, y: f64, degrees: f64) -> Self {
        Self::new(Translation2D::new(x, y), Rotation2D::from_degrees(degrees))
    }

    /// The transform of `end` expressed in `start`'s local frame.
    pub fn delta(start: &Self, end: &Self) -> Self {
        let inv_rot = start.rotation.inverse();
        Self::new(
            Translation2D::delta(&start.translation, &end.translation).rotate_by(&inv_rot),
            end.rotation.rotate_by(&inv_rot),
        )
    }

    /// The twist that carries `start` onto `end`.
    #[inline]
    pub fn twist_between(start: &Self, end: &Self) -> Twist2D {
        Self::log(&Self::delta(start, end))
    }

    /// SE(2) exponential map: integrate a constant twist into a pose delta.
    ///
    /// Uses a Taylor branch near `dtheta = 0` so the sinc-style terms stay
    /// finite.
    pub fn exp(twist: &Twist2D) -> Self {
        let (sin_theta, cos_theta) = twist.dtheta.sin_cos();
        let (s, c) = if twist.dtheta.abs() < EPSILON {
            (1.0 - twist.dtheta * twist.dtheta / 6.0, 0.5 * twist.dtheta)
        } else {
            (sin_theta / twist.dtheta, (1.0 - cos_theta) / twist.dtheta)
        };
        Self::new(
            Translation2D::new(twist.dx * s - twist.dy * c, twist.dx * c + twist.dy * s),
            Rotation2D::new(cos_theta, sin_theta),
        )
    }

    /// SE(2) logarithm map, inverse of [`Pose2D::exp`].
    pub fn log(transform: &Self) -> Twist2D {
        let dtheta = transform.rotation.radians();
        let half_dtheta = 0.5 * dtheta;
        let cos_minus_one = transform.rotation.cos - 1.0;
        let halftheta_by_tan_of_halfdtheta = if cos_minus_one.abs() < EPSILON {
            1.0 - dtheta * dtheta / 12.0
        } else {
            -(half_dtheta * transform.rotation.sin) / cos_minus_one
        };
        // Scratch rotation is deliberately unnormalized; it carries the
        // inverse left Jacobian, not a heading.
        let translation = transform
            .translation
            .rotate_by(&Rotation2D::new(halftheta_by_tan_of_halfdtheta, -half_dtheta));
        Twist2D::new(translation.x, translation.y, dtheta)
    }

    /// Compose: apply `other` in this pose's local frame.
    pub fn transform_by(&self, other: &Self) -> Self {
        Self::new(
            self.translation.translate_by(&other.translation.rotate_by(&self.rotation)),
            self.rotation.rotate_by(&other.rotation),
        )
    }

    pub fn inverse(&self) -> Self {
        let inv_rot = self.rotation.inverse();
        Self::new(self.translation.inverse().rotate_by(&inv_rot), inv_rot)
    }

    /// Move along the current heading by a local offset.
    pub fn offset_by(&self, x: f64, y: f64) -> Self {
        Self::new(
            self.translation
                .translate_by(&Translation2D::new(x, y).rotate_by(&self.rotation)),
            self.rotation,
        )
    }

    /// True when this pose and `other` lie on one straight line.
    ///
    /// Both headings must be parallel, and also parallel to the bearing from
    /// this pose to the other. A zero-length bearing normalizes to the
    /// identity direction, so coincident points with parallel headings only
    /// count as colinear when that heading is the identity too.
    pub fn is_colinear(&self, other: &Self) -> bool {
        if !self.rotation.is_parallel(&other.rotation) {
            return false;
        }
        let bearing = Translation2D::delta(&self.translation, &other.translation).direction();
        self.rotation.is_parallel(&bearing)
    }

    /// Geodesic interpolation along the constant-twist path to `other`,
    /// clamped at the endpoints.
    pub fn interpolate(&self, other: &Self, x: f64) -> Self {
        if x <= 0.0 {
            *self
        } else if x >= 1.0 {
            *other
        } else {
            let twist = Self::twist_between(self, other);
            self.transform_by(&Self::exp(&twist.scaled(x)))
        }
    }

    /// Arc-length style distance: the norm of the connecting twist.
    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        Self::twist_between(self, other).norm()
    }

    /// Reflection about the x axis.
    pub fn mirror(&self) -> Self {
        Self::new(
            Translation2D::new(self.translation.x, -self.translation.y),
            self.rotation.inverse(),
        )
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.translation.approx_eq(&other.translation, epsilon)
            && self.rotation.approx_eq(&other.rotation, epsilon)
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// A pose stamped with path curvature.
///
/// `dcurvature_ds` is curvature change per unit arc length (the spline's
/// parametric curvature-rate divided by parametric speed), the quantity the
/// curvature optimizer minimizes and the timing constraints consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCurvature {
    pub pose: Pose2D,
    /// Signed path curvature, 1 / length-unit. Infinite for a point turn.
    pub curvature: f64,
    /// Curvature change per unit arc length, 1 / length-unit².
    pub dcurvature_ds: f64,
}

impl PoseWithCurvature {
    #[inline]
    pub fn new(pose: Pose2D, curvature: f64, dcurvature_ds: f64) -> Self {
        Self { pose, curvature, dcurvature_ds }
    }

    /// Geodesic pose interpolation with linearly interpolated curvature.
    pub fn interpolate(&self, other: &Self, x: f64) -> Self {
        Self {
            pose: self.pose.interpolate(&other.pose, x),
            curvature: lerp(self.curvature, other.curvature, x),
            dcurvature_ds: lerp(self.dcurvature_ds, other.dcurvature_ds, x),
        }
    }

    #[inline]
    pub fn distance(&self, other: &Self) -> f64 {
        self.pose.distance(&other.pose)
    }

    /// Reflection across the x axis. Curvature flips sign with the turn
    /// direction.
    pub fn mirror(&self) -> Self {
        Self {
            pose: self.pose.mirror(),
            curvature: -self.curvature,
            dcurvature_ds: -self.dcurvature_ds,
        }
    }
}
