//! Planar quintic Hermite spline segments.
//!
//! A [`Spline2D`] pairs two [`Spline1D`] polynomials into a curve in the
//! plane. Headings come from the parametric derivative, curvature from the
//! standard planar formula. The curvature optimizer and the adaptive sampler
//! both hammer the same parameter values repeatedly, so each segment keeps a
//! small per-derivative memo of the last evaluation.

use std::cell::RefCell;

use crate::geometry::{Pose2D, PoseWithCurvature, Rotation2D, Translation2D};

use super::Spline1D;

/// Hermite tangent magnitude as a fraction of chord length.
const TANGENT_SCALE: f64 = 1.2;

/// Last-evaluation memo, one slot per derivative order.
#[derive(Debug, Clone, Copy, Default)]
struct EvalCache {
    point: Option<(f64, f64, f64)>,
    first: Option<(f64, f64, f64)>,
    second: Option<(f64, f64, f64)>,
    third: Option<(f64, f64, f64)>,
}

impl EvalCache {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One spline segment between two waypoints.
#[derive(Debug, Clone)]
pub struct Spline2D {
    x: Spline1D,
    y: Spline1D,
    cache: RefCell<EvalCache>,
}

impl Spline2D {
    pub fn new(x: Spline1D, y: Spline1D) -> Self {
        Self {
            x,
            y,
            cache: RefCell::new(EvalCache::default()),
        }
    }

    /// Fit a segment between two waypoints. Tangent directions follow the
    /// waypoint headings; tangent magnitudes scale with the chord so the
    /// fit stays well conditioned for short and long segments alike. The
    /// endpoint second derivatives start at zero and are left for the
    /// curvature optimizer.
    pub fn from_poses(p0: &Pose2D, p1: &Pose2D) -> Self {
        let scale = TANGENT_SCALE * p0.translation.distance(&p1.translation);
        let x = Spline1D::new(
            p0.translation.x,
            p0.rotation.cos * scale,
            0.0,
            p1.translation.x,
            p1.rotation.cos * scale,
            0.0,
        );
        let y = Spline1D::new(
            p0.translation.y,
            p0.rotation.sin * scale,
            0.0,
            p1.translation.y,
            p1.rotation.sin * scale,
            0.0,
        );
        Self::new(x, y)
    }

    fn point_xy(&self, t: f64) -> (f64, f64) {
        let cached = self.cache.borrow().point;
        if let Some((ct, x, y)) = cached {
            if ct == t {
                return (x, y);
            }
        }
        let x = self.x.position(t);
        let y = self.y.position(t);
        self.cache.borrow_mut().point = Some((t, x, y));
        (x, y)
    }

    fn first_derivative(&self, t: f64) -> (f64, f64) {
        let cached = self.cache.borrow().first;
        if let Some((ct, dx, dy)) = cached {
            if ct == t {
                return (dx, dy);
            }
        }
        let dx = self.x.tangent(t);
        let dy = self.y.tangent(t);
        self.cache.borrow_mut().first = Some((t, dx, dy));
        (dx, dy)
    }

    fn second_derivative(&self, t: f64) -> (f64, f64) {
        let cached = self.cache.borrow().second;
        if let Some((ct, ddx, ddy)) = cached {
            if ct == t {
                return (ddx, ddy);
            }
        }
        let ddx = self.x.curvature(t);
        let ddy = self.y.curvature(t);
        self.cache.borrow_mut().second = Some((t, ddx, ddy));
        (ddx, ddy)
    }

    fn third_derivative(&self, t: f64) -> (f64, f64) {
        let cached = self.cache.borrow().third;
        if let Some((ct, dddx, dddy)) = cached {
            if ct == t {
                return (dddx, dddy);
            }
        }
        let dddx = self.x.dcurvature(t);
        let dddy = self.y.dcurvature(t);
        self.cache.borrow_mut().third = Some((t, dddx, dddy));
        (dddx, dddy)
    }

    pub fn point(&self, t: f64) -> Translation2D {
        let (x, y) = self.point_xy(t);
        Translation2D::new(x, y)
    }

    pub fn heading(&self, t: f64) -> Rotation2D {
        let (dx, dy) = self.first_derivative(t);
        Rotation2D::from_vector(dx, dy)
    }

    /// Parametric speed `|dp/dt|`.
    pub fn velocity(&self, t: f64) -> f64 {
        let (dx, dy) = self.first_derivative(t);
        dx.hypot(dy)
    }

    pub fn pose(&self, t: f64) -> Pose2D {
        Pose2D::new(self.point(t), self.heading(t))
    }

    /// Signed path curvature at `t`, in 1 / length-unit.
    pub fn curvature(&self, t: f64) -> f64 {
        let (dx, dy) = self.first_derivative(t);
        let (ddx, ddy) = self.second_derivative(t);
        let speed_sq = dx * dx + dy * dy;
        (dx * ddy - ddx * dy) / (speed_sq * speed_sq.sqrt())
    }

    /// Curvature derivative with respect to `t`.
    pub fn dcurvature(&self, t: f64) -> f64 {
        let (dx, dy) = self.first_derivative(t);
        let (ddx, ddy) = self.second_derivative(t);
        let (dddx, dddy) = self.third_derivative(t);
        let speed_sq = dx * dx + dy * dy;
        let num = (dx * dddy - dddx * dy) * speed_sq
            - 3.0 * (dx * ddy - ddx * dy) * (dx * ddx + dy * ddy);
        num / (speed_sq * speed_sq * speed_sq.sqrt())
    }

    /// Squared curvature derivative, kept in ratio form to avoid a square
    /// root in the optimizer's inner loop.
    pub fn dcurvature_squared(&self, t: f64) -> f64 {
        let (dx, dy) = self.first_derivative(t);
        let (ddx, ddy) = self.second_derivative(t);
        let (dddx, dddy) = self.third_derivative(t);
        let speed_sq = dx * dx + dy * dy;
        let num = (dx * dddy - dddx * dy) * speed_sq
            - 3.0 * (dx * ddy - ddx * dy) * (dx * ddx + dy * ddy);
        num * num / (speed_sq * speed_sq * speed_sq * speed_sq * speed_sq)
    }

    /// Riemann sum of squared curvature derivative over the segment.
    pub fn sum_dcurvature_squared(&self, samples: usize) -> f64 {
        let dt = 1.0 / samples as f64;
        let mut sum = 0.0;
        for i in 0..samples {
            sum += dt * self.dcurvature_squared(i as f64 * dt);
        }
        sum
    }

    /// Pose plus curvature and curvature-per-arc-length at `t`.
    pub fn pose_with_curvature(&self, t: f64) -> PoseWithCurvature {
        PoseWithCurvature::new(
            self.pose(t),
            self.curvature(t),
            self.dcurvature(t) / self.velocity(t),
        )
    }

    pub fn start_pose(&self) -> Pose2D {
        self.pose(0.0)
    }

    pub fn end_pose(&self) -> Pose2D {
        self.pose(1.0)
    }

    /// Shift the endpoint second derivatives of both axes and refit.
    /// Invalidate the memo, the coefficients just changed.
    pub(crate) fn tweak_curvature(&mut self, ddx0: f64, ddx1: f64, ddy0: f64, ddy1: f64) {
        self.x.tweak_curvature(ddx0, ddx1);
        self.y.tweak_curvature(ddy0, ddy1);
        self.cache.borrow_mut().clear();
    }

    pub fn x_spline(&self) -> &Spline1D {
        &self.x
    }

    pub fn y_spline(&self) -> &Spline1D {
        &self.y
    }
}
