//! Multi-segment splines and junction curvature optimization.
//!
//! A piecewise quintic through waypoints is C1 by construction but free in
//! the junction second derivatives. [`SplineSequence::optimize_curvature`]
//! performs gradient descent on those free parameters, minimizing the
//! integral of squared curvature derivative so the curve a follower has to
//! track stays smooth.

use log::{debug, trace};

use crate::error::{MargaError, Result};
use crate::geometry::{Pose2D, Translation2D, EPSILON};

use super::Spline2D;

/// Riemann samples per segment for the smoothness cost.
const CURVE_SAMPLES: usize = 100;
/// Finite-difference step for the cost gradient.
const FD_EPSILON: f64 = 1e-5;
/// Descent terminates once an iteration improves the cost by less than this.
const MIN_DELTA: f64 = 0.001;
/// Norm of one descent step across all junction parameters.
const STEP_SIZE: f64 = 1.0;
const MAX_ITERATIONS: usize = 100;

/// Cost gradient at one junction, one component per axis.
#[derive(Debug, Clone, Copy, Default)]
struct GradientSample {
    ddx: f64,
    ddy: f64,
}

/// A chain of [`Spline2D`] segments sharing waypoint poses end to start.
#[derive(Debug, Clone)]
pub struct SplineSequence {
    splines: Vec<Spline2D>,
}

impl SplineSequence {
    pub fn new(splines: Vec<Spline2D>) -> Self {
        Self { splines }
    }

    /// Fit one segment per consecutive waypoint pair. At least two
    /// waypoints are required.
    pub fn from_waypoints(waypoints: &[Pose2D]) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(MargaError::InsufficientWaypoints {
                count: waypoints.len(),
            });
        }
        let splines = waypoints
            .windows(2)
            .map(|pair| Spline2D::from_poses(&pair[0], &pair[1]))
            .collect();
        Ok(Self { splines })
    }

    pub fn splines(&self) -> &[Spline2D] {
        &self.splines
    }

    pub fn len(&self) -> usize {
        self.splines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splines.is_empty()
    }

    /// Smoothness cost: summed squared curvature derivative over the chain.
    pub fn sum_dcurvature_squared(&self) -> f64 {
        self.splines
            .iter()
            .map(|s| s.sum_dcurvature_squared(CURVE_SAMPLES))
            .sum()
    }

    /// Descend on the junction second derivatives until the smoothness cost
    /// stops improving. Waypoint positions and headings never move. Returns
    /// the final cost.
    pub fn optimize_curvature(&mut self) -> f64 {
        let mut prev = self.sum_dcurvature_squared();
        trace!("curvature optimization start, cost {:.6}", prev);
        for iteration in 0..MAX_ITERATIONS {
            let snapshot = self.splines.clone();
            self.run_descent_iteration();
            let current = self.sum_dcurvature_squared();
            trace!("iteration {}: cost {:.6}", iteration, current);
            if current > prev {
                // The parabola fit overshot. Keep the last good state.
                self.splines = snapshot;
                debug!(
                    "curvature optimization reverted at iteration {}, cost {:.6}",
                    iteration, prev
                );
                return prev;
            }
            if prev - current < MIN_DELTA {
                debug!(
                    "curvature optimization converged at iteration {}, cost {:.6}",
                    iteration, current
                );
                return current;
            }
            prev = current;
        }
        debug!("curvature optimization hit iteration cap, cost {:.6}", prev);
        prev
    }

    /// Junctions bordered by a straight segment stay fixed; a straight
    /// segment already has zero curvature cost and its endpoint second
    /// derivatives must stay zero to keep it straight.
    fn junction_is_fixed(&self, i: usize) -> bool {
        let before = &self.splines[i];
        let after = &self.splines[i + 1];
        before.start_pose().is_colinear(&before.end_pose())
            || after.start_pose().is_colinear(&after.end_pose())
    }

    /// One gradient descent step with a parabolic line search.
    fn run_descent_iteration(&mut self) {
        if self.splines.len() <= 1 {
            return;
        }
        let junctions = self.splines.len() - 1;
        let original = self.sum_dcurvature_squared();
        let mut gradient: Vec<Option<GradientSample>> = Vec::with_capacity(junctions);
        let mut magnitude = 0.0;

        // Finite-difference the cost with respect to each free junction's
        // shared second derivative, x axis then y axis. Both neighboring
        // segments move together so the junction stays parametrically C2.
        for i in 0..junctions {
            if self.junction_is_fixed(i) {
                gradient.push(None);
                continue;
            }
            let saved_before = self.splines[i].clone();
            let saved_after = self.splines[i + 1].clone();

            self.splines[i].tweak_curvature(0.0, FD_EPSILON, 0.0, 0.0);
            self.splines[i + 1].tweak_curvature(FD_EPSILON, 0.0, 0.0, 0.0);
            let ddx = (self.sum_dcurvature_squared() - original) / FD_EPSILON;

            self.splines[i] = saved_before.clone();
            self.splines[i + 1] = saved_after.clone();
            self.splines[i].tweak_curvature(0.0, 0.0, 0.0, FD_EPSILON);
            self.splines[i + 1].tweak_curvature(0.0, 0.0, FD_EPSILON, 0.0);
            let ddy = (self.sum_dcurvature_squared() - original) / FD_EPSILON;

            self.splines[i] = saved_before;
            self.splines[i + 1] = saved_after;

            magnitude += ddx * ddx + ddy * ddy;
            gradient.push(Some(GradientSample { ddx, ddy }));
        }

        let magnitude = magnitude.sqrt();
        if magnitude < EPSILON {
            // Flat gradient, every free junction is already stationary.
            return;
        }

        // Probe the cost one step behind and one step ahead of the current
        // state along the normalized gradient.
        let p2 = Translation2D::new(0.0, original);

        for i in 0..junctions {
            if let Some(sample) = gradient[i].as_mut() {
                sample.ddx *= STEP_SIZE / magnitude;
                sample.ddy *= STEP_SIZE / magnitude;
                self.apply_junction_delta(i, -sample.ddx, -sample.ddy);
            }
        }
        let p1 = Translation2D::new(-STEP_SIZE, self.sum_dcurvature_squared());

        for i in 0..junctions {
            if let Some(sample) = gradient[i] {
                self.apply_junction_delta(i, 2.0 * sample.ddx, 2.0 * sample.ddy);
            }
        }
        let p3 = Translation2D::new(STEP_SIZE, self.sum_dcurvature_squared());

        let vertex = fit_parabola(p1, p2, p3);
        let step = if vertex.is_finite() { vertex } else { 0.0 };

        // The chain currently sits one step ahead. Move the remaining
        // distance so it lands on the parabola's minimum.
        let shift = step / STEP_SIZE - 1.0;
        for i in 0..junctions {
            if let Some(sample) = gradient[i] {
                self.apply_junction_delta(i, shift * sample.ddx, shift * sample.ddy);
            }
        }
    }

    /// Move junction `i`'s shared second derivative by `(ddx, ddy)` on both
    /// neighboring segments.
    fn apply_junction_delta(&mut self, i: usize, ddx: f64, ddy: f64) {
        self.splines[i].tweak_curvature(0.0, ddx, 0.0, ddy);
        self.splines[i + 1].tweak_curvature(ddx, 0.0, ddy, 0.0);
    }
}

/// Vertex of the parabola through three points, as an x coordinate.
fn fit_parabola(p1: Translation2D, p2: Translation2D, p3: Translation2D) -> f64 {
    let a = p3.x * (p2.y - p1.y) + p2.x * (p1.y - p3.y) + p1.x * (p3.y - p2.y);
    let b = p3.x * p3.x * (p1.y - p2.y)
        + p2.x * p2.x * (p3.y - p1.y)
        + p1.x * p1.x * (p2.y - p3.y);
    -b / (2.0 * a)
}
