//! Adaptive spline sampling.
//!
//! Converts a [`SplineSequence`] into a dense list of
//! [`PoseWithCurvature`] samples by recursive bisection: a parameter span
//! is split until the local twist between its endpoints fits inside the
//! configured box. Straight stretches come out sparse, tight arcs dense.

use serde::{Deserialize, Serialize};

use crate::error::{MargaError, Result};
use crate::geometry::{Pose2D, PoseWithCurvature};

use super::{Spline2D, SplineSequence};

/// Bisection depth at which a span is declared degenerate.
const MAX_SUBDIVISIONS: usize = 500;

/// Local-twist bounds for one accepted span.
///
/// `max_dx` and `max_dy` are along-track and cross-track displacement in
/// inches, `max_dtheta` is heading change in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub max_dx: f64,
    pub max_dy: f64,
    pub max_dtheta: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_dx: 2.0,
            max_dy: 0.05,
            max_dtheta: 0.1,
        }
    }
}

/// Recursive bisection sampler over spline chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplineSampler {
    config: SamplerConfig,
}

impl SplineSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Sample the whole chain. The first pose of the first segment is
    /// emitted once up front; each accepted span then contributes its end
    /// pose, so consecutive segments share no duplicate junction samples.
    pub fn sample(&self, sequence: &SplineSequence) -> Result<Vec<PoseWithCurvature>> {
        let mut samples = Vec::new();
        let Some(first) = sequence.splines().first() else {
            return Ok(samples);
        };
        samples.push(first.pose_with_curvature(0.0));
        for spline in sequence.splines() {
            self.sample_span(spline, 0.0, 1.0, 0, &mut samples)?;
        }
        Ok(samples)
    }

    fn sample_span(
        &self,
        spline: &Spline2D,
        t0: f64,
        t1: f64,
        depth: usize,
        samples: &mut Vec<PoseWithCurvature>,
    ) -> Result<()> {
        if depth > MAX_SUBDIVISIONS {
            return Err(MargaError::MalformedSpline { depth });
        }
        let start = spline.pose(t0);
        let end = spline.pose(t1);
        let twist = Pose2D::twist_between(&start, &end);
        if twist.dx.abs() > self.config.max_dx
            || twist.dy.abs() > self.config.max_dy
            || twist.dtheta.abs() > self.config.max_dtheta
        {
            let mid = 0.5 * (t0 + t1);
            self.sample_span(spline, t0, mid, depth + 1, samples)?;
            self.sample_span(spline, mid, t1, depth + 1, samples)?;
        } else {
            samples.push(spline.pose_with_curvature(t1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_default(waypoints: &[Pose2D]) -> Vec<PoseWithCurvature> {
        let sequence = SplineSequence::from_waypoints(waypoints).unwrap();
        SplineSampler::default().sample(&sequence).unwrap()
    }

    #[test]
    fn test_samples_cover_endpoints() {
        let a = Pose2D::from_xy_degrees(0.0, 0.0, 0.0);
        let b = Pose2D::from_xy_degrees(40.0, 20.0, 30.0);
        let samples = sample_default(&[a, b]);
        assert!(samples.len() > 2);
        assert!(samples[0].pose.approx_eq(&a, 1e-9));
        assert!(samples[samples.len() - 1].pose.approx_eq(&b, 1e-9));
    }

    #[test]
    fn test_every_span_within_bounds() {
        let config = SamplerConfig::default();
        let samples = sample_default(&[
            Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(15.0, 10.0, 60.0),
        ]);
        for pair in samples.windows(2) {
            let twist = Pose2D::twist_between(&pair[0].pose, &pair[1].pose);
            assert!(twist.dx.abs() <= config.max_dx + 1e-9);
            assert!(twist.dy.abs() <= config.max_dy + 1e-9);
            assert!(twist.dtheta.abs() <= config.max_dtheta + 1e-9);
        }
    }

    #[test]
    fn test_straight_line_samples_sparse() {
        // A straight segment satisfies the cross-track and heading bounds
        // everywhere, so only the along-track bound forces splits.
        let samples = sample_default(&[
            Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(16.0, 0.0, 0.0),
        ]);
        for s in &samples {
            assert_relative_eq!(s.pose.translation.y, 0.0, epsilon = 1e-9);
            assert_relative_eq!(s.curvature, 0.0, epsilon = 1e-9);
        }
        // 16 inches at a 2 inch bound needs at least 8 spans.
        assert!(samples.len() >= 9);
    }

    #[test]
    fn test_multi_segment_has_no_duplicate_junction() {
        let samples = sample_default(&[
            Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(20.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(40.0, 0.0, 0.0),
        ]);
        for pair in samples.windows(2) {
            assert!(pair[0].pose.translation.distance(&pair[1].pose.translation) > 1e-9);
        }
    }
}
