//! Spline fitting, curvature optimization, and adaptive sampling tests.
//!
//! Each optimization scenario pins the initial integrated squared
//! curvature-rate and requires the descent to land under a fixed bound while
//! leaving every waypoint pose untouched.
//!
//! ## Targets
//!
//! | Scenario | Initial cost | Bound after optimization |
//! |----------------------------|-----------|-------|
//! | 3-waypoint down-and-back | 0.0154757 | 0.014 |
//! | 4-waypoint double S | 3.8285483 | 0.16 |
//! | 5-waypoint mixed straights | 0.0711581 | 0.05 |
//!
//! Run with: `cargo test --test spline_sampling`

use approx::assert_relative_eq;
use rand::prelude::*;

use marga_traj::{
    MargaError, Pose2D, Rotation2D, SamplerConfig, Spline2D, SplineSampler, SplineSequence,
    Translation2D,
};

// ============================================================================
// Helpers
// ============================================================================

fn assert_waypoints_pinned(sequence: &SplineSequence, waypoints: &[Pose2D]) {
    for (i, spline) in sequence.splines().iter().enumerate() {
        assert!(
            spline.start_pose().approx_eq(&waypoints[i], 1e-9),
            "segment {} start drifted from its waypoint",
            i
        );
        assert!(
            spline.end_pose().approx_eq(&waypoints[i + 1], 1e-9),
            "segment {} end drifted from its waypoint",
            i
        );
    }
}

// ============================================================================
// Curvature optimization scenarios
// ============================================================================

#[test]
fn test_optimize_down_and_back() {
    env_logger::try_init().ok();

    let waypoints = [
        Pose2D::from_xy_degrees(0.0, 100.0, 270.0),
        Pose2D::from_xy_degrees(50.0, 0.0, 0.0),
        Pose2D::from_xy_degrees(100.0, 100.0, 90.0),
    ];
    let mut sequence = SplineSequence::from_waypoints(&waypoints).unwrap();

    let initial = sequence.sum_dcurvature_squared();
    assert_relative_eq!(initial, 0.015475712363875602, epsilon = 1e-9);

    let cost = sequence.optimize_curvature();
    assert!(cost < 0.014, "cost {} should drop below 0.014", cost);
    assert!(cost < initial);
    assert_relative_eq!(cost, sequence.sum_dcurvature_squared(), epsilon = 1e-12);
    assert_waypoints_pinned(&sequence, &waypoints);
}

#[test]
fn test_optimize_double_s() {
    env_logger::try_init().ok();

    let waypoints = [
        Pose2D::from_xy_degrees(0.0, 0.0, 90.0),
        Pose2D::from_xy_degrees(0.0, 50.0, 0.0),
        Pose2D::from_xy_degrees(100.0, 0.0, 90.0),
        Pose2D::from_xy_degrees(100.0, 100.0, 0.0),
    ];
    let mut sequence = SplineSequence::from_waypoints(&waypoints).unwrap();

    let initial = sequence.sum_dcurvature_squared();
    assert_relative_eq!(initial, 3.8285483233365114, epsilon = 1e-9);

    let cost = sequence.optimize_curvature();
    assert!(cost < 0.16, "cost {} should drop below 0.16", cost);
    assert_waypoints_pinned(&sequence, &waypoints);
}

#[test]
fn test_optimize_mixed_straights() {
    env_logger::try_init().ok();

    let waypoints = [
        Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
        Pose2D::from_xy_degrees(50.0, 0.0, 0.0),
        Pose2D::from_xy_degrees(100.0, 50.0, 45.0),
        Pose2D::from_xy_degrees(150.0, 0.0, 270.0),
        Pose2D::from_xy_degrees(150.0, -50.0, 270.0),
    ];
    let mut sequence = SplineSequence::from_waypoints(&waypoints).unwrap();

    let initial = sequence.sum_dcurvature_squared();
    assert_relative_eq!(initial, 0.07115809828520288, epsilon = 1e-9);

    let cost = sequence.optimize_curvature();
    assert!(cost < 0.05, "cost {} should drop below 0.05", cost);
    assert_waypoints_pinned(&sequence, &waypoints);

    // Junctions flanked by a colinear segment are held fixed, so the path
    // stays dead straight through them.
    let splines = sequence.splines();
    assert_relative_eq!(splines[0].curvature(1.0), 0.0, epsilon = 1e-9);
    assert_relative_eq!(splines[2].curvature(1.0), 0.0, epsilon = 1e-9);
}

#[test]
fn test_optimize_never_raises_cost_on_random_chains() {
    env_logger::try_init().ok();

    let mut rng = StdRng::seed_from_u64(42);

    for trial in 0..8 {
        let count = rng.random_range(3..=6);
        let mut waypoints = Vec::with_capacity(count);
        let mut x = 0.0;
        for _ in 0..count {
            x += rng.random_range(20.0..60.0);
            waypoints.push(Pose2D::from_xy_degrees(
                x,
                rng.random_range(-40.0..40.0),
                rng.random_range(0.0..360.0),
            ));
        }

        let mut sequence = SplineSequence::from_waypoints(&waypoints).unwrap();
        let initial = sequence.sum_dcurvature_squared();
        let cost = sequence.optimize_curvature();

        assert!(
            cost <= initial + 1e-12,
            "trial {}: cost rose from {} to {}",
            trial,
            initial,
            cost
        );
        assert_waypoints_pinned(&sequence, &waypoints);
    }
}

// ============================================================================
// Adaptive sampling
// ============================================================================

#[test]
fn test_sampling_covers_s_curve_within_twist_bounds() {
    let start = Pose2D::identity();
    let end = Pose2D::new(
        Translation2D::new(15.0, 10.0),
        Rotation2D::from_vector(1.0, -5.0),
    );
    let sequence = SplineSequence::new(vec![Spline2D::from_poses(&start, &end)]);
    let samples = SplineSampler::default().sample(&sequence).unwrap();

    assert_eq!(samples.len(), 57);

    let mut arc_length = 0.0;
    for pair in samples.windows(2) {
        let twist = Pose2D::twist_between(&pair[0].pose, &pair[1].pose);
        assert!(twist.dx.abs() <= 2.0 + 1e-9, "dx {} exceeds bound", twist.dx);
        assert!(twist.dy.abs() <= 0.05 + 1e-9, "dy {} exceeds bound", twist.dy);
        assert!(
            twist.dtheta.abs() <= 0.1 + 1e-9,
            "dtheta {} exceeds bound",
            twist.dtheta
        );
        arc_length += twist.dx;
    }
    assert_relative_eq!(arc_length, 23.22566884614335, epsilon = 1e-6);

    let last = samples.last().unwrap();
    assert_relative_eq!(last.pose.translation.x, 15.0, epsilon = 1e-9);
    assert_relative_eq!(last.pose.translation.y, 10.0, epsilon = 1e-9);
    assert_relative_eq!(
        last.pose.rotation.degrees(),
        -78.69006752597979,
        epsilon = 1e-9
    );
}

#[test]
fn test_sampling_density_on_short_straight_line() {
    let waypoints = [
        Pose2D::identity(),
        Pose2D::from_xy_degrees(1.0, 0.0, 0.0),
    ];
    let sequence = SplineSequence::from_waypoints(&waypoints).unwrap();
    let sampler = SplineSampler::new(SamplerConfig {
        max_dx: 0.1,
        max_dy: 0.05,
        max_dtheta: 0.1,
    });
    let samples = sampler.sample(&sequence).unwrap();

    assert_eq!(samples.len(), 17);
    for sample in &samples {
        assert_relative_eq!(sample.pose.translation.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sample.curvature, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_unsatisfiable_bound_reports_malformed_spline() {
    // A zero along-track bound can never be met, so subdivision would
    // recurse forever; the sampler aborts at its depth cap instead.
    let waypoints = [
        Pose2D::identity(),
        Pose2D::from_xy_degrees(10.0, 0.0, 0.0),
    ];
    let sequence = SplineSequence::from_waypoints(&waypoints).unwrap();
    let sampler = SplineSampler::new(SamplerConfig {
        max_dx: 0.0,
        max_dy: 0.05,
        max_dtheta: 0.1,
    });
    let result = sampler.sample(&sequence);

    assert!(matches!(result, Err(MargaError::MalformedSpline { .. })));
}
