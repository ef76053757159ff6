//! One-call entry point from waypoints to a drivable trajectory.

use log::{debug, info};

use crate::config::PlannerConfig;
use crate::drive::DifferentialDrive;
use crate::error::Result;
use crate::geometry::Pose2D;
use crate::spline::{SamplerConfig, SplineSampler, SplineSequence};
use crate::trajectory::{TimingConstraint, Trajectory};

/// Plan a time-parameterized trajectory through `waypoints` (at least two).
///
/// The pipeline fits one quintic spline per waypoint pair, optionally smooths
/// junction curvature, samples the result adaptively, then
/// time-parameterizes under the configured constraint stack: velocity-limited
/// regions first, then the centripetal cap, then the voltage-budget drive
/// dynamics. With `config.reverse` set the finished trajectory is flipped
/// for driving backwards.
pub fn plan_trajectory(waypoints: &[Pose2D], config: &PlannerConfig) -> Result<Trajectory> {
    let mut sequence = SplineSequence::from_waypoints(waypoints)?;
    if config.optimize {
        let cost = sequence.optimize_curvature();
        debug!("junction curvature smoothed, final cost {:.6}", cost);
    }

    let sampler = SplineSampler::new(SamplerConfig {
        max_dx: config.max_dx,
        max_dy: config.max_dy,
        max_dtheta: config.max_dtheta,
    });
    let samples = sampler.sample(&sequence)?;

    let drive = DifferentialDrive::from_config(&config.drive);
    let mut constraints: Vec<TimingConstraint> = config
        .regions
        .iter()
        .map(|(region, max_velocity)| TimingConstraint::VelocityLimitRegion {
            region: *region,
            max_velocity: *max_velocity,
        })
        .collect();
    constraints.push(TimingConstraint::CentripetalAcceleration {
        max_centripetal_acceleration: config.max_centripetal_acceleration,
    });
    constraints.push(TimingConstraint::DriveDynamics {
        drive,
        max_voltage: config.max_voltage,
    });

    let trajectory = Trajectory::generate(
        &samples,
        &constraints,
        config.step_size,
        config.start_velocity,
        config.end_velocity,
        config.max_velocity,
        config.max_abs_acceleration,
    )?;
    let trajectory = if config.reverse {
        trajectory.reverse()
    } else {
        trajectory
    };

    info!(
        "planned trajectory: {} spline segments, {} samples, {:.3} s, {:.1} path units",
        sequence.len(),
        trajectory.len(),
        trajectory.total_time(),
        trajectory.total_distance()
    );
    Ok(trajectory)
}
