//! Characterization constants and planning parameters.
//!
//! Geometry fields are in inches to match path coordinates; inertia is
//! already SI. [`crate::drive::DifferentialDrive::from_config`] converts
//! the geometry at construction. The defaults carry the reference robot's
//! measured characterization; [`DriveConfig::test_chassis`] is the small
//! development chassis the test suite runs against.

use serde::{Deserialize, Serialize};

use crate::trajectory::Region;

/// One side's motor characterization, from a voltage-ramp test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransmissionConfig {
    /// Static friction voltage, V.
    pub ks: f64,
    /// Velocity constant, V per rad/s of wheel speed.
    pub kv: f64,
    /// Acceleration constant, V per rad/s² of wheel acceleration.
    pub ka: f64,
}

/// Physical drivetrain characterization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Distance between wheel centers, in.
    pub wheelbase: f64,
    /// Empirical multiplier on half the wheelbase accounting for wheel
    /// scrub while turning.
    pub track_scrub_factor: f64,
    /// Wheel radius, in.
    pub wheel_radius: f64,
    /// Robot mass, kg.
    pub linear_inertia: f64,
    /// Yaw moment of inertia, kg·m².
    pub angular_inertia: f64,
    /// Drag torque per unit angular velocity, N·m/(rad/s).
    pub angular_drag: f64,
    pub left_transmission: TransmissionConfig,
    pub right_transmission: TransmissionConfig,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            wheelbase: 25.75,
            track_scrub_factor: 1.037,
            wheel_radius: 3.0,
            linear_inertia: 67.81,
            angular_inertia: 4.97,
            angular_drag: 12.0,
            left_transmission: TransmissionConfig {
                ks: 1.476,
                kv: 0.216,
                ka: 0.092,
            },
            right_transmission: TransmissionConfig {
                ks: 1.582,
                kv: 0.244,
                ka: 0.076,
            },
        }
    }
}

impl DriveConfig {
    /// The small development chassis.
    pub fn test_chassis() -> Self {
        Self {
            wheelbase: 23.75,
            track_scrub_factor: 1.063,
            wheel_radius: 3.0,
            linear_inertia: 27.93,
            angular_inertia: 1.74,
            angular_drag: 12.0,
            left_transmission: TransmissionConfig {
                ks: 0.794,
                kv: 0.185,
                ka: 0.035,
            },
            right_transmission: TransmissionConfig {
                ks: 0.7714,
                kv: 0.192,
                ka: 0.0533,
            },
        }
    }
}

/// Everything [`crate::planner::plan_trajectory`] needs besides waypoints.
/// Distances in inches, angles in radians, velocities in in/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub drive: DriveConfig,
    /// Sampler along-track bound, in.
    pub max_dx: f64,
    /// Sampler cross-track bound, in.
    pub max_dy: f64,
    /// Sampler heading bound, rad.
    pub max_dtheta: f64,
    /// Resampling step, in.
    pub step_size: f64,
    /// Velocity at the first sample, in/s.
    pub start_velocity: f64,
    /// Velocity at the last sample, in/s.
    pub end_velocity: f64,
    /// Global velocity cap, in/s.
    pub max_velocity: f64,
    /// Global acceleration magnitude cap, in/s².
    pub max_abs_acceleration: f64,
    /// Lateral acceleration cap on curves, in/s².
    pub max_centripetal_acceleration: f64,
    /// Bus voltage budget for the drive dynamics limit, V.
    pub max_voltage: f64,
    /// Velocity-limited zones: a box and its cap in in/s.
    pub regions: Vec<(Region, f64)>,
    /// Flip the trajectory for driving backwards.
    pub reverse: bool,
    /// Smooth junction curvature before sampling.
    pub optimize: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            drive: DriveConfig::default(),
            max_dx: 2.0,
            max_dy: 0.05,
            max_dtheta: 0.1,
            step_size: 2.0,
            start_velocity: 0.0,
            end_velocity: 0.0,
            max_velocity: 240.0,
            max_abs_acceleration: 120.0,
            max_centripetal_acceleration: 30.0,
            max_voltage: 9.0,
            regions: Vec::new(),
            reverse: false,
            optimize: true,
        }
    }
}
