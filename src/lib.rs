//! marga-traj - Trajectory generation for differential-drive robots
//!
//! Turns a handful of waypoint poses into a smooth, time-parameterized
//! trajectory a differential-drive robot can actually follow at its voltage
//! budget.
//!
//! # Architecture
//!
//! The crate is organized into 6 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin/                           │  ← Demo executable
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    planner                          │  ← Orchestration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   trajectory                        │  ← Timing passes,
//! │             (generator, constraints)                │    constraint stack
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────┬──────────────────────────┐
//! │         spline           │          drive           │  ← Path geometry,
//! │ (quintic, optimization,  │ (transmission, dynamics, │    drivetrain
//! │       sampling)          │   velocity envelopes)    │    physics
//! └──────────────────────────┴──────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              geometry · units · config              │  ← Foundation
//! │          (SE(2) algebra, conversion, presets)       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! [`planner::plan_trajectory`] runs the stages in order:
//!
//! 1. **Spline fitting** - one quintic Hermite spline per waypoint pair,
//!    tangent magnitudes scaled from the chord length
//!    ([`spline::SplineSequence`]).
//! 2. **Curvature optimization** - gradient descent on the second-derivative
//!    boundary values at interior junctions, minimizing integrated squared
//!    curvature-rate while waypoint poses stay pinned.
//! 3. **Adaptive sampling** - recursive bisection until every inter-sample
//!    twist fits the configured box ([`spline::SplineSampler`]).
//! 4. **Time parameterization** - forward/backward constrained passes over
//!    an arc-length resampling, then time integration
//!    ([`trajectory::Trajectory::generate`]).
//!
//! Path coordinates are in inches with headings as unit vectors; the drive
//! model works in SI internally and the voltage-budget constraint converts at
//! its boundary ([`units`]).
//!
//! # Example
//!
//! ```
//! use marga_traj::{plan_trajectory, PlannerConfig, Pose2D};
//!
//! let waypoints = [
//!     Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
//!     Pose2D::from_xy_degrees(120.0, 60.0, 0.0),
//! ];
//! let trajectory = plan_trajectory(&waypoints, &PlannerConfig::default())?;
//! let state = trajectory.sample_at_time(0.5 * trajectory.total_time());
//! # assert!(state.is_some());
//! # Ok::<(), marga_traj::MargaError>(())
//! ```

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod error;
pub mod geometry;
pub mod units;

// ============================================================================
// Layer 2: Path geometry (depends on geometry)
// ============================================================================
pub mod spline;

// ============================================================================
// Layer 3: Drivetrain physics (depends on geometry, units)
// ============================================================================
pub mod drive;

// ============================================================================
// Layer 4: Time parameterization (depends on all lower layers)
// ============================================================================
pub mod trajectory;

// ============================================================================
// Layer 5: Characterization presets (depends on trajectory, drive)
// ============================================================================
pub mod config;

// ============================================================================
// Layer 6: Planner (ties everything together)
// ============================================================================
pub mod planner;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Error handling
pub use error::{MargaError, Result};

// Geometry
pub use geometry::{Pose2D, PoseWithCurvature, Rotation2D, Translation2D, Twist2D};

// Splines
pub use spline::{SamplerConfig, Spline1D, Spline2D, SplineSampler, SplineSequence};

// Drive model
pub use drive::{
    ChassisState, DcMotorTransmission, DifferentialDrive, DriveDynamics, MinMaxAcceleration,
    WheelState,
};

// Trajectory
pub use trajectory::{Region, TimingConstraint, Trajectory, TrajectorySample};

// Configuration
pub use config::{DriveConfig, PlannerConfig, TransmissionConfig};

// Planner
pub use planner::plan_trajectory;
