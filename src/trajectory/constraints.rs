//! Velocity and acceleration limits applied during timing.
//!
//! Constraints answer two questions for a path sample: how fast may the
//! chassis move here, and what acceleration interval is achievable at a
//! given speed. The generator intersects the answers across the whole
//! stack. Path samples are in inches; the drive-dynamics variant converts
//! to SI at its boundary and back.

use serde::{Deserialize, Serialize};

use crate::drive::{ChassisState, DifferentialDrive, MinMaxAcceleration};
use crate::geometry::{PoseWithCurvature, Translation2D};
use crate::units::{inches_to_meters, meters_to_inches, per_inch_to_per_meter};

/// Axis-aligned box in path coordinates, closed on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Translation2D,
    pub max: Translation2D,
}

impl Region {
    pub fn new(min: Translation2D, max: Translation2D) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: &Translation2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// One timing limit. The generator treats all variants uniformly through
/// [`TimingConstraint::max_velocity`] and
/// [`TimingConstraint::min_max_acceleration`].
#[derive(Debug, Clone)]
pub enum TimingConstraint {
    /// Plain caps independent of the path sample.
    Fixed {
        max_velocity: f64,
        min_acceleration: f64,
        max_acceleration: f64,
    },
    /// Caps speed on curves so lateral acceleration stays bounded.
    CentripetalAcceleration { max_centripetal_acceleration: f64 },
    /// Caps speed and acceleration by what the drivetrain can do within a
    /// voltage budget.
    DriveDynamics {
        drive: DifferentialDrive,
        max_voltage: f64,
    },
    /// Caps speed inside an axis-aligned box.
    VelocityLimitRegion { region: Region, max_velocity: f64 },
}

impl TimingConstraint {
    /// Largest velocity allowed at `sample`, in/s.
    pub fn max_velocity(&self, sample: &PoseWithCurvature) -> f64 {
        match self {
            Self::Fixed { max_velocity, .. } => *max_velocity,
            Self::CentripetalAcceleration {
                max_centripetal_acceleration,
            } => {
                if sample.curvature == 0.0 {
                    f64::INFINITY
                } else {
                    (max_centripetal_acceleration / sample.curvature).abs().sqrt()
                }
            }
            Self::DriveDynamics { drive, max_voltage } => meters_to_inches(
                drive.max_abs_velocity_at_curvature(
                    per_inch_to_per_meter(sample.curvature),
                    *max_voltage,
                ),
            ),
            Self::VelocityLimitRegion {
                region,
                max_velocity,
            } => {
                if region.contains(&sample.pose.translation) {
                    *max_velocity
                } else {
                    f64::INFINITY
                }
            }
        }
    }

    /// Achievable acceleration interval at `sample` when moving at
    /// `velocity` in/s, in in/s².
    pub fn min_max_acceleration(
        &self,
        sample: &PoseWithCurvature,
        velocity: f64,
    ) -> MinMaxAcceleration {
        match self {
            Self::Fixed {
                min_acceleration,
                max_acceleration,
                ..
            } => MinMaxAcceleration {
                min: *min_acceleration,
                max: *max_acceleration,
            },
            Self::DriveDynamics { drive, max_voltage } => {
                // Angular velocity is curvature times speed; the inch terms
                // cancel, so it is already rad/s.
                let chassis = ChassisState::new(
                    inches_to_meters(velocity),
                    sample.curvature * velocity,
                );
                let bounds = drive.min_max_acceleration(
                    &chassis,
                    per_inch_to_per_meter(sample.curvature),
                    *max_voltage,
                );
                MinMaxAcceleration {
                    min: meters_to_inches(bounds.min),
                    max: meters_to_inches(bounds.max),
                }
            }
            Self::CentripetalAcceleration { .. } | Self::VelocityLimitRegion { .. } => {
                MinMaxAcceleration::unlimited()
            }
        }
    }
}

impl Default for TimingConstraint {
    fn default() -> Self {
        Self::Fixed {
            max_velocity: f64::INFINITY,
            min_acceleration: f64::NEG_INFINITY,
            max_acceleration: f64::INFINITY,
        }
    }
}
