//! Differential-drive kinematics and dynamics.
//!
//! Everything here is SI: meters, kilograms, rad/s, N·m, volts. The
//! trajectory layer works in inches and converts at the constraint
//! boundary.

use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::geometry::EPSILON;
use crate::units::inches_to_meters;

use super::DcMotorTransmission;

/// Chassis-frame motion: linear in m/s (or m/s²), angular in rad/s
/// (or rad/s²).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisState {
    pub linear: f64,
    pub angular: f64,
}

impl ChassisState {
    #[inline]
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }
}

/// A per-side wheel quantity: angular velocity, torque, or voltage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelState {
    pub left: f64,
    pub right: f64,
}

impl WheelState {
    #[inline]
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// Complete dynamics solution for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveDynamics {
    /// Path curvature, 1/m. Zero when stationary.
    pub curvature: f64,
    /// Curvature change per meter traveled, 1/m².
    pub dcurvature: f64,
    pub chassis_velocity: ChassisState,
    pub chassis_acceleration: ChassisState,
    /// Wheel angular velocities, rad/s.
    pub wheel_velocity: WheelState,
    /// Wheel linear accelerations at the contact patch, m/s².
    pub wheel_acceleration: WheelState,
    /// Applied or required voltage per side, V.
    pub voltage: WheelState,
    /// Torque at each wheel, N·m.
    pub wheel_torque: WheelState,
}

/// Achievable chassis acceleration interval. Starts empty (`min > max`)
/// and widens as feasible solutions are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxAcceleration {
    pub min: f64,
    pub max: f64,
}

impl MinMaxAcceleration {
    #[inline]
    pub fn unlimited() -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for MinMaxAcceleration {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Two transmissions plus chassis geometry and inertia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Robot mass, kg.
    mass: f64,
    /// Yaw moment of inertia, kg·m².
    moment_of_inertia: f64,
    /// Drag torque per unit of angular velocity, N·m/(rad/s).
    angular_drag: f64,
    /// Wheel radius, m.
    wheel_radius: f64,
    /// Half the wheelbase scaled by the track scrub factor, m.
    effective_wheelbase_radius: f64,
    left_transmission: DcMotorTransmission,
    right_transmission: DcMotorTransmission,
}

impl DifferentialDrive {
    pub fn new(
        mass: f64,
        moment_of_inertia: f64,
        angular_drag: f64,
        wheel_radius: f64,
        effective_wheelbase_radius: f64,
        left_transmission: DcMotorTransmission,
        right_transmission: DcMotorTransmission,
    ) -> Self {
        Self {
            mass,
            moment_of_inertia,
            angular_drag,
            wheel_radius,
            effective_wheelbase_radius,
            left_transmission,
            right_transmission,
        }
    }

    /// Build the SI model from an inch-unit characterization config.
    pub fn from_config(config: &DriveConfig) -> Self {
        let wheel_radius = inches_to_meters(config.wheel_radius);
        let torque_per_volt = |ka: f64| wheel_radius * wheel_radius * config.linear_inertia / (2.0 * ka);
        let left = DcMotorTransmission::new(
            1.0 / config.left_transmission.kv,
            torque_per_volt(config.left_transmission.ka),
            config.left_transmission.ks,
        );
        let right = DcMotorTransmission::new(
            1.0 / config.right_transmission.kv,
            torque_per_volt(config.right_transmission.ka),
            config.right_transmission.ks,
        );
        Self::new(
            config.linear_inertia,
            config.angular_inertia,
            config.angular_drag,
            wheel_radius,
            0.5 * config.track_scrub_factor * inches_to_meters(config.wheelbase),
            left,
            right,
        )
    }

    #[inline]
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    #[inline]
    pub fn effective_wheelbase_radius(&self) -> f64 {
        self.effective_wheelbase_radius
    }

    #[inline]
    pub fn left_transmission(&self) -> &DcMotorTransmission {
        &self.left_transmission
    }

    #[inline]
    pub fn right_transmission(&self) -> &DcMotorTransmission {
        &self.right_transmission
    }

    /// Wheel angular velocities to chassis velocity.
    pub fn forward_kinematics(&self, wheels: &WheelState) -> ChassisState {
        ChassisState {
            linear: self.wheel_radius * (wheels.left + wheels.right) / 2.0,
            angular: self.wheel_radius * (wheels.right - wheels.left)
                / (2.0 * self.effective_wheelbase_radius),
        }
    }

    /// Chassis velocity to wheel angular velocities.
    pub fn inverse_kinematics(&self, chassis: &ChassisState) -> WheelState {
        WheelState {
            left: (chassis.linear - self.effective_wheelbase_radius * chassis.angular)
                / self.wheel_radius,
            right: (chassis.linear + self.effective_wheelbase_radius * chassis.angular)
                / self.wheel_radius,
        }
    }

    /// What the chassis does when the given voltages are applied at the
    /// given velocity.
    pub fn solve_forward_dynamics(
        &self,
        velocity: &ChassisState,
        voltage: &WheelState,
    ) -> DriveDynamics {
        let wheel_velocity = self.inverse_kinematics(velocity);
        let mut curvature = velocity.angular / velocity.linear;
        if curvature.is_nan() {
            curvature = 0.0;
        }

        let left_stationary = wheel_velocity.left.abs() < EPSILON
            && voltage.left.abs() < self.left_transmission.friction_voltage();
        let right_stationary = wheel_velocity.right.abs() < EPSILON
            && voltage.right.abs() < self.right_transmission.friction_voltage();
        if left_stationary && right_stationary {
            // Neither side can break static friction.
            return DriveDynamics {
                curvature,
                dcurvature: 0.0,
                chassis_velocity: *velocity,
                chassis_acceleration: ChassisState::default(),
                wheel_velocity,
                wheel_acceleration: WheelState::default(),
                voltage: *voltage,
                wheel_torque: WheelState::default(),
            };
        }

        let wheel_torque = WheelState {
            left: self
                .left_transmission
                .torque_at(wheel_velocity.left, voltage.left),
            right: self
                .right_transmission
                .torque_at(wheel_velocity.right, voltage.right),
        };
        let linear_acceleration =
            (wheel_torque.right + wheel_torque.left) / (self.wheel_radius * self.mass);
        let angular_acceleration = self.effective_wheelbase_radius
            * (wheel_torque.right - wheel_torque.left)
            / (self.wheel_radius * self.moment_of_inertia)
            - velocity.angular * self.angular_drag / self.moment_of_inertia;
        let mut dcurvature = (angular_acceleration - linear_acceleration * curvature)
            / (velocity.linear * velocity.linear);
        if dcurvature.is_nan() {
            dcurvature = 0.0;
        }

        DriveDynamics {
            curvature,
            dcurvature,
            chassis_velocity: *velocity,
            chassis_acceleration: ChassisState {
                linear: linear_acceleration,
                angular: angular_acceleration,
            },
            wheel_velocity,
            wheel_acceleration: WheelState {
                left: linear_acceleration
                    - angular_acceleration * self.effective_wheelbase_radius,
                right: linear_acceleration
                    + angular_acceleration * self.effective_wheelbase_radius,
            },
            voltage: *voltage,
            wheel_torque,
        }
    }

    /// What torques and voltages produce the given chassis motion.
    pub fn solve_inverse_dynamics(
        &self,
        velocity: &ChassisState,
        acceleration: &ChassisState,
    ) -> DriveDynamics {
        let mut curvature = velocity.angular / velocity.linear;
        if curvature.is_nan() {
            curvature = 0.0;
        }
        let mut dcurvature = (acceleration.angular - acceleration.linear * curvature)
            / (velocity.linear * velocity.linear);
        if dcurvature.is_nan() {
            dcurvature = 0.0;
        }

        let wheel_velocity = self.inverse_kinematics(velocity);
        let wheel_acceleration = WheelState {
            left: acceleration.linear - acceleration.angular * self.effective_wheelbase_radius,
            right: acceleration.linear + acceleration.angular * self.effective_wheelbase_radius,
        };

        // Newton's second law on both channels, split into per-wheel torques.
        let linear_force = acceleration.linear * self.mass;
        let angular_force = (acceleration.angular * self.moment_of_inertia
            + velocity.angular * self.angular_drag)
            / self.effective_wheelbase_radius;
        let wheel_torque = WheelState {
            left: 0.5 * self.wheel_radius * (linear_force - angular_force),
            right: 0.5 * self.wheel_radius * (linear_force + angular_force),
        };
        let voltage = WheelState {
            left: self
                .left_transmission
                .voltage_at(wheel_velocity.left, wheel_torque.left),
            right: self
                .right_transmission
                .voltage_at(wheel_velocity.right, wheel_torque.right),
        };

        DriveDynamics {
            curvature,
            dcurvature,
            chassis_velocity: *velocity,
            chassis_acceleration: *acceleration,
            wheel_velocity,
            wheel_acceleration,
            voltage,
            wheel_torque,
        }
    }

    /// Largest chassis speed sustainable on an arc of the given curvature
    /// without either side exceeding `max_voltage`.
    ///
    /// For finite nonzero curvature the two wheels are locked in a fixed
    /// speed ratio, so the binding side is whichever hits its free speed
    /// first. Returns m/s, or rad/s for infinite curvature (point turn).
    pub fn max_abs_velocity_at_curvature(&self, curvature: f64, max_voltage: f64) -> f64 {
        let left_speed = self.left_transmission.free_speed_at_voltage(max_voltage);
        let right_speed = self.right_transmission.free_speed_at_voltage(max_voltage);
        if curvature.abs() < EPSILON {
            return self.wheel_radius * left_speed.min(right_speed);
        }
        if curvature.is_infinite() {
            let wheel_speed = left_speed.min(right_speed);
            return curvature.signum() * self.wheel_radius * wheel_speed
                / self.effective_wheelbase_radius;
        }

        let radius_term = self.effective_wheelbase_radius * curvature;
        let right_if_left_max = left_speed * (radius_term + 1.0) / (1.0 - radius_term);
        if right_if_left_max.abs() <= right_speed + EPSILON {
            return self.wheel_radius * (left_speed + right_if_left_max) / 2.0;
        }
        let left_if_right_max = right_speed * (1.0 - radius_term) / (1.0 + radius_term);
        self.wheel_radius * (right_speed + left_if_right_max) / 2.0
    }

    /// Achievable chassis acceleration interval at the given velocity and
    /// curvature within the voltage budget.
    ///
    /// One wheel is pinned at ±`max_voltage`; the other wheel's torque
    /// follows from the curvature-consistency torque balance. Each of the
    /// four (side, sign) candidates counts only if the free wheel's
    /// required voltage stays inside the budget.
    pub fn min_max_acceleration(
        &self,
        velocity: &ChassisState,
        curvature: f64,
        max_voltage: f64,
    ) -> MinMaxAcceleration {
        let wheel_velocity = self.inverse_kinematics(velocity);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        // Torque balance terms: with T_l, T_r the wheel torques,
        //   mass * r_wb * a           = (T_l + T_r) * r_wb / r_w
        //   moi * alpha + drag_torque = (T_r - T_l) * r_wb / r_w
        // and curvature consistency alpha = a * curvature ties them.
        let linear_term = self.mass * self.effective_wheelbase_radius;
        let angular_term = self.moment_of_inertia * curvature;
        let drag_torque = velocity.angular * self.angular_drag;

        for left_fixed in [false, true] {
            for sign in [1.0, -1.0] {
                let (fixed, variable) = if left_fixed {
                    (&self.left_transmission, &self.right_transmission)
                } else {
                    (&self.right_transmission, &self.left_transmission)
                };
                let fixed_wheel_velocity = if left_fixed {
                    wheel_velocity.left
                } else {
                    wheel_velocity.right
                };
                let variable_wheel_velocity = if left_fixed {
                    wheel_velocity.right
                } else {
                    wheel_velocity.left
                };
                let fixed_torque = fixed.torque_at(fixed_wheel_velocity, sign * max_voltage);

                let variable_torque = if curvature.is_infinite() {
                    -fixed_torque
                } else if left_fixed {
                    (fixed_torque * (linear_term + angular_term)
                        + drag_torque * self.mass * self.wheel_radius)
                        / (linear_term - angular_term)
                } else {
                    (fixed_torque * (linear_term - angular_term)
                        - drag_torque * self.mass * self.wheel_radius)
                        / (linear_term + angular_term)
                };

                let variable_voltage =
                    variable.voltage_at(variable_wheel_velocity, variable_torque);
                if variable_voltage.abs() > max_voltage + EPSILON {
                    continue;
                }

                let acceleration = if curvature.is_infinite() {
                    let direction = if left_fixed { -1.0 } else { 1.0 };
                    direction * (fixed_torque - variable_torque) * self.effective_wheelbase_radius
                        / (self.moment_of_inertia * self.wheel_radius)
                        - drag_torque / self.moment_of_inertia
                } else {
                    (fixed_torque + variable_torque) / (self.mass * self.wheel_radius)
                };
                min = min.min(acceleration);
                max = max.max(acceleration);
            }
        }
        MinMaxAcceleration { min, max }
    }
}
