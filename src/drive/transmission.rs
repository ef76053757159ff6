//! Motor side of the drive model.

use serde::{Deserialize, Serialize};

use crate::geometry::EPSILON;

/// Lumped model of one side's geared motors, reduced to the wheel output.
///
/// Linear motor model with a static friction offset: output torque is
/// proportional to the voltage left over after friction and back-EMF.
/// Speeds are wheel angular velocities in rad/s, torques in N·m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcMotorTransmission {
    /// Wheel speed per volt of applied voltage, rad/s per V.
    speed_per_volt: f64,
    /// Wheel torque per volt across the motor, N·m per V.
    torque_per_volt: f64,
    /// Voltage needed to overcome static friction, V.
    friction_voltage: f64,
}

impl DcMotorTransmission {
    pub fn new(speed_per_volt: f64, torque_per_volt: f64, friction_voltage: f64) -> Self {
        Self {
            speed_per_volt,
            torque_per_volt,
            friction_voltage,
        }
    }

    #[inline]
    pub fn speed_per_volt(&self) -> f64 {
        self.speed_per_volt
    }

    #[inline]
    pub fn torque_per_volt(&self) -> f64 {
        self.torque_per_volt
    }

    #[inline]
    pub fn friction_voltage(&self) -> f64 {
        self.friction_voltage
    }

    /// Steady-state wheel speed at the given voltage, zero if the voltage
    /// cannot break static friction.
    pub fn free_speed_at_voltage(&self, voltage: f64) -> f64 {
        if voltage > EPSILON {
            ((voltage - self.friction_voltage) * self.speed_per_volt).max(0.0)
        } else if voltage < -EPSILON {
            ((voltage + self.friction_voltage) * self.speed_per_volt).min(0.0)
        } else {
            0.0
        }
    }

    /// Output torque at the given wheel speed and applied voltage.
    ///
    /// Friction opposes motion while the wheel turns. At standstill it
    /// instead eats into the applied voltage, and a voltage below the
    /// friction threshold produces no torque at all.
    pub fn torque_at(&self, output_speed: f64, voltage: f64) -> f64 {
        let effective_voltage = if output_speed > EPSILON {
            voltage - self.friction_voltage
        } else if output_speed < -EPSILON {
            voltage + self.friction_voltage
        } else if voltage > EPSILON {
            (voltage - self.friction_voltage).max(0.0)
        } else if voltage < -EPSILON {
            (voltage + self.friction_voltage).min(0.0)
        } else {
            return 0.0;
        };
        self.torque_per_volt * (effective_voltage - output_speed / self.speed_per_volt)
    }

    /// Voltage required to produce `torque` at the given wheel speed.
    /// Inverse of [`DcMotorTransmission::torque_at`] away from the friction
    /// dead band; the friction sign follows the motion, or the torque when
    /// stationary.
    pub fn voltage_at(&self, output_speed: f64, torque: f64) -> f64 {
        let friction_voltage = if output_speed > EPSILON {
            self.friction_voltage
        } else if output_speed < -EPSILON {
            -self.friction_voltage
        } else if torque > EPSILON {
            self.friction_voltage
        } else if torque < -EPSILON {
            -self.friction_voltage
        } else {
            return 0.0;
        };
        torque / self.torque_per_volt + output_speed / self.speed_per_volt + friction_voltage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Left transmission of the small test chassis: Ks 0.794 V,
    // Kv 0.185 V/(rad/s), Ka 0.035 V/(rad/s^2), 3 in wheels, 27.93 kg.
    fn test_transmission() -> DcMotorTransmission {
        DcMotorTransmission::new(5.405405405405405, 2.316769559999999, 0.794)
    }

    #[test]
    fn test_free_speed() {
        let t = test_transmission();
        assert_relative_eq!(t.free_speed_at_voltage(9.0), 44.35675675675675, epsilon = 1e-9);
        assert_relative_eq!(t.free_speed_at_voltage(-9.0), -44.35675675675675, epsilon = 1e-9);
        // Below the friction threshold nothing moves.
        assert_eq!(t.free_speed_at_voltage(0.5), 0.0);
        assert_eq!(t.free_speed_at_voltage(-0.5), 0.0);
        assert_eq!(t.free_speed_at_voltage(0.0), 0.0);
    }

    #[test]
    fn test_torque_at_stall_and_free_speed() {
        let t = test_transmission();
        assert_relative_eq!(t.torque_at(0.0, 9.0), 19.011411009359993, epsilon = 1e-9);
        // Free speed is by definition the zero-torque speed.
        assert_relative_eq!(t.torque_at(44.35675675675675, 9.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(t.torque_at(20.0, 9.0), 10.439363637359994, epsilon = 1e-9);
        // Stationary with sub-friction voltage: dead band.
        assert_eq!(t.torque_at(0.0, 0.5), 0.0);
        assert_eq!(t.torque_at(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_voltage_inverts_torque_when_moving() {
        let t = test_transmission();
        for &(speed, voltage) in &[(20.0, 9.0), (-20.0, -9.0), (5.0, 3.0), (-5.0, -3.0)] {
            let torque = t.torque_at(speed, voltage);
            assert_relative_eq!(t.voltage_at(speed, torque), voltage, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_voltage_at_standstill() {
        let t = test_transmission();
        assert_eq!(t.voltage_at(0.0, 0.0), 0.0);
        // Breaking away from rest pays the full friction voltage.
        assert_relative_eq!(t.voltage_at(0.0, 1.0), 1.225635505431969, epsilon = 1e-9);
        assert_relative_eq!(
            t.voltage_at(0.0, -1.0),
            -1.225635505431969,
            epsilon = 1e-9
        );
    }
}
