//! Drivetrain model: motor transmissions and differential-drive dynamics.

mod differential;
mod transmission;

pub use differential::{
    ChassisState, DifferentialDrive, DriveDynamics, MinMaxAcceleration, WheelState,
};
pub use transmission::DcMotorTransmission;
