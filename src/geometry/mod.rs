//! SE(2) pose algebra: translations, rotations, poses, and twists.
//!
//! These are the leaf types for the whole pipeline. All operations are pure
//! value-to-value math on f64; nothing here allocates or fails.

mod pose;
mod rotation;
mod translation;
mod twist;

pub use pose::{Pose2D, PoseWithCurvature};
pub use rotation::Rotation2D;
pub use translation::Translation2D;
pub use twist::Twist2D;

/// Default tolerance for approximate comparisons and small-angle branches.
pub const EPSILON: f64 = 1e-9;

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp(a: f64, b: f64, x: f64) -> f64 {
    a + (b - a) * x
}
