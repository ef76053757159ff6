//! Quintic Hermite path representation.
//!
//! Waypoints become [`Spline2D`] segments chained into a
//! [`SplineSequence`], junction curvature is smoothed by gradient descent,
//! and [`SplineSampler`] turns the result into pose samples dense enough
//! for timing.

mod planar;
mod quintic;
mod sampler;
mod sequence;

pub use planar::Spline2D;
pub use quintic::Spline1D;
pub use sampler::{SamplerConfig, SplineSampler};
pub use sequence::SplineSequence;
