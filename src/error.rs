//! Error types for marga-traj.

use thiserror::Error;

/// Fatal conditions surfaced by the trajectory pipeline.
///
/// Degenerate geometry inputs (zero-length vectors, near-zero rotations) are
/// handled by returning identity values and never reach this enum. Everything
/// here means the caller must relax constraints or fix input geometry and
/// regenerate; retrying is pointless since the pipeline is deterministic.
#[derive(Error, Debug)]
pub enum MargaError {
    /// Adaptive sampling exceeded its recursion depth, which signals a
    /// degenerate or cusp-containing spline that cannot be approximated
    /// within the configured twist bounds.
    #[error("spline subdivision exceeded depth {depth}; spline is degenerate or contains a cusp")]
    MalformedSpline { depth: usize },

    /// A timing constraint reported a negative maximum velocity.
    #[error("constraint produced negative max velocity {velocity} at sample {index}")]
    NegativeConstraintVelocity { index: usize, velocity: f64 },

    /// A constraint (or the intersection of all constraints) produced an
    /// acceleration range with min > max.
    #[error("inverted acceleration bounds: min {min} > max {max}")]
    InvertedAccelBounds { min: f64, max: f64 },

    /// Time integration hit a sample requiring motion with neither velocity
    /// nor acceleration, or accumulated a non-finite timestamp.
    #[error("time integration failed: {0}")]
    TimeIntegration(String),

    /// The planner needs at least two waypoints to build a spline.
    #[error("need at least 2 waypoints, got {count}")]
    InsufficientWaypoints { count: usize },
}

pub type Result<T> = std::result::Result<T, MargaError>;
