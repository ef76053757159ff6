//! Time parameterization of sampled paths.
//!
//! [`Trajectory::generate`] turns a dense pose-with-curvature path into timed
//! motion states in four steps:
//!
//! 1. resample to near-uniform arc-length spacing,
//! 2. forward pass: cap each sample's velocity by what is reachable from the
//!    start under every constraint,
//! 3. backward pass: cap by what still lets the profile hit the end velocity,
//! 4. integrate distance and velocity into timestamps.
//!
//! Both passes run a small fixed-point loop per sample pair: when the
//! acceleration actually required between two samples exceeds a neighbor's
//! bound, the neighbor's bound is tightened and the pair re-evaluated.

mod constraints;

pub use constraints::{Region, TimingConstraint};

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::{MargaError, Result};
use crate::geometry::{lerp, PoseWithCurvature};

/// Comparison slop for the timing passes, in profile units.
const EPSILON: f64 = 1e-6;

/// One timed state of the robot along a trajectory.
///
/// `acceleration` is the *outgoing* value: the acceleration applied between
/// this sample and the next. The final sample stores 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Seconds since the trajectory start.
    pub time: f64,
    /// Cumulative arc length, in path units.
    pub distance: f64,
    /// Signed speed along the path, path units per second.
    pub velocity: f64,
    /// Signed acceleration toward the next sample, path units per second².
    pub acceleration: f64,
    /// Pose, curvature, and curvature-rate at this point.
    pub state: PoseWithCurvature,
}

/// Per-sample working state for the forward/backward passes.
#[derive(Debug, Clone, Copy)]
struct ConstrainedState {
    state: PoseWithCurvature,
    distance: f64,
    max_velocity: f64,
    min_acceleration: f64,
    max_acceleration: f64,
}

/// A time-parameterized path: ordered samples with nondecreasing timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// Time-parameterize a sampled path.
    ///
    /// `samples` is the dense pose sequence from the spline sampler (it is
    /// resampled to roughly `step_size` spacing first, keeping the final
    /// pose). `start_velocity` and `end_velocity` pin the profile endpoints;
    /// `max_velocity` and `max_abs_acceleration` are the global caps that
    /// apply everywhere before any [`TimingConstraint`] tightens them.
    /// `step_size` must be positive.
    pub fn generate(
        samples: &[PoseWithCurvature],
        constraints: &[TimingConstraint],
        step_size: f64,
        start_velocity: f64,
        end_velocity: f64,
        max_velocity: f64,
        max_abs_acceleration: f64,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Ok(Self::default());
        }

        let path = resample(samples, step_size);
        debug!(
            "resampled {} path samples to {} timing states",
            samples.len(),
            path.len()
        );

        let mut states = Vec::with_capacity(path.len());
        let mut distance = 0.0;
        for (i, sample) in path.iter().enumerate() {
            if i > 0 {
                distance += path[i - 1].distance(sample);
            }
            states.push(ConstrainedState {
                state: *sample,
                distance,
                max_velocity: 0.0,
                min_acceleration: -max_abs_acceleration,
                max_acceleration: max_abs_acceleration,
            });
        }

        forward_pass(
            &mut states,
            constraints,
            start_velocity,
            max_velocity,
            max_abs_acceleration,
        )?;
        backward_pass(&mut states, constraints, end_velocity)?;
        integrate(&states)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    #[inline]
    pub fn first(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Duration in seconds. Zero when empty.
    pub fn total_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.time)
    }

    /// Path length in path units. Zero when empty.
    pub fn total_distance(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.distance)
    }

    /// Interpolated lookup for controller-style consumption.
    ///
    /// Clamps to the first/last sample outside the time range. The pose
    /// interpolates geodesically; distance, velocity, and acceleration
    /// interpolate linearly in time. `None` only when the trajectory is
    /// empty.
    pub fn sample_at_time(&self, time: f64) -> Option<TrajectorySample> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        if time <= first.time {
            return Some(*first);
        }
        if time >= last.time {
            return Some(*last);
        }
        // First sample strictly past the query; the bracket is (idx-1, idx).
        let idx = self.samples.partition_point(|s| s.time <= time);
        let lo = &self.samples[idx - 1];
        let hi = &self.samples[idx];
        let dt = hi.time - lo.time;
        if dt < EPSILON {
            return Some(*hi);
        }
        let x = (time - lo.time) / dt;
        Some(TrajectorySample {
            time,
            distance: lerp(lo.distance, hi.distance, x),
            velocity: lerp(lo.velocity, hi.velocity, x),
            acceleration: lerp(lo.acceleration, hi.acceleration, x),
            state: lo.state.interpolate(&hi.state, x),
        })
    }

    /// The same path driven facing the other way: headings rotate a half
    /// turn, velocity and acceleration change sign, timing and geometry are
    /// unchanged.
    pub fn reverse(&self) -> Self {
        let samples = self
            .samples
            .iter()
            .map(|s| {
                let mut state = s.state;
                state.pose.rotation = state.pose.rotation.reversed();
                TrajectorySample {
                    velocity: -s.velocity,
                    acceleration: -s.acceleration,
                    state,
                    ..*s
                }
            })
            .collect();
        Self { samples }
    }

    /// Reflect every sample across the x axis, for mirror-symmetric field
    /// layouts.
    pub fn mirror(&self) -> Self {
        let samples = self
            .samples
            .iter()
            .map(|s| TrajectorySample {
                state: s.state.mirror(),
                ..*s
            })
            .collect();
        Self { samples }
    }
}

/// Resample a dense pose sequence to near-uniform arc-length spacing.
///
/// One long input segment can emit several output samples. The final input
/// pose is always kept so the path endpoint survives resampling.
fn resample(samples: &[PoseWithCurvature], step_size: f64) -> Vec<PoseWithCurvature> {
    let mut out = vec![samples[0]];
    let mut last = samples[0];
    for next in &samples[1..] {
        loop {
            let d = last.distance(next);
            if d < step_size {
                break;
            }
            last = last.interpolate(next, step_size / d);
            out.push(last);
        }
    }
    let end = samples[samples.len() - 1];
    if last.distance(&end) > EPSILON || out.len() == 1 {
        out.push(end);
    }
    out
}

/// Walk start to end, capping each velocity by what the previous sample can
/// reach and by every constraint, tightening the previous sample's
/// acceleration bound when the required acceleration exceeds it.
fn forward_pass(
    states: &mut [ConstrainedState],
    constraints: &[TimingConstraint],
    start_velocity: f64,
    max_velocity: f64,
    max_abs_acceleration: f64,
) -> Result<()> {
    states[0].max_velocity = start_velocity;
    for i in 1..states.len() {
        let ds = states[i].distance - states[i - 1].distance;
        loop {
            let reachable = (states[i - 1].max_velocity * states[i - 1].max_velocity
                + 2.0 * states[i - 1].max_acceleration * ds)
                .sqrt();
            states[i].max_velocity = max_velocity.min(reachable);
            states[i].min_acceleration = -max_abs_acceleration;
            states[i].max_acceleration = max_abs_acceleration;

            for constraint in constraints {
                let cap = constraint.max_velocity(&states[i].state);
                states[i].max_velocity = states[i].max_velocity.min(cap);
                if states[i].max_velocity < 0.0 {
                    let err = MargaError::NegativeConstraintVelocity {
                        index: i,
                        velocity: states[i].max_velocity,
                    };
                    error!("{}", err);
                    return Err(err);
                }
            }
            intersect_acceleration_bounds(&mut states[i], constraints)?;

            if ds < EPSILON {
                break;
            }
            // Acceleration this pair actually demands at the capped velocity.
            let actual = (states[i].max_velocity * states[i].max_velocity
                - states[i - 1].max_velocity * states[i - 1].max_velocity)
                / (2.0 * ds);
            if states[i].max_acceleration < actual - EPSILON {
                states[i - 1].max_acceleration = states[i].max_acceleration;
            } else {
                if actual > states[i - 1].min_acceleration + EPSILON {
                    states[i - 1].max_acceleration = actual;
                }
                break;
            }
        }
    }
    Ok(())
}

/// Walk end to start, lowering velocities until the end velocity stays
/// reachable under each sample's deceleration bound.
fn backward_pass(
    states: &mut [ConstrainedState],
    constraints: &[TimingConstraint],
    end_velocity: f64,
) -> Result<()> {
    let n = states.len();
    states[n - 1].max_velocity = states[n - 1].max_velocity.min(end_velocity);
    for i in (0..n - 1).rev() {
        // Negative: walking against the direction of travel.
        let ds = states[i].distance - states[i + 1].distance;
        loop {
            let reachable = (states[i + 1].max_velocity * states[i + 1].max_velocity
                + 2.0 * states[i + 1].min_acceleration * ds)
                .sqrt();
            if reachable >= states[i].max_velocity {
                break;
            }
            states[i].max_velocity = reachable;
            intersect_acceleration_bounds(&mut states[i], constraints)?;

            if -ds < EPSILON {
                break;
            }
            let actual = (states[i].max_velocity * states[i].max_velocity
                - states[i + 1].max_velocity * states[i + 1].max_velocity)
                / (2.0 * ds);
            if states[i].min_acceleration > actual + EPSILON {
                states[i + 1].min_acceleration = states[i].min_acceleration;
            } else {
                states[i + 1].min_acceleration = actual;
                break;
            }
        }
    }
    Ok(())
}

/// Intersect every constraint's acceleration interval at the state's current
/// velocity cap.
fn intersect_acceleration_bounds(
    state: &mut ConstrainedState,
    constraints: &[TimingConstraint],
) -> Result<()> {
    for constraint in constraints {
        let bounds = constraint.min_max_acceleration(&state.state, state.max_velocity);
        if !bounds.is_valid() {
            let err = MargaError::InvertedAccelBounds {
                min: bounds.min,
                max: bounds.max,
            };
            error!("{}", err);
            return Err(err);
        }
        state.min_acceleration = state.min_acceleration.max(bounds.min);
        state.max_acceleration = state.max_acceleration.min(bounds.max);
    }
    if state.min_acceleration > state.max_acceleration {
        let err = MargaError::InvertedAccelBounds {
            min: state.min_acceleration,
            max: state.max_acceleration,
        };
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}

/// Single forward sweep turning the velocity profile into timestamps.
fn integrate(states: &[ConstrainedState]) -> Result<Trajectory> {
    let mut samples: Vec<TrajectorySample> = Vec::with_capacity(states.len());
    let mut time = 0.0;
    let mut distance = 0.0;
    let mut velocity = 0.0;
    for (i, cs) in states.iter().enumerate() {
        let ds = cs.distance - distance;
        let acceleration = if ds > 0.0 {
            (cs.max_velocity * cs.max_velocity - velocity * velocity) / (2.0 * ds)
        } else {
            0.0
        };
        let mut dt = 0.0;
        if i > 0 {
            // Backfill: sample i-1 carries the acceleration of segment
            // (i-1, i).
            samples[i - 1].acceleration = acceleration;
            if acceleration.abs() > EPSILON {
                dt = (cs.max_velocity - velocity) / acceleration;
            } else if velocity.abs() > EPSILON {
                dt = ds / velocity;
            } else {
                let err = MargaError::TimeIntegration(format!(
                    "sample {} requires motion with zero velocity and zero acceleration",
                    i
                ));
                error!("{}", err);
                return Err(err);
            }
        }
        time += dt;
        if !time.is_finite() {
            let err =
                MargaError::TimeIntegration(format!("non-finite time at sample {}", i));
            error!("{}", err);
            return Err(err);
        }
        velocity = cs.max_velocity;
        distance = cs.distance;
        samples.push(TrajectorySample {
            time,
            distance,
            velocity,
            acceleration: 0.0,
            state: cs.state,
        });
    }
    Ok(Trajectory { samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pose2D;
    use approx::assert_relative_eq;

    fn straight_line(length: f64, count: usize) -> Vec<PoseWithCurvature> {
        (0..count)
            .map(|i| {
                let x = length * i as f64 / (count - 1) as f64;
                PoseWithCurvature::new(Pose2D::from_xy_radians(x, 0.0, 0.0), 0.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_triangle_profile_on_short_straight() {
        // 1 inch at ±20 in/s² never reaches 80 in/s: a pure triangle.
        let samples = straight_line(1.0, 11);
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 0.0, 80.0, 20.0).unwrap();

        assert_eq!(traj.len(), 11);
        assert_relative_eq!(traj.total_distance(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(traj.total_time(), 0.4472135954999579, epsilon = 1e-9);

        let states = traj.samples();
        assert_relative_eq!(states[0].velocity, 0.0, epsilon = 1e-9);
        assert_relative_eq!(states[10].velocity, 0.0, epsilon = 1e-9);
        for (i, s) in states.iter().enumerate() {
            let expected = 2.0 * (i.min(10 - i) as f64).sqrt();
            assert_relative_eq!(s.velocity, expected, epsilon = 1e-9);
            assert_relative_eq!(s.distance, 0.1 * i as f64, epsilon = 1e-9);
        }
        // Outgoing accelerations: full throttle up, full braking down, zero
        // on the final sample.
        assert_relative_eq!(states[0].acceleration, 20.0, epsilon = 1e-9);
        assert_relative_eq!(states[4].acceleration, 20.0, epsilon = 1e-9);
        assert_relative_eq!(states[5].acceleration, -20.0, epsilon = 1e-9);
        assert_relative_eq!(states[9].acceleration, -20.0, epsilon = 1e-9);
        assert_relative_eq!(states[10].acceleration, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_resample_emits_uniform_steps_and_keeps_endpoint() {
        let samples = straight_line(0.25, 2);
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 0.0, 10.0, 100.0).unwrap();

        let distances: Vec<f64> = traj.samples().iter().map(|s| s.distance).collect();
        assert_eq!(distances.len(), 4);
        for (got, want) in distances.iter().zip([0.0, 0.1, 0.2, 0.25]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        let end = traj.last().unwrap();
        assert_relative_eq!(end.state.pose.translation.x, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_end_velocity_is_pinned() {
        let samples = straight_line(1.0, 11);
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 2.0, 80.0, 20.0).unwrap();

        assert_relative_eq!(traj.last().unwrap().velocity, 2.0, epsilon = 1e-9);
        let times: Vec<f64> = traj.samples().iter().map(|s| s.time).collect();
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_fixed_constraint_caps_velocity() {
        let samples = straight_line(1.0, 11);
        let cap = TimingConstraint::Fixed {
            max_velocity: 3.0,
            min_acceleration: f64::NEG_INFINITY,
            max_acceleration: f64::INFINITY,
        };
        let traj = Trajectory::generate(&samples, &[cap], 0.1, 0.0, 0.0, 80.0, 20.0)
            .unwrap();

        for s in traj.samples() {
            assert!(s.velocity <= 3.0 + 1e-9, "velocity {} above cap", s.velocity);
        }
        // The cap binds: the unconstrained triangle would peak at sqrt(20).
        let peak = traj
            .samples()
            .iter()
            .map(|s| s.velocity)
            .fold(0.0, f64::max);
        assert_relative_eq!(peak, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_at_time_clamps_and_interpolates() {
        let samples = straight_line(1.0, 11);
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 0.0, 80.0, 20.0).unwrap();

        let before = traj.sample_at_time(-1.0).unwrap();
        assert_relative_eq!(before.time, 0.0, epsilon = 1e-12);
        let after = traj.sample_at_time(traj.total_time() + 1.0).unwrap();
        assert_relative_eq!(after.distance, 1.0, epsilon = 1e-9);

        // First segment: 0 -> 2 in/s over 0.1 s at 20 in/s².
        let mid = traj.sample_at_time(0.05).unwrap();
        assert_relative_eq!(mid.velocity, 1.0, epsilon = 1e-9);
        assert_relative_eq!(mid.distance, 0.05, epsilon = 1e-9);
        assert_relative_eq!(mid.state.pose.translation.x, 0.05, epsilon = 1e-9);
    }

    #[test]
    fn test_reverse_flips_heading_and_signs() {
        let samples = straight_line(1.0, 11);
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 0.0, 80.0, 20.0).unwrap();
        let reversed = traj.reverse();

        for (orig, rev) in traj.samples().iter().zip(reversed.samples()) {
            assert_relative_eq!(rev.velocity, -orig.velocity, epsilon = 1e-12);
            assert_relative_eq!(rev.acceleration, -orig.acceleration, epsilon = 1e-12);
            assert_relative_eq!(rev.time, orig.time, epsilon = 1e-12);
            assert_relative_eq!(
                rev.state.pose.rotation.cos,
                -orig.state.pose.rotation.cos,
                epsilon = 1e-12
            );
        }
        assert_eq!(reversed.reverse(), traj);
    }

    #[test]
    fn test_mirror_reflects_across_x_axis() {
        let samples: Vec<PoseWithCurvature> = (0..11)
            .map(|i| {
                let d = 0.1 * i as f64;
                PoseWithCurvature::new(
                    Pose2D::from_xy_degrees(d, d, 45.0),
                    0.0,
                    0.0,
                )
            })
            .collect();
        let traj =
            Trajectory::generate(&samples, &[], 0.1, 0.0, 0.0, 80.0, 20.0).unwrap();
        let mirrored = traj.mirror();

        for (orig, mir) in traj.samples().iter().zip(mirrored.samples()) {
            assert_relative_eq!(
                mir.state.pose.translation.y,
                -orig.state.pose.translation.y,
                epsilon = 1e-12
            );
            assert_relative_eq!(
                mir.state.pose.rotation.radians(),
                -orig.state.pose.rotation.radians(),
                epsilon = 1e-12
            );
            assert_relative_eq!(mir.velocity, orig.velocity, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = Trajectory::generate(&[], &[], 0.1, 0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.total_time(), 0.0);
        assert!(empty.sample_at_time(0.0).is_none());

        // A single pose with zero endpoint velocities asks for motion with
        // neither velocity nor acceleration.
        let one = vec![PoseWithCurvature::new(Pose2D::identity(), 0.0, 0.0)];
        let err = Trajectory::generate(&one, &[], 0.1, 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(err, Err(MargaError::TimeIntegration(_))));
    }
}
