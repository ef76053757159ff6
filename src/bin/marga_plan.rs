//! Plan a trajectory from the command line and print it.
//!
//! Ships three built-in demo paths; pass `--waypoint` repeatedly to plan a
//! custom one instead.
//!
//! # Usage
//!
//! ```bash
//! # Built-in S-curve on the reference robot
//! marga_plan
//!
//! # Custom path, small chassis, CSV to stdout
//! marga_plan --test-chassis --csv \
//!     --waypoint 0,0,90 --waypoint 50,50,0 --waypoint 100,0,-90
//!
//! # Reverse run with per-sample wheel voltages
//! marga_plan --demo hook --reverse --wheels
//! ```

use clap::{Parser, ValueEnum};

use marga_traj::units::inches_to_meters;
use marga_traj::{
    plan_trajectory, ChassisState, DifferentialDrive, DriveConfig, PlannerConfig, Pose2D,
    Trajectory, TrajectorySample,
};

#[derive(Parser)]
#[command(name = "marga_plan")]
#[command(about = "Plan a differential-drive trajectory and print the timed samples")]
struct Args {
    /// Built-in demo path (ignored when --waypoint is given)
    #[arg(long, value_enum, default_value = "s-curve")]
    demo: DemoPath,

    /// Waypoint as "x,y,heading_deg" in inches/degrees; repeat per waypoint
    #[arg(long = "waypoint", value_parser = parse_waypoint)]
    waypoints: Vec<Pose2D>,

    /// Velocity cap (in/s)
    #[arg(long, default_value = "240.0")]
    max_velocity: f64,

    /// Acceleration magnitude cap (in/s^2)
    #[arg(long, default_value = "120.0")]
    max_accel: f64,

    /// Bus voltage budget (V)
    #[arg(long, default_value = "9.0")]
    voltage: f64,

    /// Plan for driving backwards
    #[arg(long)]
    reverse: bool,

    /// Skip junction curvature smoothing
    #[arg(long)]
    no_optimize: bool,

    /// Use the small test chassis instead of the reference robot
    #[arg(long)]
    test_chassis: bool,

    /// Append per-sample wheel voltages from inverse dynamics
    #[arg(long)]
    wheels: bool,

    /// Emit CSV instead of an aligned table
    #[arg(long)]
    csv: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoPath {
    /// Gentle S-curve, matching start and end headings
    SCurve,
    /// Three-waypoint slalom ending in the opposite heading
    Slalom,
    /// Straight run into a 90 degree hook
    Hook,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> marga_traj::Result<()> {
    let waypoints = if args.waypoints.is_empty() {
        demo_waypoints(args.demo)
    } else {
        args.waypoints.clone()
    };

    let drive = if args.test_chassis {
        DriveConfig::test_chassis()
    } else {
        DriveConfig::default()
    };
    let config = PlannerConfig {
        drive,
        max_velocity: args.max_velocity,
        max_abs_acceleration: args.max_accel,
        max_voltage: args.voltage,
        reverse: args.reverse,
        optimize: !args.no_optimize,
        ..PlannerConfig::default()
    };

    let trajectory = plan_trajectory(&waypoints, &config)?;
    let model = args
        .wheels
        .then(|| DifferentialDrive::from_config(&config.drive));

    if args.csv {
        print_csv(&trajectory, model.as_ref());
    } else {
        println!(
            "Planned {} waypoints -> {} samples, {:.3} s, {:.1} in",
            waypoints.len(),
            trajectory.len(),
            trajectory.total_time(),
            trajectory.total_distance()
        );
        println!();
        print_table(&trajectory, model.as_ref());
    }
    Ok(())
}

fn demo_waypoints(demo: DemoPath) -> Vec<Pose2D> {
    match demo {
        DemoPath::SCurve => vec![
            Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(120.0, 60.0, 0.0),
        ],
        DemoPath::Slalom => vec![
            Pose2D::from_xy_degrees(0.0, 0.0, 90.0),
            Pose2D::from_xy_degrees(50.0, 50.0, 0.0),
            Pose2D::from_xy_degrees(100.0, 0.0, -90.0),
        ],
        DemoPath::Hook => vec![
            Pose2D::from_xy_degrees(0.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(80.0, 0.0, 0.0),
            Pose2D::from_xy_degrees(120.0, 40.0, 90.0),
        ],
    }
}

fn parse_waypoint(s: &str) -> Result<Pose2D, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,heading_deg, got '{}'", s));
    }
    let x: f64 = parts[0].trim().parse().map_err(|_| format!("bad x '{}'", parts[0]))?;
    let y: f64 = parts[1].trim().parse().map_err(|_| format!("bad y '{}'", parts[1]))?;
    let heading: f64 = parts[2]
        .trim()
        .parse()
        .map_err(|_| format!("bad heading '{}'", parts[2]))?;
    Ok(Pose2D::from_xy_degrees(x, y, heading))
}

/// Required per-side voltages for the sample's chassis motion.
///
/// Angular rate and acceleration come from the stamped curvature:
/// `w = curvature * v` and `alpha = dcurvature_ds * v^2 + curvature * a`,
/// both already in 1/s units regardless of the length unit.
fn wheel_voltages(drive: &DifferentialDrive, sample: &TrajectorySample) -> (f64, f64) {
    let velocity = ChassisState {
        linear: inches_to_meters(sample.velocity),
        angular: sample.state.curvature * sample.velocity,
    };
    let acceleration = ChassisState {
        linear: inches_to_meters(sample.acceleration),
        angular: sample.state.dcurvature_ds * sample.velocity * sample.velocity
            + sample.state.curvature * sample.acceleration,
    };
    let dynamics = drive.solve_inverse_dynamics(&velocity, &acceleration);
    (dynamics.voltage.left, dynamics.voltage.right)
}

fn print_table(trajectory: &Trajectory, model: Option<&DifferentialDrive>) {
    print!(
        "{:>8}  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}  {:>9}",
        "t", "x", "y", "heading", "vel", "accel", "curv"
    );
    if model.is_some() {
        print!("  {:>7}  {:>7}", "v_left", "v_right");
    }
    println!();

    for sample in trajectory.samples() {
        print!(
            "{:>8.3}  {:>9.3}  {:>9.3}  {:>8.2}  {:>8.2}  {:>8.2}  {:>9.4}",
            sample.time,
            sample.state.pose.translation.x,
            sample.state.pose.translation.y,
            sample.state.pose.rotation.degrees(),
            sample.velocity,
            sample.acceleration,
            sample.state.curvature
        );
        if let Some(drive) = model {
            let (left, right) = wheel_voltages(drive, sample);
            print!("  {:>7.2}  {:>7.2}", left, right);
        }
        println!();
    }
}

fn print_csv(trajectory: &Trajectory, model: Option<&DifferentialDrive>) {
    if model.is_some() {
        println!("t,x,y,heading_deg,velocity,acceleration,curvature,volts_left,volts_right");
    } else {
        println!("t,x,y,heading_deg,velocity,acceleration,curvature");
    }
    for sample in trajectory.samples() {
        print!(
            "{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            sample.time,
            sample.state.pose.translation.x,
            sample.state.pose.translation.y,
            sample.state.pose.rotation.degrees(),
            sample.velocity,
            sample.acceleration,
            sample.state.curvature
        );
        if let Some(drive) = model {
            let (left, right) = wheel_voltages(drive, sample);
            print!(",{:.4},{:.4}", left, right);
        }
        println!();
    }
}
