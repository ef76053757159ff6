//! Unit conversions between path units (inches, degrees) and SI.
//!
//! Path geometry is authored in inches; the drive model works in SI. The
//! conversions live here so the boundary is explicit at every crossing.

use std::f64::consts::PI;

/// Meters per inch, exact by definition.
pub const METERS_PER_INCH: f64 = 0.0254;

#[inline]
pub fn inches_to_meters(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

#[inline]
pub fn meters_to_inches(meters: f64) -> f64 {
    meters / METERS_PER_INCH
}

#[inline]
pub fn feet_to_meters(feet: f64) -> f64 {
    inches_to_meters(feet * 12.0)
}

#[inline]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters_to_inches(meters) / 12.0
}

/// Curvature conversion: 1/in to 1/m. Reciprocal units invert the factor.
#[inline]
pub fn per_inch_to_per_meter(curvature: f64) -> f64 {
    curvature / METERS_PER_INCH
}

#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[inline]
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

#[inline]
pub fn rad_per_sec_to_rpm(rad_per_sec: f64) -> f64 {
    rad_per_sec * 60.0 / (2.0 * PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inch_meter_round_trip() {
        assert_relative_eq!(inches_to_meters(1.0), 0.0254);
        assert_relative_eq!(meters_to_inches(inches_to_meters(36.5)), 36.5, epsilon = 1e-12);
        assert_relative_eq!(feet_to_meters(1.0), 0.3048);
        assert_relative_eq!(meters_to_feet(0.3048), 1.0, epsilon = 1e-12);
        // 0.04/in is a 25 inch radius, about 0.635 m.
        assert_relative_eq!(1.0 / per_inch_to_per_meter(0.04), 0.635, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_conversions() {
        assert_relative_eq!(degrees_to_radians(180.0), PI);
        assert_relative_eq!(radians_to_degrees(PI / 2.0), 90.0);
        assert_relative_eq!(rpm_to_rad_per_sec(60.0), 2.0 * PI);
        assert_relative_eq!(rad_per_sec_to_rpm(PI), 30.0);
    }
}
