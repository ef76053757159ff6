//! One-dimensional quintic Hermite basis.

/// A quintic polynomial on `t in [0, 1]` pinned by value, first derivative,
/// and second derivative at each endpoint.
///
/// The six boundary conditions are kept alongside the fitted power-basis
/// coefficients so the endpoint second derivatives can be nudged and the
/// polynomial refit without touching the other four conditions. Evaluation
/// clamps to the boundary values outside `[0, 1]`, which keeps endpoint
/// queries exact instead of accumulating Horner round-off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spline1D {
    k0: f64,
    dk0: f64,
    ddk0: f64,
    k1: f64,
    dk1: f64,
    ddk1: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Spline1D {
    pub fn new(k0: f64, dk0: f64, ddk0: f64, k1: f64, dk1: f64, ddk1: f64) -> Self {
        let mut spline = Self {
            k0,
            dk0,
            ddk0,
            k1,
            dk1,
            ddk1,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        };
        spline.rebuild();
        spline
    }

    /// Refit the power-basis coefficients from the boundary conditions.
    fn rebuild(&mut self) {
        self.a = -6.0 * self.k0 - 3.0 * self.dk0 - 0.5 * self.ddk0 + 0.5 * self.ddk1
            - 3.0 * self.dk1
            + 6.0 * self.k1;
        self.b = 15.0 * self.k0 + 8.0 * self.dk0 + 1.5 * self.ddk0 - self.ddk1 + 7.0 * self.dk1
            - 15.0 * self.k1;
        self.c = -10.0 * self.k0 - 6.0 * self.dk0 - 1.5 * self.ddk0 + 0.5 * self.ddk1
            - 4.0 * self.dk1
            + 10.0 * self.k1;
        self.d = 0.5 * self.ddk0;
        self.e = self.dk0;
        self.f = self.k0;
    }

    /// Shift the endpoint second derivatives and refit.
    pub fn tweak_curvature(&mut self, delta_ddk0: f64, delta_ddk1: f64) {
        self.ddk0 += delta_ddk0;
        self.ddk1 += delta_ddk1;
        self.rebuild();
    }

    #[inline]
    pub fn ddk0(&self) -> f64 {
        self.ddk0
    }

    #[inline]
    pub fn ddk1(&self) -> f64 {
        self.ddk1
    }

    pub fn position(&self, t: f64) -> f64 {
        if t <= 0.0 {
            self.k0
        } else if t >= 1.0 {
            self.k1
        } else {
            ((((self.a * t + self.b) * t + self.c) * t + self.d) * t + self.e) * t + self.f
        }
    }

    /// First derivative with respect to `t`.
    pub fn tangent(&self, t: f64) -> f64 {
        if t <= 0.0 {
            self.dk0
        } else if t >= 1.0 {
            self.dk1
        } else {
            (((5.0 * self.a * t + 4.0 * self.b) * t + 3.0 * self.c) * t + 2.0 * self.d) * t
                + self.e
        }
    }

    /// Second derivative with respect to `t`.
    pub fn curvature(&self, t: f64) -> f64 {
        if t <= 0.0 {
            self.ddk0
        } else if t >= 1.0 {
            self.ddk1
        } else {
            ((20.0 * self.a * t + 12.0 * self.b) * t + 6.0 * self.c) * t + 2.0 * self.d
        }
    }

    /// Third derivative with respect to `t`.
    pub fn dcurvature(&self, t: f64) -> f64 {
        if t <= 0.0 {
            6.0 * self.c
        } else if t >= 1.0 {
            60.0 * self.a + 24.0 * self.b + 6.0 * self.c
        } else {
            (60.0 * self.a * t + 24.0 * self.b) * t + 6.0 * self.c
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_line_collapses_to_identity() {
        // Matching unit tangents and zero second derivatives fit s(t) = t.
        let s = Spline1D::new(0.0, 1.0, 0.0, 1.0, 1.0, 0.0);
        assert_relative_eq!(s.position(0.25), 0.25, epsilon = 1e-12);
        assert_relative_eq!(s.position(0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.tangent(0.7), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.curvature(0.3), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.dcurvature(0.6), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smoothstep_fit() {
        // Zero tangents and second derivatives give 6t^5 - 15t^4 + 10t^3.
        let s = Spline1D::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert_relative_eq!(s.position(0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.tangent(0.5), 1.875, epsilon = 1e-12);
        assert_relative_eq!(s.curvature(0.5), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boundaries_are_exact() {
        let s = Spline1D::new(3.1, -0.4, 0.9, -7.2, 2.6, -1.1);
        assert_eq!(s.position(0.0), 3.1);
        assert_eq!(s.position(1.0), -7.2);
        assert_eq!(s.tangent(0.0), -0.4);
        assert_eq!(s.tangent(1.0), 2.6);
        assert_eq!(s.curvature(0.0), 0.9);
        assert_eq!(s.curvature(1.0), -1.1);
        // Out-of-range parameters clamp to the same values.
        assert_eq!(s.position(-0.5), 3.1);
        assert_eq!(s.position(1.5), -7.2);
    }

    #[test]
    fn test_tangent_matches_finite_difference() {
        let s = Spline1D::new(0.0, 2.0, -1.0, 5.0, 0.5, 3.0);
        let h = 1e-6;
        for &t in &[0.1, 0.35, 0.61, 0.9] {
            let fd = (s.position(t + h) - s.position(t - h)) / (2.0 * h);
            assert_relative_eq!(s.tangent(t), fd, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_tweak_curvature_moves_only_second_derivatives() {
        let mut s = Spline1D::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        s.tweak_curvature(2.0, -2.0);
        assert_eq!(s.curvature(0.0), 2.0);
        assert_eq!(s.curvature(1.0), -2.0);
        assert_eq!(s.position(0.0), 0.0);
        assert_eq!(s.position(1.0), 1.0);
        assert_eq!(s.tangent(0.0), 0.0);
        assert_eq!(s.tangent(1.0), 0.0);
    }
}
