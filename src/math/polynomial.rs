//! Polynomial motion primitives.

/// A quintic polynomial fitted to full boundary conditions at both ends.
#[derive(Clone, Copy, Debug)]
pub struct QuinticPolynomial {
    coeffs: [f64; 6],
}

impl QuinticPolynomial {
    /// Fits a quintic satisfying position, first and second derivative
    /// at `p = 0` and at `p = length`.
    pub fn fit(x0: f64, dx0: f64, ddx0: f64, x1: f64, dx1: f64, ddx1: f64, length: f64) -> Self {
        let a0 = x0;
        let a1 = dx0;
        let a2 = 0.5 * ddx0;

        let p2 = length * length;
        let p3 = p2 * length;

        let b0 = x1 - a0 - a1 * length - a2 * p2;
        let b1 = dx1 - a1 - 2.0 * a2 * length;
        let b2 = ddx1 - 2.0 * a2;

        let a3 = (20.0 * b0 - 8.0 * b1 * length + b2 * p2) / (2.0 * p3);
        let a4 = (-30.0 * b0 + 14.0 * b1 * length - 2.0 * b2 * p2) / (2.0 * p3 * length);
        let a5 = (12.0 * b0 - 6.0 * b1 * length + b2 * p2) / (2.0 * p3 * p2);

        Self {
            coeffs: [a0, a1, a2, a3, a4, a5],
        }
    }

    /// Evaluates the polynomial or one of its first three derivatives.
    pub fn evaluate(&self, order: usize, p: f64) -> f64 {
        let c = &self.coeffs;
        match order {
            0 => ((((c[5] * p + c[4]) * p + c[3]) * p + c[2]) * p + c[1]) * p + c[0],
            1 => (((5.0 * c[5] * p + 4.0 * c[4]) * p + 3.0 * c[3]) * p + 2.0 * c[2]) * p + c[1],
            2 => ((20.0 * c[5] * p + 12.0 * c[4]) * p + 6.0 * c[3]) * p + 2.0 * c[2],
            3 => (60.0 * c[5] * p + 24.0 * c[4]) * p + 6.0 * c[3],
            _ => 0.0,
        }
    }

    /// Returns true if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }
}

/// A quartic polynomial with a free end position; fitted to position,
/// first and second derivative at `p = 0` and to first and second
/// derivative at `p = length`.
#[derive(Clone, Copy, Debug)]
pub struct QuarticPolynomial {
    coeffs: [f64; 5],
}

impl QuarticPolynomial {
    /// Fits a quartic leaving the end position unconstrained.
    pub fn fit(x0: f64, dx0: f64, ddx0: f64, dx1: f64, ddx1: f64, length: f64) -> Self {
        let a0 = x0;
        let a1 = dx0;
        let a2 = 0.5 * ddx0;

        let p2 = length * length;

        let b0 = dx1 - a1 - 2.0 * a2 * length;
        let b1 = ddx1 - 2.0 * a2;

        let a3 = (3.0 * b0 - b1 * length) / (3.0 * p2);
        let a4 = (-2.0 * b0 + b1 * length) / (4.0 * p2 * length);

        Self {
            coeffs: [a0, a1, a2, a3, a4],
        }
    }

    /// Evaluates the polynomial or one of its first three derivatives.
    pub fn evaluate(&self, order: usize, p: f64) -> f64 {
        let c = &self.coeffs;
        match order {
            0 => (((c[4] * p + c[3]) * p + c[2]) * p + c[1]) * p + c[0],
            1 => ((4.0 * c[4] * p + 3.0 * c[3]) * p + 2.0 * c[2]) * p + c[1],
            2 => (12.0 * c[4] * p + 6.0 * c[3]) * p + 2.0 * c[2],
            3 => 24.0 * c[4] * p + 6.0 * c[3],
            _ => 0.0,
        }
    }

    /// Returns true if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }
}
