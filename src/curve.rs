//! One-dimensional motion primitives.

use crate::math::{QuarticPolynomial, QuinticPolynomial};

/// The functional form backing a [`Curve1d`].
///
/// The lattice mixes polynomial families: a quartic when the end position is
/// free (cruising) and a quintic when it is pinned (stopping, following).
/// `Numeric` interpolates sampled derivative triples and exists so
/// observed trajectories can be pushed through the same cost functional as
/// analytic candidates.
#[derive(Clone, Debug)]
pub enum CurveForm {
    Quartic(QuarticPolynomial),
    Quintic(QuinticPolynomial),
    Numeric(SampledCurve),
}

/// A scalar curve on `[0, param_length]` with linear extrapolation beyond
/// its fitted range, carrying the lattice end condition it was built for.
#[derive(Clone, Debug)]
pub struct Curve1d {
    form: CurveForm,
    param_length: f64,
    target_position: Option<f64>,
    target_velocity: f64,
    target_param: f64,
}

impl Curve1d {
    /// A curve with a free end position (cruise primitives).
    pub fn cruise(poly: QuarticPolynomial, target_velocity: f64, target_param: f64) -> Self {
        Self {
            form: CurveForm::Quartic(poly),
            param_length: target_param,
            target_position: None,
            target_velocity,
            target_param,
        }
    }

    /// A curve pinned to an end position (stop/follow primitives and all
    /// lateral primitives).
    pub fn pinned(
        poly: QuinticPolynomial,
        target_position: f64,
        target_velocity: f64,
        target_param: f64,
    ) -> Self {
        Self {
            form: CurveForm::Quintic(poly),
            param_length: target_param,
            target_position: Some(target_position),
            target_velocity,
            target_param,
        }
    }

    /// A curve interpolating observed samples.
    pub fn sampled(curve: SampledCurve) -> Self {
        let param_length = curve.param_length();
        let target_velocity = curve.evaluate(1, param_length);
        let target_position = Some(curve.evaluate(0, param_length));
        Self {
            form: CurveForm::Numeric(curve),
            param_length,
            target_position,
            target_velocity,
            target_param: param_length,
        }
    }

    /// Evaluates the curve or one of its first three derivatives.
    ///
    /// Defined for any `param >= 0`: beyond the fitted range the curve
    /// extrapolates linearly, holding its end derivative.
    pub fn evaluate(&self, order: usize, param: f64) -> f64 {
        if param <= self.param_length {
            return self.form_evaluate(order, param);
        }
        let p = self.param_length;
        match order {
            0 => self.form_evaluate(0, p) + (param - p) * self.form_evaluate(1, p),
            1 => self.form_evaluate(1, p),
            _ => 0.0,
        }
    }

    fn form_evaluate(&self, order: usize, param: f64) -> f64 {
        match &self.form {
            CurveForm::Quartic(poly) => poly.evaluate(order, param),
            CurveForm::Quintic(poly) => poly.evaluate(order, param),
            CurveForm::Numeric(curve) => curve.evaluate(order, param),
        }
    }

    /// The length of the fitted parameter range.
    pub fn param_length(&self) -> f64 {
        self.param_length
    }

    /// The end position this primitive was fitted to, if it was pinned.
    pub fn target_position(&self) -> Option<f64> {
        self.target_position
    }

    /// The end first-derivative this primitive was fitted to.
    pub fn target_velocity(&self) -> f64 {
        self.target_velocity
    }

    /// The parameter value of the end condition (time for longitudinal
    /// curves, arc length for lateral ones).
    pub fn target_param(&self) -> f64 {
        self.target_param
    }

    /// Returns true if every coefficient or sample is finite.
    pub fn is_finite(&self) -> bool {
        let form_finite = match &self.form {
            CurveForm::Quartic(poly) => poly.is_finite(),
            CurveForm::Quintic(poly) => poly.is_finite(),
            CurveForm::Numeric(curve) => curve.is_finite(),
        };
        form_finite && self.param_length.is_finite()
    }

    /// The form tag, for logging the chosen end condition.
    pub fn form_name(&self) -> &'static str {
        match &self.form {
            CurveForm::Quartic(_) => "quartic",
            CurveForm::Quintic(_) => "quintic",
            CurveForm::Numeric(_) => "numeric",
        }
    }
}

/// Piecewise-linear interpolation over samples of a value and its first two
/// derivatives at arbitrary, strictly increasing parameter values.
#[derive(Clone, Debug)]
pub struct SampledCurve {
    /// `(param, [value, first derivative, second derivative])`, ordered.
    samples: Vec<(f64, [f64; 3])>,
}

impl SampledCurve {
    /// Wraps ordered samples. At least one sample is required; parameters
    /// must be strictly increasing.
    pub fn new(samples: Vec<(f64, [f64; 3])>) -> Self {
        debug_assert!(!samples.is_empty());
        debug_assert!(samples.windows(2).all(|w| w[1].0 > w[0].0));
        Self { samples }
    }

    fn param_length(&self) -> f64 {
        self.samples.last().map(|(p, _)| *p).unwrap_or(0.0)
    }

    fn evaluate(&self, order: usize, param: f64) -> f64 {
        let first = &self.samples[0];
        let last = self.samples.last().unwrap();
        if param <= first.0 {
            return Self::channel(first, order);
        }
        if param >= last.0 {
            return Self::channel(last, order);
        }
        let index = self.samples.partition_point(|(p, _)| *p < param).max(1);
        let (p0, y0) = &self.samples[index - 1];
        let (p1, y1) = &self.samples[index];
        if order == 3 {
            // slope of the sampled second derivative
            return (y1[2] - y0[2]) / (p1 - p0);
        }
        let frac = (param - p0) / (p1 - p0);
        let a = Self::channel(&(*p0, *y0), order);
        let b = Self::channel(&(*p1, *y1), order);
        a + frac * (b - a)
    }

    fn channel(sample: &(f64, [f64; 3]), order: usize) -> f64 {
        match order {
            0 | 1 | 2 => sample.1[order],
            _ => 0.0,
        }
    }

    fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .all(|(p, y)| p.is_finite() && y.iter().all(|v| v.is_finite()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn extrapolates_linearly_past_the_end() {
        let poly = QuinticPolynomial::fit(0.0, 10.0, 0.0, 40.0, 0.0, 0.0, 5.0);
        let curve = Curve1d::pinned(poly, 40.0, 0.0, 5.0);

        // End state is (40, 0, 0); the extrapolation must hold it.
        assert_approx_eq!(curve.evaluate(0, 8.0), 40.0, 1e-9);
        assert_approx_eq!(curve.evaluate(1, 8.0), 0.0, 1e-9);
        assert_approx_eq!(curve.evaluate(2, 8.0), 0.0, 1e-9);

        let moving = Curve1d::cruise(QuarticPolynomial::fit(0.0, 10.0, 0.0, 15.0, 0.0, 4.0), 15.0, 4.0);
        let s_end = moving.evaluate(0, 4.0);
        assert_approx_eq!(moving.evaluate(0, 6.0), s_end + 2.0 * 15.0, 1e-9);
        assert_approx_eq!(moving.evaluate(1, 6.0), 15.0, 1e-9);
        assert_approx_eq!(moving.evaluate(2, 6.0), 0.0, 1e-12);
    }

    #[test]
    fn sampled_curve_interpolates_channels() {
        let curve = SampledCurve::new(vec![
            (0.0, [0.0, 1.0, 0.0]),
            (1.0, [1.0, 1.0, 0.0]),
            (2.0, [2.0, 1.0, 2.0]),
        ]);
        assert_approx_eq!(curve.evaluate(0, 0.5), 0.5, 1e-12);
        assert_approx_eq!(curve.evaluate(1, 1.5), 1.0, 1e-12);
        assert_approx_eq!(curve.evaluate(2, 1.5), 1.0, 1e-12);
        assert_approx_eq!(curve.evaluate(3, 1.5), 2.0, 1e-12);
    }

    #[test]
    fn carries_end_condition() {
        let poly = QuinticPolynomial::fit(0.0, 12.0, 0.0, 40.0, 0.0, 0.0, 5.0);
        let curve = Curve1d::pinned(poly, 40.0, 0.0, 5.0);
        assert_eq!(curve.target_position(), Some(40.0));
        assert_eq!(curve.target_velocity(), 0.0);
        assert_eq!(curve.target_param(), 5.0);
        assert_eq!(curve.form_name(), "quintic");
    }
}
