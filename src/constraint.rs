//! Point-wise feasibility checks for 1-D primitives and combined
//! trajectories.

use crate::config::PlannerConfig;
use crate::curve::Curve1d;
use crate::trajectory::DiscretizedTrajectory;

/// Numerical slack applied to every limit comparison.
const EPSILON: f64 = 1e-6;

/// Sampling step for lateral curves, in m of arc length.
const LATERAL_SAMPLE_STEP: f64 = 1.0;

/// Checks candidate motions against the configured vehicle limits.
/// All checks are pure predicates; a non-finite sample fails the check.
#[derive(Clone, Debug)]
pub struct ConstraintChecker {
    horizon: f64,
    time_resolution: f64,
    v_max: f64,
    a_long_max: f64,
    a_long_min: f64,
    a_lat_max: f64,
    jerk_max: f64,
    kappa_max: f64,
    lateral_bound: f64,
}

impl ConstraintChecker {
    pub fn new(config: &PlannerConfig) -> Self {
        let limits = &config.limits;
        Self {
            horizon: config.planned_trajectory_time,
            time_resolution: config.trajectory_time_resolution,
            v_max: limits.v_max,
            a_long_max: limits.a_long_max,
            a_long_min: limits.a_long_min,
            a_lat_max: limits.a_lat_max,
            jerk_max: limits.jerk_max,
            kappa_max: limits.kappa_max,
            lateral_bound: limits.lateral_offset_max,
        }
    }

    /// Single-axis feasibility of a longitudinal curve: speed, acceleration
    /// and jerk sampled over the planning horizon.
    pub fn is_valid_longitudinal(&self, lon: &Curve1d) -> bool {
        if !(lon.is_finite() && lon.param_length() > 0.0) {
            return false;
        }
        let mut step = 0;
        loop {
            let t = step as f64 * self.time_resolution;
            if t > self.horizon {
                return true;
            }
            let v = lon.evaluate(1, t);
            let a = lon.evaluate(2, t);
            let jerk = lon.evaluate(3, t);
            let ok = v >= -EPSILON
                && v <= self.v_max + EPSILON
                && a <= self.a_long_max + EPSILON
                && a >= -self.a_long_min - EPSILON
                && jerk.abs() <= self.jerk_max + EPSILON;
            if !ok {
                return false;
            }
            step += 1;
        }
    }

    /// Single-axis feasibility of a lateral curve: domain and offset bound
    /// sampled over its fitted arc length.
    pub fn is_valid_lateral(&self, lat: &Curve1d) -> bool {
        if !(lat.is_finite() && lat.param_length() > 0.0) {
            return false;
        }
        let steps = (lat.param_length() / LATERAL_SAMPLE_STEP).ceil() as usize;
        (0..=steps).all(|i| {
            let s = (i as f64 * LATERAL_SAMPLE_STEP).min(lat.param_length());
            let d = lat.evaluate(0, s);
            d.is_finite() && d.abs() <= self.lateral_bound + EPSILON
        })
    }

    /// Feasibility of a longitudinal/lateral pair, including the lateral
    /// acceleration induced by the longitudinal speed profile.
    pub fn is_valid_pair(&self, lon: &Curve1d, lat: &Curve1d) -> bool {
        if !self.is_valid_longitudinal(lon) || !self.is_valid_lateral(lat) {
            return false;
        }
        let s0 = lon.evaluate(0, 0.0);
        let mut step = 0;
        loop {
            let t = step as f64 * self.time_resolution;
            if t > self.horizon {
                return true;
            }
            let s_dot = lon.evaluate(1, t);
            let d_pprime = lat.evaluate(2, lon.evaluate(0, t) - s0);
            if (d_pprime * s_dot * s_dot).abs() > self.a_lat_max + EPSILON {
                return false;
            }
            step += 1;
        }
    }

    /// Feasibility of a combined Cartesian trajectory: speed, longitudinal
    /// acceleration, centripetal acceleration and curvature at every sample.
    pub fn is_valid_trajectory(&self, trajectory: &DiscretizedTrajectory) -> bool {
        trajectory.iter().all(|point| {
            point.is_finite()
                && point.v >= -EPSILON
                && point.v <= self.v_max + EPSILON
                && point.a <= self.a_long_max + EPSILON
                && point.a >= -self.a_long_min - EPSILON
                && (point.v * point.v * point.kappa).abs() <= self.a_lat_max + EPSILON
                && point.kappa.abs() <= self.kappa_max + EPSILON
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{QuarticPolynomial, QuinticPolynomial};
    use crate::trajectory::TrajectoryPoint;

    fn checker() -> ConstraintChecker {
        ConstraintChecker::new(&PlannerConfig::default())
    }

    #[test]
    fn gentle_cruise_curve_is_valid() {
        // 10 m/s to 15 m/s over 5 s.
        let poly = QuarticPolynomial::fit(0.0, 10.0, 0.0, 15.0, 0.0, 5.0);
        let lon = Curve1d::cruise(poly, 15.0, 5.0);
        assert!(checker().is_valid_longitudinal(&lon));
    }

    #[test]
    fn harsh_braking_curve_is_rejected() {
        // 12 m/s to rest in 40 m over 2 s demands far more than the limits.
        let poly = QuinticPolynomial::fit(0.0, 12.0, 0.0, 40.0, 0.0, 0.0, 2.0);
        let lon = Curve1d::pinned(poly, 40.0, 0.0, 2.0);
        assert!(!checker().is_valid_longitudinal(&lon));
    }

    #[test]
    fn reversing_curve_is_rejected() {
        let poly = QuarticPolynomial::fit(0.0, 2.0, 0.0, -2.0, 0.0, 4.0);
        let lon = Curve1d::cruise(poly, -2.0, 4.0);
        assert!(!checker().is_valid_longitudinal(&lon));
    }

    #[test]
    fn fast_swerve_fails_the_pair_check() {
        let lon = Curve1d::cruise(QuarticPolynomial::fit(0.0, 15.0, 0.0, 15.0, 0.0, 8.0), 15.0, 8.0);
        // A full lane change over 20 m at 15 m/s exceeds the lateral limit...
        let swerve = Curve1d::pinned(
            QuinticPolynomial::fit(0.0, 0.0, 0.0, 3.5, 0.0, 0.0, 20.0),
            3.5,
            0.0,
            20.0,
        );
        assert!(!checker().is_valid_pair(&lon, &swerve));

        // ...but the same manoeuvre spread over 80 m is comfortable.
        let gentle = Curve1d::pinned(
            QuinticPolynomial::fit(0.0, 0.0, 0.0, 3.5, 0.0, 0.0, 80.0),
            3.5,
            0.0,
            80.0,
        );
        assert!(checker().is_valid_pair(&lon, &gentle));
    }

    #[test]
    fn trajectory_with_excess_curvature_is_rejected() {
        let mut points = Vec::new();
        for i in 0..10 {
            points.push(TrajectoryPoint {
                x: i as f64,
                y: 0.0,
                theta: 0.0,
                kappa: 0.4,
                v: 5.0,
                a: 0.0,
                relative_time: i as f64 * 0.1,
            });
        }
        let trajectory = DiscretizedTrajectory::from_points(points);
        assert!(!checker().is_valid_trajectory(&trajectory));
    }
}
