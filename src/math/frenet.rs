//! Closed-form conversion between Cartesian and Frenet frames.
//!
//! Both directions require the curvature and its derivative at the matched
//! reference point; without `dkappa` the second-order longitudinal condition
//! is undefined. The functions are pure and raise nothing: if the caller
//! passes a point that is not the true projection, the results silently
//! degrade, and non-finite inputs propagate to non-finite outputs.

use super::normalize_angle;
use crate::reference_line::ReferencePoint;

/// The full kinematic state of the vehicle in the Cartesian frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianState {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub kappa: f64,
    pub v: f64,
    pub a: f64,
}

/// Converts a Cartesian state into Frenet conditions relative to `ref_point`,
/// which must be the projection of `(state.x, state.y)` onto the reference line.
///
/// Returns the longitudinal triple `(s, ds/dt, dds/dt)` and the lateral
/// triple `(d, dd/ds, ddd/ds)`; lateral derivatives are with respect to
/// arc length, not time.
pub fn cartesian_to_frenet(ref_point: &ReferencePoint, state: &CartesianState) -> ([f64; 3], [f64; 3]) {
    let dx = state.x - ref_point.x;
    let dy = state.y - ref_point.y;

    let cos_theta_r = ref_point.theta.cos();
    let sin_theta_r = ref_point.theta.sin();

    let cross = cos_theta_r * dy - sin_theta_r * dx;
    let d = (dx * dx + dy * dy).sqrt().copysign(cross);

    let delta_theta = normalize_angle(state.theta - ref_point.theta);
    let tan_delta = delta_theta.tan();
    let cos_delta = delta_theta.cos();

    let one_minus_kd = 1.0 - ref_point.kappa * d;
    let d_prime = one_minus_kd * tan_delta;

    let kappa_d_prime = ref_point.dkappa * d + ref_point.kappa * d_prime;
    let d_pprime = -kappa_d_prime * tan_delta
        + one_minus_kd / (cos_delta * cos_delta)
            * (state.kappa * one_minus_kd / cos_delta - ref_point.kappa);

    let s = ref_point.s;
    let s_dot = state.v * cos_delta / one_minus_kd;

    let delta_theta_prime = one_minus_kd / cos_delta * state.kappa - ref_point.kappa;
    let s_ddot = (state.a * cos_delta
        - s_dot * s_dot * (d_prime * delta_theta_prime - kappa_d_prime))
        / one_minus_kd;

    ([s, s_dot, s_ddot], [d, d_prime, d_pprime])
}

/// Converts Frenet conditions back into a Cartesian state. `ref_point` must
/// be the reference point matched at arc length `s_conditions[0]`.
pub fn frenet_to_cartesian(
    ref_point: &ReferencePoint,
    s_conditions: &[f64; 3],
    d_conditions: &[f64; 3],
) -> CartesianState {
    let [_, s_dot, s_ddot] = *s_conditions;
    let [d, d_prime, d_pprime] = *d_conditions;

    let cos_theta_r = ref_point.theta.cos();
    let sin_theta_r = ref_point.theta.sin();

    let x = ref_point.x - sin_theta_r * d;
    let y = ref_point.y + cos_theta_r * d;

    let one_minus_kd = 1.0 - ref_point.kappa * d;
    let tan_delta = d_prime / one_minus_kd;
    let delta_theta = d_prime.atan2(one_minus_kd);
    let cos_delta = delta_theta.cos();
    let theta = normalize_angle(delta_theta + ref_point.theta);

    let kappa_d_prime = ref_point.dkappa * d + ref_point.kappa * d_prime;
    let kappa = ((d_pprime + kappa_d_prime * tan_delta) * cos_delta * cos_delta / one_minus_kd
        + ref_point.kappa)
        * cos_delta
        / one_minus_kd;

    let d_dot = d_prime * s_dot;
    let v = (one_minus_kd * one_minus_kd * s_dot * s_dot + d_dot * d_dot).sqrt();

    let delta_theta_prime = one_minus_kd / cos_delta * kappa - ref_point.kappa;
    let a = s_ddot * one_minus_kd / cos_delta
        + s_dot * s_dot / cos_delta * (d_prime * delta_theta_prime - kappa_d_prime);

    CartesianState {
        x,
        y,
        theta,
        kappa,
        v,
        a,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ref_point(s: f64, x: f64, y: f64, theta: f64, kappa: f64, dkappa: f64) -> ReferencePoint {
        ReferencePoint {
            s,
            x,
            y,
            theta,
            kappa,
            dkappa,
        }
    }

    #[test]
    fn round_trip_on_straight_line() {
        let rp = ref_point(12.0, 12.0, 0.0, 0.0, 0.0, 0.0);
        let state = CartesianState {
            x: 12.0,
            y: 1.5,
            theta: 0.1,
            kappa: 0.01,
            v: 8.0,
            a: 0.4,
        };

        let (s_cond, d_cond) = cartesian_to_frenet(&rp, &state);
        let back = frenet_to_cartesian(&rp, &s_cond, &d_cond);

        assert_approx_eq!(back.x, state.x, 1e-6);
        assert_approx_eq!(back.y, state.y, 1e-6);
        assert_approx_eq!(back.theta, state.theta, 1e-6);
        assert_approx_eq!(back.kappa, state.kappa, 1e-6);
        assert_approx_eq!(back.v, state.v, 1e-6);
        assert_approx_eq!(back.a, state.a, 1e-6);
    }

    #[test]
    fn round_trip_on_arc() {
        // A point sitting slightly inside a 50 m radius arc.
        let theta_r: f64 = 0.3;
        let rp = ref_point(15.0, 49.0 * theta_r.sin(), 50.0 - 49.0 * theta_r.cos(), theta_r, 0.02, 0.0);
        let state = CartesianState {
            x: rp.x - theta_r.sin() * 0.5,
            y: rp.y + theta_r.cos() * 0.5,
            theta: theta_r + 0.05,
            kappa: 0.021,
            v: 10.0,
            a: -0.2,
        };

        let (s_cond, d_cond) = cartesian_to_frenet(&rp, &state);
        let back = frenet_to_cartesian(&rp, &s_cond, &d_cond);

        assert_approx_eq!(back.x, state.x, 1e-6);
        assert_approx_eq!(back.y, state.y, 1e-6);
        assert_approx_eq!(back.theta, state.theta, 1e-6);
        assert_approx_eq!(back.v, state.v, 1e-6);
        assert_approx_eq!(back.a, state.a, 1e-6);
    }

    #[test]
    fn on_centre_line_velocity_maps_to_s_dot() {
        let rp = ref_point(20.0, 20.0, 0.0, 0.0, 0.0, 0.0);
        let state = CartesianState {
            x: 20.0,
            y: 0.0,
            theta: 0.0,
            kappa: 0.0,
            v: 11.0,
            a: 0.7,
        };
        let (s_cond, d_cond) = cartesian_to_frenet(&rp, &state);
        assert_approx_eq!(s_cond[0], 20.0, 1e-12);
        assert_approx_eq!(s_cond[1], 11.0, 1e-12);
        assert_approx_eq!(s_cond[2], 0.7, 1e-12);
        assert_approx_eq!(d_cond[0], 0.0, 1e-12);
        assert_approx_eq!(d_cond[1], 0.0, 1e-12);
        assert_approx_eq!(d_cond[2], 0.0, 1e-12);
    }
}
