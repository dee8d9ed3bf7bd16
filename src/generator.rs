//! Generation of the 1-D trajectory bundles.

use crate::config::PlannerConfig;
use crate::curve::Curve1d;
use crate::decider::PlanningTarget;
use crate::math::{QuarticPolynomial, QuinticPolynomial};
use crate::path_time::PathTimeNeighborhood;
use itertools::iproduct;
use tracing::{debug, warn};

/// Shortest admissible end time for a longitudinal primitive, in s.
const MIN_END_TIME: f64 = 1.0;

/// Produces the longitudinal and lateral candidate bundles for one cycle.
pub struct Trajectory1dGenerator<'a> {
    init_s: [f64; 3],
    init_d: [f64; 3],
    neighborhood: &'a PathTimeNeighborhood,
    config: &'a PlannerConfig,
}

impl<'a> Trajectory1dGenerator<'a> {
    pub fn new(
        init_s: [f64; 3],
        init_d: [f64; 3],
        neighborhood: &'a PathTimeNeighborhood,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            init_s,
            init_d,
            neighborhood,
            config,
        }
    }

    /// Generates both bundles. The bundles are non-empty for any finite
    /// initial state; primitives whose fit produces non-finite coefficients
    /// are dropped.
    pub fn generate_bundles(&self, target: PlanningTarget) -> (Vec<Curve1d>, Vec<Curve1d>) {
        let lon = self.generate_longitudinal(target);
        let lat = self.generate_lateral();
        debug!(
            lon = lon.len(),
            lat = lat.len(),
            "generated trajectory bundles"
        );
        (lon, lat)
    }

    fn generate_longitudinal(&self, target: PlanningTarget) -> Vec<Curve1d> {
        let mut bundle = Vec::new();
        match target {
            PlanningTarget::Cruise { speed } => self.cruise_curves(speed, &mut bundle),
            PlanningTarget::Stop { s } => self.stop_curves(s, &mut bundle),
        }
        self.condition_curves(&mut bundle);
        bundle
    }

    /// Quartic primitives over the (end time × end velocity) grid; the end
    /// position is free.
    fn cruise_curves(&self, speed: f64, bundle: &mut Vec<Curve1d>) {
        let lattice = &self.config.lattice;
        let [s0, v0, a0] = self.init_s;
        let top = speed.min(self.config.limits.v_max);
        for (&t_end, step) in iproduct!(&lattice.time_samples, 0..=lattice.velocity_sample_count) {
            let v_end = top * step as f64 / lattice.velocity_sample_count as f64;
            let poly = QuarticPolynomial::fit(s0, v0, a0, v_end, 0.0, t_end);
            self.push_if_finite(Curve1d::cruise(poly, v_end, t_end), bundle);
        }
    }

    /// Quintic primitives pinned to rest at the stop station.
    fn stop_curves(&self, stop_s: f64, bundle: &mut Vec<Curve1d>) {
        let [s0, v0, a0] = self.init_s;
        let stop_s = stop_s.max(s0);
        for &t_end in &self.config.lattice.time_samples {
            let poly = QuinticPolynomial::fit(s0, v0, a0, stop_s, 0.0, 0.0, t_end);
            self.push_if_finite(Curve1d::pinned(poly, stop_s, 0.0, t_end), bundle);
        }
    }

    /// Quintic primitives pinned to the neighbourhood's critical conditions
    /// (follow, overtake, yield, stop seeds around blocking obstacles).
    fn condition_curves(&self, bundle: &mut Vec<Curve1d>) {
        let [s0, v0, a0] = self.init_s;
        for condition in self.neighborhood.critical_conditions() {
            if condition.s <= s0 {
                continue;
            }
            for &t_end in &self.config.lattice.time_samples {
                if t_end < condition.t.max(MIN_END_TIME) {
                    continue;
                }
                let poly =
                    QuinticPolynomial::fit(s0, v0, a0, condition.s, condition.v, 0.0, t_end);
                self.push_if_finite(Curve1d::pinned(poly, condition.s, condition.v, t_end), bundle);
            }
        }
    }

    /// Quintic offset primitives over the (arc length × end offset) grid,
    /// parameterised in arc length rather than time.
    fn generate_lateral(&self) -> Vec<Curve1d> {
        let lattice = &self.config.lattice;
        let [d0, dd0, ddd0] = self.init_d;
        let mut bundle = Vec::new();
        for (&s_end, &d_end) in iproduct!(&lattice.lateral_arc_lengths, &lattice.lateral_offsets) {
            let poly = QuinticPolynomial::fit(d0, dd0, ddd0, d_end, 0.0, 0.0, s_end);
            self.push_if_finite(Curve1d::pinned(poly, d_end, 0.0, s_end), &mut bundle);
        }
        bundle
    }

    fn push_if_finite(&self, curve: Curve1d, bundle: &mut Vec<Curve1d>) {
        if curve.is_finite() {
            bundle.push(curve);
        } else {
            warn!(
                form = curve.form_name(),
                target_param = curve.target_param(),
                "dropping primitive with non-finite fit"
            );
        }
    }
}
