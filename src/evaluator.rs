//! Ranking of longitudinal/lateral pairs by cost.

use crate::config::PlannerConfig;
use crate::constraint::ConstraintChecker;
use crate::curve::{Curve1d, SampledCurve};
use crate::decider::PlanningTarget;
use crate::path_time::PathTimeNeighborhood;
use itertools::iproduct;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

/// Decay scale of the obstacle proximity penalty, in m.
const OBSTACLE_SIGMA: f64 = 5.0;

/// Penalty per sample for occupying the same (s, t) cell as an obstacle.
const OCCUPANCY_PENALTY: f64 = 1000.0;

/// Weighting of overshooting a stop target relative to undershooting it.
const STOP_OVERSHOOT_WEIGHT: f64 = 10.0;

/// Sampling step along lateral curves, in m.
const LATERAL_SAMPLE_STEP: f64 = 1.0;

/// One longitudinal/lateral pair popped from the ranking.
#[derive(Clone, Copy, Debug)]
pub struct TrajectoryPair<'a> {
    pub lon: &'a Curve1d,
    pub lat: &'a Curve1d,
    pub lon_index: usize,
    pub lat_index: usize,
    /// Weighted total cost.
    pub cost: f64,
    /// Unweighted component costs: travel, jerk, obstacle, lateral.
    pub components: [f64; 4],
}

/// An observed longitudinal sample for offline evaluation.
#[derive(Clone, Copy, Debug)]
pub struct SpeedSample {
    pub t: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

/// An observed lateral sample for offline evaluation.
#[derive(Clone, Copy, Debug)]
pub struct LateralSample {
    pub s: f64,
    pub d: f64,
    pub d_prime: f64,
    pub d_pprime: f64,
}

#[derive(Debug)]
struct RankedPair {
    cost: f64,
    components: [f64; 4],
    lon_index: usize,
    lat_index: usize,
}

impl PartialEq for RankedPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedPair {}

impl PartialOrd for RankedPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedPair {
    // Inverted so the max-heap pops the cheapest pair; ties resolve to the
    // lexicographically smallest (lon, lat) index for determinism.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.lon_index.cmp(&self.lon_index))
            .then_with(|| other.lat_index.cmp(&self.lat_index))
    }
}

/// Evaluates the Cartesian product of the two bundles and yields pairs in
/// ascending cost order through a lazy binary heap.
pub struct TrajectoryEvaluator<'a> {
    lon_bundle: &'a [Curve1d],
    lat_bundle: &'a [Curve1d],
    heap: BinaryHeap<RankedPair>,
    costing: Costing<'a>,
}

/// The cost functional shared by pair ranking and the offline evaluation of
/// observed trajectories.
#[derive(Clone, Copy)]
struct Costing<'a> {
    target: PlanningTarget,
    neighborhood: &'a PathTimeNeighborhood,
    horizon: f64,
    time_resolution: f64,
    weights: [f64; 4],
}

impl<'a> TrajectoryEvaluator<'a> {
    /// Costs every pair of the two bundles. Curves failing the single-axis
    /// feasibility check are excluded up front when `prefilter` is set;
    /// pairs with a non-finite cost are dropped.
    pub fn new(
        target: PlanningTarget,
        lon_bundle: &'a [Curve1d],
        lat_bundle: &'a [Curve1d],
        prefilter: bool,
        neighborhood: &'a PathTimeNeighborhood,
        checker: &ConstraintChecker,
        config: &PlannerConfig,
    ) -> Self {
        let costing = Costing {
            target,
            neighborhood,
            horizon: config.planned_trajectory_time,
            time_resolution: config.trajectory_time_resolution,
            weights: [
                config.weights.travel,
                config.weights.jerk,
                config.weights.obstacle,
                config.weights.lateral,
            ],
        };

        let keep = |valid: bool| !prefilter || valid;
        let lon_indices: Vec<usize> = (0..lon_bundle.len())
            .filter(|&i| keep(checker.is_valid_longitudinal(&lon_bundle[i])))
            .collect();
        let lat_indices: Vec<usize> = (0..lat_bundle.len())
            .filter(|&i| keep(checker.is_valid_lateral(&lat_bundle[i])))
            .collect();

        let mut heap = BinaryHeap::with_capacity(lon_indices.len() * lat_indices.len());
        for (&lon_index, &lat_index) in iproduct!(&lon_indices, &lat_indices) {
            let components = costing.components(&lon_bundle[lon_index], &lat_bundle[lat_index]);
            let cost = costing.total(&components);
            if !cost.is_finite() {
                trace!(lon_index, lat_index, "dropping pair with non-finite cost");
                continue;
            }
            heap.push(RankedPair {
                cost,
                components,
                lon_index,
                lat_index,
            });
        }

        Self {
            lon_bundle,
            lat_bundle,
            heap,
            costing,
        }
    }

    /// Number of ranked pairs not yet consumed.
    pub fn num_pairs(&self) -> usize {
        self.heap.len()
    }

    /// Returns true while pairs remain.
    pub fn has_more(&self) -> bool {
        !self.heap.is_empty()
    }

    /// The cost of the cheapest remaining pair.
    pub fn peek_cost(&self) -> Option<f64> {
        self.heap.peek().map(|pair| pair.cost)
    }

    /// The component costs of the cheapest remaining pair.
    pub fn peek_components(&self) -> Option<[f64; 4]> {
        self.heap.peek().map(|pair| pair.components)
    }

    /// Pops the cheapest remaining pair.
    pub fn pop_next(&mut self) -> Option<TrajectoryPair<'a>> {
        self.heap.pop().map(|pair| TrajectoryPair {
            lon: &self.lon_bundle[pair.lon_index],
            lat: &self.lat_bundle[pair.lat_index],
            lon_index: pair.lon_index,
            lat_index: pair.lat_index,
            cost: pair.cost,
            components: pair.components,
        })
    }

    /// Evaluates discrete observed samples through the same cost functional
    /// as the analytic candidates; input to the offline tuning hook.
    pub fn evaluate_per_lonlat(
        &self,
        target: PlanningTarget,
        lon_samples: &[SpeedSample],
        lat_samples: &[LateralSample],
    ) -> Option<[f64; 4]> {
        if lon_samples.len() < 2 || lat_samples.len() < 2 {
            return None;
        }
        let t0 = lon_samples[0].t;
        let lon = Curve1d::sampled(SampledCurve::new(
            lon_samples
                .iter()
                .map(|p| (p.t - t0, [p.s, p.v, p.a]))
                .collect(),
        ));
        let s0 = lat_samples[0].s;
        let lat = Curve1d::sampled(SampledCurve::new(
            lat_samples
                .iter()
                .map(|p| (p.s - s0, [p.d, p.d_prime, p.d_pprime]))
                .collect(),
        ));
        let costing = Costing {
            target,
            ..self.costing
        };
        Some(costing.components(&lon, &lat))
    }
}

impl Costing<'_> {
    fn total(&self, components: &[f64; 4]) -> f64 {
        components
            .iter()
            .zip(self.weights.iter())
            .map(|(c, w)| c * w)
            .sum()
    }

    /// Unweighted component costs in the fixed order travel, jerk,
    /// obstacle, lateral.
    fn components(&self, lon: &Curve1d, lat: &Curve1d) -> [f64; 4] {
        [
            self.travel_cost(lon),
            self.jerk_cost(lon, lat),
            self.obstacle_cost(lon),
            self.lateral_cost(lat),
        ]
    }

    /// Deviation of the longitudinal profile from the target objective.
    fn travel_cost(&self, lon: &Curve1d) -> f64 {
        match self.target {
            PlanningTarget::Cruise { speed } => {
                let mut sum = 0.0;
                let mut count = 0;
                self.each_time(|t| {
                    let dv = lon.evaluate(1, t) - speed;
                    sum += dv * dv;
                    count += 1;
                });
                sum / count.max(1) as f64
            }
            PlanningTarget::Stop { s } => {
                let s_end = lon.evaluate(0, self.horizon);
                let v_end = lon.evaluate(1, self.horizon);
                let error = s - s_end;
                let station = if error >= 0.0 {
                    error
                } else {
                    STOP_OVERSHOOT_WEIGHT * -error
                };
                station + v_end.abs()
            }
        }
    }

    /// Mean squared jerk along both curves.
    fn jerk_cost(&self, lon: &Curve1d, lat: &Curve1d) -> f64 {
        let mut lon_sum = 0.0;
        let mut count = 0;
        self.each_time(|t| {
            let jerk = lon.evaluate(3, t);
            lon_sum += jerk * jerk;
            count += 1;
        });

        let steps = (lat.param_length() / LATERAL_SAMPLE_STEP).ceil().max(1.0) as usize;
        let lat_sum: f64 = (0..=steps)
            .map(|i| {
                let s = (i as f64 * LATERAL_SAMPLE_STEP).min(lat.param_length());
                let jerk = lat.evaluate(3, s);
                jerk * jerk
            })
            .sum();

        lon_sum / count.max(1) as f64 + lat_sum / (steps + 1) as f64
    }

    /// Penalty accumulated from occupancy queries on the neighbourhood.
    fn obstacle_cost(&self, lon: &Curve1d) -> f64 {
        let mut sum = 0.0;
        let mut count = 0;
        self.each_time(|t| {
            let s = lon.evaluate(0, t);
            let clearance = self.neighborhood.longitudinal_clearance(s, t);
            sum += if clearance < 0.0 {
                OCCUPANCY_PENALTY
            } else {
                (-clearance / OBSTACLE_SIGMA).exp()
            };
            count += 1;
        });
        sum / count.max(1) as f64
    }

    /// Mean squared lateral offset plus the squared end offset.
    fn lateral_cost(&self, lat: &Curve1d) -> f64 {
        let steps = (lat.param_length() / LATERAL_SAMPLE_STEP).ceil().max(1.0) as usize;
        let sum: f64 = (0..=steps)
            .map(|i| {
                let s = (i as f64 * LATERAL_SAMPLE_STEP).min(lat.param_length());
                let d = lat.evaluate(0, s);
                d * d
            })
            .sum();
        let d_end = lat.evaluate(0, lat.param_length());
        sum / (steps + 1) as f64 + d_end * d_end
    }

    fn each_time(&self, mut f: impl FnMut(f64)) {
        let mut step = 0;
        loop {
            let t = step as f64 * self.time_resolution;
            if t > self.horizon {
                return;
            }
            f(t);
            step += 1;
        }
    }
}
