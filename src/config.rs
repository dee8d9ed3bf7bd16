//! Planner configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration of the lattice planner. All values are externally
/// supplied; the defaults describe a passenger vehicle on an urban road.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Length of the planning horizon in s.
    pub planned_trajectory_time: f64,
    /// Sampling step of the output trajectory in s.
    pub trajectory_time_resolution: f64,
    /// End-condition grids of the lattice.
    pub lattice: LatticeConfig,
    /// Kinematic and dynamic feasibility limits.
    pub limits: DynamicLimits,
    /// Weights of the cost components.
    pub weights: CostWeights,
    /// Ego vehicle footprint used for collision checking.
    pub footprint: EgoFootprint,
    /// Reject single-axis infeasible curves before pairing.
    pub enable_constraint_prefilter: bool,
    /// Feed the observed ego trajectory back through the cost functional.
    pub enable_auto_tuning: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            planned_trajectory_time: 8.0,
            trajectory_time_resolution: 0.1,
            lattice: Default::default(),
            limits: Default::default(),
            weights: Default::default(),
            footprint: Default::default(),
            enable_constraint_prefilter: true,
            enable_auto_tuning: false,
        }
    }
}

/// Grid parameters spanning the lattice of end conditions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LatticeConfig {
    /// End times of the longitudinal primitives in s.
    pub time_samples: Vec<f64>,
    /// Number of end-velocity samples between zero and the cruise speed.
    pub velocity_sample_count: usize,
    /// End offsets of the lateral primitives in m.
    pub lateral_offsets: Vec<f64>,
    /// Arc lengths over which the lateral manoeuvres complete, in m.
    pub lateral_arc_lengths: Vec<f64>,
    /// How far ahead of the ego obstacles are projected, in m.
    pub lookahead: f64,
    /// How far behind the ego obstacles are projected, in m.
    pub lookback: f64,
    /// Obstacles beyond this lateral offset from the reference line are
    /// discarded, in m.
    pub lateral_corridor: f64,
    /// Lateral offset below which an obstacle blocks the path, in m.
    pub on_path_lateral_threshold: f64,
    /// Longitudinal gap kept when seeding follow/overtake end conditions, in m.
    pub follow_buffer: f64,
    /// Extra margin when seeding a stop ahead of a blocking obstacle, in m.
    pub stop_margin: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            time_samples: vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            velocity_sample_count: 6,
            lateral_offsets: vec![-3.5, -1.75, 0.0, 1.75, 3.5],
            lateral_arc_lengths: vec![20.0, 40.0, 80.0],
            lookahead: 120.0,
            lookback: 20.0,
            lateral_corridor: 8.0,
            on_path_lateral_threshold: 2.5,
            follow_buffer: 7.5,
            stop_margin: 2.0,
        }
    }
}

/// Feasibility limits enforced by the constraint checker.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DynamicLimits {
    /// Maximum speed in m/s.
    pub v_max: f64,
    /// Maximum forward acceleration in m/s².
    pub a_long_max: f64,
    /// Maximum braking deceleration (magnitude) in m/s².
    pub a_long_min: f64,
    /// Maximum lateral acceleration in m/s².
    pub a_lat_max: f64,
    /// Maximum longitudinal jerk (magnitude) in m/s³.
    pub jerk_max: f64,
    /// Maximum curvature in 1/m.
    pub kappa_max: f64,
    /// Maximum lateral offset a candidate may take from the reference
    /// line, in m.
    pub lateral_offset_max: f64,
}

impl Default for DynamicLimits {
    fn default() -> Self {
        Self {
            v_max: 30.0,
            a_long_max: 3.0,
            a_long_min: 6.0,
            a_lat_max: 4.0,
            jerk_max: 10.0,
            kappa_max: 0.25,
            lateral_offset_max: 4.5,
        }
    }
}

/// Nonnegative weights of the cost components, applied in the fixed order
/// travel, jerk, obstacle, lateral.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CostWeights {
    pub travel: f64,
    pub jerk: f64,
    pub obstacle: f64,
    pub lateral: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            travel: 1.0,
            jerk: 0.05,
            obstacle: 1.0,
            lateral: 2.0,
        }
    }
}

/// The oriented rectangle swept along candidate trajectories.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EgoFootprint {
    /// Overall vehicle length in m.
    pub length: f64,
    /// Overall vehicle width in m.
    pub width: f64,
    /// Distance from the rear axle (the trajectory reference point) to the
    /// geometric centre, in m.
    pub rear_axle_to_center: f64,
}

impl Default for EgoFootprint {
    fn default() -> Self {
        Self {
            length: 4.8,
            width: 1.9,
            rear_axle_to_center: 1.4,
        }
    }
}
