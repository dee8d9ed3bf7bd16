//! Per-cycle input and output containers.

use crate::obstacle::Obstacle;
use crate::reference_line::ReferenceLine;
use crate::trajectory::DiscretizedTrajectory;
use serde::{Deserialize, Serialize};

/// Everything the caller has materialised for one planning cycle. The
/// planner borrows it read-only; it owns nothing across cycles.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    obstacles: Vec<Obstacle>,
    /// Latest observed ego trajectory from localization; consumed only by
    /// the auto-tuning hook.
    observed_trajectory: Option<DiscretizedTrajectory>,
}

impl Frame {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self {
            obstacles,
            observed_trajectory: None,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Supplies the observed ego trajectory for auto-tuning.
    pub fn set_observed_trajectory(&mut self, trajectory: DiscretizedTrajectory) {
        self.observed_trajectory = Some(trajectory);
    }

    pub fn observed_trajectory(&self) -> Option<&DiscretizedTrajectory> {
        self.observed_trajectory.as_ref()
    }
}

/// Failure-class counters and chosen-pair details for one cycle, exposed
/// through the debug channel.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanningDebug {
    /// Pairs popped from the evaluator.
    pub pairs_examined: usize,
    /// Pairs rejected by the 1-D constraint check.
    pub constraint_failures: usize,
    /// Pairs rejected by the combined-trajectory constraint check.
    pub combined_constraint_failures: usize,
    /// Pairs rejected by the collision check.
    pub collision_failures: usize,
    /// Total cost of the chosen pair, excluding the priority cost.
    pub chosen_cost: Option<f64>,
    /// Component costs of the chosen pair: travel, jerk, obstacle, lateral.
    pub chosen_components: Option<[f64; 4]>,
}

/// The reference line under consideration plus the sinks the planner fills
/// when it commits to a trajectory.
#[derive(Clone, Debug)]
pub struct ReferenceLineInfo {
    reference_line: ReferenceLine,
    priority_cost: f64,
    trajectory: Option<DiscretizedTrajectory>,
    cost: f64,
    drivable: bool,
    debug: PlanningDebug,
}

impl ReferenceLineInfo {
    pub fn new(reference_line: ReferenceLine, priority_cost: f64) -> Self {
        Self {
            reference_line,
            priority_cost,
            trajectory: None,
            cost: 0.0,
            drivable: false,
            debug: Default::default(),
        }
    }

    pub fn reference_line(&self) -> &ReferenceLine {
        &self.reference_line
    }

    pub fn priority_cost(&self) -> f64 {
        self.priority_cost
    }

    pub fn set_trajectory(&mut self, trajectory: DiscretizedTrajectory) {
        self.trajectory = Some(trajectory);
    }

    pub fn trajectory(&self) -> Option<&DiscretizedTrajectory> {
        self.trajectory.as_ref()
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_drivable(&mut self, drivable: bool) {
        self.drivable = drivable;
    }

    pub fn is_drivable(&self) -> bool {
        self.drivable
    }

    pub fn debug(&self) -> &PlanningDebug {
        &self.debug
    }

    pub(crate) fn debug_mut(&mut self) -> &mut PlanningDebug {
        &mut self.debug
    }
}
