//! The seam to the behavioural decider.

use crate::frame::{Frame, ReferenceLineInfo};
use crate::path_time::PathTimeNeighborhood;
use crate::trajectory::TrajectoryPoint;

/// The high-level objective for one planning cycle. Produced by the
/// behavioural decider; interpreted only by the bundle generator and the
/// trajectory evaluator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlanningTarget {
    /// Hold a target speed; the end station is free.
    Cruise { speed: f64 },
    /// Come to rest at the given arc length.
    Stop { s: f64 },
}

/// The behavioural decider consulted once per cycle. The planner builds the
/// path-time neighbourhood, lends it to the decider, and receives the
/// objective to plan against.
pub trait Decider {
    fn analyze(
        &mut self,
        frame: &Frame,
        reference_line_info: &ReferenceLineInfo,
        init_point: &TrajectoryPoint,
        init_s: [f64; 3],
        neighborhood: &PathTimeNeighborhood,
    ) -> PlanningTarget;
}

/// A decider that forwards a fixed objective every cycle.
#[derive(Clone, Copy, Debug)]
pub struct FixedTarget(pub PlanningTarget);

impl Decider for FixedTarget {
    fn analyze(
        &mut self,
        _frame: &Frame,
        _reference_line_info: &ReferenceLineInfo,
        _init_point: &TrajectoryPoint,
        _init_s: [f64; 3],
        _neighborhood: &PathTimeNeighborhood,
    ) -> PlanningTarget {
        self.0
    }
}
