//! Error types for the planner.

use std::fmt;

/// Errors surfaced by the planning pipeline.
///
/// Per-pair numerical failures are not represented here: a pair whose fit or
/// conversion produces a non-finite value is dropped and counted as a
/// constraint failure, and only the exhaustion of every candidate escalates
/// to an error.
#[derive(Debug)]
pub enum PlanningError {
    /// The reference line is unusable: empty, fewer than two points,
    /// or its arc length is not strictly increasing.
    InvalidReferenceLine(String),
    /// The selection loop exhausted every trajectory pair without finding
    /// a feasible one.
    NoFeasibleTrajectory,
}

impl fmt::Display for PlanningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningError::InvalidReferenceLine(msg) => {
                write!(f, "invalid reference line: {}", msg)
            }
            PlanningError::NoFeasibleTrajectory => write!(f, "no feasible trajectories"),
        }
    }
}

impl std::error::Error for PlanningError {}

/// Result type alias for planning operations.
pub type PlanningResult<T> = Result<T, PlanningError>;
