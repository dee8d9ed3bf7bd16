//! A lattice-based trajectory planner for autonomous ground vehicles.
//!
//! Given the vehicle's kinematic state, a reference line, obstacle
//! predictions and a high-level objective, the planner searches a lattice of
//! longitudinal and lateral motion primitives in the Frenet frame of the
//! reference line and commits the cheapest feasible combined trajectory for
//! the next planning horizon.

pub use collision::CollisionChecker;
pub use config::{CostWeights, DynamicLimits, EgoFootprint, LatticeConfig, PlannerConfig};
pub use constraint::ConstraintChecker;
pub use curve::{Curve1d, CurveForm, SampledCurve};
pub use decider::{Decider, FixedTarget, PlanningTarget};
pub use error::{PlanningError, PlanningResult};
pub use evaluator::{LateralSample, SpeedSample, TrajectoryEvaluator, TrajectoryPair};
pub use frame::{Frame, PlanningDebug, ReferenceLineInfo};
pub use generator::Trajectory1dGenerator;
pub use obstacle::{Obstacle, PredictedState};
pub use path_time::{ConditionKind, CriticalCondition, PathTimeNeighborhood};
pub use planner::{LatticePlanner, NoopTuningObserver, TuningObserver};
pub use reference_line::{ReferenceLine, ReferencePoint};
pub use trajectory::{DiscretizedTrajectory, TrajectoryPoint};

mod collision;
mod config;
mod constraint;
mod curve;
mod decider;
mod error;
mod evaluator;
mod frame;
mod generator;
pub mod math;
mod obstacle;
mod path_time;
mod planner;
mod reference_line;
mod trajectory;
mod util;
