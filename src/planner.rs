//! The lattice planner orchestrator.

use crate::collision::CollisionChecker;
use crate::config::PlannerConfig;
use crate::constraint::ConstraintChecker;
use crate::curve::Curve1d;
use crate::decider::{Decider, PlanningTarget};
use crate::error::{PlanningError, PlanningResult};
use crate::evaluator::{LateralSample, SpeedSample, TrajectoryEvaluator};
use crate::frame::{Frame, ReferenceLineInfo};
use crate::generator::Trajectory1dGenerator;
use crate::math::{cartesian_to_frenet, frenet_to_cartesian, CartesianState};
use crate::path_time::PathTimeNeighborhood;
use crate::reference_line::ReferenceLine;
use crate::trajectory::{DiscretizedTrajectory, TrajectoryPoint};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Observer of the cost components of the chosen pair and of the observed
/// ego trajectory, for offline tuning of the cost weights. The default sink
/// discards everything.
pub trait TuningObserver {
    fn emit(&mut self, chosen: &[f64; 4], observed: &[f64; 4]);
}

/// A [`TuningObserver`] that discards its input.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTuningObserver;

impl TuningObserver for NoopTuningObserver {
    fn emit(&mut self, _chosen: &[f64; 4], _observed: &[f64; 4]) {}
}

/// Plans a trajectory along one reference line per cycle by searching a
/// lattice of longitudinal and lateral motion primitives.
pub struct LatticePlanner<D> {
    config: PlannerConfig,
    decider: D,
    tuning_observer: Box<dyn TuningObserver>,
    num_planning_cycles: usize,
    num_planning_succeeded_cycles: usize,
}

impl<D: Decider> LatticePlanner<D> {
    pub fn new(config: PlannerConfig, decider: D) -> Self {
        Self {
            config,
            decider,
            tuning_observer: Box::new(NoopTuningObserver),
            num_planning_cycles: 0,
            num_planning_succeeded_cycles: 0,
        }
    }

    /// Replaces the no-op tuning sink.
    pub fn with_tuning_observer(mut self, observer: Box<dyn TuningObserver>) -> Self {
        self.tuning_observer = observer;
        self
    }

    /// Planning cycles attempted by this instance.
    pub fn num_planning_cycles(&self) -> usize {
        self.num_planning_cycles
    }

    /// Planning cycles that committed a trajectory.
    pub fn num_planning_succeeded_cycles(&self) -> usize {
        self.num_planning_succeeded_cycles
    }

    /// Plans one cycle: transforms the initial state into the Frenet frame,
    /// consults the decider, generates and ranks the primitive bundles, and
    /// commits the cheapest feasible combined trajectory to
    /// `reference_line_info`.
    pub fn plan(
        &mut self,
        init_point: &TrajectoryPoint,
        frame: &mut Frame,
        reference_line_info: &mut ReferenceLineInfo,
    ) -> PlanningResult<()> {
        let start = Instant::now();
        info!(
            cycles = self.num_planning_cycles,
            succeeded = self.num_planning_succeeded_cycles,
            "planning cycle started"
        );
        self.num_planning_cycles += 1;

        // Match the initial point onto the reference line and convert the
        // state into the Frenet frame.
        let reference_line = reference_line_info.reference_line();
        let matched = reference_line.match_by_position(init_point.x, init_point.y);
        let (init_s, init_d) = cartesian_to_frenet(
            &matched,
            &CartesianState {
                x: init_point.x,
                y: init_point.y,
                theta: init_point.theta,
                kappa: init_point.kappa,
                v: init_point.v,
                a: init_point.a,
            },
        );
        let phase_frenet = start.elapsed();

        // Project the obstacle predictions into (s, t) space and let the
        // decider pick the objective against them.
        let neighborhood =
            PathTimeNeighborhood::new(frame.obstacles(), init_s[0], reference_line, &self.config);
        let target = self.decider.analyze(
            frame,
            reference_line_info,
            init_point,
            init_s,
            &neighborhood,
        );
        let phase_decision = start.elapsed();

        // Generate the 1-D bundles and rank their Cartesian product.
        let generator = Trajectory1dGenerator::new(init_s, init_d, &neighborhood, &self.config);
        let (lon_bundle, lat_bundle) = generator.generate_bundles(target);
        let phase_generation = start.elapsed();

        let checker = ConstraintChecker::new(&self.config);
        let mut evaluator = TrajectoryEvaluator::new(
            target,
            &lon_bundle,
            &lat_bundle,
            self.config.enable_constraint_prefilter,
            &neighborhood,
            &checker,
            &self.config,
        );
        debug!(
            pairs = evaluator.num_pairs(),
            lon = lon_bundle.len(),
            lat = lat_bundle.len(),
            obstacles = neighborhood.num_obstacles(),
            "evaluator constructed"
        );
        let phase_evaluation = start.elapsed();

        let collision_checker = CollisionChecker::new(frame.obstacles(), self.config.footprint);

        // Consume pairs in ascending cost order; the first one that survives
        // every check is the cheapest feasible trajectory.
        let mut chosen = false;
        while let Some(pair) = evaluator.pop_next() {
            reference_line_info.debug_mut().pairs_examined += 1;

            if !checker.is_valid_pair(pair.lon, pair.lat) {
                reference_line_info.debug_mut().constraint_failures += 1;
                continue;
            }

            let combined = combine_trajectory(
                reference_line_info.reference_line(),
                pair.lon,
                pair.lat,
                init_point.relative_time,
                &self.config,
            );

            if !checker.is_valid_trajectory(&combined) {
                reference_line_info.debug_mut().combined_constraint_failures += 1;
                continue;
            }

            if collision_checker.in_collision(&combined) {
                reference_line_info.debug_mut().collision_failures += 1;
                continue;
            }

            info!(
                start_s = init_s[0],
                start_v = init_s[1],
                end_form = pair.lon.form_name(),
                end_s = ?pair.lon.target_position(),
                end_v = pair.lon.target_velocity(),
                end_t = pair.lon.target_param(),
                travel = pair.components[0],
                jerk = pair.components[1],
                obstacle = pair.components[2],
                lateral = pair.components[3],
                priority = reference_line_info.priority_cost(),
                total = pair.cost,
                "trajectory selected"
            );

            reference_line_info.set_trajectory(combined);
            reference_line_info.set_cost(reference_line_info.priority_cost() + pair.cost);
            reference_line_info.set_drivable(true);
            let cycle_debug = reference_line_info.debug_mut();
            cycle_debug.chosen_cost = Some(pair.cost);
            cycle_debug.chosen_components = Some(pair.components);

            if self.config.enable_auto_tuning {
                self.emit_tuning_sample(frame, reference_line_info, target, &evaluator, &pair.components);
            }

            chosen = true;
            break;
        }

        let cycle_debug = reference_line_info.debug();
        info!(
            constraint = cycle_debug.constraint_failures,
            combined = cycle_debug.combined_constraint_failures,
            collision = cycle_debug.collision_failures,
            frenet_ms = phase_frenet.as_secs_f64() * 1e3,
            decision_ms = (phase_decision - phase_frenet).as_secs_f64() * 1e3,
            generation_ms = (phase_generation - phase_decision).as_secs_f64() * 1e3,
            evaluation_ms = (phase_evaluation - phase_generation).as_secs_f64() * 1e3,
            total_ms = start.elapsed().as_secs_f64() * 1e3,
            "planning cycle finished"
        );

        if chosen {
            self.num_planning_succeeded_cycles += 1;
            Ok(())
        } else {
            warn!("no feasible trajectory among the examined pairs");
            Err(PlanningError::NoFeasibleTrajectory)
        }
    }

    /// Feeds the observed ego trajectory through the cost functional and
    /// hands both component vectors to the tuning observer.
    fn emit_tuning_sample(
        &mut self,
        frame: &Frame,
        reference_line_info: &ReferenceLineInfo,
        target: PlanningTarget,
        evaluator: &TrajectoryEvaluator<'_>,
        chosen: &[f64; 4],
    ) {
        let Some(observed) = frame.observed_trajectory() else {
            debug!("auto tuning skipped: no localization trajectory");
            return;
        };
        let Some((lon_samples, lat_samples)) =
            map_future_trajectory_to_sl(observed, reference_line_info)
        else {
            debug!("auto tuning skipped: no mapping from future trajectory to lon-lat");
            return;
        };
        if let Some(components) = evaluator.evaluate_per_lonlat(target, &lon_samples, &lat_samples)
        {
            self.tuning_observer.emit(chosen, &components);
        }
    }
}

/// Maps an observed Cartesian trajectory to longitudinal and lateral sample
/// sequences on the reference line.
// TODO: project the observed points through the matcher and the Frenet
// converter; until then auto-tuning never fires.
fn map_future_trajectory_to_sl(
    _future_trajectory: &DiscretizedTrajectory,
    _reference_line_info: &ReferenceLineInfo,
) -> Option<(Vec<SpeedSample>, Vec<LateralSample>)> {
    None
}

/// Combines a longitudinal curve over time and a lateral curve over arc
/// length into a Cartesian trajectory sampled on the output time grid.
/// Sampling stops when the longitudinal position leaves the reference line.
pub(crate) fn combine_trajectory(
    reference_line: &ReferenceLine,
    lon: &Curve1d,
    lat: &Curve1d,
    init_relative_time: f64,
    config: &PlannerConfig,
) -> DiscretizedTrajectory {
    let mut combined = DiscretizedTrajectory::new();
    let s0 = lon.evaluate(0, 0.0);
    let s_max = reference_line.back().s;

    let mut step = 0;
    loop {
        let t_param = step as f64 * config.trajectory_time_resolution;
        if t_param >= config.planned_trajectory_time {
            break;
        }
        let s = lon.evaluate(0, t_param);
        if s > s_max {
            break;
        }
        let s_conditions = [s, lon.evaluate(1, t_param), lon.evaluate(2, t_param)];
        let s_param = s - s0;
        let d_conditions = [
            lat.evaluate(0, s_param),
            lat.evaluate(1, s_param),
            lat.evaluate(2, s_param),
        ];

        let matched = reference_line.match_by_arc_length(s);
        let state = frenet_to_cartesian(&matched, &s_conditions, &d_conditions);
        combined.push(TrajectoryPoint::from_state(state, t_param + init_relative_time));
        step += 1;
    }
    combined
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::QuarticPolynomial;
    use crate::reference_line::ReferencePoint;

    fn straight_line(n: usize) -> ReferenceLine {
        let points = (0..n)
            .map(|i| ReferencePoint {
                s: i as f64,
                x: i as f64,
                y: 0.0,
                theta: 0.0,
                kappa: 0.0,
                dkappa: 0.0,
            })
            .collect();
        ReferenceLine::new(points).unwrap()
    }

    #[test]
    fn combination_samples_the_time_grid() {
        let config = PlannerConfig::default();
        let line = straight_line(200);
        let lon = Curve1d::cruise(QuarticPolynomial::fit(0.0, 10.0, 0.0, 10.0, 0.0, 8.0), 10.0, 8.0);
        let lat = Curve1d::pinned(
            crate::math::QuinticPolynomial::fit(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0),
            0.0,
            0.0,
            40.0,
        );

        let combined = combine_trajectory(&line, &lon, &lat, 0.2, &config);
        assert_eq!(combined.len(), 80);
        for (i, point) in combined.iter().enumerate() {
            let expected = 0.2 + i as f64 * config.trajectory_time_resolution;
            assert!((point.relative_time - expected).abs() < 1e-9);
            assert!(point.y.abs() < 1e-9);
        }
    }

    #[test]
    fn combination_stops_at_the_end_of_the_line() {
        let config = PlannerConfig::default();
        let line = straight_line(40);
        let lon = Curve1d::cruise(QuarticPolynomial::fit(0.0, 10.0, 0.0, 10.0, 0.0, 8.0), 10.0, 8.0);
        let lat = Curve1d::pinned(
            crate::math::QuinticPolynomial::fit(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0),
            0.0,
            0.0,
            40.0,
        );

        let combined = combine_trajectory(&line, &lon, &lat, 0.0, &config);
        assert!(!combined.is_empty());
        // 39 m of line at 10 m/s is reached before the 8 s horizon.
        assert!(combined.len() < 80);
        for point in combined.iter() {
            assert!(point.x <= 39.0 + 1e-9);
        }
    }
}
