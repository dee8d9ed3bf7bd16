//! Projection of obstacle predictions into the (s, t) space of the
//! reference line.

use crate::config::PlannerConfig;
use crate::obstacle::Obstacle;
use crate::reference_line::ReferenceLine;
use crate::util::Interval;
use smallvec::SmallVec;

/// The manoeuvre class of a critical condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionKind {
    Overtake,
    Follow,
    Yield,
    Stop,
}

/// An end condition seed extracted from the neighbourhood: reach arc length
/// `s` at time `t` with speed `v`.
#[derive(Clone, Copy, Debug)]
pub struct CriticalCondition {
    pub s: f64,
    pub t: f64,
    pub v: f64,
    pub kind: ConditionKind,
}

/// The occupancy of one obstacle at one instant of the time grid.
#[derive(Clone, Copy, Debug)]
struct BlockSample {
    t: f64,
    s: Interval,
    /// Lateral offset of the obstacle centre from the reference line.
    d: f64,
    /// Obstacle speed projected onto the reference line.
    v: f64,
}

/// One obstacle's occupancy over the planning horizon.
#[derive(Clone, Debug)]
struct PathTimeObstacle {
    id: u64,
    samples: Vec<BlockSample>,
}

/// The projection of every relevant obstacle prediction into (s, t)
/// coordinates. Built once per cycle and immutable afterwards; the decider
/// and the evaluator both read it.
#[derive(Clone, Debug)]
pub struct PathTimeNeighborhood {
    obstacles: Vec<PathTimeObstacle>,
    time_resolution: f64,
    on_path_lateral_threshold: f64,
    follow_buffer: f64,
    stop_margin: f64,
    ego_s: f64,
}

impl PathTimeNeighborhood {
    /// Projects each obstacle's predicted footprint onto the reference line
    /// over the planning horizon. Obstacles entirely outside the
    /// look-ahead/look-back window or the lateral corridor are discarded.
    pub fn new(
        obstacles: &[Obstacle],
        ego_s: f64,
        reference_line: &ReferenceLine,
        config: &PlannerConfig,
    ) -> Self {
        let lattice = &config.lattice;
        let window = Interval::new(ego_s - lattice.lookback, ego_s + lattice.lookahead);
        let dt = config.trajectory_time_resolution;
        let steps = (config.planned_trajectory_time / dt).ceil() as usize;

        let mut projected = Vec::new();
        for obstacle in obstacles {
            let mut samples = Vec::new();
            for step in 0..=steps {
                let t = step as f64 * dt;
                let Some(sample) = Self::project(obstacle, t, reference_line) else {
                    continue;
                };
                let in_window = sample.s.overlaps(&window) || window.contains(sample.s.min);
                if in_window && sample.d.abs() <= lattice.lateral_corridor {
                    samples.push(sample);
                }
            }
            if !samples.is_empty() {
                projected.push(PathTimeObstacle {
                    id: obstacle.id(),
                    samples,
                });
            }
        }

        Self {
            obstacles: projected,
            time_resolution: dt,
            on_path_lateral_threshold: lattice.on_path_lateral_threshold,
            follow_buffer: lattice.follow_buffer,
            stop_margin: lattice.stop_margin,
            ego_s,
        }
    }

    /// Projects one obstacle's polygon at time `t` to the reference line.
    fn project(obstacle: &Obstacle, t: f64, reference_line: &ReferenceLine) -> Option<BlockSample> {
        let pose = obstacle.pose_at(t);
        let centre = reference_line.match_by_position(pose.x, pose.y);

        let dx = pose.x - centre.x;
        let dy = pose.y - centre.y;
        let cross = centre.theta.cos() * dy - centre.theta.sin() * dx;
        let d = (dx * dx + dy * dy).sqrt().copysign(cross);

        let s = Interval::hull(
            obstacle
                .polygon_at(t)
                .iter()
                .map(|corner| reference_line.match_by_position(corner.x, corner.y).s),
        );
        if !(s.min.is_finite() && s.max.is_finite() && d.is_finite()) {
            return None;
        }

        // Speed along the path: the heading component tangent to the line.
        let v = pose.v * (pose.theta - centre.theta).cos();

        Some(BlockSample { t, s, d, v })
    }

    /// Returns true if any obstacle blocks arc length `s` at time `t`.
    pub fn is_blocked(&self, s: f64, t: f64) -> bool {
        self.longitudinal_clearance(s, t) < 0.0
    }

    /// The smallest longitudinal gap between `s` and any on-path obstacle at
    /// time `t`; negative when `s` lies inside an occupied interval.
    /// Returns infinity when nothing occupies the corridor at `t`.
    pub fn longitudinal_clearance(&self, s: f64, t: f64) -> f64 {
        let mut clearance = f64::INFINITY;
        for obstacle in &self.obstacles {
            let Some(sample) = Self::sample_at(obstacle, t, self.time_resolution) else {
                continue;
            };
            if sample.d.abs() > self.on_path_lateral_threshold {
                continue;
            }
            clearance = clearance.min(sample.s.distance(s));
        }
        clearance
    }

    /// Enumerates end-condition seeds for each obstacle blocking the path
    /// ahead of the ego: follow or stop short of it, or overtake past it.
    pub fn critical_conditions(&self) -> Vec<CriticalCondition> {
        let mut conditions = Vec::new();
        for obstacle in &self.obstacles {
            let seeds: SmallVec<[CriticalCondition; 4]> = self.conditions_for(obstacle);
            conditions.extend(seeds);
        }
        conditions
    }

    fn conditions_for(&self, obstacle: &PathTimeObstacle) -> SmallVec<[CriticalCondition; 4]> {
        let mut seeds = SmallVec::new();
        // The first instant the obstacle occupies the corridor ahead.
        let Some(first) = obstacle
            .samples
            .iter()
            .find(|sample| sample.d.abs() <= self.on_path_lateral_threshold && sample.s.max > self.ego_s)
        else {
            return seeds;
        };

        let follow_s = first.s.min - self.follow_buffer;
        if follow_s > self.ego_s {
            seeds.push(CriticalCondition {
                s: follow_s,
                t: first.t,
                v: first.v.max(0.0),
                kind: ConditionKind::Follow,
            });
            seeds.push(CriticalCondition {
                s: follow_s - self.stop_margin,
                t: first.t,
                v: 0.0,
                kind: if first.v.abs() < 0.1 {
                    ConditionKind::Stop
                } else {
                    ConditionKind::Yield
                },
            });
        }
        seeds.push(CriticalCondition {
            s: first.s.max + self.follow_buffer,
            t: first.t,
            v: first.v.max(0.0),
            kind: ConditionKind::Overtake,
        });
        seeds
    }

    /// The occupancy sample of `obstacle` nearest to time `t`, if the
    /// obstacle is projected around that instant.
    fn sample_at(obstacle: &PathTimeObstacle, t: f64, dt: f64) -> Option<BlockSample> {
        obstacle
            .samples
            .iter()
            .find(|sample| (sample.t - t).abs() <= 0.5 * dt)
            .copied()
    }

    /// Number of obstacles kept after windowing.
    pub fn num_obstacles(&self) -> usize {
        self.obstacles.len()
    }

    /// Identifiers of the obstacles kept after windowing.
    pub fn obstacle_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.obstacles.iter().map(|o| o.id)
    }
}
