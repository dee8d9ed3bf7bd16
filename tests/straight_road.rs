//! Scenario tests on a straight reference line.

mod common;

use common::{init_point, straight_line};
use lattice_planner::{
    FixedTarget, Frame, LatticePlanner, PlannerConfig, PlanningTarget, ReferenceLineInfo,
};

/// Cruising from 10 m/s towards a 15 m/s target produces a monotone speed
/// profile glued to the centre line.
#[test]
fn cruise_on_straight_road() {
    let mut planner = LatticePlanner::new(
        PlannerConfig::default(),
        FixedTarget(PlanningTarget::Cruise { speed: 15.0 }),
    );
    let mut frame = Frame::new(vec![]);
    let mut info = ReferenceLineInfo::new(straight_line(100), 0.0);

    planner.plan(&init_point(10.0), &mut frame, &mut info).unwrap();
    assert!(info.is_drivable());

    let trajectory = info.trajectory().unwrap();
    assert!(!trajectory.is_empty());

    let mut previous_v = 10.0 - 1e-6;
    for point in trajectory.iter() {
        assert!(point.y.abs() < 1e-3);
        assert!(point.v >= previous_v - 1e-6);
        previous_v = point.v;
    }
    let last = trajectory.points().last().unwrap();
    assert!(last.v > 14.0);
    assert!(last.v <= 15.0 + 1e-6);
}

/// Stopping at the 40 m station brings the vehicle to rest there.
#[test]
fn stop_at_station() {
    let mut planner = LatticePlanner::new(
        PlannerConfig::default(),
        FixedTarget(PlanningTarget::Stop { s: 40.0 }),
    );
    let mut frame = Frame::new(vec![]);
    let mut info = ReferenceLineInfo::new(straight_line(100), 0.0);

    planner.plan(&init_point(12.0), &mut frame, &mut info).unwrap();

    let trajectory = info.trajectory().unwrap();
    let stopped = trajectory
        .iter()
        .find(|point| point.v < 0.15)
        .expect("vehicle never comes to rest");
    assert!(stopped.x >= 39.0 && stopped.x <= 41.0);

    let last = trajectory.points().last().unwrap();
    assert!(last.v < 0.15);
    assert!(last.x >= 39.0 && last.x <= 41.0);
}

/// The output lies on the fixed time grid and never leaves the line.
#[test]
fn time_grid_and_boundary() {
    let config = PlannerConfig::default();
    let resolution = config.trajectory_time_resolution;
    let max_len = (config.planned_trajectory_time / resolution).ceil() as usize;

    let mut planner = LatticePlanner::new(
        config,
        FixedTarget(PlanningTarget::Cruise { speed: 15.0 }),
    );
    let mut frame = Frame::new(vec![]);
    let mut info = ReferenceLineInfo::new(straight_line(100), 0.0);

    planner.plan(&init_point(10.0), &mut frame, &mut info).unwrap();

    let trajectory = info.trajectory().unwrap();
    assert!(trajectory.len() <= max_len);
    for (i, point) in trajectory.iter().enumerate() {
        assert!((point.relative_time - i as f64 * resolution).abs() < 1e-9);
        // Never beyond the last reference point.
        assert!(point.x <= 99.0 + 1e-9);
    }
}

/// Identical inputs plan identical trajectories, bit for bit.
#[test]
fn deterministic_replay() {
    let run = || {
        let mut planner = LatticePlanner::new(
            PlannerConfig::default(),
            FixedTarget(PlanningTarget::Cruise { speed: 15.0 }),
        );
        let mut frame = Frame::new(vec![]);
        let mut info = ReferenceLineInfo::new(straight_line(100), 0.0);
        planner.plan(&init_point(10.0), &mut frame, &mut info).unwrap();
        (info.cost(), info.trajectory().unwrap().clone())
    };

    let (cost_a, trajectory_a) = run();
    let (cost_b, trajectory_b) = run();

    assert_eq!(cost_a.to_bits(), cost_b.to_bits());
    assert_eq!(trajectory_a.len(), trajectory_b.len());
    for (a, b) in trajectory_a.iter().zip(trajectory_b.iter()) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.theta.to_bits(), b.theta.to_bits());
        assert_eq!(a.kappa.to_bits(), b.kappa.to_bits());
        assert_eq!(a.v.to_bits(), b.v.to_bits());
        assert_eq!(a.a.to_bits(), b.a.to_bits());
        assert_eq!(a.relative_time.to_bits(), b.relative_time.to_bits());
    }
}

/// The committed cost is the pair cost plus the reference line's priority.
#[test]
fn cost_includes_the_priority() {
    let mut planner = LatticePlanner::new(
        PlannerConfig::default(),
        FixedTarget(PlanningTarget::Cruise { speed: 15.0 }),
    );
    let mut frame = Frame::new(vec![]);
    let mut info = ReferenceLineInfo::new(straight_line(100), 5.0);

    planner.plan(&init_point(10.0), &mut frame, &mut info).unwrap();

    let chosen = info.debug().chosen_cost.unwrap();
    assert!((info.cost() - (5.0 + chosen)).abs() < 1e-12);
    assert!(info.debug().chosen_components.is_some());
}
