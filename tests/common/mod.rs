//! Shared fixtures for the scenario tests.
#![allow(dead_code)]

use lattice_planner::{ReferenceLine, ReferencePoint, TrajectoryPoint};

/// A straight reference line along the x axis with 1 m spacing.
pub fn straight_line(points: usize) -> ReferenceLine {
    let points = (0..points)
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

/// A circular arc of the given radius sampled every `step` metres.
pub fn arc_line(radius: f64, points: usize, step: f64) -> ReferenceLine {
    let points = (0..points)
        .map(|i| {
            let s = i as f64 * step;
            let angle = s / radius;
            ReferencePoint {
                s,
                x: radius * angle.sin(),
                y: radius * (1.0 - angle.cos()),
                theta: angle,
                kappa: 1.0 / radius,
                dkappa: 0.0,
            }
        })
        .collect();
    ReferenceLine::new(points).unwrap()
}

/// An initial point at the origin heading along the x axis.
pub fn init_point(v: f64) -> TrajectoryPoint {
    TrajectoryPoint {
        x: 0.0,
        y: 0.0,
        theta: 0.0,
        kappa: 0.0,
        v,
        a: 0.0,
        relative_time: 0.0,
    }
}
