//! Swept-volume collision test between the ego footprint and obstacle
//! predictions.

use crate::config::EgoFootprint;
use crate::math::{rot90, Point2d, Vector2d};
use crate::obstacle::Obstacle;
use crate::trajectory::DiscretizedTrajectory;
use crate::util::Interval;
use cgmath::prelude::*;
use smallvec::SmallVec;

/// Tests candidate trajectories against every obstacle's predicted
/// footprint, sampled on the trajectory's own time grid.
pub struct CollisionChecker<'a> {
    obstacles: &'a [Obstacle],
    footprint: EgoFootprint,
}

impl<'a> CollisionChecker<'a> {
    pub fn new(obstacles: &'a [Obstacle], footprint: EgoFootprint) -> Self {
        Self {
            obstacles,
            footprint,
        }
    }

    /// Returns true if the ego footprint transported along `trajectory`
    /// overlaps any obstacle's predicted footprint at any sample.
    /// Early-outs on the first hit.
    pub fn in_collision(&self, trajectory: &DiscretizedTrajectory) -> bool {
        for point in trajectory.iter() {
            let ego = self.ego_corners(point.x, point.y, point.theta);
            for obstacle in self.obstacles {
                let polygon = obstacle.polygon_at(point.relative_time);
                if polygons_overlap(&ego, &polygon) {
                    return true;
                }
            }
        }
        false
    }

    /// Corners of the ego rectangle when the rear axle sits at `(x, y)`
    /// with heading `theta`.
    fn ego_corners(&self, x: f64, y: f64, theta: f64) -> [Point2d; 4] {
        let (sin, cos) = theta.sin_cos();
        let centre = Point2d::new(
            x + self.footprint.rear_axle_to_center * cos,
            y + self.footprint.rear_axle_to_center * sin,
        );
        let half_len = 0.5 * self.footprint.length;
        let half_wid = 0.5 * self.footprint.width;
        let forward = Vector2d::new(cos, sin) * half_len;
        let left = Vector2d::new(-sin, cos) * half_wid;
        [
            centre + forward + left,
            centre - forward + left,
            centre - forward - left,
            centre + forward - left,
        ]
    }
}

/// Separating-axis overlap test between two convex polygons.
fn polygons_overlap(a: &[Point2d], b: &[Point2d]) -> bool {
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

/// True if any edge normal of `a` separates the two vertex sets.
fn has_separating_axis(a: &[Point2d], b: &[Point2d]) -> bool {
    let mut axes: SmallVec<[Vector2d; 4]> = SmallVec::new();
    for i in 0..a.len() {
        let edge = a[(i + 1) % a.len()] - a[i];
        axes.push(rot90(edge));
    }
    axes.iter().any(|axis| {
        let span_a = Interval::hull(a.iter().map(|p| p.to_vec().dot(*axis)));
        let span_b = Interval::hull(b.iter().map(|p| p.to_vec().dot(*axis)));
        !span_a.overlaps(&span_b)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trajectory::TrajectoryPoint;

    fn straight_trajectory(v: f64, count: usize) -> DiscretizedTrajectory {
        let points = (0..count)
            .map(|i| {
                let t = 0.1 * i as f64;
                TrajectoryPoint {
                    x: v * t,
                    y: 0.0,
                    theta: 0.0,
                    kappa: 0.0,
                    v,
                    a: 0.0,
                    relative_time: t,
                }
            })
            .collect();
        DiscretizedTrajectory::from_points(points)
    }

    #[test]
    fn hits_a_static_obstacle_on_the_path() {
        let obstacles = vec![Obstacle::static_rectangle(1, 20.0, 0.0, 0.0, 2.0, 2.0)];
        let checker = CollisionChecker::new(&obstacles, EgoFootprint::default());
        assert!(checker.in_collision(&straight_trajectory(10.0, 80)));
    }

    #[test]
    fn misses_an_offset_obstacle() {
        let obstacles = vec![Obstacle::static_rectangle(1, 20.0, 6.0, 0.0, 2.0, 2.0)];
        let checker = CollisionChecker::new(&obstacles, EgoFootprint::default());
        assert!(!checker.in_collision(&straight_trajectory(10.0, 80)));
    }

    #[test]
    fn crossing_obstacle_only_collides_when_times_align() {
        // An obstacle crossing x=20 sideways, clear of the path until t=2.
        let crossing = Obstacle::rectangle(
            1,
            2.0,
            2.0,
            vec![
                crate::obstacle::PredictedState {
                    relative_time: 0.0,
                    x: 20.0,
                    y: 30.0,
                    theta: -std::f64::consts::FRAC_PI_2,
                    v: 15.0,
                },
                crate::obstacle::PredictedState {
                    relative_time: 2.0,
                    x: 20.0,
                    y: 0.0,
                    theta: -std::f64::consts::FRAC_PI_2,
                    v: 15.0,
                },
            ],
        );
        let obstacles = vec![crossing];
        let checker = CollisionChecker::new(&obstacles, EgoFootprint::default());

        // At 10 m/s the ego reaches x=20 at t=2, exactly when the obstacle
        // arrives there.
        assert!(checker.in_collision(&straight_trajectory(10.0, 80)));
        // At 18 m/s the ego has long passed x=20 by the time it arrives.
        assert!(!checker.in_collision(&straight_trajectory(18.0, 80)));
    }

    #[test]
    fn separating_axis_handles_rotated_boxes() {
        let a = [
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 0.0),
            Point2d::new(2.0, 2.0),
            Point2d::new(0.0, 2.0),
        ];
        let shifted: Vec<Point2d> = a.iter().map(|p| Point2d::new(p.x + 3.0, p.y + 3.0)).collect();
        assert!(!polygons_overlap(&a, &shifted));

        let rotated: Vec<Point2d> = a
            .iter()
            .map(|p| {
                let (x, y) = (p.x - 1.0, p.y - 1.0);
                let c = std::f64::consts::FRAC_PI_4.cos();
                let s = std::f64::consts::FRAC_PI_4.sin();
                Point2d::new(1.0 + x * c - y * s, 1.0 + x * s + y * c)
            })
            .collect();
        assert!(polygons_overlap(&a, &rotated));
    }
}
