//! Perceived obstacles and their predicted motion.

use crate::math::Point2d;

/// A predicted pose of an obstacle at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct PredictedState {
    /// Time relative to the start of the planning cycle in s.
    pub relative_time: f64,
    pub x: f64,
    pub y: f64,
    /// Heading in rad.
    pub theta: f64,
    /// Speed in m/s.
    pub v: f64,
}

/// A perceived obstacle with a predicted trajectory.
#[derive(Clone, Debug)]
pub struct Obstacle {
    id: u64,
    /// Footprint polygon in the obstacle's body frame, counter-clockwise.
    polygon: Vec<Point2d>,
    /// Predicted poses ordered by time; a single entry models a static
    /// obstacle.
    prediction: Vec<PredictedState>,
}

impl Obstacle {
    /// Creates an obstacle from a body-frame footprint and a non-empty
    /// prediction ordered by time.
    pub fn new(id: u64, polygon: Vec<Point2d>, prediction: Vec<PredictedState>) -> Self {
        debug_assert!(!prediction.is_empty());
        Self {
            id,
            polygon,
            prediction,
        }
    }

    /// Convenience constructor for a rectangular footprint.
    pub fn rectangle(id: u64, length: f64, width: f64, prediction: Vec<PredictedState>) -> Self {
        let (hl, hw) = (0.5 * length, 0.5 * width);
        let polygon = vec![
            Point2d::new(hl, hw),
            Point2d::new(-hl, hw),
            Point2d::new(-hl, -hw),
            Point2d::new(hl, -hw),
        ];
        Self::new(id, polygon, prediction)
    }

    /// A stationary rectangular obstacle.
    pub fn static_rectangle(id: u64, x: f64, y: f64, theta: f64, length: f64, width: f64) -> Self {
        Self::rectangle(
            id,
            length,
            width,
            vec![PredictedState {
                relative_time: 0.0,
                x,
                y,
                theta,
                v: 0.0,
            }],
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Interpolates the predicted pose at `relative_time`, clamping to the
    /// ends of the prediction.
    pub fn pose_at(&self, relative_time: f64) -> PredictedState {
        let first = self.prediction.first().unwrap();
        let last = self.prediction.last().unwrap();
        if relative_time <= first.relative_time {
            return *first;
        }
        if relative_time >= last.relative_time {
            return *last;
        }
        let index = self
            .prediction
            .partition_point(|p| p.relative_time < relative_time)
            .max(1);
        let p0 = &self.prediction[index - 1];
        let p1 = &self.prediction[index];
        let frac = (relative_time - p0.relative_time) / (p1.relative_time - p0.relative_time);
        let lerp = |a: f64, b: f64| a + frac * (b - a);
        PredictedState {
            relative_time,
            x: lerp(p0.x, p1.x),
            y: lerp(p0.y, p1.y),
            theta: crate::math::slerp_angle(p0.theta, p1.theta, frac),
            v: lerp(p0.v, p1.v),
        }
    }

    /// The footprint polygon in the world frame at `relative_time`.
    pub fn polygon_at(&self, relative_time: f64) -> Vec<Point2d> {
        let pose = self.pose_at(relative_time);
        let (sin, cos) = pose.theta.sin_cos();
        self.polygon
            .iter()
            .map(|p| Point2d::new(pose.x + p.x * cos - p.y * sin, pose.y + p.x * sin + p.y * cos))
            .collect()
    }
}
