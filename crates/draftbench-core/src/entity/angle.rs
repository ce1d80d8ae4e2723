//! Angle measurement entity.

use super::{EntityGeometry, EntityId, EntityProps, normalize_angle_deg, point_to_segment_dist};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An angle measurement: two arms meeting at a vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    pub(crate) id: EntityId,
    /// Apex of the measured angle.
    pub vertex: Point,
    /// End of the first arm.
    pub arm_a: Point,
    /// End of the second arm.
    pub arm_b: Point,
    /// Display properties.
    pub props: EntityProps,
}

impl AngleMeasurement {
    /// Create a new angle measurement.
    pub fn new(vertex: Point, arm_a: Point, arm_b: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            vertex,
            arm_a,
            arm_b,
            props: EntityProps::default(),
        }
    }

    /// The measured angle between the two arms, in degrees `[0, 360)`.
    pub fn angle(&self) -> f64 {
        let a = (self.arm_a - self.vertex).atan2().to_degrees();
        let b = (self.arm_b - self.vertex).atan2().to_degrees();
        normalize_angle_deg(b - a)
    }
}

impl EntityGeometry for AngleMeasurement {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let xs = [self.vertex.x, self.arm_a.x, self.arm_b.x];
        let ys = [self.vertex.y, self.arm_a.y, self.arm_b.y];
        Rect::new(
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
            xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    }

    fn distance_to(&self, point: Point) -> f64 {
        point_to_segment_dist(point, self.vertex, self.arm_a)
            .min(point_to_segment_dist(point, self.vertex, self.arm_b))
    }

    fn translate(&mut self, delta: Vec2) {
        self.vertex += delta;
        self.arm_a += delta;
        self.arm_b += delta;
    }

    fn defining_points(&self) -> Vec<Point> {
        vec![self.vertex, self.arm_a, self.arm_b]
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}
