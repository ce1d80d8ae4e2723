//! Circle entity.

use super::{EntityGeometry, EntityId, EntityProps};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A full circle defined by center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: EntityId,
    /// Center point.
    pub center: Point,
    /// Radius in world units. Always positive.
    pub radius: f64,
    /// Display properties.
    pub props: EntityProps,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            props: EntityProps::default(),
        }
    }

    /// The four quadrant points at 0, 90, 180 and 270 degrees.
    pub fn quadrant_points(&self) -> [Point; 4] {
        let (c, r) = (self.center, self.radius);
        [
            Point::new(c.x + r, c.y),
            Point::new(c.x, c.y + r),
            Point::new(c.x - r, c.y),
            Point::new(c.x, c.y - r),
        ]
    }
}

impl EntityGeometry for Circle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }

    fn distance_to(&self, point: Point) -> f64 {
        ((point - self.center).hypot() - self.radius).abs()
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn defining_points(&self) -> Vec<Point> {
        let mut pts = vec![self.center];
        pts.extend(self.quadrant_points());
        pts
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}
