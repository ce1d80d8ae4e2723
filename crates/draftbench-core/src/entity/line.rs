//! Line entity.

use super::{EntityGeometry, EntityId, EntityProps, point_to_segment_dist, segment_midpoint};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: EntityId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Display properties.
    pub props: EntityProps,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            props: EntityProps::default(),
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Get the midpoint of the line.
    pub fn midpoint(&self) -> Point {
        segment_midpoint(self.start, self.end)
    }
}

impl EntityGeometry for Line {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn distance_to(&self, point: Point) -> f64 {
        point_to_segment_dist(point, self.start, self.end)
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn defining_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}
