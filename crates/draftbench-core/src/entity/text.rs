//! Text entity.

use super::{EntityGeometry, EntityId, EntityProps};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approximate glyph advance as a fraction of text height.
const GLYPH_ASPECT: f64 = 0.6;

/// A single-line text label anchored at its insertion point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: EntityId,
    /// Insertion point (bottom-left of the first glyph).
    pub position: Point,
    /// Text content.
    pub content: String,
    /// Text height in world units.
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Display properties.
    pub props: EntityProps,
}

impl Text {
    /// Create a new text entity.
    pub fn new(position: Point, content: impl Into<String>, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            height,
            rotation: 0.0,
            props: EntityProps::default(),
        }
    }

    /// Estimated width from content length and height.
    pub fn estimated_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.height * GLYPH_ASPECT
    }
}

impl EntityGeometry for Text {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.estimated_width().max(self.height * GLYPH_ASPECT),
            self.position.y + self.height,
        )
    }

    fn distance_to(&self, point: Point) -> f64 {
        let b = self.bounds();
        if b.contains(point) {
            return 0.0;
        }
        let dx = (b.x0 - point.x).max(point.x - b.x1).max(0.0);
        let dy = (b.y0 - point.y).max(point.y - b.y1).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn defining_points(&self) -> Vec<Point> {
        vec![self.position]
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}
