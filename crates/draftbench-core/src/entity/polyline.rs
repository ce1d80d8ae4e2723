//! Polyline entity.

use super::{
    EntityGeometry, EntityId, EntityProps, point_to_polyline_dist, point_to_segment_dist,
    segment_midpoint,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open or closed chain of straight segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub(crate) id: EntityId,
    /// Ordered vertices.
    pub vertices: Vec<Point>,
    /// Whether the last vertex connects back to the first.
    #[serde(default)]
    pub closed: bool,
    /// Display properties.
    pub props: EntityProps,
}

impl Polyline {
    /// Create a new open polyline.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vertices,
            closed: false,
            props: EntityProps::default(),
        }
    }

    /// Create a closed polyline.
    pub fn closed(vertices: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vertices,
            closed: true,
            props: EntityProps::default(),
        }
    }

    /// Number of edges (segments).
    pub fn edge_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// The two vertex indices forming edge `i`.
    pub fn edge(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.edge_count() {
            return None;
        }
        let j = (i + 1) % self.vertices.len();
        Some((i, j))
    }

    /// Midpoint of edge `i`.
    pub fn edge_midpoint(&self, i: usize) -> Option<Point> {
        let (a, b) = self.edge(i)?;
        Some(segment_midpoint(self.vertices[a], self.vertices[b]))
    }

    /// The vertex chain with the closing vertex repeated when closed.
    pub fn segment_points(&self) -> Vec<Point> {
        let mut pts = self.vertices.clone();
        if self.closed && pts.len() > 2 {
            pts.push(pts[0]);
        }
        pts
    }
}

impl EntityGeometry for Polyline {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.vertices {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if self.vertices.is_empty() {
            return Rect::ZERO;
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn distance_to(&self, point: Point) -> f64 {
        match self.vertices.len() {
            0 => f64::INFINITY,
            1 => (point - self.vertices[0]).hypot(),
            _ => {
                let mut dist = point_to_polyline_dist(point, &self.vertices);
                if self.closed {
                    let closing = point_to_segment_dist(
                        point,
                        self.vertices[self.vertices.len() - 1],
                        self.vertices[0],
                    );
                    dist = dist.min(closing);
                }
                dist
            }
        }
    }

    fn translate(&mut self, delta: Vec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    fn defining_points(&self) -> Vec<Point> {
        self.vertices.clone()
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}
