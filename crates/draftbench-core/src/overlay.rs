//! Free-form polygon overlays.
//!
//! Overlays are closed polygons layered on top of the drawing, edited by
//! vertex rather than by geometric parameters. Their vertex chain is
//! implicitly closed: the last vertex connects back to the first.

use crate::entity::{point_to_segment_dist, segment_midpoint, segments_intersect};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for overlays.
pub type OverlayId = Uuid;

/// A closed polygon region with an optional layer tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub(crate) id: OverlayId,
    /// Ordered polygon vertices. The polygon closes implicitly.
    pub polygon: Vec<Point>,
    /// Optional layer tag used for grouped selection.
    #[serde(default)]
    pub layer: Option<String>,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
}

impl Overlay {
    /// Create a new overlay from its polygon.
    pub fn new(polygon: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            polygon,
            layer: None,
            label: String::new(),
        }
    }

    /// Create a new overlay on a named layer.
    pub fn on_layer(polygon: Vec<Point>, layer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            polygon,
            layer: Some(layer.into()),
            label: String::new(),
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Number of polygon vertices.
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    /// Number of edges; equals the vertex count for a closed polygon.
    pub fn edge_count(&self) -> usize {
        if self.polygon.len() < 2 { 0 } else { self.polygon.len() }
    }

    /// The two vertex indices forming edge `i` (wrapping).
    pub fn edge(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.edge_count() {
            return None;
        }
        Some((i, (i + 1) % self.polygon.len()))
    }

    /// Midpoint of edge `i`.
    pub fn edge_midpoint(&self, i: usize) -> Option<Point> {
        let (a, b) = self.edge(i)?;
        Some(segment_midpoint(self.polygon[a], self.polygon[b]))
    }

    /// Point-in-polygon test via ray casting.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.polygon.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (self.polygon[i], self.polygon[j]);
            if ((pi.y > point.y) != (pj.y > point.y))
                && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Distance from a point to the polygon outline.
    pub fn distance_to_outline(&self, point: Point) -> f64 {
        let mut dist = f64::INFINITY;
        for i in 0..self.edge_count() {
            let Some((a, b)) = self.edge(i) else { break };
            dist = dist.min(point_to_segment_dist(point, self.polygon[a], self.polygon[b]));
        }
        dist
    }

    /// Axis-aligned bounding box of the polygon.
    pub fn bounds(&self) -> Rect {
        if self.polygon.is_empty() {
            return Rect::ZERO;
        }
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.polygon {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// True when every vertex lies inside `rect` (window selection).
    pub fn contained_in_rect(&self, rect: Rect) -> bool {
        !self.polygon.is_empty() && self.polygon.iter().all(|p| rect.contains(*p))
    }

    /// True when the polygon touches, contains or is inside `rect`
    /// (crossing selection).
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        if self.polygon.iter().any(|p| rect.contains(*p)) {
            return true;
        }
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        // Rect fully inside the polygon.
        if corners.iter().any(|c| self.contains(*c)) {
            return true;
        }
        for i in 0..self.edge_count() {
            let Some((a, b)) = self.edge(i) else { break };
            for k in 0..4 {
                if segments_intersect(
                    self.polygon[a],
                    self.polygon[b],
                    corners[k],
                    corners[(k + 1) % 4],
                ) {
                    return true;
                }
            }
        }
        false
    }
}
