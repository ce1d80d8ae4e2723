//! Drawing entity definitions.

mod angle;
mod arc;
mod circle;
mod line;
mod polyline;
mod text;

pub use angle::AngleMeasurement;
pub use arc::{Arc, normalize_angle_deg};
pub use circle::Circle;
pub use line::Line;
pub use polyline::Polyline;
pub use text::Text;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl EntityColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// Line pattern, mirroring the usual CAD line types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    Center,
}

/// Display properties shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProps {
    /// Owning layer name.
    pub layer: String,
    /// Stroke color.
    pub color: EntityColor,
    /// Line pattern.
    #[serde(default)]
    pub line_type: LineType,
    /// Line weight in drawing units.
    pub line_weight: f64,
    /// Whether the entity is drawn and hit-testable.
    pub visible: bool,
}

impl Default for EntityProps {
    fn default() -> Self {
        Self {
            layer: "0".to_string(),
            color: EntityColor::black(),
            line_type: LineType::default(),
            line_weight: 1.0,
            visible: true,
        }
    }
}

/// Distance from a point to a line segment (a -> b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Midpoint of a segment.
pub fn segment_midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Common geometric behavior implemented by every entity kind.
pub trait EntityGeometry {
    /// Get the unique identifier.
    fn id(&self) -> EntityId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Distance from a world point to the entity's drawn geometry.
    fn distance_to(&self, point: Point) -> f64;

    /// Translate the whole entity by a delta.
    fn translate(&mut self, delta: Vec2);

    /// The points that define the entity, used for enclosure tests.
    fn defining_points(&self) -> Vec<Point>;

    /// Get the display properties.
    fn props(&self) -> &EntityProps;

    /// Get mutable display properties.
    fn props_mut(&mut self) -> &mut EntityProps;
}

/// Closed tagged union over all entity kinds.
///
/// Geometry is replaced wholesale on commit (copy-on-write); identity is
/// immutable for the entity's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
    Text(Text),
    AngleMeasurement(AngleMeasurement),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Line(e) => e.id(),
            Entity::Circle(e) => e.id(),
            Entity::Arc(e) => e.id(),
            Entity::Polyline(e) => e.id(),
            Entity::Text(e) => e.id(),
            Entity::AngleMeasurement(e) => e.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Line(e) => e.bounds(),
            Entity::Circle(e) => e.bounds(),
            Entity::Arc(e) => e.bounds(),
            Entity::Polyline(e) => e.bounds(),
            Entity::Text(e) => e.bounds(),
            Entity::AngleMeasurement(e) => e.bounds(),
        }
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        match self {
            Entity::Line(e) => e.distance_to(point),
            Entity::Circle(e) => e.distance_to(point),
            Entity::Arc(e) => e.distance_to(point),
            Entity::Polyline(e) => e.distance_to(point),
            Entity::Text(e) => e.distance_to(point),
            Entity::AngleMeasurement(e) => e.distance_to(point),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Entity::Line(e) => e.translate(delta),
            Entity::Circle(e) => e.translate(delta),
            Entity::Arc(e) => e.translate(delta),
            Entity::Polyline(e) => e.translate(delta),
            Entity::Text(e) => e.translate(delta),
            Entity::AngleMeasurement(e) => e.translate(delta),
        }
    }

    pub fn props(&self) -> &EntityProps {
        match self {
            Entity::Line(e) => e.props(),
            Entity::Circle(e) => e.props(),
            Entity::Arc(e) => e.props(),
            Entity::Polyline(e) => e.props(),
            Entity::Text(e) => e.props(),
            Entity::AngleMeasurement(e) => e.props(),
        }
    }

    pub fn props_mut(&mut self) -> &mut EntityProps {
        match self {
            Entity::Line(e) => e.props_mut(),
            Entity::Circle(e) => e.props_mut(),
            Entity::Arc(e) => e.props_mut(),
            Entity::Polyline(e) => e.props_mut(),
            Entity::Text(e) => e.props_mut(),
            Entity::AngleMeasurement(e) => e.props_mut(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.props().visible
    }

    /// True when every defining point lies inside `rect` (window selection).
    pub fn contained_in_rect(&self, rect: Rect) -> bool {
        match self {
            // Round entities use their bounds; a circle whose bounds fit
            // is fully enclosed.
            Entity::Circle(_) | Entity::Arc(_) | Entity::Text(_) => {
                let b = self.bounds();
                rect.contains(Point::new(b.x0, b.y0)) && rect.contains(Point::new(b.x1, b.y1))
            }
            _ => {
                let pts = match self {
                    Entity::Line(e) => e.defining_points(),
                    Entity::Polyline(e) => e.defining_points(),
                    Entity::AngleMeasurement(e) => e.defining_points(),
                    _ => unreachable!(),
                };
                !pts.is_empty() && pts.iter().all(|p| rect.contains(*p))
            }
        }
    }

    /// True when the entity touches or is inside `rect` (crossing selection).
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        if self.contained_in_rect(rect) {
            return true;
        }
        match self {
            Entity::Line(e) => segments_intersect_rect(&e.defining_points(), rect),
            Entity::Polyline(e) => segments_intersect_rect(&e.segment_points(), rect),
            Entity::AngleMeasurement(e) => {
                segments_intersect_rect(&[e.arm_a, e.vertex, e.arm_b], rect)
            }
            Entity::Circle(e) => circle_intersects_rect(e.center, e.radius, rect),
            Entity::Arc(e) => {
                // Approximate with the chord polyline through the sweep.
                segments_intersect_rect(&e.sample_points(16), rect)
            }
            Entity::Text(_) => rect.intersect(self.bounds()).area() > 0.0,
        }
    }
}

/// Test if a circle outline intersects a rectangle region.
///
/// The outline touches the rect iff the rect spans the circle's radius:
/// its nearest point is inside the circle and its farthest corner is not
/// strictly inside.
fn circle_intersects_rect(center: Point, radius: f64, rect: Rect) -> bool {
    let corners = rect_corners(rect);
    let dist_min = if rect.contains(center) {
        0.0
    } else {
        rect_edges(&corners)
            .iter()
            .map(|&(a, b)| point_to_segment_dist(center, a, b))
            .fold(f64::INFINITY, f64::min)
    };
    let dist_max = corners
        .iter()
        .map(|c| (*c - center).hypot())
        .fold(0.0_f64, f64::max);
    dist_min <= radius && radius <= dist_max
}

fn rect_corners(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

fn rect_edges(corners: &[Point; 4]) -> [(Point, Point); 4] {
    [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ]
}

/// Test if any segment of a connected point chain intersects or is inside a rectangle.
pub fn segments_intersect_rect(points: &[Point], rect: Rect) -> bool {
    if points.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    let corners = rect_corners(rect);
    let edges = rect_edges(&corners);
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        for &(c, d) in &edges {
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Test if two line segments (a-b) and (c-d) intersect.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross =
        |o: Point, p: Point, q: Point| (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x);
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: check if an endpoint lies on the other segment.
    let on_segment = |p: Point, q: Point, r: Point| {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < 1e-10 && on_segment(c, d, a))
        || (d2.abs() < 1e-10 && on_segment(c, d, b))
        || (d3.abs() < 1e-10 && on_segment(a, b, c))
        || (d4.abs() < 1e-10 && on_segment(a, b, d))
}
