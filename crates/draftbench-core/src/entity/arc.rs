//! Circular arc entity.

use super::{EntityGeometry, EntityId, EntityProps};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalize an angle in degrees to the range `[0, 360)`.
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// A circular arc swept counter-clockwise from `start_angle` to `end_angle`.
///
/// Angles are stored in degrees, normalized to `[0, 360)`, matching the
/// DXF arc convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub(crate) id: EntityId,
    /// Center point.
    pub center: Point,
    /// Radius in world units.
    pub radius: f64,
    /// Start angle in degrees, `[0, 360)`.
    pub start_angle: f64,
    /// End angle in degrees, `[0, 360)`.
    pub end_angle: f64,
    /// Display properties.
    pub props: EntityProps,
}

impl Arc {
    /// Create a new arc. Angles are normalized on construction.
    pub fn new(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius,
            start_angle: normalize_angle_deg(start_angle),
            end_angle: normalize_angle_deg(end_angle),
            props: EntityProps::default(),
        }
    }

    /// The point on the arc's circle at the given angle in degrees.
    pub fn point_at(&self, angle_deg: f64) -> Point {
        let rad = angle_deg.to_radians();
        Point::new(
            self.center.x + self.radius * rad.cos(),
            self.center.y + self.radius * rad.sin(),
        )
    }

    /// Start point of the arc.
    pub fn start_point(&self) -> Point {
        self.point_at(self.start_angle)
    }

    /// End point of the arc.
    pub fn end_point(&self) -> Point {
        self.point_at(self.end_angle)
    }

    /// Counter-clockwise sweep from start to end, in degrees `(0, 360]`.
    pub fn sweep(&self) -> f64 {
        let sweep = normalize_angle_deg(self.end_angle - self.start_angle);
        if sweep == 0.0 { 360.0 } else { sweep }
    }

    /// True if the given angle (degrees) lies within the arc's sweep.
    pub fn contains_angle(&self, angle_deg: f64) -> bool {
        normalize_angle_deg(angle_deg - self.start_angle) <= self.sweep()
    }

    /// Sample `n` points along the arc, start to end inclusive.
    pub fn sample_points(&self, n: usize) -> Vec<Point> {
        let n = n.max(2);
        let sweep = self.sweep();
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                self.point_at(self.start_angle + sweep * t)
            })
            .collect()
    }
}

impl EntityGeometry for Arc {
    fn id(&self) -> EntityId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Bounds of the sampled outline; exact for the axis-crossing cases
        // because 0/90/180/270 are included when swept.
        let mut pts = vec![self.start_point(), self.end_point()];
        for axis in [0.0, 90.0, 180.0, 270.0] {
            if self.contains_angle(axis) {
                pts.push(self.point_at(axis));
            }
        }
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in pts {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    fn distance_to(&self, point: Point) -> f64 {
        let v = point - self.center;
        let angle = v.y.atan2(v.x).to_degrees();
        if self.contains_angle(angle) {
            (v.hypot() - self.radius).abs()
        } else {
            let to_start = (point - self.start_point()).hypot();
            let to_end = (point - self.end_point()).hypot();
            to_start.min(to_end)
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn defining_points(&self) -> Vec<Point> {
        vec![self.center, self.start_point(), self.end_point()]
    }

    fn props(&self) -> &EntityProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut EntityProps {
        &mut self.props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert!((normalize_angle_deg(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_angle_deg(450.0) - 90.0).abs() < 1e-9);
        assert!(normalize_angle_deg(360.0).abs() < 1e-9);
    }

    #[test]
    fn test_endpoints() {
        let arc = Arc::new(Point::new(0.0, 0.0), 10.0, 0.0, 90.0);
        let start = arc.start_point();
        let end = arc.end_point();
        assert!((start.x - 10.0).abs() < 1e-9 && start.y.abs() < 1e-9);
        assert!(end.x.abs() < 1e-9 && (end.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_angle_wraps() {
        let arc = Arc::new(Point::ZERO, 5.0, 350.0, 20.0);
        assert!(arc.contains_angle(0.0));
        assert!(arc.contains_angle(355.0));
        assert!(!arc.contains_angle(180.0));
    }

    #[test]
    fn test_distance_on_and_off_sweep() {
        let arc = Arc::new(Point::ZERO, 10.0, 0.0, 90.0);
        // On the sweep: radial distance.
        assert!((arc.distance_to(Point::new(0.0, 12.0)) - 2.0).abs() < 1e-9);
        // Off the sweep: distance to the nearest endpoint.
        let d = arc.distance_to(Point::new(0.0, -10.0));
        assert!((d - (Point::new(0.0, -10.0) - Point::new(10.0, 0.0)).hypot()).abs() < 1e-9);
    }
}
