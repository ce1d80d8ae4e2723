//! Snapping seam for drag points.
//!
//! Snapping is an external concern: the engine asks a provider for a
//! candidate and falls back to the raw point when none is offered.

use kurbo::Point;

/// Default grid spacing in world units.
pub const GRID_SIZE: f64 = 10.0;

/// Supplies snap candidates for a world-space point.
pub trait SnapProvider {
    /// Return a snapped position for `world`, or `None` to leave it as-is.
    fn find_snap_point(&self, world: Point) -> Option<Point>;
}

/// Resolve a point through a provider, falling back to the input.
pub fn resolve_snap(provider: &dyn SnapProvider, world: Point) -> Point {
    provider.find_snap_point(world).unwrap_or(world)
}

/// Snaps to a uniform grid.
#[derive(Debug, Clone, Copy)]
pub struct GridSnap {
    pub grid_size: f64,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self { grid_size: GRID_SIZE }
    }
}

impl SnapProvider for GridSnap {
    fn find_snap_point(&self, world: Point) -> Option<Point> {
        if self.grid_size <= 0.0 {
            return None;
        }
        Some(Point::new(
            (world.x / self.grid_size).round() * self.grid_size,
            (world.y / self.grid_size).round() * self.grid_size,
        ))
    }
}

/// Never snaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnap;

impl SnapProvider for NoSnap {
    fn find_snap_point(&self, _world: Point) -> Option<Point> {
        None
    }
}
