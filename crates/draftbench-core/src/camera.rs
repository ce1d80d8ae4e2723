//! Camera module for pan/zoom view transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Camera manages the view transform for the drawing surface.
///
/// It handles panning (translation) and zooming (scaling), converting
/// between screen coordinates and world (drawing) coordinates.
/// World-to-screen is `screen = world * zoom + offset` on both axes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level. Always positive.
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.05,
            max_zoom: 40.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform converting world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform converting screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Convert a screen-pixel distance to world units at the current zoom.
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_anchor: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let applied = new_zoom / self.zoom;
        self.zoom = new_zoom;

        // new_offset = anchor - (anchor - offset) * f, per axis
        self.offset = Vec2::new(
            screen_anchor.x - (screen_anchor.x - self.offset.x) * applied,
            screen_anchor.y - (screen_anchor.y - self.offset.y) * applied,
        );
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the camera to show the given world bounds inside the viewport.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Viewport, padding: f64) {
        if viewport.is_empty() || bounds.is_zero_area() {
            return;
        }

        let padded = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = padded.width / bounds.width();
        let scale_y = padded.height / bounds.height();
        self.zoom = scale_x.min(scale_y).clamp(self.min_zoom, self.max_zoom);

        let bounds_center = bounds.center();
        let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        self.offset = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}

/// Size of the drawing surface in logical pixels.
///
/// A `0x0` viewport means the surface is not laid out yet; all geometry
/// math must short-circuit on it rather than divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when the surface is not ready for geometry math.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The viewport as a screen-space rectangle anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Layout state of the drawing surface, captured once per input event.
///
/// The rect and viewport must be read together: reading the rect at the
/// start of a handler and the viewport later can observe two different
/// layouts when a sibling panel has just resized the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSnapshot {
    /// On-screen rectangle of the drawing surface.
    pub rect: Rect,
    /// Viewport size derived from the same rect.
    pub viewport: Viewport,
    /// Device pixel ratio. Applied at the render surface, never inside
    /// the camera transform.
    pub scale_factor: f64,
}

impl PointerSnapshot {
    /// Capture a snapshot from the surface's current rectangle.
    pub fn capture(rect: Rect, scale_factor: f64) -> Self {
        Self {
            rect,
            viewport: Viewport::new(rect.width(), rect.height()),
            scale_factor,
        }
    }

    /// Convert client (window) coordinates to surface-local screen coordinates.
    pub fn to_local(&self, client: Point) -> Point {
        Point::new(client.x - self.rect.x0, client.y - self.rect.y0)
    }
}
