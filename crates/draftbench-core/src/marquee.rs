//! Rectangle (marquee) selection.
//!
//! Drag direction picks the mode: left-to-right is a window selection
//! (full enclosure), right-to-left is a crossing selection (any
//! intersection). A release within a few pixels of the press degrades to
//! a point click.

use crate::camera::{Camera, Viewport};
use crate::document::Document;
use crate::entity::EntityId;
use crate::hit_test::{HitTestOptions, hit_test_entity};
use crate::overlay::OverlayId;
use kurbo::{Point, Rect};

/// Below this size in both axes, a marquee is treated as a click.
pub const MIN_MARQUEE_PX: f64 = 5.0;

/// Marquee selection mode, derived from drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeMode {
    /// Select only what the rectangle fully encloses.
    Window,
    /// Select everything the rectangle touches.
    Crossing,
}

/// An in-flight marquee drag, in screen coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    pub fn update(&mut self, screen: Point) {
        self.current = screen;
    }

    /// Screen-space rectangle of the drag.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }

    /// Dragging rightwards selects by enclosure, anything else by
    /// crossing. A purely vertical drag is the permissive mode.
    pub fn mode(&self) -> MarqueeMode {
        if self.current.x > self.start.x {
            MarqueeMode::Window
        } else {
            MarqueeMode::Crossing
        }
    }

    /// True when the drag never grew past the click threshold.
    pub fn is_click(&self) -> bool {
        (self.current.x - self.start.x).abs() < MIN_MARQUEE_PX
            && (self.current.y - self.start.y).abs() < MIN_MARQUEE_PX
    }
}

/// What a marquee captured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarqueeHit {
    pub entities: Vec<EntityId>,
    pub overlays: Vec<OverlayId>,
    /// Distinct layers of the captured overlays, first-seen order.
    pub layers: Vec<String>,
}

/// What a degraded point click landed on, tested overlay-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickHit {
    Overlay(OverlayId),
    Entity(EntityId),
    Empty,
}

/// Outcome of releasing a marquee drag.
#[derive(Debug, Clone, PartialEq)]
pub enum MarqueeOutcome {
    /// The drag was too small; treat it as a click at the start point.
    Click(ClickHit),
    /// A real rectangle selection.
    Select(MarqueeHit),
}

/// Resolve a finished marquee against the document.
pub fn resolve_marquee(
    marquee: &Marquee,
    document: &Document,
    camera: &Camera,
    viewport: Viewport,
) -> MarqueeOutcome {
    if marquee.is_click() {
        return MarqueeOutcome::Click(resolve_click(
            marquee.start,
            document,
            camera,
            viewport,
        ));
    }

    let screen_rect = marquee.rect();
    let world_rect = Rect::from_points(
        camera.screen_to_world(Point::new(screen_rect.x0, screen_rect.y0)),
        camera.screen_to_world(Point::new(screen_rect.x1, screen_rect.y1)),
    );
    let mode = marquee.mode();

    let mut hit = MarqueeHit::default();
    for entity in document.entities_ordered() {
        if !entity.is_visible() {
            continue;
        }
        let captured = match mode {
            MarqueeMode::Window => entity.contained_in_rect(world_rect),
            MarqueeMode::Crossing => entity.intersects_rect(world_rect),
        };
        if captured {
            hit.entities.push(entity.id());
        }
    }
    for overlay in document.overlays_ordered() {
        let captured = match mode {
            MarqueeMode::Window => overlay.contained_in_rect(world_rect),
            MarqueeMode::Crossing => overlay.intersects_rect(world_rect),
        };
        if captured {
            hit.overlays.push(overlay.id());
            if let Some(layer) = &overlay.layer {
                if !hit.layers.contains(layer) {
                    hit.layers.push(layer.clone());
                }
            }
        }
    }
    MarqueeOutcome::Select(hit)
}

/// Point-click resolution: overlays first (point in polygon), then entity
/// hit test, then empty space.
pub fn resolve_click(
    screen: Point,
    document: &Document,
    camera: &Camera,
    viewport: Viewport,
) -> ClickHit {
    if viewport.is_empty() {
        return ClickHit::Empty;
    }
    let world = camera.screen_to_world(screen);
    // Topmost overlay wins.
    let overlays: Vec<_> = document.overlays_ordered().collect();
    for overlay in overlays.into_iter().rev() {
        if overlay.contains(world) {
            return ClickHit::Overlay(overlay.id());
        }
    }
    match hit_test_entity(document, screen, camera, viewport, HitTestOptions::default()) {
        Some(id) => ClickHit::Entity(id),
        None => ClickHit::Empty,
    }
}
