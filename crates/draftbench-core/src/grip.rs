//! Grip enumeration and nearest-grip lookup.
//!
//! Every selected entity or overlay exposes a deterministic list of grips.
//! A grip is addressed by its owner plus a single absolute index: for
//! vertex-chain owners the vertices come first (`0..vertex_count`), then
//! the edge midpoints (`vertex_count + edge_index`). All lookups and drag
//! commits use this one encoding.

use crate::document::Document;
use crate::entity::{Entity, EntityId, segment_midpoint};
use crate::overlay::OverlayId;
use crate::selection::SelectionSet;
use kurbo::Point;

/// Default pick tolerance for grips, in screen pixels.
pub const GRIP_TOLERANCE_PX: f64 = 10.0;

/// Lower bound on the grip tolerance, so grips stay pickable at any DPI.
pub const MIN_GRIP_TOLERANCE_PX: f64 = 6.0;

/// What a grip edits when dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripKind {
    /// A polygon or polyline vertex.
    Vertex,
    /// A line or arc endpoint.
    Endpoint,
    /// The midpoint of an edge; dragging stretches or inserts.
    EdgeMidpoint,
    /// A circle quadrant point; dragging resizes the radius.
    Quadrant,
    /// A center point; dragging moves the whole owner.
    Center,
    /// A text insertion point; dragging moves the whole owner.
    Insertion,
}

/// The model object a grip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GripOwner {
    Entity(EntityId),
    Overlay(OverlayId),
}

/// Canonical grip address: owner plus absolute index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GripId {
    pub owner: GripOwner,
    pub index: usize,
}

/// One draggable control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grip {
    pub id: GripId,
    pub kind: GripKind,
    /// World position at enumeration time.
    pub position: Point,
    /// Dragging this grip translates the whole owner instead of editing
    /// one point.
    pub moves_owner: bool,
    /// For overlay edge midpoints: where the new vertex is inserted.
    pub insert_index: Option<usize>,
}

impl Grip {
    fn point(id: GripId, kind: GripKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            moves_owner: false,
            insert_index: None,
        }
    }

    fn mover(id: GripId, kind: GripKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            moves_owner: true,
            insert_index: None,
        }
    }
}

/// Enumerate grips for the current selection, in selection order then
/// index order.
pub fn build_grips(document: &Document, selection: &SelectionSet) -> Vec<Grip> {
    let mut grips = Vec::new();
    for &id in selection.entities() {
        let Some(entity) = document.entity(id) else {
            continue;
        };
        entity_grips(entity, &mut grips);
    }
    for &id in selection.overlays() {
        let Some(overlay) = document.overlay(id) else {
            continue;
        };
        let owner = GripOwner::Overlay(id);
        let n = overlay.vertex_count();
        for (i, v) in overlay.polygon.iter().enumerate() {
            grips.push(Grip::point(GripId { owner, index: i }, GripKind::Vertex, *v));
        }
        for e in 0..overlay.edge_count() {
            let Some(mid) = overlay.edge_midpoint(e) else { break };
            let mut grip = Grip::point(
                GripId { owner, index: n + e },
                GripKind::EdgeMidpoint,
                mid,
            );
            grip.insert_index = Some(e + 1);
            grips.push(grip);
        }
    }
    grips
}

fn entity_grips(entity: &Entity, out: &mut Vec<Grip>) {
    let owner = GripOwner::Entity(entity.id());
    let at = |index| GripId { owner, index };
    match entity {
        Entity::Line(line) => {
            out.push(Grip::point(at(0), GripKind::Endpoint, line.start));
            out.push(Grip::point(at(1), GripKind::Endpoint, line.end));
            out.push(Grip::point(
                at(2),
                GripKind::EdgeMidpoint,
                segment_midpoint(line.start, line.end),
            ));
        }
        Entity::Circle(circle) => {
            out.push(Grip::mover(at(0), GripKind::Center, circle.center));
            for (i, q) in circle.quadrant_points().iter().enumerate() {
                out.push(Grip::point(at(1 + i), GripKind::Quadrant, *q));
            }
        }
        Entity::Arc(arc) => {
            out.push(Grip::mover(at(0), GripKind::Center, arc.center));
            out.push(Grip::point(at(1), GripKind::Endpoint, arc.start_point()));
            out.push(Grip::point(at(2), GripKind::Endpoint, arc.end_point()));
        }
        Entity::Polyline(poly) => {
            let n = poly.vertices.len();
            for (i, v) in poly.vertices.iter().enumerate() {
                out.push(Grip::point(at(i), GripKind::Vertex, *v));
            }
            for e in 0..poly.edge_count() {
                let Some(mid) = poly.edge_midpoint(e) else { break };
                out.push(Grip::point(at(n + e), GripKind::EdgeMidpoint, mid));
            }
        }
        Entity::Text(text) => {
            out.push(Grip::mover(at(0), GripKind::Insertion, text.position));
        }
        Entity::AngleMeasurement(m) => {
            out.push(Grip::point(at(0), GripKind::Vertex, m.vertex));
            out.push(Grip::point(at(1), GripKind::Endpoint, m.arm_a));
            out.push(Grip::point(at(2), GripKind::Endpoint, m.arm_b));
        }
    }
}

/// Find the grip nearest to a world point, within a screen-space tolerance.
///
/// The tolerance is converted to world units using the current zoom; a
/// strictly smaller distance wins, so the first grip in enumeration order
/// breaks ties.
pub fn find_nearest_grip<'a>(
    world: Point,
    grips: &'a [Grip],
    tolerance_px: f64,
    zoom: f64,
) -> Option<&'a Grip> {
    let tolerance = tolerance_px.max(MIN_GRIP_TOLERANCE_PX) / zoom;
    let mut best: Option<(&Grip, f64)> = None;
    for grip in grips {
        let dist = (grip.position - world).hypot();
        if dist > tolerance {
            continue;
        }
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((grip, dist)),
        }
    }
    best.map(|(g, _)| g)
}
