//! Grip drag lifecycle: idle, hovering, warm, dragging.
//!
//! The engine never mutates the document during a gesture. It snapshots
//! the owner's geometry when a drag starts, recomputes the edited geometry
//! from that snapshot plus the latest pointer position for previews, and
//! hands back a single [`Command`] on release. Cancelling therefore needs
//! no rollback.

use crate::command::{Command, StretchEdit};
use crate::document::Document;
use crate::entity::{Entity, normalize_angle_deg};
use crate::grip::{
    GRIP_TOLERANCE_PX, Grip, GripId, GripKind, GripOwner, MIN_GRIP_TOLERANCE_PX,
    find_nearest_grip,
};
use crate::overlay::{Overlay, OverlayId};
use crate::snap::{SnapProvider, resolve_snap};
use kurbo::{Point, Vec2};
use std::time::{Duration, Instant};

/// How long the pointer must rest on a grip before it turns warm.
pub const WARM_DELAY: Duration = Duration::from_millis(1000);

/// Minimum interval between hover hit tests on pointer move.
pub const HOVER_THROTTLE: Duration = Duration::from_millis(30);

/// Snapshot of the geometry a drag started from.
#[derive(Debug, Clone)]
pub enum DragOriginal {
    Entity(Entity),
    Overlays(Vec<Overlay>),
}

/// An in-flight grip drag.
#[derive(Debug, Clone)]
pub struct DragState {
    /// The grip that was pressed.
    pub grip: Grip,
    /// All grips moving in this gesture. One entry except for overlay
    /// multi-vertex drags.
    pub dragged: Vec<GripId>,
    /// Where the drag is measured from: the press position. Anchoring at
    /// the press keeps a grip grabbed at the tolerance edge from jumping
    /// to the cursor on the first move.
    pub anchor_world: Point,
    /// Latest drag point, after snapping.
    pub current_world: Point,
    /// Pre-drag geometry. Commits derive from this, never incrementally.
    pub original: DragOriginal,
    /// This gesture inserts a new overlay vertex.
    pub inserted_vertex: bool,
}

impl DragState {
    pub fn delta(&self) -> Vec2 {
        self.current_world - self.anchor_world
    }

    /// Where the grabbed grip point should land: its original position
    /// moved by the drag delta.
    pub fn target_point(&self) -> Point {
        self.grip.position + self.delta()
    }
}

/// Lifecycle phase of the grip interaction.
#[derive(Debug, Clone)]
pub enum GripPhase {
    Idle,
    Hovering { grip: Grip, since: Instant },
    Warm { grip: Grip },
    Dragging(DragState),
}

/// Result of routing a pointer press through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripPress {
    /// A drag started; the press is consumed.
    Drag,
    /// Shift-press toggled grip membership; no drag, press consumed.
    Toggle,
    /// No grip under the pointer; the press falls through.
    Miss,
}

/// Geometry to draw instead of the committed model during a drag.
#[derive(Debug, Clone, Default)]
pub struct DragPreview {
    pub entities: Vec<Entity>,
    pub overlays: Vec<Overlay>,
}

/// The grip interaction state machine. One per editor, with snapping
/// injected at construction.
pub struct InteractionEngine {
    phase: GripPhase,
    grips: Vec<Grip>,
    /// Overlay vertex grips selected for joint dragging.
    selected_grips: Vec<GripId>,
    last_hover_check: Option<Instant>,
    /// Zoom seen by the most recent pointer event, for tolerance math
    /// outside of move handling.
    last_zoom: f64,
    /// Raw pointer position in world space, updated on every move even
    /// when hover work is throttled.
    pointer_world: Point,
    snap: Box<dyn SnapProvider>,
}

impl std::fmt::Debug for InteractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionEngine")
            .field("phase", &self.phase)
            .field("grips", &self.grips.len())
            .field("selected_grips", &self.selected_grips)
            .finish()
    }
}

impl InteractionEngine {
    pub fn new(snap: Box<dyn SnapProvider>) -> Self {
        Self {
            phase: GripPhase::Idle,
            grips: Vec::new(),
            selected_grips: Vec::new(),
            last_hover_check: None,
            last_zoom: 1.0,
            pointer_world: Point::ZERO,
            snap,
        }
    }

    pub fn phase(&self) -> &GripPhase {
        &self.phase
    }

    pub fn grips(&self) -> &[Grip] {
        &self.grips
    }

    pub fn selected_grips(&self) -> &[GripId] {
        &self.selected_grips
    }

    /// Raw pointer position for rendering (crosshair), never throttled.
    pub fn pointer_world(&self) -> Point {
        self.pointer_world
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GripPhase::Dragging(_))
    }

    /// The grip currently hovered, warm or dragged.
    pub fn active_grip(&self) -> Option<&Grip> {
        match &self.phase {
            GripPhase::Idle => None,
            GripPhase::Hovering { grip, .. } | GripPhase::Warm { grip } => Some(grip),
            GripPhase::Dragging(state) => Some(&state.grip),
        }
    }

    /// The selection changed: drop all transient state and adopt the new
    /// grip list.
    pub fn selection_changed(&mut self, grips: Vec<Grip>) {
        self.phase = GripPhase::Idle;
        self.selected_grips.clear();
        self.last_hover_check = None;
        self.grips = grips;
    }

    /// Advance time-based transitions. Returns true when the phase changed.
    ///
    /// The pointer may have left the grip inside the hover throttle
    /// window, so the warm promotion re-checks proximity against the raw
    /// pointer position instead of trusting the stale hover state.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let GripPhase::Hovering { grip, since } = &self.phase {
            if now.duration_since(*since) >= WARM_DELAY {
                let grip = *grip;
                let tolerance = GRIP_TOLERANCE_PX.max(MIN_GRIP_TOLERANCE_PX) / self.last_zoom;
                if (self.pointer_world - grip.position).hypot() > tolerance {
                    self.phase = GripPhase::Idle;
                } else {
                    self.phase = GripPhase::Warm { grip };
                }
                return true;
            }
        }
        false
    }

    /// Route a pointer move. Returns true when a redraw is needed.
    pub fn pointer_moved(&mut self, world: Point, zoom: f64, now: Instant) -> bool {
        self.pointer_world = world;
        self.last_zoom = zoom;
        if let GripPhase::Dragging(state) = &mut self.phase {
            state.current_world = resolve_snap(self.snap.as_ref(), world);
            return true;
        }
        // Hover hit tests are throttled; the raw position above is not.
        if let Some(last) = self.last_hover_check {
            if now.duration_since(last) < HOVER_THROTTLE {
                return false;
            }
        }
        self.last_hover_check = Some(now);

        match find_nearest_grip(world, &self.grips, GRIP_TOLERANCE_PX, zoom) {
            Some(grip) => {
                let grip = *grip;
                match &self.phase {
                    GripPhase::Hovering { grip: current, .. } | GripPhase::Warm { grip: current }
                        if current.id == grip.id =>
                    {
                        false
                    }
                    _ => {
                        self.phase = GripPhase::Hovering { grip, since: now };
                        true
                    }
                }
            }
            None => {
                if matches!(self.phase, GripPhase::Idle) {
                    false
                } else {
                    self.phase = GripPhase::Idle;
                    true
                }
            }
        }
    }

    /// Route a pointer press. `shift` toggles overlay grip membership
    /// instead of dragging.
    pub fn pointer_pressed(
        &mut self,
        world: Point,
        zoom: f64,
        shift: bool,
        document: &Document,
    ) -> GripPress {
        let Some(grip) = find_nearest_grip(world, &self.grips, GRIP_TOLERANCE_PX, zoom).copied()
        else {
            return GripPress::Miss;
        };

        let overlay_vertex =
            matches!(grip.id.owner, GripOwner::Overlay(_)) && grip.kind == GripKind::Vertex;

        if shift && overlay_vertex {
            if let Some(pos) = self.selected_grips.iter().position(|g| *g == grip.id) {
                self.selected_grips.remove(pos);
            } else {
                self.selected_grips.push(grip.id);
            }
            return GripPress::Toggle;
        }

        let dragged = if overlay_vertex {
            if self.selected_grips.contains(&grip.id) {
                // Pressing a member drags the whole selected set.
                self.selected_grips.clone()
            } else {
                self.selected_grips = vec![grip.id];
                vec![grip.id]
            }
        } else {
            vec![grip.id]
        };

        let original = match self.snapshot_original(&grip, &dragged, document) {
            Some(original) => original,
            None => {
                log::warn!("grip press on stale owner, ignoring");
                return GripPress::Miss;
            }
        };

        self.pointer_world = world;
        self.last_zoom = zoom;
        self.phase = GripPhase::Dragging(DragState {
            grip,
            dragged,
            anchor_world: world,
            current_world: world,
            original,
            inserted_vertex: grip.insert_index.is_some(),
        });
        GripPress::Drag
    }

    fn snapshot_original(
        &self,
        grip: &Grip,
        dragged: &[GripId],
        document: &Document,
    ) -> Option<DragOriginal> {
        match grip.id.owner {
            GripOwner::Entity(id) => document.entity(id).cloned().map(DragOriginal::Entity),
            GripOwner::Overlay(_) => {
                let mut owners: Vec<OverlayId> = Vec::new();
                for g in dragged {
                    if let GripOwner::Overlay(id) = g.owner {
                        if !owners.contains(&id) {
                            owners.push(id);
                        }
                    }
                }
                let mut originals = Vec::with_capacity(owners.len());
                for id in owners {
                    originals.push(document.overlay(id)?.clone());
                }
                Some(DragOriginal::Overlays(originals))
            }
        }
    }

    /// Cancel the gesture (Escape or right-click). The document was never
    /// touched, so this only drops the preview.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.phase = GripPhase::Idle;
        was_dragging
    }

    /// Finish the drag, producing the single command for the gesture, or
    /// `None` for a zero-delta release.
    pub fn pointer_released(&mut self, now: Instant) -> Option<Command> {
        let GripPhase::Dragging(state) = std::mem::replace(&mut self.phase, GripPhase::Idle)
        else {
            return None;
        };
        if state.delta() == Vec2::ZERO {
            return None;
        }
        Some(build_commit(&state, now))
    }

    /// Recompute preview geometry for the current drag from the original
    /// snapshot and the latest point.
    pub fn preview(&self) -> Option<DragPreview> {
        let GripPhase::Dragging(state) = &self.phase else {
            return None;
        };
        let mut preview = DragPreview::default();
        match &state.original {
            DragOriginal::Entity(entity) => {
                preview.entities.push(apply_entity_grip(
                    entity,
                    &state.grip,
                    state.delta(),
                    state.target_point(),
                ));
            }
            DragOriginal::Overlays(overlays) => {
                for overlay in overlays {
                    preview.overlays.push(apply_overlay_grips(
                        overlay,
                        &state.dragged,
                        &state.grip,
                        state.delta(),
                        state.target_point(),
                    ));
                }
            }
        }
        Some(preview)
    }
}

fn build_commit(state: &DragState, now: Instant) -> Command {
    let delta = state.delta();
    match &state.original {
        DragOriginal::Entity(entity) => {
            if state.grip.moves_owner {
                // Whole-owner translations go through the move path so
                // consecutive drags can merge.
                return Command::move_targets(vec![entity.id()], vec![], delta, now);
            }
            let after = apply_entity_grip(entity, &state.grip, delta, state.target_point());
            Command::stretch(
                vec![StretchEdit::Entity {
                    id: entity.id(),
                    before: entity.clone(),
                    after,
                }],
                now,
            )
        }
        DragOriginal::Overlays(overlays) => {
            let edits = overlays
                .iter()
                .map(|overlay| StretchEdit::Overlay {
                    id: overlay.id(),
                    before: overlay.clone(),
                    after: apply_overlay_grips(
                        overlay,
                        &state.dragged,
                        &state.grip,
                        delta,
                        state.target_point(),
                    ),
                })
                .collect();
            Command::stretch(edits, now)
        }
    }
}

/// Apply a grip edit to an entity snapshot, returning the new geometry.
/// `target` is where the grabbed grip point lands.
fn apply_entity_grip(original: &Entity, grip: &Grip, delta: Vec2, target: Point) -> Entity {
    if grip.moves_owner {
        let mut moved = original.clone();
        moved.translate(delta);
        return moved;
    }
    let index = grip.id.index;
    let mut entity = original.clone();
    match &mut entity {
        Entity::Line(line) => match index {
            0 => line.start = target,
            1 => line.end = target,
            // Midpoint: stretch the whole segment.
            2 => {
                line.start += delta;
                line.end += delta;
            }
            _ => log::warn!("line has no grip {index}"),
        },
        Entity::Circle(circle) => match index {
            1..=4 => circle.radius = (target - circle.center).hypot(),
            _ => log::warn!("circle has no grip {index}"),
        },
        Entity::Arc(arc) => {
            let angle = normalize_angle_deg((target - arc.center).atan2().to_degrees());
            let radius = (target - arc.center).hypot();
            match index {
                1 => {
                    arc.start_angle = angle;
                    arc.radius = radius;
                }
                2 => {
                    arc.end_angle = angle;
                    arc.radius = radius;
                }
                _ => log::warn!("arc has no grip {index}"),
            }
        }
        Entity::Polyline(poly) => {
            let n = poly.vertices.len();
            if index < n {
                poly.vertices[index] = target;
            } else if let Some((a, b)) = poly.edge(index - n) {
                poly.vertices[a] += delta;
                poly.vertices[b] += delta;
            } else {
                log::warn!("polyline has no grip {index}");
            }
        }
        Entity::Text(_) => log::warn!("text has no stretch grip {index}"),
        Entity::AngleMeasurement(m) => match index {
            0 => m.vertex = target,
            1 => m.arm_a = target,
            2 => m.arm_b = target,
            _ => log::warn!("angle measurement has no grip {index}"),
        },
    }
    entity
}

/// Apply a grip gesture to an overlay snapshot.
///
/// Edge-midpoint drags insert a new vertex at the grip's insert index,
/// exactly once, because the result is always derived from the snapshot.
/// Vertex drags move every dragged vertex of this overlay by the same
/// delta.
fn apply_overlay_grips(
    original: &Overlay,
    dragged: &[GripId],
    primary: &Grip,
    delta: Vec2,
    target: Point,
) -> Overlay {
    let mut overlay = original.clone();
    if let Some(insert_index) = primary.insert_index {
        if primary.id.owner == GripOwner::Overlay(overlay.id()) {
            let at = insert_index.min(overlay.polygon.len());
            overlay.polygon.insert(at, target);
            return overlay;
        }
    }
    let n = overlay.polygon.len();
    for grip_id in dragged {
        if grip_id.owner != GripOwner::Overlay(overlay.id()) {
            continue;
        }
        if grip_id.index < n {
            overlay.polygon[grip_id.index] = original.polygon[grip_id.index] + delta;
        }
    }
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandHistory;
    use crate::entity::{Arc, Circle, Line};
    use crate::grip::build_grips;
    use crate::selection::SelectionSet;
    use crate::snap::NoSnap;

    fn engine() -> InteractionEngine {
        InteractionEngine::new(Box::new(NoSnap))
    }

    fn select_entity(doc: &Document, id: crate::entity::EntityId) -> Vec<Grip> {
        let mut sel = SelectionSet::new();
        sel.select_entity(id);
        build_grips(doc, &sel)
    }

    #[test]
    fn test_warm_after_delay() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        assert!(engine.pointer_moved(Point::new(0.0, 0.0), 1.0, t0));
        assert!(matches!(engine.phase(), GripPhase::Hovering { .. }));
        // Not warm yet.
        assert!(!engine.tick(t0 + Duration::from_millis(500)));
        assert!(engine.tick(t0 + WARM_DELAY));
        assert!(matches!(engine.phase(), GripPhase::Warm { .. }));
    }

    #[test]
    fn test_hover_throttled_but_pointer_tracked() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        engine.pointer_moved(Point::new(0.0, 0.0), 1.0, t0);
        assert!(matches!(engine.phase(), GripPhase::Hovering { .. }));
        // 10 ms later, far from any grip: hover work is skipped, so the
        // phase stays, but the raw pointer still updates.
        let off = Point::new(500.0, 500.0);
        assert!(!engine.pointer_moved(off, 1.0, t0 + Duration::from_millis(10)));
        assert!(matches!(engine.phase(), GripPhase::Hovering { .. }));
        assert_eq!(engine.pointer_world(), off);
        // Past the throttle the hover state catches up.
        assert!(engine.pointer_moved(off, 1.0, t0 + Duration::from_millis(40)));
        assert!(matches!(engine.phase(), GripPhase::Idle));
    }

    #[test]
    fn test_warm_requires_pointer_still_on_grip() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        engine.pointer_moved(Point::new(0.0, 0.0), 1.0, t0);
        assert!(matches!(engine.phase(), GripPhase::Hovering { .. }));
        // Pointer leaves the grip inside the throttle window, so the
        // hover state never noticed.
        engine.pointer_moved(Point::new(500.0, 500.0), 1.0, t0 + Duration::from_millis(10));
        assert!(matches!(engine.phase(), GripPhase::Hovering { .. }));
        // The warm deadline demotes instead of promoting.
        assert!(engine.tick(t0 + WARM_DELAY));
        assert!(matches!(engine.phase(), GripPhase::Idle));
    }

    #[test]
    fn test_off_center_press_drags_by_delta() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        // Press inside the tolerance but 4 units off the endpoint.
        assert_eq!(
            engine.pointer_pressed(Point::new(14.0, 0.0), 1.0, false, &doc),
            GripPress::Drag
        );
        engine.pointer_moved(Point::new(14.0, 5.0), 1.0, t0);
        engine.pointer_released(t0).unwrap().apply(&mut doc);
        // The endpoint moved by the pointer delta, not onto the cursor.
        match doc.entity(id).unwrap() {
            Entity::Line(l) => assert_eq!(l.end, Point::new(10.0, 5.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_line_endpoint_drag_commits_once() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        assert_eq!(
            engine.pointer_pressed(Point::new(10.0, 0.0), 1.0, false, &doc),
            GripPress::Drag
        );
        engine.pointer_moved(Point::new(20.0, 5.0), 1.0, t0);
        // Document untouched mid-drag.
        match doc.entity(id).unwrap() {
            Entity::Line(l) => assert_eq!(l.end, Point::new(10.0, 0.0)),
            _ => unreachable!(),
        }
        let command = engine.pointer_released(t0).unwrap();
        let mut history = CommandHistory::new();
        history.commit(&mut doc, command);
        match doc.entity(id).unwrap() {
            Entity::Line(l) => {
                assert_eq!(l.start, Point::new(0.0, 0.0));
                assert_eq!(l.end, Point::new(20.0, 5.0));
            }
            _ => unreachable!(),
        }
        // Undo restores the original geometry.
        history.undo(&mut doc);
        match doc.entity(id).unwrap() {
            Entity::Line(l) => assert_eq!(l.end, Point::new(10.0, 0.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_circle_quadrant_drag_doubles_radius() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Circle(Circle::new(Point::new(0.0, 0.0), 5.0)));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        engine.pointer_pressed(Point::new(5.0, 0.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(10.0, 0.0), 1.0, t0);
        let command = engine.pointer_released(t0).unwrap();
        command.apply(&mut doc);
        match doc.entity(id).unwrap() {
            Entity::Circle(c) => {
                assert!((c.radius - 10.0).abs() < 1e-9);
                assert_eq!(c.center, Point::new(0.0, 0.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_arc_endpoint_rederives_angle_and_radius() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Arc(Arc::new(Point::new(0.0, 0.0), 10.0, 0.0, 90.0)));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        // Grab the end point at (0, 10), drag to (-20, 0): 180 degrees,
        // radius 20.
        engine.pointer_pressed(Point::new(0.0, 10.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(-20.0, 0.0), 1.0, t0);
        engine.pointer_released(t0).unwrap().apply(&mut doc);
        match doc.entity(id).unwrap() {
            Entity::Arc(a) => {
                assert!((a.end_angle - 180.0).abs() < 1e-9);
                assert!((a.radius - 20.0).abs() < 1e-9);
                assert!(a.start_angle.abs() < 1e-9);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_escape_restores_and_leaves_history_empty() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let before = doc.entity(id).unwrap().clone();
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        engine.pointer_pressed(Point::new(10.0, 0.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(50.0, 50.0), 1.0, t0);
        assert!(engine.preview().is_some());
        assert!(engine.cancel());
        assert!(engine.preview().is_none());
        assert_eq!(doc.entity(id).unwrap(), &before);
        // A release after cancel produces nothing.
        assert!(engine.pointer_released(t0).is_none());
    }

    #[test]
    fn test_zero_delta_release_is_no_command() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));
        engine.pointer_pressed(Point::new(0.0, 0.0), 1.0, false, &doc);
        assert!(engine.pointer_released(Instant::now()).is_none());
    }

    #[test]
    fn test_center_grip_moves_whole_circle() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Circle(Circle::new(Point::new(0.0, 0.0), 5.0)));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));

        let t0 = Instant::now();
        engine.pointer_pressed(Point::new(0.0, 0.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(7.0, 3.0), 1.0, t0);
        let command = engine.pointer_released(t0).unwrap();
        // Whole-owner drags are moves, so they can merge.
        assert!(matches!(command.kind, crate::command::CommandKind::Move { .. }));
        command.apply(&mut doc);
        match doc.entity(id).unwrap() {
            Entity::Circle(c) => {
                assert_eq!(c.center, Point::new(7.0, 3.0));
                assert!((c.radius - 5.0).abs() < 1e-9);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_overlay_edge_drag_inserts_exactly_one_vertex() {
        let mut doc = Document::new();
        let id = doc.add_overlay(Overlay::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ]));
        let mut sel = SelectionSet::new();
        sel.select_overlay(id);
        let mut engine = engine();
        engine.selection_changed(build_grips(&doc, &sel));

        let t0 = Instant::now();
        // First edge midpoint at (5, 0).
        engine.pointer_pressed(Point::new(5.0, 0.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(5.0, -4.0), 1.0, t0);
        let preview = engine.preview().unwrap();
        assert_eq!(preview.overlays[0].vertex_count(), 4);
        engine.pointer_released(t0).unwrap().apply(&mut doc);
        let overlay = doc.overlay(id).unwrap();
        assert_eq!(overlay.vertex_count(), 4);
        assert_eq!(overlay.polygon[1], Point::new(5.0, -4.0));
    }

    #[test]
    fn test_shift_toggles_without_drag_and_set_moves_together() {
        let mut doc = Document::new();
        let id = doc.add_overlay(Overlay::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ]));
        let mut sel = SelectionSet::new();
        sel.select_overlay(id);
        let mut engine = engine();
        engine.selection_changed(build_grips(&doc, &sel));

        let t0 = Instant::now();
        assert_eq!(
            engine.pointer_pressed(Point::new(0.0, 0.0), 1.0, true, &doc),
            GripPress::Toggle
        );
        assert_eq!(
            engine.pointer_pressed(Point::new(10.0, 0.0), 1.0, true, &doc),
            GripPress::Toggle
        );
        assert_eq!(engine.selected_grips().len(), 2);
        assert!(!engine.is_dragging());

        // Plain press on a member drags the whole set.
        assert_eq!(
            engine.pointer_pressed(Point::new(0.0, 0.0), 1.0, false, &doc),
            GripPress::Drag
        );
        engine.pointer_moved(Point::new(0.0, 2.0), 1.0, t0);
        engine.pointer_released(t0).unwrap().apply(&mut doc);
        let overlay = doc.overlay(id).unwrap();
        assert_eq!(overlay.polygon[0], Point::new(0.0, 2.0));
        assert_eq!(overlay.polygon[1], Point::new(10.0, 2.0));
        // Unselected vertex untouched.
        assert_eq!(overlay.polygon[2], Point::new(5.0, 10.0));
    }

    #[test]
    fn test_selection_change_resets_everything() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = engine();
        engine.selection_changed(select_entity(&doc, id));
        engine.pointer_pressed(Point::new(0.0, 0.0), 1.0, false, &doc);
        assert!(engine.is_dragging());
        engine.selection_changed(Vec::new());
        assert!(matches!(engine.phase(), GripPhase::Idle));
        assert!(engine.grips().is_empty());
    }

    #[test]
    fn test_snap_applies_to_drag_point() {
        let mut doc = Document::new();
        let id = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut engine = InteractionEngine::new(Box::new(crate::snap::GridSnap { grid_size: 10.0 }));
        engine.selection_changed(select_entity(&doc, id));
        let t0 = Instant::now();
        engine.pointer_pressed(Point::new(10.0, 0.0), 1.0, false, &doc);
        engine.pointer_moved(Point::new(23.0, 18.0), 1.0, t0);
        engine.pointer_released(t0).unwrap().apply(&mut doc);
        match doc.entity(id).unwrap() {
            Entity::Line(l) => assert_eq!(l.end, Point::new(20.0, 20.0)),
            _ => unreachable!(),
        }
    }
}
