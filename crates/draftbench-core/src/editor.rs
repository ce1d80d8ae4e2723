//! The assembled editing surface.
//!
//! `Editor` owns the document, camera, selection and interaction state and
//! routes raw pointer/keyboard events through them. Presses are offered to
//! the grip engine first; only a miss falls through to marquee selection.

use crate::camera::{Camera, Viewport};
use crate::command::{CommandHistory, NudgeDirection, NudgeStep, nudge_command};
use crate::document::Document;
use crate::entity::EntityId;
use crate::events::{EditorEvent, EditorEventHandler, EventBus};
use crate::grip::{Grip, build_grips};
use crate::hit_test::{HitTestOptions, hit_test_entity};
use crate::input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::interaction::{DragPreview, GripPress, HOVER_THROTTLE, InteractionEngine};
use crate::marquee::{ClickHit, Marquee, MarqueeOutcome, resolve_marquee};
use crate::overlay::OverlayId;
use crate::selection::SelectionSet;
use crate::snap::SnapProvider;
use kurbo::{Point, Rect, Vec2};
use std::time::Instant;

/// Scroll zoom factor per wheel notch.
const SCROLL_ZOOM_STEP: f64 = 1.1;

pub struct Editor {
    document: Document,
    camera: Camera,
    viewport: Viewport,
    selection: SelectionSet,
    interaction: InteractionEngine,
    history: CommandHistory,
    events: EventBus,
    input: InputState,
    marquee: Option<Marquee>,
    hover_entity: Option<EntityId>,
    hover_overlay: Option<OverlayId>,
    last_hover_at: Option<Instant>,
}

impl Editor {
    pub fn new(snap: Box<dyn SnapProvider>) -> Self {
        Self {
            document: Document::new(),
            camera: Camera::default(),
            viewport: Viewport::default(),
            selection: SelectionSet::new(),
            interaction: InteractionEngine::new(snap),
            history: CommandHistory::new(),
            events: EventBus::new(),
            input: InputState::new(),
            marquee: None,
            hover_entity: None,
            hover_overlay: None,
            last_hover_at: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable model access for hosts; call [`Editor::refresh_grips`] after
    /// editing selected geometry directly.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn grips(&self) -> &[Grip] {
        self.interaction.grips()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Preview geometry for the in-flight drag, if any.
    pub fn drag_preview(&self) -> Option<DragPreview> {
        self.interaction.preview()
    }

    /// The marquee rectangle in screen space, if one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.map(|m| m.rect())
    }

    /// Raw cursor position in world space.
    pub fn pointer_world(&self) -> Point {
        self.interaction.pointer_world()
    }

    pub fn hover_entity(&self) -> Option<EntityId> {
        self.hover_entity
    }

    pub fn subscribe(&mut self, handler: Box<dyn EditorEventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.emit_transform();
    }

    pub fn zoom_at(&mut self, screen_anchor: Point, factor: f64) {
        self.camera.zoom_at(screen_anchor, factor);
        self.emit_transform();
    }

    fn emit_transform(&mut self) {
        self.events.emit(&EditorEvent::TransformChanged {
            offset: self.camera.offset,
            zoom: self.camera.zoom,
        });
    }

    /// Replace the selection programmatically.
    pub fn select(&mut self, entities: Vec<EntityId>, overlays: Vec<OverlayId>) {
        self.selection.set(entities, overlays);
        self.sync_selection();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.sync_selection();
    }

    /// Rebuild grips after geometry changed under the current selection.
    pub fn refresh_grips(&mut self) {
        self.interaction
            .selection_changed(build_grips(&self.document, &self.selection));
    }

    fn sync_selection(&mut self) {
        self.refresh_grips();
        self.events.emit(&EditorEvent::SelectionChanged {
            entities: self.selection.entities().to_vec(),
            overlays: self.selection.overlays().to_vec(),
        });
    }

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.document);
        if done {
            self.refresh_grips();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.document);
        if done {
            self.refresh_grips();
        }
        done
    }

    /// Advance time-based interaction state (the warm timer).
    pub fn tick(&mut self, now: Instant) -> bool {
        self.interaction.tick(now)
    }

    /// Route a pointer event. Returns true when a redraw is needed.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> bool {
        self.input.apply(&event, now);
        if self.viewport.is_empty() {
            return false;
        }
        match event {
            PointerEvent::Down {
                pos,
                button: MouseButton::Left,
                modifiers,
            } => self.on_left_down(pos, modifiers),
            PointerEvent::Down {
                button: MouseButton::Right,
                ..
            } => self.interaction.cancel(),
            PointerEvent::Down { .. } => false,
            PointerEvent::Move { pos, modifiers: _ } => self.on_move(pos, now),
            PointerEvent::Up {
                pos,
                button: MouseButton::Left,
                modifiers,
            } => self.on_left_up(pos, modifiers, now),
            PointerEvent::Up { .. } => false,
            PointerEvent::Leave => {
                self.marquee = None;
                false
            }
            PointerEvent::Scroll { pos, delta, .. } => {
                let factor = if delta.y > 0.0 {
                    SCROLL_ZOOM_STEP
                } else {
                    1.0 / SCROLL_ZOOM_STEP
                };
                self.zoom_at(pos, factor);
                true
            }
        }
    }

    fn on_left_down(&mut self, pos: Point, modifiers: Modifiers) -> bool {
        let world = self.camera.screen_to_world(pos);
        match self
            .interaction
            .pointer_pressed(world, self.camera.zoom, modifiers.shift, &self.document)
        {
            GripPress::Drag | GripPress::Toggle => true,
            GripPress::Miss => {
                self.marquee = Some(Marquee::new(pos));
                true
            }
        }
    }

    fn on_move(&mut self, pos: Point, now: Instant) -> bool {
        let world = self.camera.screen_to_world(pos);
        if let Some(marquee) = &mut self.marquee {
            marquee.update(pos);
            // Keep the raw pointer current for the crosshair.
            self.interaction.pointer_moved(world, self.camera.zoom, now);
            return true;
        }
        let redraw = self
            .interaction
            .pointer_moved(world, self.camera.zoom, now);
        if !self.interaction.is_dragging() {
            return self.update_hover(pos, world, now) || redraw;
        }
        redraw
    }

    /// Hover hit tests share the grip engine's throttle interval.
    fn update_hover(&mut self, screen: Point, world: Point, now: Instant) -> bool {
        if let Some(last) = self.last_hover_at {
            if now.duration_since(last) < HOVER_THROTTLE {
                return false;
            }
        }
        self.last_hover_at = Some(now);

        let overlay = self
            .document
            .overlays_ordered()
            .filter(|o| o.contains(world))
            .last()
            .map(|o| o.id());
        let entity = hit_test_entity(
            &self.document,
            screen,
            &self.camera,
            self.viewport,
            HitTestOptions::default(),
        );

        let mut changed = false;
        if overlay != self.hover_overlay {
            self.hover_overlay = overlay;
            self.events.emit(&EditorEvent::HoverOverlay { id: overlay });
            changed = true;
        }
        if entity != self.hover_entity {
            self.hover_entity = entity;
            self.events.emit(&EditorEvent::HoverEntity { id: entity });
            changed = true;
        }
        changed
    }

    fn on_left_up(&mut self, pos: Point, modifiers: Modifiers, now: Instant) -> bool {
        if let Some(mut marquee) = self.marquee.take() {
            marquee.update(pos);
            let outcome = resolve_marquee(&marquee, &self.document, &self.camera, self.viewport);
            self.apply_marquee(outcome, modifiers, marquee.start);
            return true;
        }
        if let Some(command) = self.interaction.pointer_released(now) {
            let merged = self.history.commit(&mut self.document, command);
            self.events.emit(&EditorEvent::CommandCommitted { merged });
            self.refresh_grips();
            return true;
        }
        false
    }

    fn apply_marquee(&mut self, outcome: MarqueeOutcome, modifiers: Modifiers, start: Point) {
        match outcome {
            MarqueeOutcome::Click(hit) => match hit {
                ClickHit::Overlay(id) => {
                    if modifiers.shift {
                        self.selection.toggle_overlay(id);
                    } else {
                        self.selection.set(Vec::new(), vec![id]);
                    }
                    self.sync_selection();
                }
                ClickHit::Entity(id) => {
                    if modifiers.shift {
                        self.selection.toggle_entity(id);
                    } else {
                        self.selection.set(vec![id], Vec::new());
                    }
                    self.sync_selection();
                }
                ClickHit::Empty => {
                    if !modifiers.shift && !self.selection.is_empty() {
                        self.selection.clear();
                        self.sync_selection();
                    }
                    let world = self.camera.screen_to_world(start);
                    self.events.emit(&EditorEvent::CanvasClick { world });
                }
            },
            MarqueeOutcome::Select(hit) => {
                if modifiers.shift {
                    for id in hit.entities {
                        self.selection.select_entity(id);
                    }
                    for id in hit.overlays {
                        self.selection.select_overlay(id);
                    }
                } else {
                    self.selection.set(hit.entities, hit.overlays);
                }
                self.sync_selection();
            }
        }
    }

    /// Route a key event. Returns true when a redraw is needed.
    pub fn handle_key(&mut self, event: KeyEvent, now: Instant) -> bool {
        match event.key {
            Key::Escape => {
                if self.interaction.cancel() {
                    return true;
                }
                if self.marquee.take().is_some() {
                    return true;
                }
                if !self.selection.is_empty() {
                    self.selection.clear();
                    self.sync_selection();
                    return true;
                }
                false
            }
            Key::ArrowLeft => self.nudge(NudgeDirection::Left, event.modifiers, now),
            Key::ArrowRight => self.nudge(NudgeDirection::Right, event.modifiers, now),
            Key::ArrowUp => self.nudge(NudgeDirection::Up, event.modifiers, now),
            Key::ArrowDown => self.nudge(NudgeDirection::Down, event.modifiers, now),
            _ => false,
        }
    }

    fn nudge(&mut self, direction: NudgeDirection, modifiers: Modifiers, now: Instant) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let step = if modifiers.shift {
            NudgeStep::Large
        } else if modifiers.ctrl {
            NudgeStep::Small
        } else {
            NudgeStep::Normal
        };
        let command = nudge_command(
            self.selection.entities().to_vec(),
            self.selection.overlays().to_vec(),
            direction,
            step,
            now,
        );
        let merged = self.history.commit(&mut self.document, command);
        self.events.emit(&EditorEvent::CommandCommitted { merged });
        self.refresh_grips();
        true
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("entities", &self.document.entity_count())
            .field("overlays", &self.document.overlay_count())
            .field("selection", &self.selection.len())
            .finish()
    }
}
