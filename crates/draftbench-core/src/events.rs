//! Typed editor events and a simple subscriber bus.

use crate::entity::EntityId;
use crate::overlay::OverlayId;
use kurbo::{Point, Vec2};

/// Notifications the editor emits to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The camera moved or zoomed.
    TransformChanged { offset: Vec2, zoom: f64 },
    /// The selection changed.
    SelectionChanged {
        entities: Vec<EntityId>,
        overlays: Vec<OverlayId>,
    },
    /// The entity under the cursor changed.
    HoverEntity { id: Option<EntityId> },
    /// The overlay under the cursor changed.
    HoverOverlay { id: Option<OverlayId> },
    /// A click landed on empty canvas.
    CanvasClick { world: Point },
    /// An undoable command was applied.
    CommandCommitted { merged: bool },
}

/// Receives editor events.
pub trait EditorEventHandler {
    fn handle(&mut self, event: &EditorEvent);
}

impl<F: FnMut(&EditorEvent)> EditorEventHandler for F {
    fn handle(&mut self, event: &EditorEvent) {
        self(event)
    }
}

/// Fan-out to registered handlers, in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Box<dyn EditorEventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: Box<dyn EditorEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        log::trace!("event: {event:?}");
        for handler in &mut self.handlers {
            handler.handle(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
