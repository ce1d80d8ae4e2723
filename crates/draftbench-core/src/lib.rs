//! DraftBench Core Library
//!
//! Platform-agnostic model and direct-manipulation engine for the
//! DraftBench drawing editor: entities, overlays, grips, selection,
//! undoable commands and the pointer interaction state machine.

pub mod camera;
pub mod command;
pub mod document;
pub mod editor;
pub mod entity;
pub mod events;
pub mod grip;
pub mod hit_test;
pub mod input;
pub mod interaction;
pub mod marquee;
pub mod overlay;
pub mod selection;
pub mod snap;

pub use camera::{Camera, PointerSnapshot, Viewport};
pub use command::{
    Command, CommandHistory, CommandKind, MAX_HISTORY, MERGE_WINDOW, NudgeDirection, NudgeStep,
    StretchEdit, nudge_command,
};
pub use document::{Document, DocumentError};
pub use editor::Editor;
pub use entity::{
    AngleMeasurement, Arc, Circle, Entity, EntityColor, EntityGeometry, EntityId, EntityProps,
    Line, LineType, Polyline, Text,
};
pub use events::{EditorEvent, EditorEventHandler, EventBus};
pub use grip::{
    GRIP_TOLERANCE_PX, Grip, GripId, GripKind, GripOwner, build_grips, find_nearest_grip,
};
pub use hit_test::{HitTestOptions, hit_test_entity};
pub use input::{InputState, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{
    DragPreview, DragState, GripPhase, GripPress, HOVER_THROTTLE, InteractionEngine, WARM_DELAY,
};
pub use marquee::{
    ClickHit, MIN_MARQUEE_PX, Marquee, MarqueeHit, MarqueeMode, MarqueeOutcome, resolve_click,
    resolve_marquee,
};
pub use overlay::{Overlay, OverlayId};
pub use selection::SelectionSet;
pub use snap::{GRID_SIZE, GridSnap, NoSnap, SnapProvider, resolve_snap};
