//! Undoable commands and history.
//!
//! Commands are built with their inverse already determined: a move undoes
//! by the negated delta, a stretch carries both the before and after
//! geometry. Applying a command to the document is therefore a pure
//! replacement, and stale targets degrade to a logged skip instead of an
//! error.

use crate::document::Document;
use crate::entity::{Entity, EntityId};
use crate::overlay::{Overlay, OverlayId};
use kurbo::Vec2;
use std::time::{Duration, Instant};

/// Maximum number of undoable commands kept.
pub const MAX_HISTORY: usize = 50;

/// Consecutive same-target commits inside this window merge into one
/// undo step.
pub const MERGE_WINDOW: Duration = Duration::from_millis(500);

/// Base nudge distance in world units.
pub const NUDGE_STEP: f64 = 1.0;

/// One geometry replacement inside a stretch command.
#[derive(Debug, Clone)]
pub enum StretchEdit {
    Entity {
        id: EntityId,
        before: Entity,
        after: Entity,
    },
    Overlay {
        id: OverlayId,
        before: Overlay,
        after: Overlay,
    },
}

impl StretchEdit {
    fn inverted(&self) -> StretchEdit {
        match self {
            StretchEdit::Entity { id, before, after } => StretchEdit::Entity {
                id: *id,
                before: after.clone(),
                after: before.clone(),
            },
            StretchEdit::Overlay { id, before, after } => StretchEdit::Overlay {
                id: *id,
                before: after.clone(),
                after: before.clone(),
            },
        }
    }

    fn target_key(&self) -> GripTargetKey {
        match self {
            StretchEdit::Entity { id, .. } => GripTargetKey::Entity(*id),
            StretchEdit::Overlay { id, .. } => GripTargetKey::Overlay(*id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GripTargetKey {
    Entity(EntityId),
    Overlay(OverlayId),
}

/// What a command does to the document.
#[derive(Debug, Clone)]
pub enum CommandKind {
    /// Translate a set of entities and overlays.
    Move {
        entities: Vec<EntityId>,
        overlays: Vec<OverlayId>,
        delta: Vec2,
    },
    /// Replace geometry wholesale on one or more targets.
    Stretch { edits: Vec<StretchEdit> },
}

/// An undoable edit, timestamped for merge decisions.
#[derive(Debug, Clone)]
pub struct Command {
    pub kind: CommandKind,
    pub at: Instant,
}

impl Command {
    pub fn move_targets(
        entities: Vec<EntityId>,
        overlays: Vec<OverlayId>,
        delta: Vec2,
        at: Instant,
    ) -> Self {
        Self {
            kind: CommandKind::Move {
                entities,
                overlays,
                delta,
            },
            at,
        }
    }

    pub fn stretch(edits: Vec<StretchEdit>, at: Instant) -> Self {
        Self {
            kind: CommandKind::Stretch { edits },
            at,
        }
    }

    /// Apply to the document. Missing targets are skipped.
    pub fn apply(&self, document: &mut Document) {
        match &self.kind {
            CommandKind::Move {
                entities,
                overlays,
                delta,
            } => {
                document.translate_entities(entities, *delta);
                document.translate_overlays(overlays, *delta);
            }
            CommandKind::Stretch { edits } => {
                for edit in edits {
                    let result = match edit {
                        StretchEdit::Entity { id, after, .. } => document
                            .replace_entity(*id, after.clone())
                            .map(|_| ())
                            .map_err(|e| e.to_string()),
                        StretchEdit::Overlay { id, after, .. } => document
                            .replace_overlay(*id, after.clone())
                            .map(|_| ())
                            .map_err(|e| e.to_string()),
                    };
                    if let Err(err) = result {
                        log::warn!("stretch skipped stale target: {err}");
                    }
                }
            }
        }
    }

    /// The command that exactly reverses this one.
    pub fn inverse(&self) -> Command {
        let kind = match &self.kind {
            CommandKind::Move {
                entities,
                overlays,
                delta,
            } => CommandKind::Move {
                entities: entities.clone(),
                overlays: overlays.clone(),
                delta: -*delta,
            },
            CommandKind::Stretch { edits } => CommandKind::Stretch {
                edits: edits.iter().map(StretchEdit::inverted).collect(),
            },
        };
        Command { kind, at: self.at }
    }

    /// Fold `newer` into `self` when both are the same kind of edit on the
    /// same targets and `newer` landed inside the merge window.
    pub fn try_merge(&mut self, newer: &Command) -> bool {
        if newer.at.duration_since(self.at) > MERGE_WINDOW {
            return false;
        }
        match (&mut self.kind, &newer.kind) {
            (
                CommandKind::Move {
                    entities,
                    overlays,
                    delta,
                },
                CommandKind::Move {
                    entities: ne,
                    overlays: no,
                    delta: nd,
                },
            ) if entities == ne && overlays == no => {
                *delta += *nd;
                self.at = newer.at;
                true
            }
            (CommandKind::Stretch { edits }, CommandKind::Stretch { edits: newer_edits }) => {
                let same_targets = edits.len() == newer_edits.len()
                    && edits
                        .iter()
                        .zip(newer_edits)
                        .all(|(a, b)| a.target_key() == b.target_key());
                if !same_targets {
                    return false;
                }
                for (edit, newer_edit) in edits.iter_mut().zip(newer_edits) {
                    match (edit, newer_edit) {
                        (
                            StretchEdit::Entity { after, .. },
                            StretchEdit::Entity { after: na, .. },
                        ) => *after = na.clone(),
                        (
                            StretchEdit::Overlay { after, .. },
                            StretchEdit::Overlay { after: na, .. },
                        ) => *after = na.clone(),
                        _ => unreachable!("target keys matched"),
                    }
                }
                self.at = newer.at;
                true
            }
            _ => false,
        }
    }
}

/// Arrow-key nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    pub fn unit(self) -> Vec2 {
        match self {
            NudgeDirection::Left => Vec2::new(-1.0, 0.0),
            NudgeDirection::Right => Vec2::new(1.0, 0.0),
            NudgeDirection::Up => Vec2::new(0.0, 1.0),
            NudgeDirection::Down => Vec2::new(0.0, -1.0),
        }
    }
}

/// Nudge step modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NudgeStep {
    #[default]
    Normal,
    /// Shift: ten times the base step.
    Large,
    /// Ctrl: one tenth of the base step.
    Small,
}

impl NudgeStep {
    pub fn scale(self) -> f64 {
        match self {
            NudgeStep::Normal => 1.0,
            NudgeStep::Large => 10.0,
            NudgeStep::Small => 0.1,
        }
    }
}

/// Build the move command for an arrow-key nudge of the selection.
pub fn nudge_command(
    entities: Vec<EntityId>,
    overlays: Vec<OverlayId>,
    direction: NudgeDirection,
    step: NudgeStep,
    at: Instant,
) -> Command {
    let delta = direction.unit() * (NUDGE_STEP * step.scale());
    Command::move_targets(entities, overlays, delta, at)
}

/// Undo/redo stacks with merge-on-commit.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Apply a new command and record it. Returns true when it merged into
    /// the previous undo step.
    pub fn commit(&mut self, document: &mut Document, command: Command) -> bool {
        command.apply(document);
        self.redo.clear();
        if let Some(last) = self.undo.last_mut() {
            if last.try_merge(&command) {
                return true;
            }
        }
        self.undo.push(command);
        if self.undo.len() > MAX_HISTORY {
            let drop = self.undo.len() - MAX_HISTORY;
            self.undo.drain(..drop);
        }
        false
    }

    /// Undo the most recent command. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        let Some(command) = self.undo.pop() else {
            return false;
        };
        command.inverse().apply(document);
        self.redo.push(command);
        true
    }

    /// Redo the most recently undone command.
    pub fn redo(&mut self, document: &mut Document) -> bool {
        let Some(command) = self.redo.pop() else {
            return false;
        };
        command.apply(document);
        self.undo.push(command);
        true
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
