//! Selection set over entities and overlays.

use crate::entity::EntityId;
use crate::overlay::OverlayId;

/// Ordered selection of entities and overlays. Order is preserved because
/// grip enumeration and command targets follow selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    entities: Vec<EntityId>,
    overlays: Vec<OverlayId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.overlays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len() + self.overlays.len()
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn overlays(&self) -> &[OverlayId] {
        &self.overlays
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub fn contains_overlay(&self, id: OverlayId) -> bool {
        self.overlays.contains(&id)
    }

    pub fn select_entity(&mut self, id: EntityId) {
        if !self.entities.contains(&id) {
            self.entities.push(id);
        }
    }

    pub fn select_overlay(&mut self, id: OverlayId) {
        if !self.overlays.contains(&id) {
            self.overlays.push(id);
        }
    }

    /// Toggle an entity's membership.
    pub fn toggle_entity(&mut self, id: EntityId) {
        if let Some(pos) = self.entities.iter().position(|e| *e == id) {
            self.entities.remove(pos);
        } else {
            self.entities.push(id);
        }
    }

    /// Toggle an overlay's membership.
    pub fn toggle_overlay(&mut self, id: OverlayId) {
        if let Some(pos) = self.overlays.iter().position(|o| *o == id) {
            self.overlays.remove(pos);
        } else {
            self.overlays.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.overlays.clear();
    }

    /// Replace the whole selection, dropping duplicates while keeping
    /// first-seen order.
    pub fn set(&mut self, entities: Vec<EntityId>, overlays: Vec<OverlayId>) {
        self.clear();
        for id in entities {
            self.select_entity(id);
        }
        for id in overlays {
            self.select_overlay(id);
        }
    }
}
