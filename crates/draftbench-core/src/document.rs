//! The drawing document: entities in z-order plus overlays.

use crate::entity::{Entity, EntityId};
use crate::overlay::{Overlay, OverlayId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors for document mutations.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("entity {0} not found")]
    MissingEntity(EntityId),
    #[error("overlay {0} not found")]
    MissingOverlay(OverlayId),
    #[error("vertex index {index} out of range for polygon of {len} vertices")]
    VertexOutOfRange { index: usize, len: usize },
}

/// The drawing model. Entities keep a stable z-order; overlays keep
/// insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    entities: HashMap<EntityId, Entity>,
    z_order: Vec<EntityId>,
    overlays: HashMap<OverlayId, Overlay>,
    overlay_order: Vec<OverlayId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.overlays.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Add an entity on top of the z-order. Returns its id.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.entities.insert(id, entity);
        self.z_order.push(id);
        id
    }

    /// Remove an entity. Returns it if present.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id);
        if removed.is_some() {
            self.z_order.retain(|e| *e != id);
        }
        removed
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entities in z-order, bottom first.
    pub fn entities_ordered(&self) -> impl Iterator<Item = &Entity> {
        self.z_order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Replace an entity's geometry wholesale, keeping its z position.
    /// Returns the previous value.
    pub fn replace_entity(&mut self, id: EntityId, entity: Entity) -> Result<Entity, DocumentError> {
        match self.entities.get_mut(&id) {
            Some(slot) => Ok(std::mem::replace(slot, entity)),
            None => Err(DocumentError::MissingEntity(id)),
        }
    }

    /// Add an overlay. Returns its id.
    pub fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        let id = overlay.id();
        self.overlays.insert(id, overlay);
        self.overlay_order.push(id);
        id
    }

    /// Remove an overlay. Returns it if present.
    pub fn remove_overlay(&mut self, id: OverlayId) -> Option<Overlay> {
        let removed = self.overlays.remove(&id);
        if removed.is_some() {
            self.overlay_order.retain(|o| *o != id);
        }
        removed
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// Overlays in insertion order.
    pub fn overlays_ordered(&self) -> impl Iterator<Item = &Overlay> {
        self.overlay_order.iter().filter_map(|id| self.overlays.get(id))
    }

    /// Replace an overlay wholesale. Returns the previous value.
    pub fn replace_overlay(
        &mut self,
        id: OverlayId,
        overlay: Overlay,
    ) -> Result<Overlay, DocumentError> {
        match self.overlays.get_mut(&id) {
            Some(slot) => Ok(std::mem::replace(slot, overlay)),
            None => Err(DocumentError::MissingOverlay(id)),
        }
    }

    /// Move one overlay vertex. Returns the previous position.
    pub fn replace_overlay_vertex(
        &mut self,
        id: OverlayId,
        index: usize,
        point: Point,
    ) -> Result<Point, DocumentError> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(DocumentError::MissingOverlay(id))?;
        let len = overlay.polygon.len();
        let slot = overlay
            .polygon
            .get_mut(index)
            .ok_or(DocumentError::VertexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, point))
    }

    /// Insert a new vertex before `index` (index == len appends).
    pub fn insert_overlay_vertex(
        &mut self,
        id: OverlayId,
        index: usize,
        point: Point,
    ) -> Result<(), DocumentError> {
        let overlay = self
            .overlays
            .get_mut(&id)
            .ok_or(DocumentError::MissingOverlay(id))?;
        let len = overlay.polygon.len();
        if index > len {
            return Err(DocumentError::VertexOutOfRange { index, len });
        }
        overlay.polygon.insert(index, point);
        Ok(())
    }

    /// Translate a set of entities. Stale ids are skipped.
    pub fn translate_entities(&mut self, ids: &[EntityId], delta: Vec2) {
        for id in ids {
            match self.entities.get_mut(id) {
                Some(entity) => entity.translate(delta),
                None => log::debug!("translate skipped stale entity {id}"),
            }
        }
    }

    /// Translate a set of overlays. Stale ids are skipped.
    pub fn translate_overlays(&mut self, ids: &[OverlayId], delta: Vec2) {
        for id in ids {
            match self.overlays.get_mut(id) {
                Some(overlay) => {
                    for v in &mut overlay.polygon {
                        *v += delta;
                    }
                }
                None => log::debug!("translate skipped stale overlay {id}"),
            }
        }
    }

    /// Union bounds of all visible content, or `None` for an empty document.
    pub fn bounds(&self) -> Option<Rect> {
        let mut acc: Option<Rect> = None;
        for entity in self.entities_ordered().filter(|e| e.is_visible()) {
            let b = entity.bounds();
            acc = Some(acc.map_or(b, |r| r.union(b)));
        }
        for overlay in self.overlays_ordered() {
            let b = overlay.bounds();
            acc = Some(acc.map_or(b, |r| r.union(b)));
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Line;

    #[test]
    fn test_z_order_preserved() {
        let mut doc = Document::new();
        let a = doc.add_entity(Entity::Line(Line::new(Point::ZERO, Point::new(1.0, 0.0))));
        let b = doc.add_entity(Entity::Line(Line::new(Point::ZERO, Point::new(2.0, 0.0))));
        let order: Vec<_> = doc.entities_ordered().map(|e| e.id()).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_replace_keeps_z_position() {
        let mut doc = Document::new();
        let a = doc.add_entity(Entity::Line(Line::new(Point::ZERO, Point::new(1.0, 0.0))));
        let b = doc.add_entity(Entity::Line(Line::new(Point::ZERO, Point::new(2.0, 0.0))));
        let mut replacement = doc.entity(a).unwrap().clone();
        replacement.translate(Vec2::new(5.0, 0.0));
        doc.replace_entity(a, replacement).unwrap();
        let order: Vec<_> = doc.entities_ordered().map(|e| e.id()).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_replace_missing_entity_errors() {
        let mut doc = Document::new();
        let ghost = Entity::Line(Line::new(Point::ZERO, Point::new(1.0, 0.0)));
        let err = doc.replace_entity(ghost.id(), ghost.clone()).unwrap_err();
        assert_eq!(err, DocumentError::MissingEntity(ghost.id()));
    }

    #[test]
    fn test_translate_skips_stale_ids() {
        let mut doc = Document::new();
        let line = Line::new(Point::ZERO, Point::new(1.0, 0.0));
        let a = doc.add_entity(Entity::Line(line));
        let stale = uuid::Uuid::new_v4();
        doc.translate_entities(&[a, stale], Vec2::new(3.0, 0.0));
        match doc.entity(a).unwrap() {
            Entity::Line(l) => assert_eq!(l.start, Point::new(3.0, 0.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_overlay_vertex_edits() {
        let mut doc = Document::new();
        let id = doc.add_overlay(Overlay::new(vec![
            Point::ZERO,
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
        let prev = doc
            .replace_overlay_vertex(id, 1, Point::new(12.0, 0.0))
            .unwrap();
        assert_eq!(prev, Point::new(10.0, 0.0));
        doc.insert_overlay_vertex(id, 1, Point::new(5.0, -1.0)).unwrap();
        assert_eq!(doc.overlay(id).unwrap().vertex_count(), 4);
        let err = doc
            .insert_overlay_vertex(id, 9, Point::ZERO)
            .unwrap_err();
        assert_eq!(err, DocumentError::VertexOutOfRange { index: 9, len: 4 });
    }
}
