//! Entity hit testing at a screen point.

use crate::camera::{Camera, Viewport};
use crate::document::Document;
use crate::entity::EntityId;
use kurbo::Point;

/// Pick tolerance and candidate cap for entity hit tests.
#[derive(Debug, Clone, Copy)]
pub struct HitTestOptions {
    /// Tolerance in screen pixels.
    pub tolerance_px: f64,
    /// Stop after evaluating this many visible entities, hit or miss.
    /// Bounds the per-click work on dense documents.
    pub max_results: usize,
}

impl Default for HitTestOptions {
    fn default() -> Self {
        Self {
            tolerance_px: 10.0,
            max_results: 32,
        }
    }
}

/// Find the entity nearest a screen point, or `None`.
///
/// Visible entities are examined topmost first, at most `max_results` of
/// them; among in-tolerance candidates the smallest world distance wins,
/// with the topmost entity breaking ties. Returns `None` when the
/// viewport is not ready.
pub fn hit_test_entity(
    document: &Document,
    screen: Point,
    camera: &Camera,
    viewport: Viewport,
    opts: HitTestOptions,
) -> Option<EntityId> {
    if viewport.is_empty() {
        return None;
    }
    let world = camera.screen_to_world(screen);
    let tolerance = opts.tolerance_px / camera.zoom;

    let mut best: Option<(EntityId, f64)> = None;
    let mut evaluated = 0usize;
    let ordered: Vec<_> = document.entities_ordered().collect();
    for entity in ordered.into_iter().rev() {
        if !entity.is_visible() {
            continue;
        }
        let dist = entity.distance_to(world);
        evaluated += 1;
        if dist <= tolerance {
            match best {
                Some((_, d)) if dist >= d => {}
                _ => best = Some((entity.id(), dist)),
            }
        }
        if evaluated >= opts.max_results {
            break;
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Circle, Entity, EntityGeometry, Line};

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn test_topmost_wins_tie() {
        let mut doc = Document::new();
        let bottom = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let top = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let camera = Camera::default();
        let hit = hit_test_entity(
            &doc,
            Point::new(5.0, 0.0),
            &camera,
            viewport(),
            HitTestOptions::default(),
        );
        assert_eq!(hit, Some(top));
        assert_ne!(hit, Some(bottom));
    }

    #[test]
    fn test_nearest_beats_topmost_when_closer() {
        let mut doc = Document::new();
        let near = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 1.0),
            Point::new(10.0, 1.0),
        )));
        doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 8.0),
            Point::new(10.0, 8.0),
        )));
        let camera = Camera::default();
        let hit = hit_test_entity(
            &doc,
            Point::new(5.0, 0.0),
            &camera,
            viewport(),
            HitTestOptions::default(),
        );
        assert_eq!(hit, Some(near));
    }

    #[test]
    fn test_invisible_entities_skipped() {
        let mut doc = Document::new();
        let mut circle = Circle::new(Point::new(0.0, 0.0), 5.0);
        circle.props.visible = false;
        let id = circle.id();
        doc.add_entity(Entity::Circle(circle));
        let camera = Camera::default();
        let hit = hit_test_entity(
            &doc,
            Point::new(5.0, 0.0),
            &camera,
            viewport(),
            HitTestOptions::default(),
        );
        assert_ne!(hit, Some(id));
        assert_eq!(hit, None);
    }

    #[test]
    fn test_empty_viewport_short_circuits() {
        let mut doc = Document::new();
        doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let camera = Camera::default();
        let hit = hit_test_entity(
            &doc,
            Point::new(5.0, 0.0),
            &camera,
            Viewport::default(),
            HitTestOptions::default(),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn test_max_results_caps_evaluated_entities() {
        let mut doc = Document::new();
        // Bottom of the z-order: the only entity near the probe point.
        let near = doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        // Stacked on top: all far from the probe, all still evaluated.
        for i in 0..5 {
            doc.add_entity(Entity::Line(Line::new(
                Point::new(100.0 + i as f64, 100.0),
                Point::new(110.0 + i as f64, 100.0),
            )));
        }
        let camera = Camera::default();
        let opts = HitTestOptions {
            tolerance_px: 10.0,
            max_results: 3,
        };
        // The cap stops the scan before it reaches the bottom entity.
        let hit = hit_test_entity(&doc, Point::new(5.0, 0.0), &camera, viewport(), opts);
        assert_eq!(hit, None);
        let hit = hit_test_entity(
            &doc,
            Point::new(5.0, 0.0),
            &camera,
            viewport(),
            HitTestOptions::default(),
        );
        assert_eq!(hit, Some(near));
    }

    #[test]
    fn test_tolerance_in_screen_space() {
        let mut doc = Document::new();
        doc.add_entity(Entity::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        )));
        let mut camera = Camera::default();
        camera.zoom_at(Point::ZERO, 10.0);
        // 8 world units away: at zoom 10 that is 80 px, outside a 10 px pick.
        let hit = hit_test_entity(
            &doc,
            camera.world_to_screen(Point::new(5.0, 8.0)),
            &camera,
            viewport(),
            HitTestOptions::default(),
        );
        assert_eq!(hit, None);
    }
}
