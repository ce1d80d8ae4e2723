//! Priority-ordered draw passes with dirty flags.
//!
//! State changes never draw synchronously; they mark a pass dirty and the
//! next `run_frame` evaluates dirty passes lowest priority first. A
//! failing pass is logged, left dirty for the next frame and the rest of
//! the frame still runs.

use crate::context::FrameContext;
use thiserror::Error;

/// Standard pass names.
pub const PASS_SCENE: &str = "scene";
pub const PASS_GRID: &str = "grid";
pub const PASS_GUIDES: &str = "guides";
pub const PASS_RULERS: &str = "rulers";
pub const PASS_SELECTION: &str = "selection";
pub const PASS_CROSSHAIR: &str = "crosshair";

/// Standard pass priorities; lower draws first.
pub const PRIORITY_SCENE: u32 = 10;
pub const PRIORITY_GRID: u32 = 20;
pub const PRIORITY_GUIDES: u32 = 30;
pub const PRIORITY_RULERS: u32 = 40;
pub const PRIORITY_SELECTION: u32 = 50;
pub const PRIORITY_CROSSHAIR: u32 = 60;

/// Draw pass errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pass '{pass}' failed: {message}")]
    PassFailed { pass: String, message: String },
    #[error("surface error: {0}")]
    Surface(String),
}

/// One schedulable draw pass.
pub trait RenderPass {
    fn name(&self) -> &str;
    fn priority(&self) -> u32;
    fn draw(&mut self, ctx: &FrameContext<'_>) -> Result<(), RenderError>;
}

/// Closure-backed pass, for hosts that don't need a full type.
pub struct FnPass<F> {
    name: String,
    priority: u32,
    draw: F,
}

impl<F> FnPass<F>
where
    F: FnMut(&FrameContext<'_>) -> Result<(), RenderError>,
{
    pub fn new(name: impl Into<String>, priority: u32, draw: F) -> Self {
        Self {
            name: name.into(),
            priority,
            draw,
        }
    }
}

impl<F> RenderPass for FnPass<F>
where
    F: FnMut(&FrameContext<'_>) -> Result<(), RenderError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn draw(&mut self, ctx: &FrameContext<'_>) -> Result<(), RenderError> {
        (self.draw)(ctx)
    }
}

struct Slot {
    pass: Box<dyn RenderPass>,
    dirty: bool,
}

/// What one `run_frame` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Passes drawn successfully.
    pub drawn: usize,
    /// Passes that returned an error.
    pub failed: usize,
}

/// Registry and dispatcher for draw passes.
#[derive(Default)]
pub struct RenderScheduler {
    slots: Vec<Slot>,
    /// Marking the first pass dirty also marks the second.
    couplings: Vec<(String, String)>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler pre-wired with the editor's coupling: the selection
    /// overlay is composited with the scene, so a selection change must
    /// also redraw the scene (and the other way round a scene clear
    /// repaints the selection).
    pub fn with_standard_couplings() -> Self {
        let mut scheduler = Self::new();
        scheduler.couple(PASS_SELECTION, PASS_SCENE);
        scheduler.couple(PASS_SCENE, PASS_SELECTION);
        scheduler
    }

    /// Register a pass, keeping the list sorted by priority. New passes
    /// start dirty.
    pub fn register(&mut self, pass: Box<dyn RenderPass>) {
        let at = self
            .slots
            .partition_point(|slot| slot.pass.priority() <= pass.priority());
        self.slots.insert(at, Slot { pass, dirty: true });
    }

    /// Declare that marking `trigger` dirty also marks `also`.
    pub fn couple(&mut self, trigger: impl Into<String>, also: impl Into<String>) {
        self.couplings.push((trigger.into(), also.into()));
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.dirty && slot.pass.name() == name)
    }

    /// Mark a pass (and everything coupled to it) dirty.
    pub fn mark_dirty(&mut self, name: &str) {
        let mut queue = vec![name.to_string()];
        while let Some(current) = queue.pop() {
            let mut newly_marked = false;
            for slot in &mut self.slots {
                if slot.pass.name() == current && !slot.dirty {
                    slot.dirty = true;
                    newly_marked = true;
                }
            }
            if !newly_marked {
                continue;
            }
            for (trigger, also) in &self.couplings {
                if *trigger == current {
                    queue.push(also.clone());
                }
            }
        }
    }

    pub fn mark_all_dirty(&mut self) {
        for slot in &mut self.slots {
            slot.dirty = true;
        }
    }

    /// Draw all dirty passes in priority order. A failure is logged and
    /// the remaining passes still run; the failed pass stays dirty and
    /// is retried on the next frame.
    pub fn run_frame(&mut self, ctx: &FrameContext<'_>) -> FrameReport {
        let mut report = FrameReport::default();
        for slot in &mut self.slots {
            if !slot.dirty {
                continue;
            }
            match slot.pass.draw(ctx) {
                Ok(()) => {
                    slot.dirty = false;
                    report.drawn += 1;
                }
                Err(err) => {
                    log::error!("render pass '{}' failed: {err}", slot.pass.name());
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftbench_core::camera::{Camera, Viewport};
    use draftbench_core::document::Document;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_pass(
        name: &str,
        priority: u32,
        order: &Rc<RefCell<Vec<String>>>,
    ) -> Box<dyn RenderPass> {
        let order = Rc::clone(order);
        let name_owned = name.to_string();
        Box::new(FnPass::new(name, priority, move |_ctx| {
            order.borrow_mut().push(name_owned.clone());
            Ok(())
        }))
    }

    fn frame<'a>(doc: &'a Document, camera: &'a Camera) -> FrameContext<'a> {
        FrameContext::new(doc, camera, Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_priority_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = RenderScheduler::new();
        scheduler.register(recording_pass(PASS_CROSSHAIR, PRIORITY_CROSSHAIR, &order));
        scheduler.register(recording_pass(PASS_SCENE, PRIORITY_SCENE, &order));
        scheduler.register(recording_pass(PASS_GRID, PRIORITY_GRID, &order));
        let doc = Document::new();
        let camera = Camera::default();
        let report = scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(report.drawn, 3);
        assert_eq!(*order.borrow(), vec!["scene", "grid", "crosshair"]);
    }

    #[test]
    fn test_clean_pass_skipped() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = RenderScheduler::new();
        scheduler.register(recording_pass(PASS_SCENE, PRIORITY_SCENE, &order));
        scheduler.register(recording_pass(PASS_GRID, PRIORITY_GRID, &order));
        let doc = Document::new();
        let camera = Camera::default();
        scheduler.run_frame(&frame(&doc, &camera));
        order.borrow_mut().clear();

        // Nothing dirty: nothing drawn.
        let report = scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(report.drawn, 0);
        assert!(order.borrow().is_empty());

        scheduler.mark_dirty(PASS_GRID);
        scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(*order.borrow(), vec!["grid"]);
    }

    #[test]
    fn test_selection_couples_to_scene() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = RenderScheduler::with_standard_couplings();
        scheduler.register(recording_pass(PASS_SCENE, PRIORITY_SCENE, &order));
        scheduler.register(recording_pass(PASS_SELECTION, PRIORITY_SELECTION, &order));
        let doc = Document::new();
        let camera = Camera::default();
        scheduler.run_frame(&frame(&doc, &camera));
        order.borrow_mut().clear();

        scheduler.mark_dirty(PASS_SELECTION);
        assert!(scheduler.is_dirty(PASS_SCENE));
        scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(*order.borrow(), vec!["scene", "selection"]);
    }

    #[test]
    fn test_failed_pass_does_not_block_the_rest() {
        let _ = env_logger::builder().is_test(true).try_init();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = RenderScheduler::new();
        scheduler.register(Box::new(FnPass::new(PASS_SCENE, PRIORITY_SCENE, |_ctx| {
            Err(RenderError::PassFailed {
                pass: PASS_SCENE.to_string(),
                message: "surface lost".to_string(),
            })
        })));
        scheduler.register(recording_pass(PASS_GRID, PRIORITY_GRID, &order));
        let doc = Document::new();
        let camera = Camera::default();
        let report = scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(report.failed, 1);
        assert_eq!(report.drawn, 1);
        assert_eq!(*order.borrow(), vec!["grid"]);
    }

    #[test]
    fn test_failed_pass_retried_next_frame() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scheduler = RenderScheduler::new();
        // Fails once (surface lost), then recovers.
        let mut failures_left = 1;
        scheduler.register(Box::new(FnPass::new(PASS_SCENE, PRIORITY_SCENE, move |_ctx| {
            if failures_left > 0 {
                failures_left -= 1;
                return Err(RenderError::Surface("surface lost".to_string()));
            }
            Ok(())
        })));
        let doc = Document::new();
        let camera = Camera::default();

        let report = scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(report.failed, 1);
        // The pass stays dirty and draws on the next frame.
        assert!(scheduler.is_dirty(PASS_SCENE));
        let report = scheduler.run_frame(&frame(&doc, &camera));
        assert_eq!(report.drawn, 1);
        assert_eq!(report.failed, 0);
        assert!(!scheduler.is_dirty(PASS_SCENE));
    }
}
