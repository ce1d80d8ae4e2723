//! DraftBench Render Library
//!
//! Frame context and the priority-ordered, dirty-flagged draw pass
//! scheduler. Actual rasterization lives in the host; this crate decides
//! what needs drawing and when.

mod context;
mod scheduler;

pub use context::FrameContext;
pub use scheduler::{
    FnPass, FrameReport, PASS_CROSSHAIR, PASS_GRID, PASS_GUIDES, PASS_RULERS, PASS_SCENE,
    PASS_SELECTION, PRIORITY_CROSSHAIR, PRIORITY_GRID, PRIORITY_GUIDES, PRIORITY_RULERS,
    PRIORITY_SCENE, PRIORITY_SELECTION, RenderError, RenderPass, RenderScheduler,
};
