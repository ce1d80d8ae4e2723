//! Per-frame render context.

use draftbench_core::camera::{Camera, Viewport};
use draftbench_core::document::Document;
use draftbench_core::grip::Grip;
use draftbench_core::interaction::DragPreview;
use kurbo::{Point, Rect};
use peniko::Color;

/// Everything a draw pass needs for one frame. Built fresh each frame by
/// the host; device pixel ratio is applied here, once.
pub struct FrameContext<'a> {
    /// The document to render.
    pub document: &'a Document,
    /// World-to-screen transform source.
    pub camera: &'a Camera,
    /// Viewport size in logical pixels.
    pub viewport: Viewport,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Marquee rectangle in screen coordinates, while one is dragged.
    pub marquee_rect: Option<Rect>,
    /// Drag preview geometry, drawn instead of the committed owners.
    pub preview: Option<&'a DragPreview>,
    /// Grips of the current selection.
    pub grips: &'a [Grip],
    /// Crosshair position in world coordinates.
    pub crosshair: Option<Point>,
}

impl<'a> FrameContext<'a> {
    pub fn new(document: &'a Document, camera: &'a Camera, viewport: Viewport) -> Self {
        Self {
            document,
            camera,
            viewport,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(33, 150, 243, 255),
            marquee_rect: None,
            preview: None,
            grips: &[],
            crosshair: None,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_marquee(mut self, rect: Option<Rect>) -> Self {
        self.marquee_rect = rect;
        self
    }

    pub fn with_preview(mut self, preview: Option<&'a DragPreview>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_grips(mut self, grips: &'a [Grip]) -> Self {
        self.grips = grips;
        self
    }

    pub fn with_crosshair(mut self, crosshair: Option<Point>) -> Self {
        self.crosshair = crosshair;
        self
    }

    /// Viewport size in physical pixels.
    pub fn physical_viewport(&self) -> Viewport {
        Viewport::new(
            self.viewport.width * self.scale_factor,
            self.viewport.height * self.scale_factor,
        )
    }
}
