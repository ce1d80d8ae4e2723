//! Pointer and keyboard event types, plus per-gesture input tracking.

use kurbo::{Point, Vec2};
use std::time::{Duration, Instant};

/// Two presses at most this far apart count as a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// Maximum cursor travel in pixels between double-click presses.
pub const DOUBLE_CLICK_SLOP_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Keyboard modifier state carried with each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Pointer events in surface-local screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Up {
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Move {
        pos: Point,
        modifiers: Modifiers,
    },
    Leave,
    Scroll {
        pos: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

/// Tracks cursor position, press origin and double clicks across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    cursor: Point,
    press_origin: Option<(MouseButton, Point)>,
    last_click: Option<(Instant, Point)>,
    double_click: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Where the active press started, if any.
    pub fn press_origin(&self) -> Option<Point> {
        self.press_origin.map(|(_, p)| p)
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        matches!(self.press_origin, Some((b, _)) if b == button)
    }

    /// True exactly once per detected double click.
    pub fn take_double_click(&mut self) -> bool {
        std::mem::take(&mut self.double_click)
    }

    /// Feed a pointer event through the tracker.
    pub fn apply(&mut self, event: &PointerEvent, now: Instant) {
        match event {
            PointerEvent::Down { pos, button, .. } => {
                self.cursor = *pos;
                self.press_origin = Some((*button, *pos));
                if *button == MouseButton::Left {
                    if let Some((at, last_pos)) = self.last_click {
                        let close = (pos.x - last_pos.x).abs() < DOUBLE_CLICK_SLOP_PX
                            && (pos.y - last_pos.y).abs() < DOUBLE_CLICK_SLOP_PX;
                        if close && now.duration_since(at) <= DOUBLE_CLICK_WINDOW {
                            self.double_click = true;
                            self.last_click = None;
                            return;
                        }
                    }
                    self.last_click = Some((now, *pos));
                }
            }
            PointerEvent::Up { pos, .. } => {
                self.cursor = *pos;
                self.press_origin = None;
            }
            PointerEvent::Move { pos, .. } => {
                self.cursor = *pos;
            }
            PointerEvent::Leave => {
                self.press_origin = None;
            }
            PointerEvent::Scroll { pos, .. } => {
                self.cursor = *pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(pos: Point) -> PointerEvent {
        PointerEvent::Down {
            pos,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply(&down(Point::new(10.0, 10.0)), t0);
        assert!(!input.take_double_click());
        input.apply(&down(Point::new(11.0, 10.0)), t0 + Duration::from_millis(200));
        assert!(input.take_double_click());
        // Flag is one-shot.
        assert!(!input.take_double_click());
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply(&down(Point::new(10.0, 10.0)), t0);
        input.apply(&down(Point::new(10.0, 10.0)), t0 + Duration::from_millis(600));
        assert!(!input.take_double_click());
    }

    #[test]
    fn test_press_origin_tracking() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        input.apply(&down(Point::new(5.0, 5.0)), t0);
        assert_eq!(input.press_origin(), Some(Point::new(5.0, 5.0)));
        assert!(input.is_pressed(MouseButton::Left));
        input.apply(
            &PointerEvent::Up {
                pos: Point::new(9.0, 9.0),
                button: MouseButton::Left,
                modifiers: Modifiers::default(),
            },
            t0,
        );
        assert_eq!(input.press_origin(), None);
        assert_eq!(input.cursor(), Point::new(9.0, 9.0));
    }
}
