//! Pointer-driven crop rectangle state machine.
//!
//! # States
//!
//! - `Idle`: no drag in progress; a rectangle may or may not exist
//! - `Creating`: dragging out a new rectangle from an anchor point
//! - `Moving`: translating the existing rectangle
//!
//! Events must be applied in arrival order from a single thread of control.
//! The machine is not reentrant.

use serde::{Deserialize, Serialize};

use super::rect::{CropRect, Point};

/// Input driving the crop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerEvent {
    /// Pointer pressed at a raster position.
    Down(Point),
    /// Pointer moved to a raster position.
    Move(Point),
    /// Pointer released.
    Up,
    /// Discard the rectangle (clear crop / reset all).
    Reset,
}

/// Current drag mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DragMode {
    #[default]
    Idle,
    /// Creating a rectangle spanning `anchor` and the pointer.
    Creating { anchor: Point },
    /// Moving the rectangle; `offset` is the pointer position relative to the
    /// rectangle origin at pointer-down.
    Moving { offset: Point },
}

impl DragMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, DragMode::Idle)
    }
}

/// Cursor feedback for the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorHint {
    Crosshair,
    Move,
}

impl CursorHint {
    /// CSS cursor keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorHint::Crosshair => "crosshair",
            CursorHint::Move => "move",
        }
    }
}

/// Crop rectangle plus drag state for a canvas of fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct CropGeometry {
    canvas_width: f64,
    canvas_height: f64,
    rect: Option<CropRect>,
    mode: DragMode,
}

impl CropGeometry {
    /// Create an idle machine with no rectangle for a canvas of the raster's
    /// natural size.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width: canvas_width as f64,
            canvas_height: canvas_height as f64,
            rect: None,
            mode: DragMode::Idle,
        }
    }

    pub fn rect(&self) -> Option<CropRect> {
        self.rect
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Apply one event. Returns true when the rectangle changed, which is
    /// the caller's cue to re-run validation.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        let before = self.rect;
        match (event, self.mode) {
            (PointerEvent::Down(p), _) => self.pointer_down(p),
            (PointerEvent::Move(p), DragMode::Creating { anchor }) => {
                self.rect = Some(CropRect::spanning(anchor, p));
            }
            (PointerEvent::Move(p), DragMode::Moving { offset }) => self.drag_to(p, offset),
            (PointerEvent::Up, mode) if mode.is_active() => self.mode = DragMode::Idle,
            (PointerEvent::Reset, _) => {
                self.rect = None;
                self.mode = DragMode::Idle;
            }
            _ => {}
        }
        self.rect != before
    }

    /// Cursor to show with the pointer at `p`.
    pub fn cursor_hint(&self, p: Point) -> CursorHint {
        match self.mode {
            DragMode::Moving { .. } => CursorHint::Move,
            DragMode::Creating { .. } => CursorHint::Crosshair,
            DragMode::Idle => match self.rect {
                Some(rect) if rect.contains(p) => CursorHint::Move,
                _ => CursorHint::Crosshair,
            },
        }
    }

    fn pointer_down(&mut self, p: Point) {
        match self.rect {
            Some(rect) if rect.contains(p) => {
                self.mode = DragMode::Moving {
                    offset: Point::new(p.x - rect.x, p.y - rect.y),
                };
            }
            _ => {
                self.mode = DragMode::Creating { anchor: p };
                self.rect = Some(CropRect::new(p.x, p.y, 0.0, 0.0));
            }
        }
    }

    /// Translate so the grab offset follows the pointer, keeping the
    /// rectangle on the canvas. When the rectangle is larger than the canvas
    /// the origin pins to zero.
    fn drag_to(&mut self, p: Point, offset: Point) {
        let Some(rect) = self.rect.as_mut() else {
            return;
        };
        rect.x = (p.x - offset.x)
            .min(self.canvas_width - rect.width)
            .max(0.0);
        rect.y = (p.y - offset.y)
            .min(self.canvas_height - rect.height)
            .max(0.0);
    }
}

/// Functional form of [`CropGeometry::handle`]: returns the next state and
/// leaves `state` untouched.
pub fn apply_pointer_event(state: &CropGeometry, event: PointerEvent) -> CropGeometry {
    let mut next = state.clone();
    next.handle(event);
    next
}


// ============================================================================
// Property-Based Tests
// ============================================================================
