//! Drag-to-resize state machine
//!
//! The controller only tracks state; the bridge feeds it DOM input and
//! applies the sizes it returns through the CSS state stack.
//!
//! ```text
//!            pointer-down / single touch-start on handle
//!   ┌──────┐ ─────────────────────────────────────────► ┌──────────┐
//!   │ Idle │                                            │ Dragging │ ◄─┐ move
//!   └──────┘ ◄───────────────────────────────────────── └──────────┘ ──┘
//!            pointer-up / touch-end / touch-cancel
//! ```
//!
//! The handle sits at the bottom-right of the resizable: moving the pointer
//! right or down grows it.

use crate::backend::TouchPoint;
use crate::foundation::collections::ElementId;
use crate::foundation::geometry::{Point, SizeF};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        origin: Point,
        size: SizeF,
        touch_id: Option<i32>,
    },
}

/// Resize interaction between a handle and a resizable element
#[derive(Debug, Clone, PartialEq)]
pub struct DragController {
    resizable: ElementId,
    handle: ElementId,
    minimum: SizeF,
    state: DragState,
}

impl DragController {
    /// Create an idle controller
    pub const fn new(resizable: ElementId, handle: ElementId, minimum: SizeF) -> Self {
        Self {
            resizable,
            handle,
            minimum,
            state: DragState::Idle,
        }
    }

    /// Element being resized
    pub const fn resizable(&self) -> ElementId {
        self.resizable
    }

    /// Element the user grabs
    pub const fn handle(&self) -> ElementId {
        self.handle
    }

    /// Whether a drag is in progress
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Touch driving the current drag, if any
    pub const fn active_touch(&self) -> Option<i32> {
        match self.state {
            DragState::Dragging { touch_id, .. } => touch_id,
            DragState::Idle => None,
        }
    }

    /// Mouse button pressed on the handle
    ///
    /// Ignored while a touch drives the drag.
    pub fn pointer_down(&mut self, current_size: SizeF, at: Point) -> bool {
        if self.active_touch().is_some() {
            return false;
        }
        self.state = DragState::Dragging {
            origin: at,
            size: current_size,
            touch_id: None,
        };
        true
    }

    /// Touch started on the handle
    ///
    /// Accepted only when idle with exactly one touch down; the caller must
    /// then suppress the default action.
    pub fn touch_start(&mut self, current_size: SizeF, touches: &[TouchPoint]) -> bool {
        match touches {
            [touch] if !self.is_dragging() => {
                self.state = DragState::Dragging {
                    origin: touch.point,
                    size: current_size,
                    touch_id: Some(touch.id),
                };
                true
            }
            _ => false,
        }
    }

    /// Mouse moved anywhere; returns the size to apply
    pub fn pointer_move(&mut self, at: Point) -> Option<SizeF> {
        match self.state {
            DragState::Dragging { touch_id: None, .. } => self.move_to(at),
            _ => None,
        }
    }

    /// Touches moved; returns the size to apply when the drag's touch is among them
    pub fn touch_move(&mut self, changed: &[TouchPoint]) -> Option<SizeF> {
        let id = self.active_touch()?;
        let touch = changed.iter().find(|touch| touch.id == id)?;
        self.move_to(touch.point)
    }

    /// Mouse released; returns `true` when a drag ended and the resizable must snap
    pub fn pointer_up(&mut self) -> bool {
        match self.state {
            DragState::Dragging { touch_id: None, .. } => {
                self.state = DragState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Touches ended or were cancelled; returns `true` when the drag ended
    pub fn touch_end(&mut self, changed: &[TouchPoint]) -> bool {
        let Some(id) = self.active_touch() else {
            return false;
        };
        if changed.iter().any(|touch| touch.id == id) {
            self.state = DragState::Idle;
            true
        } else {
            false
        }
    }

    fn move_to(&mut self, at: Point) -> Option<SizeF> {
        let DragState::Dragging { origin, size, .. } = &mut self.state else {
            return None;
        };
        let offset_x = origin.x - at.x;
        let offset_y = origin.y - at.y;
        *size = SizeF::new(size.width - offset_x, size.height - offset_y).clamp_min(self.minimum);
        *origin = at;
        Some(*size)
    }
}
