//! Resize tracking
//!
//! A window can follow the size of another DOM target (or of the viewport)
//! through a [`ResizeBinding`], and can additionally be wired to a
//! [`DragController`] that lets the user resize that target from a handle.

mod drag;
mod observer;

pub use drag::DragController;
pub use observer::{Cleanup, ResizeBinding, ResizeSource};
pub(crate) use observer::computed_size;
