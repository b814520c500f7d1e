//! # Canvas Bridge
//!
//! Browser-side windowing for native applications compiled to WebAssembly:
//! each HTML canvas the application opens becomes an independent "window"
//! with its own size, cursor, opacity, visibility, focus and resize
//! behavior, while browser input and lifecycle events flow back to native
//! code through a small set of callbacks.
//!
//! ## Features
//!
//! - **Window registry**: native handles mapped to canvases, with the page's
//!   own styles and backing-store sizes restored on release
//! - **Resize following**: windows track the size of the viewport or of any
//!   element, reported once per change
//! - **Drag-to-resize**: mouse and touch resizing from a handle element
//! - **Event bridge**: keyboard, clipboard and scale changes forwarded to
//!   native callbacks; clipboard writes and URL opens batched per frame
//! - **Headless DOM**: the whole bridge runs off-browser for testing
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use canvas_bridge::prelude::*;
//!
//! let dom = Rc::new(HeadlessDom::new());
//! dom.create_canvas("canvas", Size::new(640, 480));
//!
//! let callbacks = NativeCallbacks::new()
//!     .with_window_resized(|window, size| println!("{window} is now {size}"));
//! let bridge = WindowBridge::new(dom.clone(), BridgeConfig::default(), callbacks).unwrap();
//! bridge.init(1.0).unwrap();
//!
//! bridge.create_window(WindowHandle(1), "Module['canvas']").unwrap();
//! bridge.set_resize_target(WindowHandle(1), Some("window")).unwrap();
//! bridge.set_cursor(WindowHandle(1), CursorShape::Crosshair).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::missing_errors_doc)]

pub mod backend;
pub mod bridge;
pub mod config;
pub mod css;
pub mod deferred;
pub mod error;
pub mod foundation;
pub mod input;
pub mod registry;
pub mod resize;

#[cfg(test)]
mod tests;

pub use bridge::{NativeCallbacks, WindowBridge};
pub use error::{BridgeError, ErrorCode, ResultCode};

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        backend::{DomBackend, HeadlessDom, Target},
        bridge::{NativeCallbacks, WindowBridge},
        config::{BridgeConfig, Config},
        error::{BridgeError, ErrorCode, ResultCode},
        foundation::{
            collections::{CursorHandle, ElementId, WindowHandle},
            geometry::{Point, Size},
        },
        input::{CursorShape, KeyEvent},
        registry::Lookup,
    };
}
