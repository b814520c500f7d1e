//! Handles and keys
//!
//! Native code identifies windows and cursors with opaque integers it owns.
//! DOM nodes and listener registrations are interned by the backends in slot
//! maps and referred to through the keys declared here.

use std::fmt;

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Identity of a DOM element interned by a [`DomBackend`](crate::backend::DomBackend)
    pub struct ElementId;

    /// Registration of an event listener, resize observation or media query watcher
    pub struct ListenerId;
}

/// Opaque native window handle
///
/// The value is chosen by the caller; the bridge only requires that it is
/// unique among live windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Opaque native cursor handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorHandle(pub u64);

impl fmt::Display for CursorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
