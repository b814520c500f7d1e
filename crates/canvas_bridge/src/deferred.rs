//! Next-frame action batching
//!
//! Some browser APIs (clipboard writes, `window.open`) only work from inside
//! a user gesture. Actions are queued here and flushed on the next animation
//! frame; mouse and key events request a flush too, so the frame lands right
//! after the gesture.

use std::fmt;

/// Zero-argument action run on the next flush
pub type DeferredAction = Box<dyn FnOnce()>;

/// FIFO of actions with at most one flush scheduled at a time
#[derive(Default)]
pub struct DeferredActionQueue {
    pending: Vec<DeferredAction>,
    flush_scheduled: bool,
}

impl DeferredActionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action
    ///
    /// Returns `true` when the caller must schedule a flush on the next
    /// animation frame.
    pub fn enqueue(&mut self, action: DeferredAction) -> bool {
        self.pending.push(action);
        self.schedule()
    }

    /// Ask for a flush without queuing anything
    ///
    /// Returns `true` when the caller must schedule the flush.
    pub fn request_flush(&mut self) -> bool {
        self.schedule()
    }

    /// Take the actions to run in this flush
    ///
    /// Clears the scheduled flag first, so anything queued while the returned
    /// actions run lands in the next frame.
    pub fn take_pending(&mut self) -> Vec<DeferredAction> {
        self.flush_scheduled = false;
        std::mem::take(&mut self.pending)
    }

    /// Number of queued actions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a flush is waiting for its animation frame
    pub const fn is_flush_scheduled(&self) -> bool {
        self.flush_scheduled
    }

    /// Drop queued actions without running them
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn schedule(&mut self) -> bool {
        if self.flush_scheduled {
            false
        } else {
            self.flush_scheduled = true;
            true
        }
    }
}

impl fmt::Debug for DeferredActionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredActionQueue")
            .field("pending", &self.pending.len())
            .field("flush_scheduled", &self.flush_scheduled)
            .finish()
    }
}
