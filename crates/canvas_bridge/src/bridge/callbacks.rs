//! Native callback table
//!
//! Each callback is optional; a missing callback means native code is not
//! listening. Callbacks capture whatever context they need, so none of them
//! receives an opaque context pointer.

use std::fmt;
use std::rc::Rc;

use crate::error::ErrorCode;
use crate::foundation::collections::WindowHandle;
use crate::foundation::geometry::Size;
use crate::input::KeyEvent;

/// Device pixel ratio changed
pub type ScaleChangedFn = dyn Fn();
/// Size followed by a window's resize binding changed
pub type WindowResizedFn = dyn Fn(WindowHandle, Size);
/// Key event; returning `true` suppresses the browser's default action
pub type KeyboardFn = dyn Fn(&KeyEvent) -> bool;
/// Clipboard text arrived (`Some(text), None`) or an operation failed (`None, Some(error)`)
pub type ClipboardFn = dyn Fn(Option<&str>, Option<&str>);
/// Fullscreen requested from the page: target window, lock pointer, resize canvas
pub type RequestFullscreenFn = dyn Fn(Option<WindowHandle>, bool, bool);
/// Error report
pub type ErrorFn = dyn Fn(ErrorCode, &str);

/// Callbacks into native code
#[derive(Clone, Default)]
pub struct NativeCallbacks {
    /// Scale change
    pub scale_changed: Option<Rc<ScaleChangedFn>>,
    /// Window resize
    pub window_resized: Option<Rc<WindowResizedFn>>,
    /// Keyboard
    pub keyboard: Option<Rc<KeyboardFn>>,
    /// Clipboard
    pub clipboard: Option<Rc<ClipboardFn>>,
    /// Fullscreen request
    pub request_fullscreen: Option<Rc<RequestFullscreenFn>>,
    /// Error
    pub error: Option<Rc<ErrorFn>>,
}

impl NativeCallbacks {
    /// No callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scale change callback
    pub fn with_scale_changed(mut self, callback: impl Fn() + 'static) -> Self {
        self.scale_changed = Some(Rc::new(callback));
        self
    }

    /// Set the window resize callback
    pub fn with_window_resized(mut self, callback: impl Fn(WindowHandle, Size) + 'static) -> Self {
        self.window_resized = Some(Rc::new(callback));
        self
    }

    /// Set the keyboard callback
    pub fn with_keyboard(mut self, callback: impl Fn(&KeyEvent) -> bool + 'static) -> Self {
        self.keyboard = Some(Rc::new(callback));
        self
    }

    /// Set the clipboard callback
    pub fn with_clipboard(mut self, callback: impl Fn(Option<&str>, Option<&str>) + 'static) -> Self {
        self.clipboard = Some(Rc::new(callback));
        self
    }

    /// Set the fullscreen request callback
    pub fn with_request_fullscreen(
        mut self,
        callback: impl Fn(Option<WindowHandle>, bool, bool) + 'static,
    ) -> Self {
        self.request_fullscreen = Some(Rc::new(callback));
        self
    }

    /// Set the error callback
    pub fn with_error(mut self, callback: impl Fn(ErrorCode, &str) + 'static) -> Self {
        self.error = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for NativeCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeCallbacks")
            .field("scale_changed", &self.scale_changed.is_some())
            .field("window_resized", &self.window_resized.is_some())
            .field("keyboard", &self.keyboard.is_some())
            .field("clipboard", &self.clipboard.is_some())
            .field("request_fullscreen", &self.request_fullscreen.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}
