//! Clipboard access and URL opening
//!
//! Both need a user gesture in most browsers, so they run from the deferred
//! action queue rather than immediately.

use std::rc::Rc;

use super::{Shared, WindowBridge};
use crate::error::{BridgeError, ErrorCode};
use crate::foundation::logging::{debug, trace};

const MISSING_CLIPBOARD: &str = "Missing navigator.clipboard";

impl WindowBridge {
    /// Write text to the system clipboard on the next flush
    ///
    /// Completion is reported through the clipboard callback. Without
    /// clipboard support the failure is reported right away.
    pub fn set_clipboard_string(&self, text: &str) -> Result<(), BridgeError> {
        let shared = &self.shared;
        shared.require_initialized()?;
        if !shared.dom.has_clipboard() {
            shared.on_clipboard_failed("set", MISSING_CLIPBOARD);
            return Ok(());
        }

        let weak = Rc::downgrade(shared);
        let text = text.to_string();
        Shared::defer(
            shared,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let weak = Rc::downgrade(&shared);
                shared.dom.write_clipboard(
                    text,
                    Box::new(move |result| {
                        if let Some(shared) = weak.upgrade() {
                            shared.on_clipboard_result("set", result);
                        }
                    }),
                );
            }),
        );
        Ok(())
    }

    /// Read the system clipboard on the next flush, reporting through the clipboard callback
    pub fn request_clipboard_string(&self) -> Result<(), BridgeError> {
        let shared = &self.shared;
        shared.require_initialized()?;
        if !shared.dom.has_clipboard() {
            shared.on_clipboard_failed("get", MISSING_CLIPBOARD);
            return Ok(());
        }

        let weak = Rc::downgrade(shared);
        Shared::defer(
            shared,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let weak = Rc::downgrade(&shared);
                shared.dom.read_clipboard(Box::new(move |result| {
                    if let Some(shared) = weak.upgrade() {
                        shared.on_clipboard_result("get", result);
                    }
                }));
            }),
        );
        Ok(())
    }

    /// Open a URL on the next flush; empty URLs are ignored
    pub fn open_url(&self, url: &str, target: Option<&str>) -> Result<(), BridgeError> {
        let shared = &self.shared;
        shared.require_initialized()?;
        if url.is_empty() {
            return Ok(());
        }

        let weak = Rc::downgrade(shared);
        let url = url.to_string();
        let target = target.map(str::to_string);
        Shared::defer(
            shared,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    debug!("Opening [{url}]");
                    shared.dom.open_url(&url, target.as_deref());
                }
            }),
        );
        Ok(())
    }
}

impl Shared {
    fn require_initialized(&self) -> Result<(), BridgeError> {
        if self.state.borrow().initialized {
            Ok(())
        } else {
            Err(BridgeError::NotInitialized)
        }
    }

    fn on_clipboard_result(&self, verb: &str, result: Result<String, String>) {
        match result {
            Ok(text) => {
                trace!("Clipboard {verb} completed ({} bytes)", text.len());
                let callback = self.callbacks.borrow().clipboard.clone();
                if let Some(callback) = callback {
                    callback(Some(&text), None);
                }
            }
            Err(message) => self.on_clipboard_failed(verb, &message),
        }
    }

    fn on_clipboard_failed(&self, verb: &str, message: &str) {
        let callback = self.callbacks.borrow().clipboard.clone();
        match callback {
            Some(callback) => callback(None, Some(message)),
            None => self.report(
                ErrorCode::PlatformError,
                &format!("Cannot {verb} clipboard string [{message}]"),
            ),
        }
    }
}
