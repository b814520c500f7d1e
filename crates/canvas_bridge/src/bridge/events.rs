//! Document-level event handling
//!
//! Installed once by `init`: mouse and keyboard events schedule the deferred
//! action flush, keyboard and clipboard events are forwarded to native code,
//! and the resolution media query reports scale changes.

use std::rc::Rc;

use super::Shared;
use crate::backend::{ActiveElement, DomEvent, EventKind, EventResponse, ListenTarget};
use crate::error::BridgeError;
use crate::foundation::collections::ListenerId;
use crate::foundation::logging::{debug, trace};
use crate::input::KeyEvent;

impl Shared {
    /// Install the document listeners and the resolution watcher
    ///
    /// On failure, whatever was already installed is removed again.
    pub(super) fn install_global_listeners(this: &Rc<Self>, scale: f64) -> Result<Vec<ListenerId>, BridgeError> {
        let mut installed = Vec::new();
        let result = Self::install_into(this, scale, &mut installed);
        if let Err(error) = result {
            for id in installed {
                this.dom.remove_listener(id);
            }
            return Err(error);
        }
        Ok(installed)
    }

    fn install_into(this: &Rc<Self>, scale: f64, installed: &mut Vec<ListenerId>) -> Result<(), BridgeError> {
        let weak = Rc::downgrade(this);
        installed.push(this.dom.watch_resolution(
            scale,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_scale_changed();
                }
            }),
        )?);

        let handlers: [(EventKind, fn(&Rc<Self>, &DomEvent) -> EventResponse); 7] = [
            (EventKind::MouseUp, Self::on_mouse),
            (EventKind::MouseDown, Self::on_mouse),
            (EventKind::KeyDown, Self::on_key),
            (EventKind::KeyUp, Self::on_key),
            (EventKind::Cut, Self::on_cut_or_copy),
            (EventKind::Copy, Self::on_cut_or_copy),
            (EventKind::Paste, Self::on_paste),
        ];
        for (kind, handler) in handlers {
            let listener = Self::listener(this, handler);
            installed.push(this.dom.add_listener(ListenTarget::Document, kind, listener)?);
        }
        debug!("Installed {} document listeners", installed.len());
        Ok(())
    }

    fn on_scale_changed(&self) {
        debug!("Device pixel ratio changed");
        let callback = self.callbacks.borrow().scale_changed.clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn on_mouse(this: &Rc<Self>, _event: &DomEvent) -> EventResponse {
        Self::request_flush(this);
        EventResponse::default()
    }

    fn on_key(this: &Rc<Self>, event: &DomEvent) -> EventResponse {
        let DomEvent::Key(input) = event else {
            return EventResponse::default();
        };
        if input.is_down {
            Self::request_flush(this);
        }

        let Some(keyboard) = this.callbacks.borrow().keyboard.clone() else {
            return EventResponse::default();
        };
        let key_event = KeyEvent::from_input(input);
        trace!("Key {} [{}] down={}", key_event.code, key_event.key, key_event.is_down);
        if keyboard(&key_event) {
            EventResponse::prevent()
        } else {
            EventResponse::default()
        }
    }

    fn on_cut_or_copy(this: &Rc<Self>, _event: &DomEvent) -> EventResponse {
        let Some(clipboard) = this.callbacks.borrow().clipboard.clone() else {
            return EventResponse::default();
        };

        let selection = this.dom.selection_text();
        if !selection.is_empty() {
            clipboard(Some(&selection), None);
            return EventResponse::default();
        }

        if this.is_other_element_focused() {
            EventResponse::default()
        } else {
            // empty copies make some platforms beep
            EventResponse {
                prevent_default: true,
                clipboard_data: Some(this.config.clipboard.empty_copy_placeholder.clone()),
            }
        }
    }

    fn on_paste(this: &Rc<Self>, event: &DomEvent) -> EventResponse {
        let response = if this.is_other_element_focused() {
            EventResponse::default()
        } else {
            EventResponse::prevent()
        };

        if let DomEvent::Clipboard { text: Some(text), .. } = event {
            if !text.is_empty() {
                let callback = this.callbacks.borrow().clipboard.clone();
                if let Some(callback) = callback {
                    callback(Some(text), None);
                }
            }
        }
        response
    }

    /// Whether focus is on something other than the body or a window canvas
    pub(super) fn is_other_element_focused(&self) -> bool {
        match self.dom.active_element() {
            ActiveElement::Body => false,
            ActiveElement::Unknown => true,
            ActiveElement::Known(element) => self.state.borrow().registry.find_by_element(element).is_none(),
        }
    }
}
