//! Window presentation: size, position, cursor, opacity, visibility, focus
//! and the page-level queries native code makes.

use super::{BridgeState, WindowBridge};
use crate::backend::ActiveElement;
use crate::error::BridgeError;
use crate::foundation::collections::{CursorHandle, ElementId, WindowHandle};
use crate::foundation::geometry::{parse_css_number, px, Size};
use crate::foundation::logging::{debug, trace};
use crate::input::cursor::custom_cursor_value;
use crate::input::CursorShape;
use crate::registry::Lookup;

impl WindowBridge {
    /// Resize a window: backing store to `framebuffer`, CSS size to `size`
    ///
    /// A drag-resizable container follows along unless a drag is running.
    pub fn set_size(&self, window: WindowHandle, size: Size, framebuffer: Size) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let dom = shared.dom.as_ref();
        {
            let mut state = shared.state.borrow_mut();
            let BridgeState { registry, css, .. } = &mut *state;
            let element = registry.require(window)?.element;
            if dom.backing_size(element) != framebuffer {
                dom.set_backing_size(element, framebuffer);
            }
            // native sizing overrides any page rule, `!important` ones included
            css.set_important(dom, element, "width", &px(f64::from(size.width)));
            css.set_important(dom, element, "height", &px(f64::from(size.height)));
        }
        trace!("Window {window} set to {size} (framebuffer {framebuffer})");
        shared.sync_resizable(window, size);
        Ok(())
    }

    /// Window position in client coordinates
    #[allow(clippy::cast_possible_truncation)]
    pub fn position(&self, window: WindowHandle) -> Result<(i32, i32), BridgeError> {
        let element = self.require_element(window)?;
        let origin = self.shared.dom.client_origin(element);
        Ok((origin.x as i32, origin.y as i32))
    }

    /// Apply a standard cursor shape; the arrow restores the page's cursor
    pub fn set_cursor(&self, window: WindowHandle, shape: CursorShape) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let dom = shared.dom.as_ref();
        let mut state = shared.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;
        let element = registry.require(window)?.element;
        match shape.css_value() {
            Some(value) => css.set(dom, element, "cursor", value),
            None => css.restore_property(dom, element, "cursor"),
        }
        Ok(())
    }

    /// Render RGBA pixels into a cursor image native code can later apply
    pub fn create_custom_cursor(
        &self,
        cursor: CursorHandle,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), BridgeError> {
        let data_url = self.shared.dom.render_cursor_image(width, height, rgba)?;
        debug!("Created custom cursor {cursor} ({width}x{height})");
        self.shared.state.borrow_mut().cursors.insert(cursor, data_url);
        Ok(())
    }

    /// Forget a custom cursor
    pub fn destroy_custom_cursor(&self, cursor: CursorHandle) {
        self.shared.state.borrow_mut().cursors.remove(&cursor);
    }

    /// Apply a custom cursor with its hotspot; an unknown cursor restores the page's cursor
    pub fn set_custom_cursor(
        &self,
        window: WindowHandle,
        cursor: CursorHandle,
        xhot: i32,
        yhot: i32,
    ) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let dom = shared.dom.as_ref();
        let mut state = shared.state.borrow_mut();
        let BridgeState {
            registry, css, cursors, ..
        } = &mut *state;
        let element = registry.require(window)?.element;
        match cursors.get(&cursor) {
            Some(data_url) => css.set(dom, element, "cursor", &custom_cursor_value(data_url, xhot, yhot)),
            None => css.restore_property(dom, element, "cursor"),
        }
        Ok(())
    }

    /// Computed opacity of the window's canvas
    #[allow(clippy::cast_possible_truncation)]
    pub fn computed_opacity(&self, window: WindowHandle) -> Result<f32, BridgeError> {
        let element = self.require_element(window)?;
        let value = self.shared.dom.computed_style(element, "opacity");
        Ok(parse_css_number(&value).unwrap_or(1.0) as f32)
    }

    /// Set the window's opacity
    pub fn set_opacity(&self, window: WindowHandle, opacity: f32) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;
        let element = registry.require(window)?.element;
        css.set(shared.dom.as_ref(), element, "opacity", &opacity.to_string());
        Ok(())
    }

    /// Whether the window's canvas is displayed
    pub fn computed_visibility(&self, window: WindowHandle) -> Result<bool, BridgeError> {
        let element = self.require_element(window)?;
        Ok(self.shared.dom.computed_style(element, "display") != "none")
    }

    /// Hide the window, or give it back its own `display`
    pub fn set_visibility(&self, window: WindowHandle, visible: bool) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let dom = shared.dom.as_ref();
        let mut state = shared.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;
        let element = registry.require(window)?.element;
        if visible {
            css.restore_property(dom, element, "display");
        } else {
            css.set(dom, element, "display", "none");
        }
        Ok(())
    }

    /// Focus or blur the window's canvas
    pub fn change_focus(&self, window: WindowHandle, focused: bool) -> Result<(), BridgeError> {
        let element = self.require_element(window)?;
        if focused {
            self.shared.dom.focus(element);
        } else {
            self.shared.dom.blur(element);
        }
        Ok(())
    }

    /// Set the document title; empty titles are ignored
    pub fn set_title(&self, title: &str) {
        if !title.is_empty() {
            self.shared.dom.set_title(title);
        }
    }

    /// Window whose canvas is displayed fullscreen
    pub fn fullscreen_window(&self) -> Option<WindowHandle> {
        let element = self.shared.dom.fullscreen_element()?;
        self.find_window(Lookup::Element(element))
    }

    /// Window whose canvas holds the pointer lock
    pub fn pointer_lock_window(&self) -> Option<WindowHandle> {
        let element = self.shared.dom.pointer_lock_element()?;
        self.find_window(Lookup::Element(element))
    }

    /// Ask native code to go fullscreen
    ///
    /// `target` picks the window; when it matches none, native code picks.
    pub fn request_fullscreen(&self, target: Lookup<'_>, lock_pointer: bool, resize_canvas: bool) {
        let callback = self.shared.callbacks.borrow().request_fullscreen.clone();
        if let Some(callback) = callback {
            let window = self.find_window(target);
            callback(window, lock_pointer, resize_canvas);
        }
    }

    /// Whether anything but the body has focus
    pub fn is_any_element_focused(&self) -> bool {
        self.shared.dom.active_element() != ActiveElement::Body
    }

    /// Whether the page runs on macOS or iOS
    pub fn is_runtime_platform_apple(&self) -> bool {
        let platform = self.shared.dom.platform();
        platform.starts_with("Mac") || platform == "iPhone"
    }

    /// High resolution timestamp in milliseconds
    pub fn now(&self) -> f64 {
        self.shared.dom.now()
    }

    fn require_element(&self, window: WindowHandle) -> Result<ElementId, BridgeError> {
        Ok(self.shared.state.borrow().registry.require(window)?.element)
    }
}
