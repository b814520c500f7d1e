//! Window context registry
//!
//! Maps native window handles to the canvas element backing them, along with
//! what is needed to give the element back untouched when the window goes
//! away.

use std::collections::HashMap;

use crate::backend::{DomBackend, Target};
use crate::css::CssStateStack;
use crate::error::BridgeError;
use crate::foundation::collections::{ElementId, WindowHandle};
use crate::foundation::geometry::Size;
use crate::resize::ResizeBinding;

/// Per-window record
#[derive(Debug)]
pub struct WindowContext {
    /// Native handle
    pub handle: WindowHandle,
    /// Selector the window was created with
    pub selector: String,
    /// Bound canvas element
    pub element: ElementId,
    /// Backing-store size captured at creation
    pub original_backing_size: Size,
    /// Optional size-following binding
    pub resize_binding: Option<ResizeBinding>,
}

/// Ways of finding a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// By native handle
    Handle(WindowHandle),
    /// By bound element
    Element(ElementId),
    /// By selector, resolved against the page
    Selector(&'a str),
    /// Matches nothing
    None,
}

/// Live window contexts keyed by handle
#[derive(Debug, Default)]
pub struct WindowRegistry {
    contexts: HashMap<WindowHandle, WindowContext>,
    next_binding_id: u64,
}

impl WindowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to the element `selector` resolves to
    pub fn insert(
        &mut self,
        dom: &dyn DomBackend,
        handle: WindowHandle,
        selector: &str,
    ) -> Result<&WindowContext, BridgeError> {
        let element = match dom.resolve(selector) {
            Some(Target::Element(element)) => element,
            Some(Target::Viewport) | None => {
                return Err(BridgeError::UnknownTarget(format!("Cannot find canvas [{selector}]")));
            }
        };
        if self.contexts.contains_key(&handle) {
            return Err(BridgeError::DuplicateTarget(format!("window {handle} already exists")));
        }
        if let Some(owner) = self.find_by_element(element) {
            return Err(BridgeError::DuplicateTarget(format!(
                "[{selector}] already backs window {}",
                owner.handle
            )));
        }

        let context = WindowContext {
            handle,
            selector: selector.to_string(),
            element,
            original_backing_size: dom.backing_size(element),
            resize_binding: None,
        };
        Ok(self.contexts.entry(handle).or_insert(context))
    }

    /// Release a window: restore its styles and backing size, tear down its binding
    ///
    /// Returns `false` for an unknown handle.
    pub fn destroy(&mut self, dom: &dyn DomBackend, css: &mut CssStateStack, handle: WindowHandle) -> bool {
        let Some(mut context) = self.contexts.remove(&handle) else {
            return false;
        };
        css.restore_all(dom, context.element);
        dom.set_backing_size(context.element, context.original_backing_size);
        if let Some(binding) = context.resize_binding.take() {
            binding.teardown(dom, css);
        }
        true
    }

    /// Context for a handle
    pub fn get(&self, handle: WindowHandle) -> Option<&WindowContext> {
        self.contexts.get(&handle)
    }

    /// Context for a handle, mutably
    pub fn get_mut(&mut self, handle: WindowHandle) -> Option<&mut WindowContext> {
        self.contexts.get_mut(&handle)
    }

    /// Context for a handle, or `UnknownTarget`
    pub fn require(&self, handle: WindowHandle) -> Result<&WindowContext, BridgeError> {
        self.get(handle)
            .ok_or_else(|| BridgeError::UnknownTarget(format!("Cannot find window [{handle}]")))
    }

    /// Context for a handle, mutably, or `UnknownTarget`
    pub fn require_mut(&mut self, handle: WindowHandle) -> Result<&mut WindowContext, BridgeError> {
        self.get_mut(handle)
            .ok_or_else(|| BridgeError::UnknownTarget(format!("Cannot find window [{handle}]")))
    }

    /// Context bound to an element
    pub fn find_by_element(&self, element: ElementId) -> Option<&WindowContext> {
        self.contexts.values().find(|context| context.element == element)
    }

    /// Find a context by handle, element or selector
    pub fn find(&self, dom: &dyn DomBackend, lookup: Lookup<'_>) -> Option<&WindowContext> {
        match lookup {
            Lookup::Handle(handle) => self.get(handle),
            Lookup::Element(element) => self.find_by_element(element),
            Lookup::Selector(selector) if !selector.is_empty() => match dom.resolve(selector)? {
                Target::Element(element) => self.find_by_element(element),
                Target::Viewport => None,
            },
            Lookup::Selector(_) | Lookup::None => None,
        }
    }

    /// Whether `handle` is live
    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.contexts.contains_key(&handle)
    }

    /// Live handles in ascending order
    pub fn handles(&self) -> Vec<WindowHandle> {
        let mut handles: Vec<_> = self.contexts.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Number of live windows
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Whether no window is live
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Fresh resize binding generation id
    pub fn next_binding_id(&mut self) -> u64 {
        self.next_binding_id += 1;
        self.next_binding_id
    }
}
