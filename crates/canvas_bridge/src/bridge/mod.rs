//! # Window Bridge
//!
//! [`WindowBridge`] is the entry point native code talks to. It owns the
//! window registry, the CSS state stack and the deferred action queue, and
//! wires browser events to the [`NativeCallbacks`].
//!
//! ## Architecture
//!
//! ```text
//! native code ──calls──► WindowBridge ──► Rc<Shared> ──► DomBackend
//!      ▲                                     ▲   │
//!      │                                Weak │   │ listeners
//!      └───────── NativeCallbacks ◄──────────┴───┘
//! ```
//!
//! Listener closures installed in the page hold a `Weak` reference to the
//! shared state and do nothing once the bridge is gone. No `RefCell` borrow
//! is held while a native callback runs, so callbacks may call straight back
//! into the bridge.
//!
//! ## Lifecycle
//!
//! ```rust
//! use std::rc::Rc;
//! use canvas_bridge::prelude::*;
//!
//! let dom = Rc::new(HeadlessDom::new());
//! dom.create_canvas("canvas", Size::new(300, 150));
//!
//! let bridge = WindowBridge::new(dom.clone(), BridgeConfig::default(), NativeCallbacks::new()).unwrap();
//! bridge.init(1.0).unwrap();
//! bridge.create_window(WindowHandle(1), "#canvas").unwrap();
//! bridge.destroy_window(WindowHandle(1));
//! bridge.teardown();
//! ```

mod callbacks;
mod clipboard;
mod events;
mod presentation;
mod resize;

pub use callbacks::{
    ClipboardFn, ErrorFn, KeyboardFn, NativeCallbacks, RequestFullscreenFn, ScaleChangedFn, WindowResizedFn,
};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{DomBackend, DomEvent, EventResponse, Listener};
use crate::config::BridgeConfig;
use crate::css::CssStateStack;
use crate::deferred::{DeferredAction, DeferredActionQueue};
use crate::error::{BridgeError, ErrorCode};
use crate::foundation::collections::{CursorHandle, ElementId, ListenerId, WindowHandle};
use crate::foundation::geometry::Size;
use crate::foundation::logging::{self, debug, info, trace, warn};
use crate::registry::{Lookup, WindowRegistry};

#[derive(Debug, Default)]
struct BridgeState {
    initialized: bool,
    registry: WindowRegistry,
    css: CssStateStack,
    deferred: DeferredActionQueue,
    cursors: HashMap<CursorHandle, String>,
    global_listeners: Vec<ListenerId>,
}

struct Shared {
    dom: Rc<dyn DomBackend>,
    config: BridgeConfig,
    callbacks: RefCell<NativeCallbacks>,
    state: RefCell<BridgeState>,
}

/// Browser side of the windowing layer
pub struct WindowBridge {
    shared: Rc<Shared>,
}

impl WindowBridge {
    /// Create a bridge over a DOM backend
    ///
    /// Validates the configuration and installs the logger it names. Nothing
    /// is attached to the page until [`init`](Self::init).
    pub fn new(
        dom: Rc<dyn DomBackend>,
        config: BridgeConfig,
        callbacks: NativeCallbacks,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        logging::init(&config.logging);
        Ok(Self {
            shared: Rc::new(Shared {
                dom,
                config,
                callbacks: RefCell::new(callbacks),
                state: RefCell::new(BridgeState::default()),
            }),
        })
    }

    /// Create a bridge over the page this module runs in
    #[cfg(target_arch = "wasm32")]
    pub fn in_browser(config: BridgeConfig, callbacks: NativeCallbacks) -> Result<Self, BridgeError> {
        let dom = crate::backend::WebDom::new(config.targets.clone())?;
        Self::new(Rc::new(dom), config, callbacks)
    }

    /// Active configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }

    /// Replace the native callbacks
    pub fn set_callbacks(&self, callbacks: NativeCallbacks) {
        *self.shared.callbacks.borrow_mut() = callbacks;
    }

    /// Install the document listeners and the `(resolution: <scale>dppx)` watcher
    pub fn init(&self, scale: f64) -> Result<(), BridgeError> {
        if self.shared.state.borrow().initialized {
            warn!("Window bridge is already initialized");
            return Err(BridgeError::InvalidParam("bridge is already initialized".to_string()));
        }
        let listeners = Shared::install_global_listeners(&self.shared, scale)?;
        let mut state = self.shared.state.borrow_mut();
        state.global_listeners = listeners;
        state.initialized = true;
        info!("Window bridge initialized (scale {scale})");
        Ok(())
    }

    /// Whether [`init`](Self::init) ran and [`teardown`](Self::teardown) did not
    pub fn is_initialized(&self) -> bool {
        self.shared.state.borrow().initialized
    }

    /// Destroy remaining windows and remove every listener
    ///
    /// Idempotent; the bridge can be initialized again afterwards.
    pub fn teardown(&self) {
        self.shared.teardown();
    }

    /// Bind a native window to the canvas `selector` resolves to
    pub fn create_window(&self, handle: WindowHandle, selector: &str) -> Result<(), BridgeError> {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        if !state.initialized {
            return Err(BridgeError::NotInitialized);
        }
        match state.registry.insert(shared.dom.as_ref(), handle, selector) {
            Ok(context) => {
                debug!(
                    "Created window {handle} on [{selector}] (backing {})",
                    context.original_backing_size
                );
                Ok(())
            }
            Err(error) => {
                warn!("Cannot create window {handle}: {error}");
                Err(error)
            }
        }
    }

    /// Release a window and give its canvas back to the page; unknown handles are ignored
    pub fn destroy_window(&self, handle: WindowHandle) {
        let shared = &self.shared;
        let mut state = shared.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;
        if registry.destroy(shared.dom.as_ref(), css, handle) {
            debug!("Destroyed window {handle}");
        }
    }

    /// Handle of the window matching `lookup`
    pub fn find_window(&self, lookup: Lookup<'_>) -> Option<WindowHandle> {
        let shared = &self.shared;
        let state = shared.state.borrow();
        state
            .registry
            .find(shared.dom.as_ref(), lookup)
            .map(|context| context.handle)
    }

    /// Selector a window was created with
    pub fn window_selector(&self, handle: WindowHandle) -> Option<String> {
        let state = self.shared.state.borrow();
        state.registry.get(handle).map(|context| context.selector.clone())
    }

    /// Canvas element backing a window
    pub fn window_element(&self, handle: WindowHandle) -> Option<ElementId> {
        let state = self.shared.state.borrow();
        state.registry.get(handle).map(|context| context.element)
    }

    /// Number of live windows
    pub fn window_count(&self) -> usize {
        self.shared.state.borrow().registry.len()
    }
}

impl Drop for WindowBridge {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl Shared {
    fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        if !state.initialized {
            return;
        }
        let dom = self.dom.as_ref();
        let BridgeState {
            registry,
            css,
            deferred,
            cursors,
            global_listeners,
            initialized,
        } = &mut *state;

        for handle in registry.handles() {
            registry.destroy(dom, css, handle);
        }
        for id in global_listeners.drain(..) {
            dom.remove_listener(id);
        }
        css.clear();
        deferred.clear();
        cursors.clear();
        *initialized = false;
        info!("Window bridge torn down");
    }

    fn report(&self, code: ErrorCode, message: &str) {
        warn!("{message}");
        let callback = self.callbacks.borrow().error.clone();
        if let Some(callback) = callback {
            callback(code, message);
        }
    }

    fn report_error(&self, error: &BridgeError) {
        self.report(error.error_code(), &error.to_string());
    }

    fn notify_resize(&self, window: WindowHandle, size: Size) {
        trace!("Window {window} resized to {size}");
        let callback = self.callbacks.borrow().window_resized.clone();
        if let Some(callback) = callback {
            callback(window, size);
        }
    }

    /// Wrap a handler into a page listener holding only a weak reference
    fn listener(
        this: &Rc<Self>,
        handler: impl Fn(&Rc<Self>, &DomEvent) -> EventResponse + 'static,
    ) -> Listener {
        let weak = Rc::downgrade(this);
        Box::new(move |event: &DomEvent| {
            weak.upgrade()
                .map_or_else(EventResponse::default, |shared| handler(&shared, event))
        })
    }

    /// Queue an action for the next flush
    fn defer(this: &Rc<Self>, action: DeferredAction) {
        let schedule = this.state.borrow_mut().deferred.enqueue(action);
        if schedule {
            Self::schedule_flush(this);
        }
    }

    /// Make sure a flush runs on the next animation frame
    fn request_flush(this: &Rc<Self>) {
        let schedule = this.state.borrow_mut().deferred.request_flush();
        if schedule {
            Self::schedule_flush(this);
        }
    }

    fn schedule_flush(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        this.dom.request_animation_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.flush();
            }
        }));
    }

    fn flush(&self) {
        let actions = self.state.borrow_mut().deferred.take_pending();
        if !actions.is_empty() {
            trace!("Running {} deferred action(s)", actions.len());
        }
        for action in actions {
            action();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::backend::HeadlessDom;

    fn bridge(dom: &Rc<HeadlessDom>) -> WindowBridge {
        let bridge = WindowBridge::new(dom.clone(), BridgeConfig::default(), NativeCallbacks::new()).unwrap();
        bridge.init(1.0).unwrap();
        bridge
    }

    #[test]
    fn test_action_deferred_during_flush_runs_next_frame() {
        let dom = Rc::new(HeadlessDom::new());
        let bridge = bridge(&dom);
        let ran = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&bridge.shared);
        let outer = Rc::clone(&ran);
        Shared::defer(
            &bridge.shared,
            Box::new(move || {
                outer.borrow_mut().push("outer");
                let inner = Rc::clone(&outer);
                if let Some(shared) = weak.upgrade() {
                    Shared::defer(&shared, Box::new(move || inner.borrow_mut().push("inner")));
                }
            }),
        );

        dom.advance_frame();
        assert_eq!(*ran.borrow(), vec!["outer"]);
        assert_eq!(dom.pending_frames(), 1);

        dom.advance_frame();
        assert_eq!(*ran.borrow(), vec!["outer", "inner"]);
        assert_eq!(dom.pending_frames(), 0);
    }

    #[test]
    fn test_flush_after_drop_is_noop() {
        let dom = Rc::new(HeadlessDom::new());
        let ran = Rc::new(RefCell::new(false));
        {
            let bridge = bridge(&dom);
            let flag = Rc::clone(&ran);
            Shared::defer(&bridge.shared, Box::new(move || *flag.borrow_mut() = true));
        }
        dom.advance_frame();
        assert!(!*ran.borrow());
    }

    #[test]
    fn test_teardown_keeps_callbacks() {
        let dom = Rc::new(HeadlessDom::new());
        let bridge = bridge(&dom);
        bridge.set_callbacks(NativeCallbacks::new().with_scale_changed(|| {}));
        bridge.teardown();
        assert!(bridge.shared.callbacks.borrow().scale_changed.is_some());
    }
}
