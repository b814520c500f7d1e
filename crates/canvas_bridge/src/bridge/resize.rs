//! Resize targets and drag-to-resize

use std::rc::Rc;

use super::{BridgeState, Shared, WindowBridge};
use crate::backend::{DomBackend, DomEvent, EventKind, EventResponse, ListenTarget, Target};
use crate::css::CssStateStack;
use crate::error::BridgeError;
use crate::foundation::collections::{ElementId, WindowHandle};
use crate::foundation::geometry::{px, Size, SizeF};
use crate::foundation::logging::debug;
use crate::resize::{computed_size, Cleanup, DragController, ResizeBinding, ResizeSource};

impl WindowBridge {
    /// Make the window follow the size of `selector`, or stop following with `None`
    ///
    /// Attaching reports the current size right away. Failures are also
    /// reported through the error callback.
    pub fn set_resize_target(&self, window: WindowHandle, selector: Option<&str>) -> Result<(), BridgeError> {
        let result = Shared::attach_resize_target(&self.shared, window, selector);
        match result {
            Ok(Some(size)) => {
                self.shared.notify_resize(window, size);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(error) => {
                self.shared.report_error(&error);
                Err(error)
            }
        }
    }

    /// Follow `resizable` and, with a handle, let the user resize it by dragging
    ///
    /// The handle sits at the resizable's bottom-right corner. The viewport
    /// can be followed but not dragged.
    pub fn make_resizable(
        &self,
        window: WindowHandle,
        resizable: &str,
        handle: Option<&str>,
    ) -> Result<(), BridgeError> {
        let shared = &self.shared;
        if resizable.is_empty() {
            let error = BridgeError::UnknownTarget("canvas resize selector is required".to_string());
            shared.report_error(&error);
            return Err(error);
        }

        let handle_target = match handle.filter(|selector| !selector.is_empty()) {
            None => None,
            Some(selector) => {
                let Some(target) = shared.dom.resolve(selector) else {
                    let error = BridgeError::UnknownTarget(format!(
                        "Cannot find handle element with selector [{selector}]"
                    ));
                    shared.report_error(&error);
                    return Err(error);
                };
                if shared.dom.resolve(resizable) == Some(Target::Viewport) {
                    let error = BridgeError::InvalidParam(format!(
                        "[{resizable}] follows the viewport and cannot be dragged"
                    ));
                    shared.report_error(&error);
                    return Err(error);
                }
                Some(target)
            }
        };

        self.set_resize_target(window, Some(resizable))?;

        let Some(handle_target) = handle_target else {
            return Ok(());
        };
        Shared::attach_drag(shared, window, handle_target).map_err(|error| {
            shared.report_error(&error);
            error
        })
    }

    /// Stop following and remove the drag interaction
    pub fn unmake_resizable(&self, window: WindowHandle) -> Result<(), BridgeError> {
        self.set_resize_target(window, None)
    }
}

impl Shared {
    /// Replace the window's binding; returns the size to report when attaching
    fn attach_resize_target(
        this: &Rc<Self>,
        window: WindowHandle,
        selector: Option<&str>,
    ) -> Result<Option<Size>, BridgeError> {
        let dom = this.dom.as_ref();
        let mut state = this.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;

        let context = registry
            .get_mut(window)
            .ok_or_else(|| BridgeError::UnknownTarget(format!("Cannot find canvas [{window}]")))?;
        if let Some(previous) = context.resize_binding.take() {
            debug!("Window {window} stops following binding {}", previous.id());
            previous.teardown(dom, css);
        }

        let Some(selector) = selector.filter(|selector| !selector.is_empty()) else {
            return Ok(None);
        };
        let target = dom.resolve(selector).ok_or_else(|| {
            BridgeError::UnknownTarget(format!("Cannot find canvas resize selector [{selector}]"))
        })?;

        let binding_id = registry.next_binding_id();
        let source = ResizeSource::from_target(target);
        let mut binding = ResizeBinding::new(binding_id, source);

        let weak = Rc::downgrade(this);
        let notify = move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_observed_resize(window, binding_id);
            }
        };
        let registered = match source {
            ResizeSource::Viewport => dom
                .add_listener(
                    ListenTarget::Viewport,
                    EventKind::Resize,
                    Box::new(move |_: &DomEvent| {
                        notify();
                        EventResponse::default()
                    }),
                )
                .map(Cleanup::RemoveListener),
            ResizeSource::Element(element) => dom.observe_resize(element, Box::new(notify)).map(Cleanup::Disconnect),
        };
        match registered {
            Ok(cleanup) => binding.push_cleanup(cleanup),
            Err(error) => {
                binding.teardown(dom, css);
                return Err(error);
            }
        }

        let size = binding.observe(dom);
        debug!("Window {window} follows [{selector}] (binding {binding_id})");
        if let Some(context) = registry.get_mut(window) {
            context.resize_binding = Some(binding);
        }
        Ok(size)
    }

    fn on_observed_resize(&self, window: WindowHandle, binding_id: u64) {
        let size = {
            let mut state = self.state.borrow_mut();
            let Some(binding) = state
                .registry
                .get_mut(window)
                .and_then(|context| context.resize_binding.as_mut())
                .filter(|binding| binding.id() == binding_id)
            else {
                return;
            };
            binding.observe(self.dom.as_ref())
        };
        if let Some(size) = size {
            self.notify_resize(window, size);
        }
    }

    /// Wire the drag controller onto the window's current binding
    fn attach_drag(this: &Rc<Self>, window: WindowHandle, handle: Target) -> Result<(), BridgeError> {
        let dom = this.dom.as_ref();
        let mut state = this.state.borrow_mut();
        let binding = state
            .registry
            .get_mut(window)
            .and_then(|context| context.resize_binding.as_mut())
            .ok_or_else(|| BridgeError::UnknownTarget(format!("Cannot find canvas [{window}]")))?;
        let Some(resizable) = binding.source().element() else {
            return Err(BridgeError::InvalidParam("the viewport cannot be dragged".to_string()));
        };
        let binding_id = binding.id();

        let (handle_listen, handle_element) = match handle {
            Target::Viewport => (ListenTarget::Viewport, resizable),
            Target::Element(element) => (ListenTarget::Element(element), element),
        };
        let subscriptions = [
            (handle_listen, EventKind::MouseDown),
            (ListenTarget::Viewport, EventKind::MouseMove),
            (ListenTarget::Viewport, EventKind::MouseUp),
            (handle_listen, EventKind::TouchStart),
            (ListenTarget::Viewport, EventKind::TouchMove),
            (ListenTarget::Viewport, EventKind::TouchEnd),
            (ListenTarget::Viewport, EventKind::TouchCancel),
        ];
        let mut installed = Vec::with_capacity(subscriptions.len());
        for (target, kind) in subscriptions {
            let listener = Self::listener(this, move |shared, event| shared.on_drag_event(window, binding_id, event));
            match dom.add_listener(target, kind, listener) {
                Ok(id) => installed.push(id),
                Err(error) => {
                    for id in installed {
                        dom.remove_listener(id);
                    }
                    return Err(error);
                }
            }
        }

        for id in installed {
            binding.push_cleanup(Cleanup::RemoveListener(id));
        }
        let minimum = SizeF::new(this.config.drag.min_width, this.config.drag.min_height);
        binding.set_drag(DragController::new(resizable, handle_element, minimum));
        debug!("Window {window} resizable by dragging (binding {binding_id})");
        Ok(())
    }

    fn on_drag_event(&self, window: WindowHandle, binding_id: u64, event: &DomEvent) -> EventResponse {
        let dom = self.dom.as_ref();
        let mut state = self.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;

        let Some(context) = registry.get_mut(window) else {
            return EventResponse::default();
        };
        let canvas = context.element;
        let Some(drag) = context
            .resize_binding
            .as_mut()
            .filter(|binding| binding.id() == binding_id)
            .and_then(|binding| binding.drag_mut())
        else {
            return EventResponse::default();
        };
        let resizable = drag.resizable();

        let mut response = EventResponse::default();
        let mut apply = None;
        let mut snap = false;
        match event {
            DomEvent::Mouse { kind: EventKind::MouseDown, point } => {
                drag.pointer_down(computed_size(dom, resizable), *point);
            }
            DomEvent::Mouse { kind: EventKind::MouseMove, point } => apply = drag.pointer_move(*point),
            DomEvent::Mouse { kind: EventKind::MouseUp, .. } => snap = drag.pointer_up(),
            DomEvent::Touch { kind: EventKind::TouchStart, touches, .. } => {
                if drag.touch_start(computed_size(dom, resizable), touches) {
                    response = EventResponse::prevent();
                }
            }
            DomEvent::Touch { kind: EventKind::TouchMove, changed, .. } => apply = drag.touch_move(changed),
            DomEvent::Touch { kind: EventKind::TouchEnd | EventKind::TouchCancel, changed, .. } => {
                snap = drag.touch_end(changed);
            }
            _ => {}
        }

        if snap {
            apply = Some(computed_size(dom, canvas));
        }
        if let Some(size) = apply {
            apply_size(dom, css, resizable, size);
        }
        response
    }

    /// Keep the resizable in step with a native-driven resize, unless a drag is running
    pub(super) fn sync_resizable(&self, window: WindowHandle, size: Size) {
        let dom = self.dom.as_ref();
        let mut state = self.state.borrow_mut();
        let BridgeState { registry, css, .. } = &mut *state;
        let Some(drag) = registry
            .get(window)
            .and_then(|context| context.resize_binding.as_ref())
            .and_then(|binding| binding.drag())
        else {
            return;
        };
        if !drag.is_dragging() {
            apply_size(dom, css, drag.resizable(), SizeF::from(size));
        }
    }
}

fn apply_size(dom: &dyn DomBackend, css: &mut CssStateStack, element: ElementId, size: SizeF) {
    css.set(dom, element, "width", &px(size.width));
    css.set(dom, element, "height", &px(size.height));
}
