//! Browser DOM backend built on `web-sys`
//!
//! Elements handed to the bridge are interned in a slot map so the rest of
//! the crate only sees [`ElementId`]s. Listener closures are owned by their
//! registration; removing one detaches it from the page immediately, but the
//! closure itself is retired until the next animation frame because a
//! listener may remove itself while it is running.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, ClipboardEvent, CssStyleDeclaration, Document,
    Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, ImageData, KeyboardEvent, MouseEvent,
    ResizeObserver, TouchEvent, TouchList, Window,
};

use super::{
    ActiveElement, ClipboardCallback, DomBackend, DomEvent, EventKind, EventResponse, FrameCallback,
    KeyboardInput, ListenTarget, Listener, Modifiers, Notify, StylePriority, Target, TouchPoint,
};
use crate::config::TargetConfig;
use crate::error::BridgeError;
use crate::foundation::collections::{ElementId, ListenerId, SlotMap};
use crate::foundation::geometry::{Point, Size};
use crate::foundation::logging::warn;

type EventClosure = Closure<dyn FnMut(Event)>;

enum Registration {
    Event {
        target: EventTarget,
        name: &'static str,
        closure: EventClosure,
    },
    Observer {
        observer: ResizeObserver,
        closure: Closure<dyn FnMut(js_sys::Array)>,
    },
}

impl Registration {
    fn detach(&self) {
        match self {
            Self::Event { target, name, closure } => {
                let _ = target.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
            Self::Observer { observer, .. } => observer.disconnect(),
        }
    }
}

#[derive(Default)]
struct WebState {
    /// Every element `resolve` ever returned; entries are never released
    ///
    /// Ids stay valid for the bridge's lifetime even when the page detaches
    /// and re-attaches the element, so the map grows by one entry per
    /// distinct element resolved by selector and `lookup` scans it linearly.
    elements: SlotMap<ElementId, Element>,
    registrations: SlotMap<ListenerId, Registration>,
    retired: Vec<Registration>,
}

impl WebState {
    fn lookup(&self, element: &Element) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|&(_, known)| known == element)
            .map(|(id, _)| id)
    }

    fn intern(&mut self, element: Element) -> ElementId {
        match self.lookup(&element) {
            Some(id) => id,
            None => self.elements.insert(element),
        }
    }
}

/// DOM backend for the browser main thread
pub struct WebDom {
    window: Window,
    document: Document,
    targets: TargetConfig,
    state: Rc<RefCell<WebState>>,
}

impl WebDom {
    /// Bind to the global `window` and `document`
    pub fn new(targets: TargetConfig) -> Result<Self, BridgeError> {
        let window = web_sys::window()
            .ok_or_else(|| BridgeError::PlatformFailure("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| BridgeError::PlatformFailure("window has no document".to_string()))?;
        Ok(Self {
            window,
            document,
            targets,
            state: Rc::new(RefCell::new(WebState::default())),
        })
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.state.borrow().elements.get(id).cloned()
    }

    fn style(&self, id: ElementId) -> Option<CssStyleDeclaration> {
        self.element(id)
            .and_then(|element| element.dyn_ref::<HtmlElement>().map(HtmlElement::style))
    }

    fn canvas(&self, id: ElementId) -> Option<HtmlCanvasElement> {
        self.element(id).and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
    }

    fn event_target(&self, target: ListenTarget) -> Result<EventTarget, BridgeError> {
        match target {
            ListenTarget::Document => Ok(self.document.clone().into()),
            ListenTarget::Viewport => Ok(self.window.clone().into()),
            ListenTarget::Element(id) => self
                .element(id)
                .map(Into::into)
                .ok_or_else(|| BridgeError::UnknownTarget(format!("element {id:?}"))),
        }
    }

    fn listen(
        &self,
        target: EventTarget,
        name: &'static str,
        closure: EventClosure,
        passive: bool,
    ) -> Result<ListenerId, BridgeError> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| BridgeError::PlatformFailure(describe(&e)))?;
        Ok(self
            .state
            .borrow_mut()
            .registrations
            .insert(Registration::Event { target, name, closure }))
    }

    fn element_of(&self, element: Option<Element>) -> Option<ElementId> {
        element.and_then(|element| self.state.borrow().lookup(&element))
    }
}

impl Drop for WebDom {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        for (_, registration) in state.registrations.drain() {
            registration.detach();
        }
        state.retired.clear();
    }
}

impl DomBackend for WebDom {
    fn resolve(&self, selector: &str) -> Option<Target> {
        if selector == self.targets.viewport_alias {
            return Some(Target::Viewport);
        }
        let selector = if selector == self.targets.default_canvas_alias {
            self.targets.default_canvas_selector.as_str()
        } else {
            selector
        };
        let element = self.document.query_selector(selector).ok().flatten()?;
        Some(Target::Element(self.state.borrow_mut().intern(element)))
    }

    fn inline_style(&self, element: ElementId, property: &str) -> String {
        self.style(element)
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn inline_priority(&self, element: ElementId, property: &str) -> StylePriority {
        self.style(element)
            .map_or(StylePriority::Normal, |style| StylePriority::from_css(&style.get_property_priority(property)))
    }

    fn set_inline_style(&self, element: ElementId, property: &str, value: &str, priority: StylePriority) {
        if let Some(style) = self.style(element) {
            let _ = style.set_property_with_priority(property, value, priority.as_str());
        }
    }

    fn remove_inline_style(&self, element: ElementId, property: &str) {
        if let Some(style) = self.style(element) {
            let _ = style.remove_property(property);
        }
    }

    fn computed_style(&self, element: ElementId, property: &str) -> String {
        self.element(element)
            .and_then(|element| self.window.get_computed_style(&element).ok().flatten())
            .and_then(|style| style.get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn backing_size(&self, element: ElementId) -> Size {
        self.canvas(element).map_or_else(Size::default, |canvas| {
            Size::new(
                i32::try_from(canvas.width()).unwrap_or(i32::MAX),
                i32::try_from(canvas.height()).unwrap_or(i32::MAX),
            )
        })
    }

    fn set_backing_size(&self, element: ElementId, size: Size) {
        if let Some(canvas) = self.canvas(element) {
            canvas.set_width(u32::try_from(size.width).unwrap_or(0));
            canvas.set_height(u32::try_from(size.height).unwrap_or(0));
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn viewport_size(&self) -> Size {
        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as i32;
        Size::new(read(self.window.inner_width()), read(self.window.inner_height()))
    }

    fn client_origin(&self, element: ElementId) -> Point {
        self.element(element).map_or_else(Point::default, |element| {
            let rect = element.get_bounding_client_rect();
            Point::new(rect.left(), rect.top())
        })
    }

    fn focus(&self, element: ElementId) {
        if let Some(element) = self.element(element).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let _ = element.focus();
        }
    }

    fn blur(&self, element: ElementId) {
        if let Some(element) = self.element(element).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let _ = element.blur();
        }
    }

    fn active_element(&self) -> ActiveElement {
        let Some(active) = self.document.active_element() else {
            return ActiveElement::Body;
        };
        let is_body = self
            .document
            .body()
            .is_some_and(|body| body.unchecked_ref::<Element>() == &active);
        if is_body {
            return ActiveElement::Body;
        }
        self.element_of(Some(active))
            .map_or(ActiveElement::Unknown, ActiveElement::Known)
    }

    fn fullscreen_element(&self) -> Option<ElementId> {
        self.element_of(self.document.fullscreen_element())
    }

    fn pointer_lock_element(&self) -> Option<ElementId> {
        self.element_of(self.document.pointer_lock_element())
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn now(&self) -> f64 {
        self.window.performance().map_or(0.0, |performance| performance.now())
    }

    fn platform(&self) -> String {
        self.window.navigator().platform().unwrap_or_default()
    }

    fn selection_text(&self) -> String {
        self.window
            .get_selection()
            .ok()
            .flatten()
            .map(|selection| String::from(selection.to_string()))
            .unwrap_or_default()
    }

    fn render_cursor_image(&self, width: u32, height: u32, rgba: &[u8]) -> Result<String, BridgeError> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba.len() as u64 != expected {
            return Err(BridgeError::InvalidParam(format!(
                "cursor image {width}x{height} needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        let platform = |e: JsValue| BridgeError::PlatformFailure(describe(&e));
        let canvas: HtmlCanvasElement = self.document.create_element("canvas").map_err(platform)?.unchecked_into();
        canvas.set_width(width);
        canvas.set_height(height);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(platform)?
            .ok_or_else(|| BridgeError::PlatformFailure("2d context unavailable".to_string()))?
            .unchecked_into();
        let pixels = ImageData::new_with_u8_clamped_array_and_sh(Clamped(rgba), width, height).map_err(platform)?;
        context.put_image_data(&pixels, 0.0, 0.0).map_err(platform)?;
        canvas.to_data_url().map_err(platform)
    }

    fn open_url(&self, url: &str, target: Option<&str>) {
        let opened = match target {
            Some(target) => self.window.open_with_url_and_target(url, target),
            None => self.window.open_with_url(url),
        };
        if let Err(e) = opened {
            warn!("Cannot open url [{url}]: {}", describe(&e));
        }
    }

    fn has_clipboard(&self) -> bool {
        Reflect::get(&self.window.navigator(), &JsValue::from_str("clipboard"))
            .is_ok_and(|clipboard| !clipboard.is_undefined() && !clipboard.is_null())
    }

    fn write_clipboard(&self, text: String, done: ClipboardCallback) {
        let promise = clipboard_call(&self.window, "writeText", Some(&text));
        wasm_bindgen_futures::spawn_local(async move {
            let result = match promise {
                Ok(promise) => JsFuture::from(promise).await.map(|_| text),
                Err(e) => Err(e),
            };
            done(result.map_err(|e| describe(&e)));
        });
    }

    fn read_clipboard(&self, done: ClipboardCallback) {
        let promise = clipboard_call(&self.window, "readText", None);
        wasm_bindgen_futures::spawn_local(async move {
            let result = match promise {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .map(|value| value.as_string().unwrap_or_default()),
                Err(e) => Err(e),
            };
            done(result.map_err(|e| describe(&e)));
        });
    }

    fn request_animation_frame(&self, callback: FrameCallback) {
        let state = Rc::clone(&self.state);
        let frame = Closure::once_into_js(move || {
            state.borrow_mut().retired.clear();
            callback();
        });
        if let Err(e) = self.window.request_animation_frame(frame.unchecked_ref()) {
            warn!("requestAnimationFrame failed: {}", describe(&e));
        }
    }

    fn add_listener(
        &self,
        target: ListenTarget,
        kind: EventKind,
        mut listener: Listener,
    ) -> Result<ListenerId, BridgeError> {
        let event_target = self.event_target(target)?;
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if let Some(dom_event) = translate(kind, &event) {
                let response = listener(&dom_event);
                apply(&event, &response);
            }
        }) as Box<dyn FnMut(Event)>);
        self.listen(event_target, kind.dom_name(), closure, kind.is_passive())
    }

    fn observe_resize(&self, element: ElementId, mut callback: Notify) -> Result<ListenerId, BridgeError> {
        let target = self
            .element(element)
            .ok_or_else(|| BridgeError::UnknownTarget(format!("element {element:?}")))?;
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| callback()) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| BridgeError::PlatformFailure(describe(&e)))?;
        observer.observe(&target);
        Ok(self
            .state
            .borrow_mut()
            .registrations
            .insert(Registration::Observer { observer, closure }))
    }

    fn watch_resolution(&self, scale: f64, mut callback: Notify) -> Result<ListenerId, BridgeError> {
        let query = self
            .window
            .match_media(&format!("(resolution: {scale}dppx)"))
            .ok()
            .flatten()
            .ok_or_else(|| BridgeError::PlatformFailure("matchMedia unavailable".to_string()))?;
        let closure = Closure::wrap(Box::new(move |_event: Event| callback()) as Box<dyn FnMut(Event)>);
        self.listen(query.into(), "change", closure, true)
    }

    fn remove_listener(&self, id: ListenerId) {
        let mut state = self.state.borrow_mut();
        if let Some(registration) = state.registrations.remove(id) {
            registration.detach();
            state.retired.push(registration);
        }
    }
}

fn clipboard_call(window: &Window, method: &str, argument: Option<&str>) -> Result<Promise, JsValue> {
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    let function: Function = Reflect::get(&clipboard, &JsValue::from_str(method))?.dyn_into()?;
    let value = match argument {
        Some(argument) => function.call1(&clipboard, &JsValue::from_str(argument))?,
        None => function.call0(&clipboard)?,
    };
    value.dyn_into()
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"))
}

fn touch_points(list: &TouchList) -> Vec<TouchPoint> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| TouchPoint::new(touch.identifier(), f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn translate(kind: EventKind, event: &Event) -> Option<DomEvent> {
    match kind {
        EventKind::MouseDown | EventKind::MouseUp | EventKind::MouseMove => event
            .dyn_ref::<MouseEvent>()
            .map(|mouse| DomEvent::mouse(kind, f64::from(mouse.client_x()), f64::from(mouse.client_y()))),
        EventKind::TouchStart | EventKind::TouchMove | EventKind::TouchEnd | EventKind::TouchCancel => {
            event.dyn_ref::<TouchEvent>().map(|touch| DomEvent::Touch {
                kind,
                touches: touch_points(&touch.touches()),
                changed: touch_points(&touch.changed_touches()),
            })
        }
        EventKind::KeyDown | EventKind::KeyUp => event.dyn_ref::<KeyboardEvent>().map(|key| {
            DomEvent::Key(KeyboardInput {
                is_down: kind == EventKind::KeyDown,
                code: key.code(),
                key: key.key(),
                repeat: key.repeat(),
                modifiers: Modifiers::from_keys(key.shift_key(), key.ctrl_key(), key.alt_key(), key.meta_key()),
            })
        }),
        EventKind::Cut | EventKind::Copy | EventKind::Paste => {
            let text = (kind == EventKind::Paste)
                .then(|| event.dyn_ref::<ClipboardEvent>().and_then(ClipboardEvent::clipboard_data))
                .flatten()
                .and_then(|data| data.get_data("text/plain").ok());
            Some(DomEvent::Clipboard { kind, text })
        }
        EventKind::Resize => Some(DomEvent::Resize),
    }
}

fn apply(event: &Event, response: &EventResponse) {
    if response.prevent_default {
        event.prevent_default();
    }
    if let Some(text) = &response.clipboard_data {
        if let Some(data) = event.dyn_ref::<ClipboardEvent>().and_then(ClipboardEvent::clipboard_data) {
            let _ = data.set_data("text/plain", text);
        }
    }
}
