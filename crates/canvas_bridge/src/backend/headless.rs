//! In-memory DOM backend
//!
//! `HeadlessDom` models just enough of a page for the bridge to run outside a
//! browser: an element arena with inline and sheet styles, canvas backing
//! stores, focus, selection, an asynchronous clipboard, listener dispatch
//! with element → document → window bubbling, animation frames and resize
//! observations.
//!
//! Time only moves when the owner calls [`HeadlessDom::advance_frame`], which
//! runs (in order) the animation-frame callbacks requested before the call,
//! settles pending clipboard operations, and delivers resize observations for
//! elements whose computed size changed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use base64::Engine;

use super::{
    ActiveElement, ClipboardCallback, DomBackend, DomEvent, EventKind, EventResponse, FrameCallback,
    ListenTarget, Listener, Notify, StylePriority, Target,
};
use crate::config::TargetConfig;
use crate::error::BridgeError;
use crate::foundation::collections::{ElementId, ListenerId, SlotMap};
use crate::foundation::geometry::{parse_css_number, px, Point, Size, SizeF};

/// A style value with its priority
#[derive(Debug, Clone)]
struct Declaration {
    value: String,
    priority: StylePriority,
}

/// One element of the in-memory document
#[derive(Debug, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    inline: HashMap<String, Declaration>,
    sheet: HashMap<String, Declaration>,
    canvas: Option<Size>,
    origin: Point,
}

enum Registration {
    Event {
        target: ListenTarget,
        kind: EventKind,
        passive: bool,
        listener: Rc<RefCell<Listener>>,
    },
    Resize {
        element: ElementId,
        last: Option<SizeF>,
        callback: Rc<RefCell<Notify>>,
    },
    Resolution {
        scale: f64,
        callback: Rc<RefCell<Notify>>,
    },
}

enum PendingClipboard {
    Write(String, ClipboardCallback),
    Read(ClipboardCallback),
}

struct DomState {
    targets: TargetConfig,
    nodes: SlotMap<ElementId, Node>,
    viewport: Size,
    device_pixel_ratio: f64,
    active: ActiveElement,
    fullscreen: Option<ElementId>,
    pointer_lock: Option<ElementId>,
    title: String,
    now: f64,
    platform: String,
    selection: String,
    clipboard_supported: bool,
    clipboard: String,
    clipboard_failure: Option<String>,
    opened_urls: Vec<(String, Option<String>)>,
    frame_callbacks: Vec<FrameCallback>,
    pending_clipboard: Vec<PendingClipboard>,
    registrations: SlotMap<ListenerId, Registration>,
}

impl DomState {
    fn find_by_id(&self, id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.id.as_deref() == Some(id))
            .map(|(key, _)| key)
    }

    fn find_by_tag(&self, tag: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.tag.eq_ignore_ascii_case(tag))
            .map(|(key, _)| key)
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            return self.find_by_id(id);
        }
        if !selector.is_empty() && selector.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return self.find_by_tag(selector);
        }
        None
    }

    fn computed_style(&self, element: ElementId, property: &str) -> String {
        let Some(node) = self.nodes.get(element) else {
            return String::new();
        };
        let inline = node.inline.get(property).filter(|declaration| !declaration.value.is_empty());
        let winner = match (inline, node.sheet.get(property)) {
            (Some(inline), Some(sheet)) if sheet.priority > inline.priority => Some(sheet),
            (Some(inline), _) => Some(inline),
            (None, sheet) => sheet,
        };
        if let Some(declaration) = winner {
            return declaration.value.clone();
        }
        match property {
            "width" => px(node.canvas.map_or(0.0, |size| f64::from(size.width))),
            "height" => px(node.canvas.map_or(0.0, |size| f64::from(size.height))),
            "display" => if node.canvas.is_some() { "inline" } else { "block" }.to_string(),
            "opacity" => "1".to_string(),
            "cursor" => "auto".to_string(),
            "visibility" => "visible".to_string(),
            _ => String::new(),
        }
    }

    fn content_size(&self, element: ElementId) -> SizeF {
        let read = |property| parse_css_number(&self.computed_style(element, property)).unwrap_or(0.0);
        SizeF::new(read("width"), read("height"))
    }
}

/// In-memory DOM used off-browser and by the test-suite
pub struct HeadlessDom {
    state: RefCell<DomState>,
}

impl HeadlessDom {
    /// Create an empty document with a 1024x768 viewport and default aliases
    pub fn new() -> Self {
        Self::with_targets(TargetConfig::default())
    }

    /// Create an empty document using the given selector aliases
    pub fn with_targets(targets: TargetConfig) -> Self {
        Self {
            state: RefCell::new(DomState {
                targets,
                nodes: SlotMap::with_key(),
                viewport: Size::new(1024, 768),
                device_pixel_ratio: 1.0,
                active: ActiveElement::Body,
                fullscreen: None,
                pointer_lock: None,
                title: String::new(),
                now: 0.0,
                platform: "Linux x86_64".to_string(),
                selection: String::new(),
                clipboard_supported: true,
                clipboard: String::new(),
                clipboard_failure: None,
                opened_urls: Vec::new(),
                frame_callbacks: Vec::new(),
                pending_clipboard: Vec::new(),
                registrations: SlotMap::with_key(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Document construction
    // ------------------------------------------------------------------

    /// Add an element with the given tag and optional `id` attribute
    pub fn create_element(&self, tag: &str, id: Option<&str>) -> ElementId {
        self.state.borrow_mut().nodes.insert(Node {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            ..Node::default()
        })
    }

    /// Add a `<canvas id=...>` with the given backing-store size
    pub fn create_canvas(&self, id: &str, size: Size) -> ElementId {
        self.state.borrow_mut().nodes.insert(Node {
            tag: "canvas".to_string(),
            id: Some(id.to_string()),
            canvas: Some(size),
            ..Node::default()
        })
    }

    /// Set a style-sheet value, used when no inline value is present
    ///
    /// A trailing `!important` makes the rule beat normal inline values.
    pub fn set_sheet_style(&self, element: ElementId, property: &str, value: &str) {
        let declaration = match value.trim_end().strip_suffix("!important") {
            Some(value) => Declaration {
                value: value.trim_end().to_string(),
                priority: StylePriority::Important,
            },
            None => Declaration {
                value: value.to_string(),
                priority: StylePriority::Normal,
            },
        };
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element) {
            node.sheet.insert(property.to_string(), declaration);
        }
    }

    /// Move the element's client rect
    pub fn set_client_origin(&self, element: ElementId, origin: Point) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element) {
            node.origin = origin;
        }
    }

    // ------------------------------------------------------------------
    // Page state
    // ------------------------------------------------------------------

    /// Resize the viewport and fire `resize` on the window
    pub fn set_viewport_size(&self, size: Size) {
        self.state.borrow_mut().viewport = size;
        self.dispatch(ListenTarget::Viewport, &DomEvent::Resize);
    }

    /// Change the device pixel ratio, notifying media queries whose match flipped
    pub fn set_device_pixel_ratio(&self, ratio: f64) {
        let callbacks: Vec<_> = {
            let mut state = self.state.borrow_mut();
            let previous = state.device_pixel_ratio;
            state.device_pixel_ratio = ratio;
            state
                .registrations
                .iter()
                .filter_map(|(id, registration)| match registration {
                    Registration::Resolution { scale, callback } => {
                        let flipped = ((previous - scale).abs() < f64::EPSILON)
                            != ((ratio - scale).abs() < f64::EPSILON);
                        flipped.then(|| (id, Rc::clone(callback)))
                    }
                    _ => None,
                })
                .collect()
        };
        for (id, callback) in callbacks {
            if self.is_registered(id) {
                (callback.borrow_mut())();
            }
        }
    }

    /// Set the focused element
    pub fn set_active_element(&self, active: ActiveElement) {
        self.state.borrow_mut().active = active;
    }

    /// Set the element reported as fullscreen
    pub fn set_fullscreen_element(&self, element: Option<ElementId>) {
        self.state.borrow_mut().fullscreen = element;
    }

    /// Set the element reported as holding the pointer lock
    pub fn set_pointer_lock_element(&self, element: Option<ElementId>) {
        self.state.borrow_mut().pointer_lock = element;
    }

    /// Set the document selection text
    pub fn set_selection(&self, text: &str) {
        self.state.borrow_mut().selection = text.to_string();
    }

    /// Set the timestamp returned by `now()`
    pub fn set_now(&self, now: f64) {
        self.state.borrow_mut().now = now;
    }

    /// Set the navigator platform string
    pub fn set_platform(&self, platform: &str) {
        self.state.borrow_mut().platform = platform.to_string();
    }

    /// Enable or disable the asynchronous clipboard API
    pub fn set_clipboard_supported(&self, supported: bool) {
        self.state.borrow_mut().clipboard_supported = supported;
    }

    /// Make subsequent clipboard operations reject with `message`
    pub fn fail_clipboard(&self, message: Option<&str>) {
        self.state.borrow_mut().clipboard_failure = message.map(str::to_string);
    }

    /// Replace the system clipboard contents
    pub fn set_clipboard_contents(&self, text: &str) {
        self.state.borrow_mut().clipboard = text.to_string();
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// System clipboard contents
    pub fn clipboard_contents(&self) -> String {
        self.state.borrow().clipboard.clone()
    }

    /// URLs opened so far, with their browsing-context targets
    pub fn opened_urls(&self) -> Vec<(String, Option<String>)> {
        self.state.borrow().opened_urls.clone()
    }

    /// Document title
    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    /// Number of live listeners, observations and watchers
    pub fn listener_count(&self) -> usize {
        self.state.borrow().registrations.len()
    }

    /// Number of listeners installed for `kind` on `target`
    pub fn listeners_on(&self, target: ListenTarget, kind: EventKind) -> usize {
        self.state
            .borrow()
            .registrations
            .values()
            .filter(|registration| {
                matches!(registration, Registration::Event { target: t, kind: k, .. } if *t == target && *k == kind)
            })
            .count()
    }

    /// Number of passive listeners installed for `kind` on `target`
    pub fn passive_listeners_on(&self, target: ListenTarget, kind: EventKind) -> usize {
        self.state
            .borrow()
            .registrations
            .values()
            .filter(|registration| {
                matches!(
                    registration,
                    Registration::Event { target: t, kind: k, passive: true, .. } if *t == target && *k == kind
                )
            })
            .count()
    }

    /// Number of animation-frame callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frame_callbacks.len()
    }

    /// Whether `id` is still registered
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.state.borrow().registrations.contains_key(id)
    }

    // ------------------------------------------------------------------
    // Driving the page
    // ------------------------------------------------------------------

    /// Dispatch an event, bubbling element → document → window
    ///
    /// Returns the merged response of every listener that ran.
    pub fn dispatch(&self, target: ListenTarget, event: &DomEvent) -> EventResponse {
        let chain = match target {
            ListenTarget::Element(_) => vec![target, ListenTarget::Document, ListenTarget::Viewport],
            ListenTarget::Document => vec![ListenTarget::Document, ListenTarget::Viewport],
            ListenTarget::Viewport => vec![ListenTarget::Viewport],
        };
        let kind = event.kind();

        let listeners: Vec<_> = {
            let state = self.state.borrow();
            chain
                .iter()
                .flat_map(|step| {
                    state.registrations.iter().filter_map(move |(id, registration)| match registration {
                        Registration::Event {
                            target,
                            kind: k,
                            passive,
                            listener,
                        } if target == step && *k == kind => Some((id, *passive, Rc::clone(listener))),
                        _ => None,
                    })
                })
                .collect()
        };

        let mut response = EventResponse::default();
        for (id, passive, listener) in listeners {
            // listeners removed by an earlier listener do not run
            if self.is_registered(id) {
                let mut result = (listener.borrow_mut())(event);
                // the page ignores preventDefault() from a passive listener
                if passive {
                    result.prevent_default = false;
                }
                response.merge(result);
            }
        }
        response
    }

    /// Run one frame: animation-frame callbacks, clipboard settlement, resize observations
    pub fn advance_frame(&self) {
        let callbacks = std::mem::take(&mut self.state.borrow_mut().frame_callbacks);
        for callback in callbacks {
            callback();
        }
        self.settle_clipboard();
        self.deliver_resize_observations();
    }

    /// Complete pending clipboard operations
    pub fn settle_clipboard(&self) {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending_clipboard);
        for operation in pending {
            let failure = self.state.borrow().clipboard_failure.clone();
            match (operation, failure) {
                (PendingClipboard::Write(_, done) | PendingClipboard::Read(done), Some(message)) => {
                    done(Err(message));
                }
                (PendingClipboard::Write(text, done), None) => {
                    self.state.borrow_mut().clipboard = text.clone();
                    done(Ok(text));
                }
                (PendingClipboard::Read(done), None) => {
                    let text = self.state.borrow().clipboard.clone();
                    done(Ok(text));
                }
            }
        }
    }

    fn deliver_resize_observations(&self) {
        let changed: Vec<_> = {
            let mut state = self.state.borrow_mut();
            let sizes: Vec<_> = state
                .registrations
                .iter()
                .filter_map(|(id, registration)| match registration {
                    Registration::Resize { element, .. } => Some((id, state.content_size(*element))),
                    _ => None,
                })
                .collect();
            sizes
                .into_iter()
                .filter_map(|(id, size)| match state.registrations.get_mut(id) {
                    Some(Registration::Resize { last, callback, .. }) if *last != Some(size) => {
                        *last = Some(size);
                        Some((id, Rc::clone(callback)))
                    }
                    _ => None,
                })
                .collect()
        };
        for (id, callback) in changed {
            if self.is_registered(id) {
                (callback.borrow_mut())();
            }
        }
    }

    fn register(&self, registration: Registration) -> ListenerId {
        self.state.borrow_mut().registrations.insert(registration)
    }
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl DomBackend for HeadlessDom {
    fn resolve(&self, selector: &str) -> Option<Target> {
        let state = self.state.borrow();
        if selector == state.targets.viewport_alias {
            return Some(Target::Viewport);
        }
        let selector = if selector == state.targets.default_canvas_alias {
            state.targets.default_canvas_selector.as_str()
        } else {
            selector
        };
        state.query_selector(selector).map(Target::Element)
    }

    fn inline_style(&self, element: ElementId, property: &str) -> String {
        self.state
            .borrow()
            .nodes
            .get(element)
            .and_then(|node| node.inline.get(property).map(|declaration| declaration.value.clone()))
            .unwrap_or_default()
    }

    fn inline_priority(&self, element: ElementId, property: &str) -> StylePriority {
        self.state
            .borrow()
            .nodes
            .get(element)
            .and_then(|node| node.inline.get(property).map(|declaration| declaration.priority))
            .unwrap_or_default()
    }

    fn set_inline_style(&self, element: ElementId, property: &str, value: &str, priority: StylePriority) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element) {
            if value.is_empty() {
                node.inline.remove(property);
            } else {
                let declaration = Declaration {
                    value: value.to_string(),
                    priority,
                };
                node.inline.insert(property.to_string(), declaration);
            }
        }
    }

    fn remove_inline_style(&self, element: ElementId, property: &str) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element) {
            node.inline.remove(property);
        }
    }

    fn computed_style(&self, element: ElementId, property: &str) -> String {
        self.state.borrow().computed_style(element, property)
    }

    fn backing_size(&self, element: ElementId) -> Size {
        self.state
            .borrow()
            .nodes
            .get(element)
            .and_then(|node| node.canvas)
            .unwrap_or_default()
    }

    fn set_backing_size(&self, element: ElementId, size: Size) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element) {
            if node.canvas.is_some() {
                node.canvas = Some(size);
            }
        }
    }

    fn viewport_size(&self) -> Size {
        self.state.borrow().viewport
    }

    fn client_origin(&self, element: ElementId) -> Point {
        self.state
            .borrow()
            .nodes
            .get(element)
            .map(|node| node.origin)
            .unwrap_or_default()
    }

    fn focus(&self, element: ElementId) {
        self.state.borrow_mut().active = ActiveElement::Known(element);
    }

    fn blur(&self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        if state.active == ActiveElement::Known(element) {
            state.active = ActiveElement::Body;
        }
    }

    fn active_element(&self) -> ActiveElement {
        self.state.borrow().active
    }

    fn fullscreen_element(&self) -> Option<ElementId> {
        self.state.borrow().fullscreen
    }

    fn pointer_lock_element(&self) -> Option<ElementId> {
        self.state.borrow().pointer_lock
    }

    fn set_title(&self, title: &str) {
        self.state.borrow_mut().title = title.to_string();
    }

    fn now(&self) -> f64 {
        self.state.borrow().now
    }

    fn platform(&self) -> String {
        self.state.borrow().platform.clone()
    }

    fn selection_text(&self) -> String {
        self.state.borrow().selection.clone()
    }

    fn render_cursor_image(&self, width: u32, height: u32, rgba: &[u8]) -> Result<String, BridgeError> {
        let image = image::RgbaImage::from_raw(width, height, rgba.to_vec()).ok_or_else(|| {
            BridgeError::InvalidParam(format!(
                "cursor image {width}x{height} needs {} bytes, got {}",
                u64::from(width) * u64::from(height) * 4,
                rgba.len()
            ))
        })?;
        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| BridgeError::PlatformFailure(format!("cursor encoding failed: {e}")))?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    fn open_url(&self, url: &str, target: Option<&str>) {
        self.state
            .borrow_mut()
            .opened_urls
            .push((url.to_string(), target.map(str::to_string)));
    }

    fn has_clipboard(&self) -> bool {
        self.state.borrow().clipboard_supported
    }

    fn write_clipboard(&self, text: String, done: ClipboardCallback) {
        self.state
            .borrow_mut()
            .pending_clipboard
            .push(PendingClipboard::Write(text, done));
    }

    fn read_clipboard(&self, done: ClipboardCallback) {
        self.state
            .borrow_mut()
            .pending_clipboard
            .push(PendingClipboard::Read(done));
    }

    fn request_animation_frame(&self, callback: FrameCallback) {
        self.state.borrow_mut().frame_callbacks.push(callback);
    }

    fn add_listener(
        &self,
        target: ListenTarget,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, BridgeError> {
        Ok(self.register(Registration::Event {
            target,
            kind,
            passive: kind.is_passive(),
            listener: Rc::new(RefCell::new(listener)),
        }))
    }

    fn observe_resize(&self, element: ElementId, callback: Notify) -> Result<ListenerId, BridgeError> {
        if !self.state.borrow().nodes.contains_key(element) {
            return Err(BridgeError::UnknownTarget(format!("element {element:?}")));
        }
        Ok(self.register(Registration::Resize {
            element,
            last: None,
            callback: Rc::new(RefCell::new(callback)),
        }))
    }

    fn watch_resolution(&self, scale: f64, callback: Notify) -> Result<ListenerId, BridgeError> {
        Ok(self.register(Registration::Resolution {
            scale,
            callback: Rc::new(RefCell::new(callback)),
        }))
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.borrow_mut().registrations.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TouchPoint;
    use std::cell::Cell;

    #[test]
    fn test_selector_resolution() {
        let dom = HeadlessDom::new();
        let canvas = dom.create_canvas("canvas", Size::new(300, 150));
        let other = dom.create_canvas("other", Size::new(10, 10));

        assert_eq!(dom.resolve("window"), Some(Target::Viewport));
        assert_eq!(dom.resolve("#canvas"), Some(Target::Element(canvas)));
        assert_eq!(dom.resolve("Module['canvas']"), Some(Target::Element(canvas)));
        assert_eq!(dom.resolve("#other"), Some(Target::Element(other)));
        assert_eq!(dom.resolve("canvas"), Some(Target::Element(canvas)));
        assert_eq!(dom.resolve("#missing"), None);
        assert_eq!(dom.resolve("div > .weird"), None);
    }

    #[test]
    fn test_computed_style_precedence() {
        let dom = HeadlessDom::new();
        let canvas = dom.create_canvas("canvas", Size::new(300, 150));

        assert_eq!(dom.computed_style(canvas, "width"), "300px");
        dom.set_sheet_style(canvas, "width", "640px");
        assert_eq!(dom.computed_style(canvas, "width"), "640px");
        dom.set_inline_style(canvas, "width", "100px", StylePriority::Normal);
        assert_eq!(dom.computed_style(canvas, "width"), "100px");
        dom.remove_inline_style(canvas, "width");
        assert_eq!(dom.computed_style(canvas, "width"), "640px");
        assert_eq!(dom.computed_style(canvas, "opacity"), "1");
    }

    #[test]
    fn test_important_declarations_win() {
        let dom = HeadlessDom::new();
        let canvas = dom.create_canvas("canvas", Size::new(300, 150));

        dom.set_sheet_style(canvas, "width", "100% !important");
        dom.set_inline_style(canvas, "width", "100px", StylePriority::Normal);
        assert_eq!(dom.computed_style(canvas, "width"), "100%");

        dom.set_inline_style(canvas, "width", "120px", StylePriority::Important);
        assert_eq!(dom.computed_style(canvas, "width"), "120px");
        assert_eq!(dom.inline_priority(canvas, "width"), StylePriority::Important);

        dom.remove_inline_style(canvas, "width");
        assert_eq!(dom.inline_priority(canvas, "width"), StylePriority::Normal);
        assert_eq!(dom.computed_style(canvas, "width"), "100%");
    }

    #[test]
    fn test_dispatch_bubbles_to_document_and_window() {
        let dom = HeadlessDom::new();
        let handle = dom.create_element("div", Some("handle"));
        let order = Rc::new(RefCell::new(Vec::new()));

        for (target, name) in [
            (ListenTarget::Viewport, "window"),
            (ListenTarget::Document, "document"),
            (ListenTarget::Element(handle), "handle"),
        ] {
            let order = Rc::clone(&order);
            dom.add_listener(
                target,
                EventKind::MouseDown,
                Box::new(move |_: &DomEvent| {
                    order.borrow_mut().push(name);
                    EventResponse::default()
                }),
            )
            .unwrap();
        }

        dom.dispatch(ListenTarget::Element(handle), &DomEvent::mouse(EventKind::MouseDown, 0.0, 0.0));
        assert_eq!(*order.borrow(), vec!["handle", "document", "window"]);

        // other kinds are not delivered
        dom.dispatch(ListenTarget::Document, &DomEvent::mouse(EventKind::MouseUp, 0.0, 0.0));
        assert_eq!(order.borrow().len(), 3);
    }

    #[test]
    fn test_passive_listener_cannot_prevent_default() {
        let dom = HeadlessDom::new();
        for kind in [EventKind::MouseMove, EventKind::MouseDown] {
            dom.add_listener(ListenTarget::Document, kind, Box::new(|_: &DomEvent| EventResponse::prevent()))
                .unwrap();
        }

        let moved = dom.dispatch(ListenTarget::Document, &DomEvent::mouse(EventKind::MouseMove, 0.0, 0.0));
        assert!(!moved.prevent_default);
        let pressed = dom.dispatch(ListenTarget::Document, &DomEvent::mouse(EventKind::MouseDown, 0.0, 0.0));
        assert!(pressed.prevent_default);
    }

    #[test]
    fn test_listener_removed_during_dispatch_does_not_run() {
        let dom = Rc::new(HeadlessDom::new());
        let second_ran = Rc::new(Cell::new(false));
        let second_id = Rc::new(Cell::new(None));

        let dom_in_first = Rc::clone(&dom);
        let id_in_first = Rc::clone(&second_id);
        dom.add_listener(
            ListenTarget::Document,
            EventKind::TouchStart,
            Box::new(move |_: &DomEvent| {
                if let Some(id) = id_in_first.get() {
                    dom_in_first.remove_listener(id);
                }
                EventResponse::default()
            }),
        )
        .unwrap();

        let ran = Rc::clone(&second_ran);
        let id = dom
            .add_listener(
                ListenTarget::Document,
                EventKind::TouchStart,
                Box::new(move |_: &DomEvent| {
                    ran.set(true);
                    EventResponse::default()
                }),
            )
            .unwrap();
        second_id.set(Some(id));

        dom.dispatch(
            ListenTarget::Document,
            &DomEvent::touch(EventKind::TouchStart, vec![TouchPoint::new(1, 0.0, 0.0)]),
        );
        assert!(!second_ran.get());
        assert_eq!(dom.listener_count(), 1);
    }

    #[test]
    fn test_resize_observation_delivered_on_frame() {
        let dom = HeadlessDom::new();
        let container = dom.create_element("div", Some("container"));
        dom.set_sheet_style(container, "width", "400px");
        dom.set_sheet_style(container, "height", "300px");

        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = dom
            .observe_resize(container, Box::new(move || seen.set(seen.get() + 1)))
            .unwrap();

        // initial observation, like browsers
        dom.advance_frame();
        assert_eq!(count.get(), 1);

        // no change, no delivery
        dom.advance_frame();
        assert_eq!(count.get(), 1);

        dom.set_inline_style(container, "width", "500px", StylePriority::Normal);
        dom.advance_frame();
        assert_eq!(count.get(), 2);

        dom.remove_listener(id);
        dom.set_inline_style(container, "width", "600px", StylePriority::Normal);
        dom.advance_frame();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_clipboard_settles_asynchronously() {
        let dom = HeadlessDom::new();
        let result = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&result);
        dom.write_clipboard("hello".into(), Box::new(move |r| *sink.borrow_mut() = Some(r)));
        assert!(result.borrow().is_none());
        assert_eq!(dom.clipboard_contents(), "");

        dom.advance_frame();
        assert_eq!(*result.borrow(), Some(Ok("hello".to_string())));
        assert_eq!(dom.clipboard_contents(), "hello");

        dom.fail_clipboard(Some("NotAllowedError"));
        let sink = Rc::clone(&result);
        dom.read_clipboard(Box::new(move |r| *sink.borrow_mut() = Some(r)));
        dom.settle_clipboard();
        assert_eq!(*result.borrow(), Some(Err("NotAllowedError".to_string())));
    }

    #[test]
    fn test_resolution_watch_fires_on_flip() {
        let dom = HeadlessDom::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        dom.watch_resolution(1.0, Box::new(move || seen.set(seen.get() + 1)))
            .unwrap();

        dom.set_device_pixel_ratio(2.0);
        assert_eq!(count.get(), 1);
        dom.set_device_pixel_ratio(1.5);
        assert_eq!(count.get(), 1);
        dom.set_device_pixel_ratio(1.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_cursor_image_rendering() {
        let dom = HeadlessDom::new();
        let url = dom.render_cursor_image(2, 2, &[255; 16]).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let error = dom.render_cursor_image(2, 2, &[0; 3]).unwrap_err();
        assert!(matches!(error, BridgeError::InvalidParam(_)));
    }
}
