//! DOM backend abstraction
//!
//! Everything the bridge needs from the page goes through [`DomBackend`]. The
//! bridge itself never touches platform types, which keeps the registry, the
//! CSS state stack and the resize machinery testable off-browser.
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     WindowBridge                │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!      ┌────────▼────────┐
//!      │ DomBackend      │ ← trait (this module)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ web::WebDom           │ ← web-sys, wasm32 only
//!   │ headless::HeadlessDom │ ← in-memory DOM
//!   └───────────────────────┘
//! ```
//!
//! # Threading
//! Browsers run all of this on one thread. Methods take `&self`; backends use
//! interior mutability. Listener callbacks may call back into the backend, so
//! implementations must not hold internal borrows while invoking them.

pub mod event;
pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use event::{DomEvent, EventKind, EventResponse, KeyboardInput, Modifiers, TouchPoint};
pub use headless::HeadlessDom;
#[cfg(target_arch = "wasm32")]
pub use web::WebDom;

use crate::error::BridgeError;
use crate::foundation::collections::{ElementId, ListenerId};
use crate::foundation::geometry::{Point, Size};

/// What a selector resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The browser viewport (`window`)
    Viewport,
    /// A DOM element
    Element(ElementId),
}

/// Where an event listener is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// `document`
    Document,
    /// `window`
    Viewport,
    /// A specific element
    Element(ElementId),
}

/// The document's focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveElement {
    /// Nothing but the body has focus
    Body,
    /// An element the backend has interned
    Known(ElementId),
    /// Some element the bridge never resolved
    Unknown,
}

/// Priority of a style declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StylePriority {
    /// Plain declaration
    #[default]
    Normal,
    /// `!important`, which beats normal declarations from any origin
    Important,
}

impl StylePriority {
    /// Priority string as used by `CSSStyleDeclaration.setProperty`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Important => "important",
        }
    }

    /// Parse the result of `getPropertyPriority`
    pub fn from_css(priority: &str) -> Self {
        if priority.trim().eq_ignore_ascii_case("important") {
            Self::Important
        } else {
            Self::Normal
        }
    }
}

/// Event listener callback
pub type Listener = Box<dyn FnMut(&DomEvent) -> EventResponse>;

/// Resize observation or media query callback
pub type Notify = Box<dyn FnMut()>;

/// Animation frame callback
pub type FrameCallback = Box<dyn FnOnce()>;

/// Completion of an asynchronous clipboard operation
///
/// `Ok` carries the text written or read, `Err` the platform's message.
pub type ClipboardCallback = Box<dyn FnOnce(Result<String, String>)>;

/// Page services used by the bridge
pub trait DomBackend {
    /// Resolve a selector or special alias
    fn resolve(&self, selector: &str) -> Option<Target>;

    /// Inline style value of `property` (`""` when not set)
    fn inline_style(&self, element: ElementId, property: &str) -> String;

    /// Priority of the inline `property` declaration
    fn inline_priority(&self, element: ElementId, property: &str) -> StylePriority;

    /// Set an inline style property
    fn set_inline_style(&self, element: ElementId, property: &str, value: &str, priority: StylePriority);

    /// Remove an inline style property
    fn remove_inline_style(&self, element: ElementId, property: &str);

    /// Resolved (computed) style value of `property`
    fn computed_style(&self, element: ElementId, property: &str) -> String;

    /// Drawable-surface size of a canvas (zero for other elements)
    fn backing_size(&self, element: ElementId) -> Size;

    /// Resize the drawable surface of a canvas
    fn set_backing_size(&self, element: ElementId, size: Size);

    /// Viewport inner size
    fn viewport_size(&self) -> Size;

    /// Top-left corner of the element's client rect
    fn client_origin(&self, element: ElementId) -> Point;

    /// Give the element input focus
    fn focus(&self, element: ElementId);

    /// Remove input focus from the element
    fn blur(&self, element: ElementId);

    /// Currently focused element
    fn active_element(&self) -> ActiveElement;

    /// Element currently displayed fullscreen, if the bridge knows it
    fn fullscreen_element(&self) -> Option<ElementId>;

    /// Element currently holding the pointer lock, if the bridge knows it
    fn pointer_lock_element(&self) -> Option<ElementId>;

    /// Set the document title
    fn set_title(&self, title: &str);

    /// High resolution timestamp in milliseconds
    fn now(&self) -> f64;

    /// Platform string as reported by the navigator
    fn platform(&self) -> String;

    /// Text of the current document selection
    fn selection_text(&self) -> String;

    /// Render RGBA pixels into an image data URL
    fn render_cursor_image(&self, width: u32, height: u32, rgba: &[u8]) -> Result<String, BridgeError>;

    /// Open a URL in a browsing context
    fn open_url(&self, url: &str, target: Option<&str>);

    /// Whether the asynchronous clipboard API is available
    fn has_clipboard(&self) -> bool;

    /// Write text to the system clipboard, reporting completion later
    fn write_clipboard(&self, text: String, done: ClipboardCallback);

    /// Read text from the system clipboard, reporting completion later
    fn read_clipboard(&self, done: ClipboardCallback);

    /// Run `callback` before the next repaint
    fn request_animation_frame(&self, callback: FrameCallback);

    /// Install an event listener
    fn add_listener(
        &self,
        target: ListenTarget,
        kind: EventKind,
        listener: Listener,
    ) -> Result<ListenerId, BridgeError>;

    /// Observe size changes of an element
    fn observe_resize(&self, element: ElementId, callback: Notify) -> Result<ListenerId, BridgeError>;

    /// Watch the `(resolution: <scale>dppx)` media query for changes
    fn watch_resolution(&self, scale: f64, callback: Notify) -> Result<ListenerId, BridgeError>;

    /// Remove a listener, observation or watcher; unknown ids are ignored
    fn remove_listener(&self, id: ListenerId);
}
