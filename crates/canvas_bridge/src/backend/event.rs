//! Normalized DOM events
//!
//! Backends translate platform events into these plain values before handing
//! them to listeners, and apply the returned [`EventResponse`] afterwards.
//! This keeps every handler in the bridge free of platform types.

use bitflags::bitflags;

use crate::foundation::geometry::Point;

/// DOM event types the bridge subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `touchcancel`
    TouchCancel,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
    /// `cut`
    Cut,
    /// `copy`
    Copy,
    /// `paste`
    Paste,
    /// `resize` (viewport only)
    Resize,
}

impl EventKind {
    /// DOM event type string
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::Resize => "resize",
        }
    }

    /// Whether listeners for this kind are registered passive
    ///
    /// A passive listener cannot suppress the default action, so only the
    /// high-frequency kinds the bridge never prevents are passive.
    pub const fn is_passive(self) -> bool {
        matches!(
            self,
            Self::MouseMove | Self::TouchMove | Self::TouchEnd | Self::TouchCancel | Self::Resize
        )
    }
}

bitflags! {
    /// Keyboard modifier bits, in the layout native code expects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Shift key held
        const SHIFT = 0x0001;
        /// Control key held
        const CONTROL = 0x0002;
        /// Alt/Option key held
        const ALT = 0x0004;
        /// Meta/Command/Windows key held
        const SUPER = 0x0008;
    }
}

impl Modifiers {
    /// Build the mask from individual key states
    pub fn from_keys(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, shift);
        modifiers.set(Self::CONTROL, ctrl);
        modifiers.set(Self::ALT, alt);
        modifiers.set(Self::SUPER, meta);
        modifiers
    }
}

/// Raw keyboard event fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyboardInput {
    /// `true` for `keydown`, `false` for `keyup`
    pub is_down: bool,
    /// Physical key code (`"KeyA"`, `"Tab"`)
    pub code: String,
    /// Logical key (`"a"`, `"Tab"`)
    pub key: String,
    /// Auto-repeat flag
    pub repeat: bool,
    /// Modifier state
    pub modifiers: Modifiers,
}

impl KeyboardInput {
    /// Key down event with no modifiers
    pub fn down(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            is_down: true,
            code: code.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Key up event with no modifiers
    pub fn up(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            is_down: false,
            ..Self::down(code, key)
        }
    }

    /// Set modifiers (builder pattern)
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set auto-repeat flag (builder pattern)
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// One touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform touch identifier
    pub id: i32,
    /// Client coordinates
    pub point: Point,
}

impl TouchPoint {
    /// Create a touch point
    pub const fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, point: Point::new(x, y) }
    }
}

/// Normalized DOM event
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Mouse button or movement
    Mouse {
        /// `MouseDown`, `MouseUp` or `MouseMove`
        kind: EventKind,
        /// Client coordinates
        point: Point,
    },
    /// Touch start, move, end or cancel
    Touch {
        /// One of the touch kinds
        kind: EventKind,
        /// All touches currently on the surface
        touches: Vec<TouchPoint>,
        /// Touches that changed in this event
        changed: Vec<TouchPoint>,
    },
    /// Key down or up
    Key(KeyboardInput),
    /// Cut, copy or paste
    Clipboard {
        /// `Cut`, `Copy` or `Paste`
        kind: EventKind,
        /// Plain-text payload (paste only)
        text: Option<String>,
    },
    /// Viewport resize
    Resize,
}

impl DomEvent {
    /// Mouse event at client coordinates
    pub const fn mouse(kind: EventKind, x: f64, y: f64) -> Self {
        Self::Mouse { kind, point: Point::new(x, y) }
    }

    /// Touch event where the changed touches are also the only touches down
    pub fn touch(kind: EventKind, changed: Vec<TouchPoint>) -> Self {
        let touches = match kind {
            EventKind::TouchEnd | EventKind::TouchCancel => Vec::new(),
            _ => changed.clone(),
        };
        Self::Touch { kind, touches, changed }
    }

    /// Event type
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Mouse { kind, .. } | Self::Touch { kind, .. } | Self::Clipboard { kind, .. } => *kind,
            Self::Key(input) => {
                if input.is_down {
                    EventKind::KeyDown
                } else {
                    EventKind::KeyUp
                }
            }
            Self::Resize => EventKind::Resize,
        }
    }
}

/// What a listener wants done with the event after it returns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the browser's default action
    pub prevent_default: bool,
    /// Plain text to place on the event's clipboard data (cut/copy)
    pub clipboard_data: Option<String>,
}

impl EventResponse {
    /// Response suppressing the default action
    pub const fn prevent() -> Self {
        Self {
            prevent_default: true,
            clipboard_data: None,
        }
    }

    /// Fold another listener's response into this one
    pub fn merge(&mut self, other: Self) {
        self.prevent_default |= other.prevent_default;
        if other.clipboard_data.is_some() {
            self.clipboard_data = other.clipboard_data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bits() {
        let modifiers = Modifiers::from_keys(true, false, true, true);
        assert_eq!(modifiers.bits(), 0b1101);
        assert_eq!(Modifiers::from_keys(false, true, false, false).bits(), 0x2);
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(DomEvent::Key(KeyboardInput::up("KeyA", "a")).kind(), EventKind::KeyUp);
        assert_eq!(DomEvent::mouse(EventKind::MouseMove, 1.0, 2.0).kind(), EventKind::MouseMove);
        assert_eq!(EventKind::TouchCancel.dom_name(), "touchcancel");
    }

    #[test]
    fn test_preventable_kinds_are_not_passive() {
        for kind in [
            EventKind::MouseDown,
            EventKind::TouchStart,
            EventKind::KeyDown,
            EventKind::KeyUp,
            EventKind::Cut,
            EventKind::Copy,
            EventKind::Paste,
        ] {
            assert!(!kind.is_passive(), "{}", kind.dom_name());
        }
        assert!(EventKind::MouseMove.is_passive());
        assert!(EventKind::TouchMove.is_passive());
    }

    #[test]
    fn test_touch_end_has_no_remaining_touches() {
        let event = DomEvent::touch(EventKind::TouchEnd, vec![TouchPoint::new(3, 0.0, 0.0)]);
        let DomEvent::Touch { touches, changed, .. } = event else {
            panic!("expected touch event");
        };
        assert!(touches.is_empty());
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn test_response_merge() {
        let mut response = EventResponse::default();
        response.merge(EventResponse::prevent());
        response.merge(EventResponse {
            prevent_default: false,
            clipboard_data: Some(" ".into()),
        });
        assert!(response.prevent_default);
        assert_eq!(response.clipboard_data.as_deref(), Some(" "));
    }
}
