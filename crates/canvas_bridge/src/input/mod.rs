//! Input translation
//!
//! Keyboard events are handed to native code as [`KeyEvent`]s; cursor shapes
//! map onto CSS `cursor` values.

pub mod cursor;

pub use cursor::CursorShape;

use crate::backend::{KeyboardInput, Modifiers};

/// Keyboard event as delivered to the native keyboard callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// `true` for key down
    pub is_down: bool,
    /// Physical key code (`"KeyA"`)
    pub code: String,
    /// Logical key (`"a"`, `"Tab"`)
    pub key: String,
    /// Auto-repeat flag
    pub repeat: bool,
    /// Character produced by the key, 0 for named keys
    pub codepoint: u32,
    /// Modifier state
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Build from a raw keyboard event
    pub fn from_input(input: &KeyboardInput) -> Self {
        Self {
            is_down: input.is_down,
            code: input.code.clone(),
            key: input.key.clone(),
            repeat: input.repeat,
            codepoint: codepoint(&input.key),
            modifiers: input.modifiers,
        }
    }
}

/// Character code of a `KeyboardEvent.key` value
///
/// This is the first UTF-16 unit of the key. Named keys (`"Tab"`,
/// `"ArrowLeft"`) start with an ASCII letter but are longer than one unit
/// and yield 0, as does an empty key.
pub fn codepoint(key: &str) -> u32 {
    let mut units = key.encode_utf16();
    let Some(first) = units.next() else {
        return 0;
    };
    if first < 0x7f && units.next().is_some() {
        0
    } else {
        u32::from(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codepoint_rules() {
        assert_eq!(codepoint("a"), 97);
        assert_eq!(codepoint("A"), 65);
        assert_eq!(codepoint(" "), 32);
        assert_eq!(codepoint("Tab"), 0);
        assert_eq!(codepoint("ArrowLeft"), 0);
        assert_eq!(codepoint(""), 0);
        assert_eq!(codepoint("é"), 0xe9);
        // non-ASCII keys keep their first unit even when longer
        assert_eq!(codepoint("😀"), 0xd83d);
    }

    #[test]
    fn test_key_event_from_input() {
        let input = KeyboardInput::down("KeyA", "a")
            .with_repeat(true)
            .with_modifiers(Modifiers::SHIFT | Modifiers::SUPER);
        let event = KeyEvent::from_input(&input);
        assert!(event.is_down);
        assert!(event.repeat);
        assert_eq!(event.codepoint, 97);
        assert_eq!(event.modifiers.bits(), 0x9);
        assert_eq!(event.code, "KeyA");
    }
}
