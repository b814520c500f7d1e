//! Standard cursor shapes

/// Cursor shapes native code can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// Default arrow; restores the page's own cursor
    Arrow,
    /// Text input beam
    IBeam,
    /// Crosshair
    Crosshair,
    /// Pointing hand
    PointingHand,
    /// Horizontal resize
    ResizeEw,
    /// Vertical resize
    ResizeNs,
    /// Diagonal resize, top-left to bottom-right
    ResizeNwse,
    /// Diagonal resize, top-right to bottom-left
    ResizeNesw,
    /// Omnidirectional resize
    ResizeAll,
    /// Operation not allowed
    NotAllowed,
    /// No cursor
    Hidden,
}

impl CursorShape {
    /// CSS `cursor` value, `None` when the page's cursor should be restored
    pub const fn css_value(self) -> Option<&'static str> {
        match self {
            Self::Arrow => None,
            Self::IBeam => Some("text"),
            Self::Crosshair => Some("crosshair"),
            Self::PointingHand => Some("pointer"),
            Self::ResizeEw => Some("ew-resize"),
            Self::ResizeNs => Some("ns-resize"),
            Self::ResizeNwse => Some("nwse-resize"),
            Self::ResizeNesw => Some("nesw-resize"),
            Self::ResizeAll => Some("all-scroll"),
            Self::NotAllowed => Some("not-allowed"),
            Self::Hidden => Some("none"),
        }
    }
}

/// CSS `cursor` value for a custom cursor image
pub fn custom_cursor_value(data_url: &str, xhot: i32, yhot: i32) -> String {
    format!("url({data_url}) {xhot} {yhot}, auto")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_values() {
        assert_eq!(CursorShape::Arrow.css_value(), None);
        assert_eq!(CursorShape::IBeam.css_value(), Some("text"));
        assert_eq!(CursorShape::ResizeAll.css_value(), Some("all-scroll"));
        assert_eq!(CursorShape::Hidden.css_value(), Some("none"));
    }

    #[test]
    fn test_custom_cursor_value() {
        assert_eq!(
            custom_cursor_value("data:image/png;base64,AA==", 3, 4),
            "url(data:image/png;base64,AA==) 3 4, auto"
        );
    }
}
