//! Geometry types shared by the bridge and its DOM backends

use std::fmt;

/// Whole-pixel size, as reported to native code and used for canvas backing stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fractional size in CSS pixels, as read from computed styles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeF {
    /// Width in CSS pixels
    pub width: f64,
    /// Height in CSS pixels
    pub height: f64,
}

impl SizeF {
    /// Create a new size
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to at least the given minimum
    pub fn clamp_min(self, min: Self) -> Self {
        Self {
            width: self.width.max(min.width),
            height: self.height.max(min.height),
        }
    }

    /// Truncate to whole pixels (`parseInt` semantics)
    #[allow(clippy::cast_possible_truncation)]
    pub fn truncate(self) -> Size {
        Size::new(self.width.trunc() as i32, self.height.trunc() as i32)
    }
}

impl From<Size> for SizeF {
    fn from(size: Size) -> Self {
        Self::new(f64::from(size.width), f64::from(size.height))
    }
}

/// Point in client (viewport) coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Format a CSS pixel length the way a template string would (`200` -> `"200px"`)
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Parse the leading number of a CSS length (`parseFloat` semantics)
///
/// `"200.5px"` yields `200.5`, `"auto"` or `""` yields `None`.
pub fn parse_css_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .take_while(|&(i, c)| {
            c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    value[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_formatting_matches_template_strings() {
        assert_eq!(px(200.0), "200px");
        assert_eq!(px(220.5), "220.5px");
        assert_eq!(px(0.0), "0px");
    }

    #[test]
    fn test_parse_css_number() {
        assert_eq!(parse_css_number("200px"), Some(200.0));
        assert_eq!(parse_css_number("150.75px"), Some(150.75));
        assert_eq!(parse_css_number(" 0.5"), Some(0.5));
        assert_eq!(parse_css_number("-12px"), Some(-12.0));
        assert_eq!(parse_css_number("auto"), None);
        assert_eq!(parse_css_number(""), None);
    }

    #[test]
    fn test_truncate_and_clamp() {
        let size = SizeF::new(199.9, -3.0).clamp_min(SizeF::default());
        assert_eq!(size, SizeF::new(199.9, 0.0));
        assert_eq!(size.truncate(), Size::new(199, 0));
    }
}
