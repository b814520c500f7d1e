//! # Bridge Configuration
//!
//! Settings consumed by the window bridge and its DOM backends. Every section
//! has defaults matching the behavior native code expects, so an empty
//! configuration file (or no file at all) is valid.
//!
//! ## Configuration Categories
//!
//! - **Logging**: level filter for the `log` facade
//! - **Targets**: special selector aliases resolved before `querySelector`
//! - **Clipboard**: placeholder written on empty-selection copy
//! - **Drag**: lower bounds for the drag-to-resize interaction

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (`error`, `warn`, `info`, `debug`, `trace` or `off`)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: if cfg!(debug_assertions) { "debug" } else { "info" }.to_string(),
        }
    }
}

/// # Target Configuration
///
/// Selector aliases resolved before falling back to `querySelector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Alias resolving to the browser viewport itself
    pub viewport_alias: String,
    /// Alias resolving to the page's default canvas
    pub default_canvas_alias: String,
    /// Selector the default canvas alias resolves to
    pub default_canvas_selector: String,
}

impl TargetConfig {
    /// Set the selector backing the default canvas alias
    pub fn with_default_canvas(mut self, selector: impl Into<String>) -> Self {
        self.default_canvas_selector = selector.into();
        self
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            viewport_alias: "window".to_string(),
            default_canvas_alias: "Module['canvas']".to_string(),
            default_canvas_selector: "#canvas".to_string(),
        }
    }
}

/// # Clipboard Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Text seeded into the clipboard when copying an empty selection
    ///
    /// Some platforms beep when a copy produces no data.
    pub empty_copy_placeholder: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            empty_copy_placeholder: " ".to_string(),
        }
    }
}

/// # Drag Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Smallest width the resizable element can be dragged to
    pub min_width: f64,
    /// Smallest height the resizable element can be dragged to
    pub min_height: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            min_width: 0.0,
            min_height: 0.0,
        }
    }
}

/// # Complete Bridge Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Selector alias configuration
    pub targets: TargetConfig,
    /// Clipboard configuration
    pub clipboard: ClipboardConfig,
    /// Drag-to-resize configuration
    pub drag: DragConfig,
}

impl BridgeConfig {
    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Set target aliases
    pub fn with_targets(mut self, targets: TargetConfig) -> Self {
        self.targets = targets;
        self
    }

    /// Set drag lower bounds
    pub fn with_drag_minimum(mut self, min_width: f64, min_height: f64) -> Self {
        self.drag = DragConfig { min_width, min_height };
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.viewport_alias.is_empty() {
            return Err(ConfigError::Invalid("viewport alias cannot be empty".to_string()));
        }
        if self.targets.default_canvas_alias.is_empty() {
            return Err(ConfigError::Invalid("default canvas alias cannot be empty".to_string()));
        }
        if self.targets.viewport_alias == self.targets.default_canvas_alias {
            return Err(ConfigError::Invalid(format!(
                "viewport and default canvas share the alias [{}]",
                self.targets.viewport_alias
            )));
        }
        if !(self.drag.min_width >= 0.0 && self.drag.min_height >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "drag minimum must be non-negative, got {}x{}",
                self.drag.min_width, self.drag.min_height
            )));
        }
        Ok(())
    }
}

impl Config for BridgeConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Format;

    #[test]
    fn test_defaults_are_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.viewport_alias, "window");
        assert_eq!(config.clipboard.empty_copy_placeholder, " ");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BridgeConfig::from_toml_str(
            r##"
            [logging]
            level = "trace"

            [targets]
            default_canvas_selector = "#app"
            "##,
        )
        .unwrap();

        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.targets.default_canvas_selector, "#app");
        assert_eq!(config.targets.default_canvas_alias, "Module['canvas']");
        assert_eq!(config.drag, DragConfig::default());
    }

    #[test]
    fn test_ron_parsing() {
        let config = BridgeConfig::from_ron_str("(drag: (min_width: 32.0, min_height: 16.0))").unwrap();
        assert_eq!(config.drag.min_width, 32.0);
        assert_eq!(config.drag.min_height, 16.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = BridgeConfig::default().with_drag_minimum(-1.0, 0.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = BridgeConfig::default();
        config.targets.default_canvas_alias = "window".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = BridgeConfig::load_from_file("bridge.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_rendered_toml_parses_back() {
        let config = BridgeConfig::default()
            .with_log_level("warn")
            .with_targets(TargetConfig::default().with_default_canvas("#game"));
        let text = config.to_text(Format::Toml).unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }
}
