//! Configuration system
//!
//! Bridge settings are plain `serde` structs. Native builds can load them
//! from `.toml` or `.ron` files; inside the browser there is no file system,
//! so the embedding page hands the text over and it is parsed with
//! [`Config::parse`].

mod bridge;

use std::path::Path;

pub use bridge::{BridgeConfig, ClipboardConfig, DragConfig, LoggingConfig, TargetConfig};
pub use serde::{Deserialize, Serialize};

/// Text formats a configuration can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// TOML
    Toml,
    /// Rusty Object Notation
    Ron,
}

impl Format {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loading and saving for configuration structs
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text; missing sections take their defaults
    fn parse(contents: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Parse TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Format::Toml)
    }

    /// Parse RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Format::Ron)
    }

    /// Render the configuration as text
    fn to_text(&self, format: Format) -> Result<String, ConfigError> {
        match format {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string())),
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, format)
    }

    /// Save to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_text(Format::from_path(path)?)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text did not parse
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration could not be rendered
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// File extension names no known format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("bridge.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("conf/bridge.ron")).unwrap(), Format::Ron);
        assert!(matches!(
            Format::from_path(Path::new("bridge.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("bridge")).is_err());
    }
}
