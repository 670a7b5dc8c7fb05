//! Application configuration loaded from TOML
//!
//! ```toml
//! [storage]
//! dir = "~/.local/share/fancard"
//!
//! [export]
//! pixel_ratio = 2
//! file_stem = "image-card"
//!
//! [defaults]
//! fanRotation = 20
//! backgroundColor = "#ffffff"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::error::{validate_hex_color, ValidationError};
use crate::export::{ExportOptions, DEFAULT_FILE_STEM, DEFAULT_PIXEL_RATIO};
use crate::layout::params::DEFAULT_BACKGROUND_COLOR;
use crate::layout::{LayoutParameters, ParameterOverrides};
use crate::session::Session;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid default: {0}")]
    InvalidDefault(#[from] ValidationError),
}

/// Directory used for snapshots when none is configured
pub const DEFAULT_STORAGE_DIR: &str = ".fancard";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub storage_dir: Option<PathBuf>,
    pub export: ExportOptions,
    /// Starting parameters for new sessions
    pub defaults: ParameterOverrides,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    storage: Option<TomlStorage>,
    export: Option<TomlExport>,
    defaults: Option<ParameterOverrides>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlStorage {
    dir: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlExport {
    pixel_ratio: Option<f64>,
    file_stem: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let export = parsed.export.map_or_else(ExportOptions::default, |e| {
            ExportOptions::new()
                .with_pixel_ratio(e.pixel_ratio.unwrap_or(DEFAULT_PIXEL_RATIO))
                .with_file_stem(e.file_stem.unwrap_or_else(|| DEFAULT_FILE_STEM.to_string()))
        });

        let defaults = parsed.defaults.unwrap_or_default();
        if let Some(color) = &defaults.background_color {
            validate_hex_color(color)?;
        }

        Ok(AppConfig {
            storage_dir: parsed.storage.and_then(|s| s.dir),
            export,
            defaults,
        })
    }

    /// Snapshot directory, falling back to [`DEFAULT_STORAGE_DIR`]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// Default parameters with the configured overrides applied
    pub fn parameters(&self) -> LayoutParameters {
        LayoutParameters::default().apply_overrides(&self.defaults)
    }

    pub fn background_color(&self) -> String {
        self.defaults
            .background_color
            .as_deref()
            .and_then(|c| validate_hex_color(c).ok())
            .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string())
    }

    /// A fresh session starting from the configured defaults
    pub fn new_session(&self) -> Session {
        Session::with_parameters(self.parameters(), self.background_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_dir(), PathBuf::from(".fancard"));
        assert_eq!(config.parameters(), LayoutParameters::default());
        assert_eq!(config.background_color(), "#f0f4f8");
    }

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_str(
            r##"
[storage]
dir = "/tmp/cards"

[export]
pixel_ratio = 3
file_stem = "fan"

[defaults]
fanRotation = 20
imageWidth = 5000
backgroundColor = "#FFFFFF"
"##,
        )
        .unwrap();

        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/cards"));
        assert_eq!(config.export.pixel_ratio, 3.0);
        assert_eq!(config.export.file_stem, "fan");

        let params = config.parameters();
        assert_eq!(params.fan_rotation, 20.0);
        assert_eq!(params.image_width, 2000);
        assert_eq!(config.background_color(), "#ffffff");
        assert_eq!(config.new_session().params().fan_rotation, 20.0);
    }

    #[test]
    fn test_unknown_default_is_rejected() {
        let result = AppConfig::from_str("[defaults]\nfanAngle = 3\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let result = AppConfig::from_str("[defaults]\nbackgroundColor = \"blue\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidDefault(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = AppConfig::from_file(Path::new("/nonexistent/fancard.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
