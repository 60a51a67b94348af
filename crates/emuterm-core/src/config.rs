#![forbid(unsafe_code)]

//! Tunables for the bridge, loadable from TOML or JSON.
//!
//! ```toml
//! [toolbar]
//! min_button_width = 44.0
//! height = 44.0
//!
//! [encoder]
//! meta_prefix = "csi"   # or "escape"
//!
//! [viewport]
//! min_top = 25.0
//! ```
//!
//! Every field has a default, so an empty document yields
//! [`BridgeConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::MetaPrefix;
use crate::toolbar::{DEFAULT_MIN_BUTTON_WIDTH, DEFAULT_TOOLBAR_HEIGHT};
use crate::viewport::ViewportMargins;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub toolbar: ToolbarConfig,
    pub encoder: EncoderConfig,
    pub viewport: ViewportMargins,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Narrowest acceptable button before lower-priority keys are dropped.
    pub min_button_width: f64,
    /// Bar height, not counting the bottom safe-area inset.
    pub height: f64,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            min_button_width: DEFAULT_MIN_BUTTON_WIDTH,
            height: DEFAULT_TOOLBAR_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub meta_prefix: MetaPrefix,
}

impl BridgeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a file, choosing the format by extension (`.json`, else TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Reject values the layout code can't use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("toolbar.min_button_width", self.toolbar.min_button_width),
            ("toolbar.height", self.toolbar.height),
            ("viewport.min_top", self.viewport.min_top),
            ("viewport.min_side", self.viewport.min_side),
            ("viewport.min_bottom", self.viewport.min_bottom),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative length (got {value})"
                )));
            }
        }
        Ok(())
    }
}
