//! Declarative switch configuration (YAML or TOML).

use super::ToggleSwitch;
use glide_core::{Color, ColorParseError, Thickness};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error raised while loading or applying a [`SwitchConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// File extension is neither YAML nor TOML
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    /// A dimension or duration is negative or not finite
    #[error("invalid value for '{field}': {value} (must be finite and >= 0)")]
    InvalidNumber {
        /// Field name
        field: &'static str,
        /// Rejected value
        value: f64,
    },
    /// A color string failed to parse
    #[error("invalid color for '{field}': {source}")]
    InvalidColor {
        /// Field name
        field: &'static str,
        /// Parse failure
        #[source]
        source: ColorParseError,
    },
}

/// Construction-time switch options.
///
/// Every field has a default, so an empty document is a valid config.
/// Keys may be written `snake_case` or `camelCase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    /// Track width
    #[serde(alias = "switchWidth")]
    pub switch_width: f64,
    /// Track height
    #[serde(alias = "switchHeight")]
    pub switch_height: f64,
    /// Initial state
    #[serde(alias = "isOn")]
    pub is_on: bool,
    /// Track color while on, as `#rrggbb` or `#rrggbbaa`
    #[serde(alias = "highlightBrush")]
    pub highlight_brush: String,
    /// Slide duration in milliseconds
    #[serde(alias = "durationMs")]
    pub duration_ms: u64,
    /// Thumb color
    pub foreground: String,
    /// Outline color
    #[serde(alias = "borderBrush")]
    pub border_brush: String,
    /// Uniform outline thickness
    #[serde(alias = "borderThickness")]
    pub border_thickness: f64,
    /// Start disabled
    pub disabled: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            switch_width: 40.0,
            switch_height: 20.0,
            is_on: false,
            highlight_brush: "#46a0ffcc".to_string(),
            duration_ms: 300,
            foreground: "#a0a0a0".to_string(),
            border_brush: "#b4b4b4".to_string(),
            border_thickness: 1.0,
            disabled: false,
        }
    }
}

fn number(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidNumber { field, value })
    }
}

fn color(field: &'static str, hex: &str) -> Result<Color, ConfigError> {
    Color::from_hex(hex).map_err(|source| ConfigError::InvalidColor { field, source })
}

impl SwitchConfig {
    /// Parse from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or has unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has unknown keys.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from a `.yaml`, `.yml` or `.toml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&contents),
            Some("toml") => Self::from_toml(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check every value without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        number("switch_width", self.switch_width)?;
        number("switch_height", self.switch_height)?;
        number("border_thickness", self.border_thickness)?;
        color("highlight_brush", &self.highlight_brush)?;
        color("foreground", &self.foreground)?;
        color("border_brush", &self.border_brush)?;
        Ok(())
    }

    /// Build a switch resting in the configured state.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn build(&self) -> Result<ToggleSwitch, ConfigError> {
        self.validate()?;
        log::debug!(
            "building toggle switch {}x{} (on: {})",
            self.switch_width,
            self.switch_height,
            self.is_on
        );
        Ok(ToggleSwitch::new()
            .switch_width(self.switch_width)
            .switch_height(self.switch_height)
            .duration(Duration::from_millis(self.duration_ms).as_secs_f64())
            .highlight_color(color("highlight_brush", &self.highlight_brush)?)
            .foreground(color("foreground", &self.foreground)?)
            .border_color(color("border_brush", &self.border_brush)?)
            .border_thickness(Thickness::uniform(self.border_thickness))
            .disabled(self.disabled)
            .on(self.is_on))
    }
}
