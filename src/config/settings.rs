//! Settings file schema.
//!
//! Values are typed at deserialisation time: a bad colour, package kind or
//! log level fails parsing with the offending value in the message.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::Level;

use crate::error::ConfigError;
use crate::export::{parse_hex_color, ExportColors, DEFAULT_BODY_COLOR, DEFAULT_PAD_COLOR};
use crate::packages::PackageKind;

/// Contents of `config.json`. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Editor schema hint, ignored.
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Free-form note, ignored.
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Directories export scripts may be written into.
    #[serde(default)]
    pub allowed_paths: Vec<PathBuf>,

    #[serde(default)]
    pub package: PackageSettings,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty allowed path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = self
            .allowed_paths
            .iter()
            .position(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::ValidationError {
                message: format!("allowed_paths[{index}] is empty"),
            });
        }
        Ok(())
    }
}

/// `package` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSettings {
    /// Family `default_config` returns when the caller names none.
    #[serde(default = "default_kind")]
    pub default_kind: PackageKind,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
        }
    }
}

const fn default_kind() -> PackageKind {
    PackageKind::Qfn
}

/// A `#RRGGBB` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub u32);

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_hex_color(&s)
            .map(Self)
            .ok_or_else(|| format!("invalid colour '{s}', expected '#RRGGBB'"))
    }
}

/// `export` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    #[serde(default = "default_body_color")]
    pub body_color: HexColor,

    #[serde(default = "default_pad_color")]
    pub pad_color: HexColor,
}

impl ExportConfig {
    /// Colours for the FreeCAD exporter.
    #[must_use]
    pub const fn colors(&self) -> ExportColors {
        ExportColors {
            body: self.body_color.0,
            pad: self.pad_color.0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            body_color: default_body_color(),
            pad_color: default_pad_color(),
        }
    }
}

const fn default_body_color() -> HexColor {
    HexColor(DEFAULT_BODY_COLOR)
}

const fn default_pad_color() -> HexColor {
    HexColor(DEFAULT_PAD_COLOR)
}

/// A tracing level name (trace, debug, info, warn, error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct LogLevel(pub Level);

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse().map(Self).map_err(|_| {
            format!("invalid log level '{s}', expected trace, debug, info, warn or error")
        })
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(Level::WARN)
    }
}

/// `logging` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level used when no `-v`/`-q` flag is given.
    #[serde(default)]
    pub level: LogLevel,
}
