//! Parametric package families and the facade that dispatches over them.
//!
//! Each package family (QFN, WSON) has its own module holding its
//! configuration type, its canonical default and its solid generator. The
//! [`PackageConfig`] enum closes over the families, so adding one is a
//! compile-time obligation to implement every facade operation.
//!
//! # Typed and loose entry points
//!
//! - [`to_solids`], [`to_name`], [`default_config`] take typed values and
//!   cannot fail.
//! - [`solids_from_value`], [`name_from_value`], [`default_config_for`] accept
//!   JSON values and string tags as they arrive from collaborators. An
//!   unknown tag is an error for names and defaults, but only yields an empty
//!   solid list for geometry.
//!
//! # Example
//!
//! ```
//! use package_model_mcp::packages::{self, PackageKind};
//!
//! let config = packages::default_config(PackageKind::Qfn);
//! let solids = packages::to_solids(&config);
//!
//! assert_eq!(solids.len(), 1 + 2 * 12 + 2 * 12 + 1);
//! assert_eq!(packages::to_name(&config), "QFN-48-1EP_6x6mm_P0.4mm_EP4.6x4.6mm");
//! ```

pub mod qfn;
pub mod wson;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PackageError, PackageResult};
use crate::geometry::Solid;

pub use qfn::QfnConfig;
pub use wson::WsonConfig;

/// Behaviour shared by every package family configuration.
pub trait PackageModel {
    /// Generates the solids of the package, body first.
    fn to_solids(&self) -> Vec<Solid>;

    /// Returns the canonical package name.
    fn name(&self) -> String;

    /// Checks the dimensional invariants of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::InvalidConfig`] naming the first offending field.
    fn validate(&self) -> PackageResult<()>;
}

/// Supported package families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// Quad flat no-lead: pads on all four sides.
    Qfn,
    /// Very-very-thin small outline no-lead: pads on two opposing sides.
    Wson,
}

impl PackageKind {
    /// Every supported family, in display order.
    pub const ALL: [Self; 2] = [Self::Qfn, Self::Wson];

    /// Returns the wire tag for this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qfn => "qfn",
            Self::Wson => "wson",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = PackageError;

    /// Parses a family tag. Tags are lowercase, as on the wire.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qfn" => Ok(Self::Qfn),
            "wson" => Ok(Self::Wson),
            _ => Err(PackageError::unrecognized(s)),
        }
    }
}

/// Outer dimensions of the package body (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDimensions {
    /// Body extent along X.
    pub width: f64,
    /// Body extent along Y.
    pub length: f64,
    /// Body height above its underside.
    pub height: f64,
}

impl BodyDimensions {
    /// Creates body dimensions.
    #[must_use]
    pub const fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    fn validate(&self) -> PackageResult<()> {
        require_positive("body.width", self.width)?;
        require_positive("body.length", self.length)?;
        require_positive("body.height", self.height)
    }
}

/// Optional centre pad, usually a thermal or ground contact.
///
/// On the wire this is `{"enabled": false}` or
/// `{"enabled": true, "width": .., "length": ..}`. A disabled pad carries no
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExposedPad", into = "RawExposedPad")]
pub enum ExposedPad {
    /// No exposed pad.
    Disabled,
    /// Exposed pad of the given size (mm).
    Enabled {
        /// Extent along X.
        width: f64,
        /// Extent along Y.
        length: f64,
    },
}

impl ExposedPad {
    /// Returns `true` if the package has an exposed pad.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    fn validate(&self) -> PackageResult<()> {
        match *self {
            Self::Disabled => Ok(()),
            Self::Enabled { width, length } => {
                require_positive("epad.width", width)?;
                require_positive("epad.length", length)
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawExposedPad {
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<f64>,
}

impl TryFrom<RawExposedPad> for ExposedPad {
    type Error = String;

    fn try_from(raw: RawExposedPad) -> Result<Self, Self::Error> {
        if !raw.enabled {
            return Ok(Self::Disabled);
        }
        match (raw.width, raw.length) {
            (Some(width), Some(length)) => Ok(Self::Enabled { width, length }),
            _ => Err("enabled exposed pad requires both width and length".to_string()),
        }
    }
}

impl From<ExposedPad> for RawExposedPad {
    fn from(epad: ExposedPad) -> Self {
        match epad {
            ExposedPad::Disabled => Self {
                enabled: false,
                width: None,
                length: None,
            },
            ExposedPad::Enabled { width, length } => Self {
                enabled: true,
                width: Some(width),
                length: Some(length),
            },
        }
    }
}

/// A package configuration of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PackageConfig {
    /// QFN package.
    Qfn(QfnConfig),
    /// WSON package.
    Wson(WsonConfig),
}

impl PackageConfig {
    /// Returns the family of this configuration.
    #[must_use]
    pub const fn kind(&self) -> PackageKind {
        match self {
            Self::Qfn(_) => PackageKind::Qfn,
            Self::Wson(_) => PackageKind::Wson,
        }
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// - [`PackageError::UnrecognizedPackageKind`] if the `type` tag names no
    ///   supported family
    /// - [`PackageError::InvalidConfig`] if the tag is missing, a field is
    ///   malformed, or a dimensional invariant does not hold
    pub fn from_value(value: &Value) -> PackageResult<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| PackageError::invalid("type", "missing package kind tag"))?;
        let kind: PackageKind = tag.parse()?;

        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| PackageError::invalid(kind.as_str(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the dimensional invariants of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> PackageResult<()> {
        self.model().validate()
    }

    fn model(&self) -> &dyn PackageModel {
        match self {
            Self::Qfn(config) => config,
            Self::Wson(config) => config,
        }
    }
}

impl From<QfnConfig> for PackageConfig {
    fn from(config: QfnConfig) -> Self {
        Self::Qfn(config)
    }
}

impl From<WsonConfig> for PackageConfig {
    fn from(config: WsonConfig) -> Self {
        Self::Wson(config)
    }
}

/// Offset of pad `index` in a row of `count` pads spaced `pitch` apart.
///
/// Rows are centred on the origin: odd counts put the middle pad at zero,
/// even counts straddle it. Every family places its rows with this formula.
#[must_use]
pub fn row_offset(index: u32, count: u32, pitch: f64) -> f64 {
    (f64::from(index) - (f64::from(count) - 1.0) / 2.0) * pitch
}

/// Generates the solids of a package.
#[must_use]
pub fn to_solids(config: &PackageConfig) -> Vec<Solid> {
    config.model().to_solids()
}

/// Returns the canonical name of a package.
#[must_use]
pub fn to_name(config: &PackageConfig) -> String {
    config.model().name()
}

/// Returns the canonical default configuration of a family.
#[must_use]
pub fn default_config(kind: PackageKind) -> PackageConfig {
    match kind {
        PackageKind::Qfn => PackageConfig::Qfn(QfnConfig::default()),
        PackageKind::Wson => PackageConfig::Wson(WsonConfig::default()),
    }
}

/// Returns the default configuration for a family tag.
///
/// # Errors
///
/// Returns [`PackageError::UnrecognizedPackageKind`] for an unknown tag.
pub fn default_config_for(tag: &str) -> PackageResult<PackageConfig> {
    Ok(default_config(tag.parse()?))
}

/// Returns the canonical name of a JSON configuration.
///
/// # Errors
///
/// Returns [`PackageError::UnrecognizedPackageKind`] for an unknown tag, or
/// [`PackageError::InvalidConfig`] for a malformed configuration.
pub fn name_from_value(value: &Value) -> PackageResult<String> {
    PackageConfig::from_value(value).map(|config| to_name(&config))
}

/// Generates the solids of a JSON configuration.
///
/// An unknown family tag yields an empty list: nothing is rendered.
///
/// # Errors
///
/// Returns [`PackageError::InvalidConfig`] if the tag is known but the
/// configuration is malformed.
pub fn solids_from_value(value: &Value) -> PackageResult<Vec<Solid>> {
    match PackageConfig::from_value(value) {
        Ok(config) => Ok(to_solids(&config)),
        Err(PackageError::UnrecognizedPackageKind { kind }) => {
            tracing::warn!(kind = %kind, "No generator for package kind, returning no solids");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn require_positive(field: &str, value: f64) -> PackageResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PackageError::invalid(
            field,
            format!("must be greater than zero, got {value}"),
        ))
    }
}

fn require_non_negative(field: &str, value: f64) -> PackageResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(PackageError::invalid(
            field,
            format!("must not be negative, got {value}"),
        ))
    }
}

/// Upper bound on the pads in one row.
pub const MAX_PADS_PER_ROW: u32 = 1024;

fn require_count(field: &str, value: u32) -> PackageResult<()> {
    if (1..=MAX_PADS_PER_ROW).contains(&value) {
        Ok(())
    } else {
        Err(PackageError::invalid(
            field,
            format!("must be between 1 and {MAX_PADS_PER_ROW}, got {value}"),
        ))
    }
}
