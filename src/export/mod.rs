//! Exporters turning generated solids into files for external CAD tools.
//!
//! # Supported targets
//!
//! - [`freecad`] - Python script for the FreeCAD console
//!
//! Exporters are pure string builders. [`write_script`] is the only function
//! here that touches the filesystem.

pub mod freecad;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Body colour used when none is configured (dark grey).
pub const DEFAULT_BODY_COLOR: u32 = 0x0026_2525;

/// Pad colour used when none is configured (light silver).
pub const DEFAULT_PAD_COLOR: u32 = 0x00d2_d1c7;

/// Colours applied to the exported features, packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColors {
    /// Colour of the fused body feature.
    pub body: u32,
    /// Colour of the fused pads feature.
    pub pad: u32,
}

impl Default for ExportColors {
    fn default() -> Self {
        Self {
            body: DEFAULT_BODY_COLOR,
            pad: DEFAULT_PAD_COLOR,
        }
    }
}

/// Parses a `#RRGGBB` (or `RRGGBB`) colour string.
#[must_use]
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Writes an export script to disk.
///
/// # Errors
///
/// Returns [`ExportError::Write`] if the file cannot be written.
pub fn write_script(path: &Path, script: &str) -> Result<(), ExportError> {
    std::fs::write(path, script).map_err(|e| ExportError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = script.len(), "Wrote export script");
    Ok(())
}
