//! QFN (Quad Flat No-lead) packages.
//!
//! Pads sit on all four sides of the body, flush with its edges. The body
//! floats `standoff` above the pad plane, and every pad is inflated by the
//! standoff so it visibly overlaps the body and pokes out past its sides.

use serde::{Deserialize, Serialize};

use crate::error::PackageResult;
use crate::geometry::{Solid, Vec3};
use crate::naming;
use crate::packages::{
    require_count, require_non_negative, require_positive, row_offset, BodyDimensions,
    ExposedPad, PackageModel,
};

/// Number of pads per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadCount {
    /// Pads in each of the two rows running along X.
    pub x: u32,
    /// Pads in each of the two rows running along Y.
    pub y: u32,
}

/// Perimeter pad dimensions (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QfnPad {
    /// Centre-to-centre spacing of adjacent pads.
    pub pitch: f64,
    /// Pad extent along its row.
    pub width: f64,
    /// Pad extent from the body edge inwards.
    pub length: f64,
    /// Gap between pad plane and body underside.
    pub standoff: f64,
    /// Pad thickness.
    pub thickness: f64,
}

/// QFN package configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QfnConfig {
    /// Body dimensions.
    pub body: BodyDimensions,
    /// Pads per row.
    pub pad_count: PadCount,
    /// Perimeter pad dimensions.
    pub pad: QfnPad,
    /// Optional exposed centre pad.
    pub epad: ExposedPad,
}

impl QfnConfig {
    /// Nordic Semiconductor nRF52832 (QFN48, 6x6 mm).
    #[must_use]
    pub const fn nrf52832() -> Self {
        Self {
            body: BodyDimensions::new(6.0, 6.0, 0.85),
            pad_count: PadCount { x: 12, y: 12 },
            pad: QfnPad {
                pitch: 0.4,
                width: 0.2,
                length: 0.4,
                standoff: 0.02,
                thickness: 0.2,
            },
            epad: ExposedPad::Enabled {
                width: 4.6,
                length: 4.6,
            },
        }
    }
}

impl Default for QfnConfig {
    fn default() -> Self {
        Self::nrf52832()
    }
}

impl PackageModel for QfnConfig {
    fn to_solids(&self) -> Vec<Solid> {
        to_solids(self)
    }

    fn name(&self) -> String {
        naming::qfn_name(
            self.pad_count.x,
            self.pad_count.y,
            self.body.width,
            self.body.length,
            self.pad.pitch,
            &self.epad,
        )
    }

    fn validate(&self) -> PackageResult<()> {
        self.body.validate()?;
        require_count("pad_count.x", self.pad_count.x)?;
        require_count("pad_count.y", self.pad_count.y)?;
        require_positive("pad.pitch", self.pad.pitch)?;
        require_positive("pad.width", self.pad.width)?;
        require_positive("pad.length", self.pad.length)?;
        require_non_negative("pad.standoff", self.pad.standoff)?;
        require_positive("pad.thickness", self.pad.thickness)?;
        self.epad.validate()
    }
}

/// Generates the solids of a QFN package.
///
/// Order: body, then left/right pad pairs along X, then top/bottom pad pairs
/// along Y, then the exposed pad if enabled. The total is
/// `1 + 2 * x + 2 * y (+ 1)`.
#[must_use]
pub fn to_solids(config: &QfnConfig) -> Vec<Solid> {
    let QfnConfig {
        body,
        pad_count,
        pad,
        epad,
    } = config;

    let mut solids = Vec::with_capacity(solid_count(config));

    solids.push(Solid::body(
        Vec3::new(0.0, 0.0, body.height / 2.0 + pad.standoff),
        Vec3::new(body.width, body.length, body.height),
    ));

    let pad_height = pad.thickness + pad.standoff;
    let pad_base = Solid::pad(
        Vec3::new(0.0, 0.0, pad.thickness / 2.0 + pad.standoff / 2.0),
        Vec3::ZERO,
    );
    let pad_base_x = pad_base.with_size(Vec3::new(
        pad.width,
        pad.length + pad.standoff,
        pad_height,
    ));
    let pad_base_y = pad_base.with_size(Vec3::new(
        pad.length + pad.standoff,
        pad.width,
        pad_height,
    ));

    // Outer pad edge flush with the body edge, pushed out by half the standoff
    let left_pad_y = -(body.width / 2.0 - pad.length / 2.0 + pad.standoff / 2.0);
    let right_pad_y = -left_pad_y;

    for i in 0..pad_count.x {
        let offset_x = row_offset(i, pad_count.x, pad.pitch);
        solids.push(pad_base_x.offset(Vec3::new(offset_x, left_pad_y, 0.0)));
        solids.push(pad_base_x.offset(Vec3::new(offset_x, right_pad_y, 0.0)));
    }

    let top_pad_x = -(body.length / 2.0 - pad.length / 2.0 + pad.standoff / 2.0);
    let bottom_pad_x = -top_pad_x;

    for i in 0..pad_count.y {
        let offset_y = row_offset(i, pad_count.y, pad.pitch);
        solids.push(pad_base_y.offset(Vec3::new(top_pad_x, offset_y, 0.0)));
        solids.push(pad_base_y.offset(Vec3::new(bottom_pad_x, offset_y, 0.0)));
    }

    if let ExposedPad::Enabled { width, length } = *epad {
        solids.push(pad_base.with_size(Vec3::new(width, length, pad_height)));
    }

    solids
}

/// Number of solids [`to_solids`] produces for `config`.
#[must_use]
pub fn solid_count(config: &QfnConfig) -> usize {
    let pads = 2 * (config.pad_count.x as usize + config.pad_count.y as usize);
    1 + pads + usize::from(config.epad.is_enabled())
}
