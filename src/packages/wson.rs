//! WSON (Very-very-thin Small Outline No-lead) packages.
//!
//! Pads sit on the two long sides only. Instead of QFN's single standoff,
//! WSON pads protrude by separate bottom and side exposures.

use serde::{Deserialize, Serialize};

use crate::error::PackageResult;
use crate::geometry::{Solid, Vec3};
use crate::naming;
use crate::packages::{
    require_count, require_non_negative, require_positive, row_offset, BodyDimensions,
    ExposedPad, PackageModel,
};

/// How far pads protrude beyond the body (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadExposure {
    /// Gap between pad plane and body underside.
    pub bottom: f64,
    /// Distance the pad's outer edge extends past the body side.
    pub sides: f64,
}

impl Default for PadExposure {
    fn default() -> Self {
        Self {
            bottom: 0.05,
            sides: 0.01,
        }
    }
}

/// Perimeter pad dimensions (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WsonPad {
    /// Centre-to-centre spacing of adjacent pads.
    pub pitch: f64,
    /// Pad extent along its row.
    pub width: f64,
    /// Pad extent from the body edge inwards.
    pub length: f64,
    /// Pad thickness.
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    /// Pad exposure beyond the body.
    #[serde(default)]
    pub exposure: PadExposure,
}

const fn default_thickness() -> f64 {
    0.1
}

/// WSON package configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsonConfig {
    /// Body dimensions.
    pub body: BodyDimensions,
    /// Pads on each of the two sides.
    pub pad_count_per_side: u32,
    /// Perimeter pad dimensions.
    pub pad: WsonPad,
    /// Optional exposed centre pad.
    pub epad: ExposedPad,
}

impl WsonConfig {
    /// Microchip 8L WSON 5x6 mm (`C04-0452A`).
    #[must_use]
    pub fn microchip_8l_5x6() -> Self {
        Self {
            body: BodyDimensions::new(5.0, 6.0, 0.75),
            pad_count_per_side: 4,
            pad: WsonPad {
                pitch: 1.27,
                width: 0.4,
                length: 0.6,
                thickness: default_thickness(),
                exposure: PadExposure::default(),
            },
            epad: ExposedPad::Enabled {
                width: 3.4,
                length: 4.0,
            },
        }
    }
}

impl Default for WsonConfig {
    fn default() -> Self {
        Self::microchip_8l_5x6()
    }
}

impl PackageModel for WsonConfig {
    fn to_solids(&self) -> Vec<Solid> {
        to_solids(self)
    }

    fn name(&self) -> String {
        naming::wson_name(
            self.pad_count_per_side,
            self.body.width,
            self.body.length,
            self.pad.pitch,
            &self.epad,
        )
    }

    fn validate(&self) -> PackageResult<()> {
        self.body.validate()?;
        require_count("pad_count_per_side", self.pad_count_per_side)?;
        require_positive("pad.pitch", self.pad.pitch)?;
        require_positive("pad.width", self.pad.width)?;
        require_positive("pad.length", self.pad.length)?;
        require_positive("pad.thickness", self.pad.thickness)?;
        require_non_negative("pad.exposure.bottom", self.pad.exposure.bottom)?;
        require_non_negative("pad.exposure.sides", self.pad.exposure.sides)?;
        self.epad.validate()
    }
}

/// Generates the solids of a WSON package.
///
/// Order: body, all left-side pads, all right-side pads, then the exposed
/// pad if enabled. The total is `1 + 2 * pad_count_per_side (+ 1)`.
#[must_use]
pub fn to_solids(config: &WsonConfig) -> Vec<Solid> {
    let WsonConfig {
        body,
        pad_count_per_side,
        pad,
        epad,
    } = config;
    let count = *pad_count_per_side;

    let mut solids = Vec::with_capacity(solid_count(config));

    solids.push(Solid::body(
        Vec3::new(0.0, 0.0, body.height / 2.0 + pad.exposure.bottom),
        Vec3::new(body.width, body.length, body.height),
    ));

    let pad_base = Solid::pad(
        Vec3::new(0.0, 0.0, pad.thickness / 2.0),
        Vec3::new(pad.width, pad.length, pad.thickness),
    );

    // Outer pad edge flush with the body edge plus the side exposure
    let half_pad_length = pad.length / 2.0;
    let left_side_y = -(body.length / 2.0 - half_pad_length + pad.exposure.sides);
    let right_side_y = body.length / 2.0 - half_pad_length + pad.exposure.sides;

    for side_y in [left_side_y, right_side_y] {
        for i in 0..count {
            let offset_x = row_offset(i, count, pad.pitch);
            solids.push(pad_base.offset(Vec3::new(offset_x, side_y, 0.0)));
        }
    }

    if let ExposedPad::Enabled { width, length } = *epad {
        solids.push(pad_base.with_size(Vec3::new(width, length, pad.thickness)));
    }

    solids
}

/// Number of solids [`to_solids`] produces for `config`.
#[must_use]
pub fn solid_count(config: &WsonConfig) -> usize {
    1 + 2 * config.pad_count_per_side as usize + usize::from(config.epad.is_enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SolidKind;

    #[test]
    fn default_is_microchip_wson8() {
        let config = WsonConfig::default();
        assert_eq!(config.pad_count_per_side, 4);
        assert_eq!(config.name(), "WSON-8-1EP_5x6mm_P1.27mm_EP3.4x4mm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn exposure_defaults_when_omitted() {
        let json = serde_json::json!({
            "body": { "width": 5.0, "length": 6.0, "height": 0.75 },
            "pad_count_per_side": 4,
            "pad": { "pitch": 1.27, "width": 0.4, "length": 0.6 },
            "epad": { "enabled": false }
        });
        let config: WsonConfig = serde_json::from_value(json).unwrap();
        assert!((config.pad.thickness - 0.1).abs() < f64::EPSILON);
        assert!((config.pad.exposure.bottom - 0.05).abs() < f64::EPSILON);
        assert!((config.pad.exposure.sides - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn solid_count_matches_generated() {
        let config = WsonConfig::default();
        assert_eq!(to_solids(&config).len(), 10);
        assert_eq!(solid_count(&config), 10);

        let mut no_epad = config;
        no_epad.epad = ExposedPad::Disabled;
        assert_eq!(to_solids(&no_epad).len(), 9);
    }

    #[test]
    fn body_sits_on_bottom_exposure() {
        let solids = to_solids(&WsonConfig::default());
        let body = solids[0];
        assert_eq!(body.kind, SolidKind::Body);
        assert!((body.position.z - (0.75 / 2.0 + 0.05)).abs() < 1e-12);
    }

    #[test]
    fn left_side_emitted_before_right_side() {
        let solids = to_solids(&WsonConfig::default());
        let expected_y = 6.0 / 2.0 - 0.6 / 2.0 + 0.01;
        for pad in &solids[1..5] {
            assert!((pad.position.y + expected_y).abs() < 1e-12);
        }
        for pad in &solids[5..9] {
            assert!((pad.position.y - expected_y).abs() < 1e-12);
        }
    }

    #[test]
    fn pads_centred_along_x() {
        let solids = to_solids(&WsonConfig::default());
        let xs: Vec<f64> = solids[1..5].iter().map(|s| s.position.x).collect();
        assert!((xs[0] + 1.905).abs() < 1e-9);
        assert!((xs[3] - 1.905).abs() < 1e-9);
        assert!((xs[0] + xs[3]).abs() < 1e-12);
        assert!((xs[1] + xs[2]).abs() < 1e-12);
    }

    #[test]
    fn pads_rest_on_pad_plane() {
        let solids = to_solids(&WsonConfig::default());
        let pad = solids[1];
        assert!((pad.position.z - 0.05).abs() < 1e-12);
        assert_eq!(pad.size, Vec3::new(0.4, 0.6, 0.1));
    }

    #[test]
    fn exposed_pad_uses_pad_thickness() {
        let solids = to_solids(&WsonConfig::default());
        let epad = solids.last().unwrap();
        assert_eq!(epad.size, Vec3::new(3.4, 4.0, 0.1));
        assert!(epad.position.x.abs() < f64::EPSILON);
        assert!(epad.position.y.abs() < f64::EPSILON);
    }

    #[test]
    fn per_config_exposure_moves_pads() {
        let mut config = WsonConfig::default();
        config.pad.exposure.sides = 0.1;
        let solids = to_solids(&config);
        let expected_y = 3.0 - 0.3 + 0.1;
        assert!((solids[5].position.y - expected_y).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_zero_per_side() {
        let mut config = WsonConfig::default();
        config.pad_count_per_side = 0;
        assert!(config.validate().is_err());
    }
}
