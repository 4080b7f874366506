//! Package naming convention generator.
//!
//! Names follow the KiCad-style convention used by datasheet part numbers:
//!
//! - With exposed pad: `{FAMILY}-{PINS}-1EP_{W}x{L}mm_P{PITCH}mm_EP{EW}x{EL}mm`
//! - Without: `{FAMILY}-{PINS}_{W}x{L}mm_P{PITCH}mm`
//!
//! Examples:
//! - `QFN-48-1EP_6x6mm_P0.4mm_EP4.6x4.6mm` - nRF52832
//! - `WSON-8-1EP_5x6mm_P1.27mm_EP3.4x4mm` - Microchip 8L WSON
//!
//! Dimensions are written exactly as given, with no rounding and no trailing
//! zeros. Names are compared by equality, so this formatting is load-bearing.

use crate::packages::ExposedPad;

/// Formats a number the way JavaScript's `Number#toString` does.
///
/// `6.0` becomes `6`, `0.40` becomes `0.4`. Negative zero is written as `0`.
/// Magnitudes below `1e-6` or from `1e21` up use exponent notation with an
/// explicit sign, as in `2.7755575615628914e-17` and `1e+21`.
///
/// # Examples
///
/// ```
/// use package_model_mcp::naming::decimal;
///
/// assert_eq!(decimal(6.0), "6");
/// assert_eq!(decimal(1.27), "1.27");
/// assert_eq!(decimal(-0.0), "0");
/// assert_eq!(decimal(2.5e-7), "2.5e-7");
/// ```
#[must_use]
pub fn decimal(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !value.is_finite() || (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    // `{:e}` gives the shortest mantissa but omits the `+` on positive exponents.
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Generates the name of a QFN package.
///
/// The pin count covers all four sides: `2 * (pad_count_x + pad_count_y)`.
///
/// # Examples
///
/// ```
/// use package_model_mcp::naming::qfn_name;
/// use package_model_mcp::packages::ExposedPad;
///
/// let name = qfn_name(2, 2, 6.0, 6.0, 0.4, &ExposedPad::Disabled);
/// assert_eq!(name, "QFN-8_6x6mm_P0.4mm");
/// ```
#[must_use]
pub fn qfn_name(
    pad_count_x: u32,
    pad_count_y: u32,
    body_width: f64,
    body_length: f64,
    pitch: f64,
    epad: &ExposedPad,
) -> String {
    let pin_count = 2 * (u64::from(pad_count_x) + u64::from(pad_count_y));
    package_name("QFN", pin_count, body_width, body_length, pitch, epad)
}

/// Generates the name of a WSON package.
///
/// The pin count is `2 * pad_count_per_side`.
#[must_use]
pub fn wson_name(
    pad_count_per_side: u32,
    body_width: f64,
    body_length: f64,
    pitch: f64,
    epad: &ExposedPad,
) -> String {
    let pin_count = u64::from(pad_count_per_side) * 2;
    package_name("WSON", pin_count, body_width, body_length, pitch, epad)
}

fn package_name(
    family: &str,
    pin_count: u64,
    body_width: f64,
    body_length: f64,
    pitch: f64,
    epad: &ExposedPad,
) -> String {
    let body_and_pitch = format!(
        "{}x{}mm_P{}mm",
        decimal(body_width),
        decimal(body_length),
        decimal(pitch)
    );

    match *epad {
        ExposedPad::Enabled { width, length } => format!(
            "{family}-{pin_count}-1EP_{body_and_pitch}_EP{}x{}mm",
            decimal(width),
            decimal(length)
        ),
        ExposedPad::Disabled => format!("{family}-{pin_count}_{body_and_pitch}"),
    }
}
