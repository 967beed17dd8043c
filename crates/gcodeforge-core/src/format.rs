//! Fixed-point coordinate formatting
//!
//! Every coordinate written by a rewrite rule uses exactly six fractional
//! digits, no exponent, and rounds exact ties away from zero.

use crate::types::Axis;

/// Number of fractional digits in every rewritten coordinate
pub const FIXED_DECIMALS: usize = 6;

/// Twice the number of fixed-point units per whole unit.
const HALF_UNIT_SCALE: f64 = 2_000_000.0;

/// Format a value with six fractional digits.
///
/// `std` formatting already rounds correctly except on exact ties, where it
/// rounds to even. A tie is a value whose exact product with `2e6` is an odd
/// integer; the fused multiply-add residual tells whether the product was exact.
/// Negative zero, and negatives that round to zero, print as `0.000000`.
pub fn format_fixed(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    let scaled = value * HALF_UNIT_SCALE;
    let exact = value.mul_add(HALF_UNIT_SCALE, -scaled) == 0.0;

    if exact && scaled.fract() == 0.0 && scaled.abs() < 9.0e15 && scaled % 2.0 != 0.0 {
        let units = ((scaled + scaled.signum()) / 2.0) as i64;
        let sign = if units < 0 { "-" } else { "" };
        let magnitude = units.unsigned_abs();
        return format!(
            "{}{}.{:06}",
            sign,
            magnitude / 1_000_000,
            magnitude % 1_000_000
        );
    }

    let text = format!("{:.6}", value);
    match text.strip_prefix('-') {
        Some(magnitude) if magnitude.bytes().all(|b| b == b'0' || b == b'.') => {
            magnitude.to_string()
        }
        _ => text,
    }
}

/// Format an axis field, e.g. `Y11.715000`.
pub fn format_field(axis: Axis, value: f64) -> String {
    format!("{}{}", axis, format_fixed(value))
}
