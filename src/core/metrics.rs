//! Percentage and rounding helpers shared by every stage.

/// Decimal places kept on every percentage field.
pub const PERCENTAGE_PRECISION: u32 = 1;

/// Decimal places kept on facet means.
pub const MEAN_PRECISION: u32 = 2;

/// Round `value` to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Express `numerator / denominator` as a rounded percentage.
///
/// A zero denominator yields `0.0`, as does any non-finite ratio.
pub fn ratio_to_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let ratio = numerator as f64 / denominator as f64;
    if !ratio.is_finite() {
        return 0.0;
    }
    round_to(ratio * 100.0, PERCENTAGE_PRECISION)
}
