//! Tolerance comparison and significant-digit helpers.

/// Checks a submission against a derived reference value.
///
/// Relative tolerance for a nonzero reference, exact equality when it is zero.
pub fn compare(trying: f64, correct: f64, accuracy: f64) -> bool {
    if correct == 0.0 {
        return trying == 0.0;
    }
    (correct - trying).abs() / correct.abs() <= accuracy
}

/// Decimal exponent of the leading significant digit (`0` for zero).
///
/// `meaning_power(1234.0) == 3`, `meaning_power(0.05) == -2`.
pub fn meaning_power(value: f64) -> i32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    value.abs().log10().floor() as i32
}

/// Number of fractional decimals that keep `digits` significant digits of `value`.
///
/// Never negative: integer parts are kept whole.
pub fn meaning_decimals(value: f64, digits: u32) -> u32 {
    let decimals = digits.max(1) as i32 - 1 - meaning_power(value);
    decimals.max(0) as u32
}

/// Rounds to `decimals` fractional digits, half away from zero.
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Rounds `value` to `digits` significant fractional digits.
///
/// `round_meaning(0.012345, 2) == 0.012`, `round_meaning(1234.5, 2) == 1235.0`.
pub fn round_meaning(value: f64, digits: u32) -> f64 {
    round_decimals(value, meaning_decimals(value, digits))
}

/// Whether two values agree at the finer of their significant-digit precisions.
pub fn compare_meaning(trying: f64, correct: f64, digits: u32) -> bool {
    let decimals = meaning_decimals(trying, digits).max(meaning_decimals(correct, digits));
    round_decimals(trying, decimals) == round_decimals(correct, decimals)
}
