//! Numeric helpers shared by the aggregator and the eligibility engine.

/// Divides `numerator` by `denominator`, returning 0 when the denominator is
/// zero or the quotient is not a finite number.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if quotient.is_finite() { quotient } else { 0.0 }
}

/// `numerator / denominator * 100`, under the same zero policy as [`safe_div`].
pub fn safe_percent(numerator: f64, denominator: f64) -> f64 {
    safe_div(numerator, denominator) * 100.0
}

/// Rounds to the nearest integer, with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}
