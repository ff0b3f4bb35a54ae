//! Deterministic numeric helpers.
//!
//! Every score in the workspace is a weighted blend of normalized factors,
//! each of which must stay finite and inside `[0, 1]` no matter what the
//! inputs look like. The helpers here are the only place that guarantee is
//! spelled out.

#![forbid(unsafe_code)]

/// Round a floating point value to `decimals` decimal places.
#[must_use]
pub fn round_f64(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Return a 4-decimal ratio and guard division by zero.
#[must_use]
pub fn safe_ratio(numer: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        round_f64(numer as f64 / denom as f64, 4)
    }
}

/// Divide and return `0.0` for a zero or non-finite result.
#[must_use]
pub fn safe_div(numer: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        return 0.0;
    }
    let value = numer / denom;
    if value.is_finite() { value } else { 0.0 }
}

/// Clamp into `[0, 1]`, mapping NaN to `0.0`.
///
/// # Examples
///
/// ```
/// use churnlens_math::clamp_unit;
///
/// assert_eq!(clamp_unit(1.7), 1.0);
/// assert_eq!(clamp_unit(-0.2), 0.0);
/// assert_eq!(clamp_unit(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// `min(value / cap, 1)`, floored at zero. A non-positive cap yields `0.0`.
///
/// # Examples
///
/// ```
/// use churnlens_math::saturating_fraction;
///
/// assert_eq!(saturating_fraction(5.0, 10.0), 0.5);
/// assert_eq!(saturating_fraction(50.0, 10.0), 1.0);
/// assert_eq!(saturating_fraction(3.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn saturating_fraction(value: f64, cap: f64) -> f64 {
    if cap <= 0.0 || cap.is_nan() {
        return 0.0;
    }
    clamp_unit(value / cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_f64_rounds_expected_precision() {
        let value = 12.34567;
        assert_eq!(round_f64(value, 2), 12.35);
        assert_eq!(round_f64(value, 4), 12.3457);
    }

    #[test]
    fn safe_ratio_guards_divide_by_zero() {
        assert_eq!(safe_ratio(5, 0), 0.0);
        assert_eq!(safe_ratio(1, 4), 0.25);
    }

    #[test]
    fn safe_div_rejects_infinite_results() {
        assert_eq!(safe_div(1.0, 0.0), 0.0);
        assert_eq!(safe_div(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(safe_div(3.0, 4.0), 0.75);
    }

    #[test]
    fn saturating_fraction_handles_infinite_value() {
        assert_eq!(saturating_fraction(f64::INFINITY, 1.0), 1.0);
    }
}
