// Rounding and ratio helpers shared by the aggregation pipelines.

/// Share of `value` in `total` as a percentage, truncated toward zero at two
/// decimals (`trunc(value / total * 10000) / 100`).
///
/// Returns `None` when the total is zero or the result is not finite, which
/// callers surface as "no data".
pub fn truncated_percent(value: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        return None;
    }
    let pct = ((value / total) * 10_000.0).trunc() / 100.0;
    pct.is_finite().then_some(pct)
}

/// Round to `decimals` places, ties to even.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

/// `numerator / denominator`, or 0.0 when the denominator is zero.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// `numerator / denominator * 100` rounded to one decimal; 0.0 for a zero
/// denominator.
pub fn percent_of_total(numerator: f64, denominator: f64) -> f64 {
    round_half_even(ratio_or_zero(numerator, denominator) * 100.0, 1)
}

/// Divide every value by the largest absolute value in the slice, mapping the
/// column into [-1, 1]. A column of zeros stays zeros.
pub fn scale_by_max_abs(values: &[f64]) -> Vec<f64> {
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    values.iter().map(|v| ratio_or_zero(*v, max_abs)).collect()
}
