//! Small numeric helpers shared by the scorer, the seeder and the summary reducer

/// Clamp `value` into `[min, max]`
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Clamp `value` into `[0, 1]`
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Round to the nearest integer, ties toward positive infinity.
///
/// `f64::round` sends ties away from zero, which differs for negative
/// halves (-2.5 becomes -3 instead of -2). Dashboard numbers have always
/// been rounded the half-up way, so keep that.
pub fn round_half_up(value: f64) -> f64 {
    let rounded = value.round();
    if rounded < value && (value - rounded - 0.5).abs() < f64::EPSILON {
        rounded + 1.0
    } else {
        rounded
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    round_half_up(value * factor) / factor
}

/// Keep only finite values (drops NaN and infinities)
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N)
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
