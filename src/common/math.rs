//! Moving-average helpers shared by the indicators

/// Simple moving average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// One EMA step with smoothing factor 2 / (period + 1)
pub fn ema_from_previous(value: f64, previous: f64, period: usize) -> f64 {
    let alpha = 2.0 / (period as f64 + 1.0);
    alpha * value + (1.0 - alpha) * previous
}

/// Full EMA series aligned with `values`.
///
/// Leading `NaN`s in the input are skipped. The average is seeded with the SMA
/// of the first `period` defined values; every position before the seed is
/// `NaN`. Returns `None` when the seed cannot be formed.
pub fn ema_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 {
        return None;
    }
    let start = values.iter().position(|v| !v.is_nan())?;
    let seed_end = start + period;
    if values.len() < seed_end {
        return None;
    }

    let mut out = vec![f64::NAN; values.len()];
    let mut previous = sma(&values[start..seed_end], period)?;
    out[seed_end - 1] = previous;
    for i in seed_end..values.len() {
        previous = ema_from_previous(values[i], previous, period);
        out[i] = previous;
    }
    Some(out)
}
