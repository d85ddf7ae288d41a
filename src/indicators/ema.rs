// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value sits at index `period - 1` and is seeded with the SMA of
// the first `period` closes. Everything before it is `None`.
// =============================================================================

/// Compute the EMA series for `closes`, aligned index-for-index with the input.
///
/// The output always has `closes.len()` entries. Entries `0..period - 1` are
/// `None`; once seeded, every later entry is `Some`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `closes.len() < period` => all `None` (insufficient data, not an error)
pub fn calculate_ema_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.len() < period {
        return vec![None; closes.len()];
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(closes.len());
    result.resize(period - 1, None);

    // Seed: SMA of the first `period` values.
    let mut prev_ema = closes[..period].iter().sum::<f64>() / period as f64;
    result.push(Some(prev_ema));

    for &close in &closes[period..] {
        let ema = close * multiplier + prev_ema * (1.0 - multiplier);
        result.push(Some(ema));
        prev_ema = ema;
    }

    result
}

/// Mean of the trailing `period` closes, clamped to however many exist.
///
/// Returns `None` only for an empty slice or a zero period.
pub fn trailing_mean(closes: &[f64], period: usize) -> Option<f64> {
    let n = period.min(closes.len());
    if n == 0 {
        return None;
    }
    let window = &closes[closes.len() - n..];
    Some(window.iter().sum::<f64>() / n as f64)
}
