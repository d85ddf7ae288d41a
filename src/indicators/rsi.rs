// =============================================================================
// Relative Strength Index (RSI): trailing simple average
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1. Take the trailing `RSI_PERIOD` closes (fewer if that is all there
//         is). The first slot of the slice has no predecessor and counts as a
//         zero move.
// Step 2. avg_gain / avg_loss = sum of gains / losses divided by RSI_PERIOD.
// Step 3. RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// No Wilder smoothing and no special-casing: a window without losses gives
// RS = +inf and RSI = 100; a window without any movement gives NaN, which
// lands in the neutral bucket.
//
// Thresholds:  RSI > 70 => Overbought,  RSI < 30 => Oversold.
// =============================================================================

use crate::types::Momentum;

pub const RSI_PERIOD: usize = 14;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// RSI over the trailing [`RSI_PERIOD`] closes of `closes`.
pub fn calculate_rsi(closes: &[f64]) -> f64 {
    let window = &closes[closes.len().saturating_sub(RSI_PERIOD)..];

    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let delta = w[1] - w[0];
        (g + delta.max(0.0), l + (-delta).max(0.0))
    });

    let avg_gain = gains / RSI_PERIOD as f64;
    let avg_loss = losses / RSI_PERIOD as f64;

    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

/// Bucket an RSI value. NaN compares false both ways and is `Neutral`.
pub fn momentum_label(rsi: f64) -> Momentum {
    if rsi > RSI_OVERBOUGHT {
        Momentum::Overbought
    } else if rsi < RSI_OVERSOLD {
        Momentum::Oversold
    } else {
        Momentum::Neutral
    }
}
