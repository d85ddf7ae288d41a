// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(12) - EMA(26)
//   Signal line = EMA(9) of the MACD line's defined suffix, left-padded with
//                 `None` back to the input length
//   Histogram   = MACD line - signal line
//
// Every output series is aligned index-for-index with the input closes.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema_series;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// MACD reading at a single index. Any field is `None` while there is not yet
/// enough history behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub value: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// Compute the MACD series for `closes` with the fixed 12/26/9 parameters.
///
/// The result has exactly `closes.len()` points. The signal and histogram stay
/// `None` everywhere when the defined part of the MACD line is shorter than
/// nine points.
pub fn calculate_macd(closes: &[f64]) -> Vec<MacdPoint> {
    let ema_fast = calculate_ema_series(closes, MACD_FAST_PERIOD);
    let ema_slow = calculate_ema_series(closes, MACD_SLOW_PERIOD);

    let macd_line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| match (fast, slow) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let defined: Vec<f64> = macd_line.iter().flatten().copied().collect();
    let signal_line = left_pad(calculate_ema_series(&defined, MACD_SIGNAL_PERIOD), macd_line.len());

    macd_line
        .iter()
        .zip(&signal_line)
        .map(|(&value, &signal)| MacdPoint {
            value,
            signal,
            histogram: match (value, signal) {
                (Some(v), Some(s)) => Some(v - s),
                _ => None,
            },
        })
        .collect()
}

/// Prepend `target_len - series.len()` empty slots so that `series` lines up
/// with the end of a sequence of `target_len` entries.
fn left_pad(series: Vec<Option<f64>>, target_len: usize) -> Vec<Option<f64>> {
    let pad = target_len.saturating_sub(series.len());
    let mut padded = vec![None; pad];
    padded.extend(series);
    padded
}
