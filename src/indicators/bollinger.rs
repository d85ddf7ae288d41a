// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the population standard deviation of
// the window. The window rolls: every index is recomputed from its own
// trailing `period` closes.

use serde::{Deserialize, Serialize};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;

/// Band values at a single index; all `None` until `period` closes exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerPoint {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

/// Calculate the rolling Bollinger series for `closes`.
///
/// Returns one point per close. Indices with fewer than `period` trailing
/// closes (including every index when `period == 0`) are empty points.
pub fn calculate_bollinger_series(closes: &[f64], period: usize) -> Vec<BollingerPoint> {
    (0..closes.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            let window = &closes[start..=i];
            if period == 0 || window.len() < period {
                return BollingerPoint::default();
            }
            bands(window)
        })
        .collect()
}

fn bands(window: &[f64]) -> BollingerPoint {
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    BollingerPoint {
        upper: Some(middle + BOLLINGER_NUM_STD * std_dev),
        middle: Some(middle),
        lower: Some(middle - BOLLINGER_NUM_STD * std_dev),
    }
}
