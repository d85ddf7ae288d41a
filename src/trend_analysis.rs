// =============================================================================
// Trend Analysis: one-shot summary of a price history
// =============================================================================
//
// Combines the SMA(5)/SMA(10) crossover, the whole-window momentum and the
// recommendation engine's key points into a `StockAnalysis`.
//
// Decision rule:
//   trend = Upward   when last close > previous close
//           Downward otherwise (ties included)

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::trailing_mean;
use crate::signals::recommendation::{LONG_SMA_PERIOD, SHORT_SMA_PERIOD};
use crate::signals::{build_key_points, KeyPoints};
use crate::types::{closes, PricePoint, Trend};

/// Histories shorter than this produce no analysis.
pub const MIN_ANALYSIS_POINTS: usize = 10;

/// Whole-window move (in percent) beyond which a momentum line is emitted.
const MOMENTUM_FLAG_PCT: f64 = 1.0;

/// Full snapshot of the analysis for a single price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysis {
    pub trend: Trend,
    pub reason: String,
    pub technical_indicators: Vec<String>,
    pub key_points: KeyPoints,
}

/// Analyse `points`.
///
/// Returns `None` when there are fewer than [`MIN_ANALYSIS_POINTS`] points.
pub fn analyze(points: &[PricePoint]) -> Option<StockAnalysis> {
    if points.len() < MIN_ANALYSIS_POINTS {
        debug!(
            points = points.len(),
            "trend analysis: insufficient data (need >= {} points)", MIN_ANALYSIS_POINTS
        );
        return None;
    }

    let prices = closes(points);
    let last = prices[prices.len() - 1];
    let prev = prices[prices.len() - 2];
    let first = prices[0];

    let sma_short = trailing_mean(&prices, SHORT_SMA_PERIOD)?;
    let sma_long = trailing_mean(&prices, LONG_SMA_PERIOD)?;
    let momentum_pct = (last - first) / first * 100.0;

    let mut technical_indicators = Vec::new();
    if sma_short > sma_long {
        technical_indicators
            .push("🟢 Short-term moving average above long-term → Bullish signal".to_string());
    }
    if sma_short < sma_long {
        technical_indicators
            .push("🔴 Short-term moving average below long-term → Bearish signal".to_string());
    }
    if momentum_pct > MOMENTUM_FLAG_PCT {
        technical_indicators.push(format!("📈 Strong upward momentum ({:.2}%)", momentum_pct));
    }
    if momentum_pct < -MOMENTUM_FLAG_PCT {
        technical_indicators.push(format!("📉 Strong downward momentum ({:.2}%)", momentum_pct));
    }

    let key_points = build_key_points(&prices);
    let trend = if last > prev { Trend::Upward } else { Trend::Downward };
    let reason = level_reason(last, &key_points);

    debug!(
        points = points.len(),
        %trend,
        momentum_pct = format!("{:.3}", momentum_pct),
        "trend analysis complete"
    );

    Some(StockAnalysis {
        trend,
        reason,
        technical_indicators,
        key_points,
    })
}

fn level_reason(last: f64, key_points: &KeyPoints) -> String {
    let side = |level: f64| if last > level { "above" } else { "below" };
    format!(
        "Current price (${:.2}) is {} support (${:.2}) and {} resistance (${:.2}).",
        last,
        side(key_points.support),
        key_points.support,
        side(key_points.resistance),
        key_points.resistance
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Momentum;

    fn history(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(1_700_000_000_000 + i as i64 * 86_400_000, p))
            .collect()
    }

    const SCENARIO: [f64; 10] = [100.0, 102.0, 101.0, 105.0, 103.0, 107.0, 106.0, 110.0, 108.0, 112.0];

    #[test]
    fn fewer_than_ten_points_is_none() {
        assert!(analyze(&[]).is_none());
        assert!(analyze(&history(&SCENARIO[..9])).is_none());
    }

    #[test]
    fn ten_point_scenario() {
        let analysis = analyze(&history(&SCENARIO)).expect("ten points are enough");
        assert_eq!(analysis.trend, Trend::Upward);
        assert_eq!(analysis.key_points.support, 100.0);
        assert_eq!(analysis.key_points.resistance, 112.0);
        assert_eq!(analysis.key_points.momentum, Momentum::Overbought);
        assert_eq!(
            analysis.technical_indicators,
            vec![
                "🟢 Short-term moving average above long-term → Bullish signal".to_string(),
                "📈 Strong upward momentum (12.00%)".to_string(),
            ]
        );
        assert_eq!(
            analysis.reason,
            "Current price ($112.00) is above support ($100.00) and below resistance ($112.00)."
        );
    }

    #[test]
    fn flat_last_move_is_downward() {
        let mut prices = SCENARIO.to_vec();
        prices.push(112.0);
        let analysis = analyze(&history(&prices)).unwrap();
        assert_eq!(analysis.trend, Trend::Downward);
    }

    #[test]
    fn falling_series_flags_bearish_lines() {
        let prices: Vec<f64> = (0..12).map(|i| 100.0 - i as f64).collect();
        let analysis = analyze(&history(&prices)).unwrap();
        assert_eq!(analysis.trend, Trend::Downward);
        assert_eq!(
            analysis.technical_indicators,
            vec![
                "🔴 Short-term moving average below long-term → Bearish signal".to_string(),
                "📉 Strong downward momentum (-11.00%)".to_string(),
            ]
        );
    }

    #[test]
    fn small_moves_emit_no_momentum_line() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let analysis = analyze(&history(&prices)).unwrap();
        assert!(analysis
            .technical_indicators
            .iter()
            .all(|s| !s.contains("momentum")));
    }

    #[test]
    fn serialises_camel_case() {
        let analysis = analyze(&history(&SCENARIO)).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["trend"], "Upward");
        assert!(json["technicalIndicators"].is_array());
        assert_eq!(json["keyPoints"]["support"], 100.0);
        assert!(json["keyPoints"]["macd"]["histogram"].is_null());
    }
}
