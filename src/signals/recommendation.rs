// =============================================================================
// Recommendation Engine: latest-value snapshot + qualitative verdict
// =============================================================================
//
// Collects independent textual signals from the latest Bollinger, MACD, SMA
// crossover and RSI readings, tallies them by sentiment and composes a single
// recommendation line.
//
// Classification is by substring: "Bullish"/"Oversold" count as bullish,
// "Bearish"/"Overbought" as bearish. The match is case-sensitive, so the RSI
// signals (lower-case wording) never tip the tally.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::rsi::{RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::indicators::{
    calculate_bollinger_series, calculate_macd, calculate_rsi, momentum_label, trailing_mean,
    BollingerPoint, MacdPoint, BOLLINGER_PERIOD,
};
use crate::types::Momentum;

/// Trailing window for support/resistance.
pub const LEVEL_WINDOW: usize = 10;
pub const SHORT_SMA_PERIOD: usize = 5;
pub const LONG_SMA_PERIOD: usize = 10;

const SIGNAL_BELOW_LOWER_BAND: &str = "Price below lower Bollinger Band (Oversold)";
const SIGNAL_ABOVE_UPPER_BAND: &str = "Price above upper Bollinger Band (Overbought)";
const SIGNAL_MACD_POSITIVE: &str = "Positive MACD (Bullish)";
const SIGNAL_MACD_NEGATIVE: &str = "Negative MACD (Bearish)";
const SIGNAL_SMA_ABOVE: &str = "Short-term MA above long-term MA (Bullish)";
const SIGNAL_SMA_BELOW: &str = "Short-term MA below long-term MA (Bearish)";
const SIGNAL_RSI_OVERSOLD: &str = "RSI shows oversold conditions";
const SIGNAL_RSI_OVERBOUGHT: &str = "RSI shows overbought conditions";

/// Snapshot of the latest indicator values for a price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPoints {
    pub support: f64,
    pub resistance: f64,
    pub volume: String,
    pub momentum: Momentum,
    pub recommendation: String,
    pub macd: MacdPoint,
    pub bollinger: BollingerPoint,
}

impl KeyPoints {
    /// Neutral result for an empty history.
    pub fn insufficient_data() -> Self {
        Self {
            support: 0.0,
            resistance: 0.0,
            volume: "No Data".to_string(),
            momentum: Momentum::Neutral,
            recommendation: "Insufficient data".to_string(),
            macd: MacdPoint::default(),
            bollinger: BollingerPoint::default(),
        }
    }
}

/// Inputs to signal collection, all taken at the last index.
#[derive(Debug, Clone, Copy)]
pub struct SignalSnapshot {
    pub last_price: f64,
    pub macd: MacdPoint,
    pub bollinger: BollingerPoint,
    pub sma_short: f64,
    pub sma_long: f64,
    pub rsi: f64,
}

/// Build the key-point snapshot for `closes`.
pub fn build_key_points(closes: &[f64]) -> KeyPoints {
    let Some(&last_price) = closes.last() else {
        debug!("key points requested for an empty history");
        return KeyPoints::insufficient_data();
    };

    let (support, resistance) = support_resistance(closes);

    let macd = calculate_macd(closes).last().copied().unwrap_or_default();
    let bollinger = calculate_bollinger_series(closes, BOLLINGER_PERIOD)
        .last()
        .copied()
        .unwrap_or_default();
    let rsi = calculate_rsi(closes);

    let snapshot = SignalSnapshot {
        last_price,
        macd,
        bollinger,
        sma_short: trailing_mean(closes, SHORT_SMA_PERIOD).unwrap_or(last_price),
        sma_long: trailing_mean(closes, LONG_SMA_PERIOD).unwrap_or(last_price),
        rsi,
    };
    let signals = collect_signals(&snapshot);

    debug!(
        points = closes.len(),
        rsi = format!("{:.2}", rsi),
        signals = signals.len(),
        "key points computed"
    );

    KeyPoints {
        support,
        resistance,
        volume: "Average".to_string(),
        momentum: momentum_label(rsi),
        recommendation: compose_recommendation(&signals),
        macd,
        bollinger,
    }
}

/// Min / max over the trailing [`LEVEL_WINDOW`] closes.
pub fn support_resistance(closes: &[f64]) -> (f64, f64) {
    let window = &closes[closes.len().saturating_sub(LEVEL_WINDOW)..];
    window
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)))
}

/// Test every signal condition independently, in a fixed order.
pub fn collect_signals(s: &SignalSnapshot) -> Vec<String> {
    let mut signals = Vec::new();

    if matches!(s.bollinger.lower, Some(lower) if s.last_price < lower) {
        signals.push(SIGNAL_BELOW_LOWER_BAND);
    }
    if matches!(s.bollinger.upper, Some(upper) if s.last_price > upper) {
        signals.push(SIGNAL_ABOVE_UPPER_BAND);
    }
    match s.macd.histogram {
        Some(h) if h > 0.0 => signals.push(SIGNAL_MACD_POSITIVE),
        Some(h) if h < 0.0 => signals.push(SIGNAL_MACD_NEGATIVE),
        _ => {}
    }
    if s.sma_short > s.sma_long {
        signals.push(SIGNAL_SMA_ABOVE);
    }
    if s.sma_short < s.sma_long {
        signals.push(SIGNAL_SMA_BELOW);
    }
    if s.rsi < RSI_OVERSOLD {
        signals.push(SIGNAL_RSI_OVERSOLD);
    }
    if s.rsi > RSI_OVERBOUGHT {
        signals.push(SIGNAL_RSI_OVERBOUGHT);
    }

    signals.into_iter().map(str::to_string).collect()
}

fn is_bullish(signal: &str) -> bool {
    signal.contains("Bullish") || signal.contains("Oversold")
}

fn is_bearish(signal: &str) -> bool {
    signal.contains("Bearish") || signal.contains("Overbought")
}

/// Tally the signals and turn them into the recommendation line.
pub fn compose_recommendation(signals: &[String]) -> String {
    let bullish = signals.iter().filter(|s| is_bullish(s)).count();
    let bearish = signals.iter().filter(|s| is_bearish(s)).count();

    if bullish > bearish {
        format!("Strong Buy Signal: {}", first(signals, 3).join(", "))
    } else if bearish > bullish {
        format!("Consider Selling: {}", first(signals, 3).join(", "))
    } else {
        format!("Market Mixed: Watch for {}", first(signals, 2).join(" and "))
    }
}

fn first(signals: &[String], n: usize) -> &[String] {
    &signals[..signals.len().min(n)]
}
