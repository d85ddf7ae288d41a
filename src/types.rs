// =============================================================================
// Shared types used across the Trendcast engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single daily close, as handed over by whatever fetched the history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Epoch milliseconds.
    pub time: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

/// Extract the bare price column from a history, preserving order.
pub fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.price).collect()
}

/// The player's call on where the price goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guess {
    Up,
    Down,
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Direction of the most recent close-to-close move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Upward,
    Downward,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upward => write!(f, "Upward"),
            Self::Downward => write!(f, "Downward"),
        }
    }
}

/// RSI bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Momentum {
    Overbought,
    Oversold,
    #[default]
    Neutral,
}

impl std::fmt::Display for Momentum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "Overbought"),
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}
