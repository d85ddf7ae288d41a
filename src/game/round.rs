// =============================================================================
// Round: one symbol, one history, one guess
// =============================================================================
//
//   AwaitingGuess --submit_guess--> Revealed
//
// The history is split into a visible prefix and a hidden continuation. Point
// `i` is hidden when `i > len / 2` (real division), so `len / 2 + 1` points
// (integer division) are shown before the guess.
//
// Indicators are computed once, over the full history, when the round is
// created. Every indicator is trailing, so slicing a series down to the shown
// prefix gives the same values as computing it over that prefix alone. The
// analysis is not: until the reveal the view carries the analysis of the
// visible prefix only.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::{GameError, Result};
use super::scoring::{resolve_prediction, GameState, PredictionOutcome};
use crate::indicators::{
    calculate_bollinger_series, calculate_macd, BollingerPoint, MacdPoint, BOLLINGER_PERIOD,
};
use crate::trend_analysis::{analyze, StockAnalysis};
use crate::types::{closes, Guess, PricePoint};

/// A history entry as delivered by the fetcher; the close may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub time: i64,
    #[serde(default)]
    pub price: Option<f64>,
}

impl From<PricePoint> for RawQuote {
    fn from(p: PricePoint) -> Self {
        Self { time: p.time, price: Some(p.price) }
    }
}

/// Which two prices the guess is scored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringAnchor {
    /// The last visible point against the last point of the full history.
    #[default]
    RevealPoint,
    /// The last two points of the full history.
    FinalMove,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundPhase {
    AwaitingGuess,
    Revealed { guess: Guess, outcome: PredictionOutcome },
}

#[derive(Debug, Clone)]
pub struct Round {
    pub id: String,
    pub symbol: String,
    history: Vec<PricePoint>,
    visible_len: usize,
    analysis: Option<StockAnalysis>,
    visible_analysis: Option<StockAnalysis>,
    macd: Vec<MacdPoint>,
    bollinger: Vec<BollingerPoint>,
    phase: RoundPhase,
    pub created_at: String,
}

/// Serializable picture of a round as the player should currently see it.
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub id: String,
    pub symbol: String,
    pub revealed: bool,
    pub visible_len: usize,
    pub total_len: usize,
    pub points: Vec<PricePoint>,
    pub macd: Vec<MacdPoint>,
    pub bollinger: Vec<BollingerPoint>,
    pub analysis: Option<StockAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess: Option<Guess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<PredictionOutcome>,
}

impl Round {
    /// Build a round from raw quotes. Missing, non-finite and non-positive
    /// closes are dropped before the visible split is taken.
    pub fn new(symbol: impl Into<String>, quotes: Vec<RawQuote>) -> Result<Self> {
        let symbol = symbol.into();
        let raw_len = quotes.len();
        let history: Vec<PricePoint> = quotes
            .into_iter()
            .filter_map(|q| match q.price {
                Some(price) if price.is_finite() && price > 0.0 => {
                    Some(PricePoint::new(q.time, price))
                }
                _ => None,
            })
            .collect();

        if history.is_empty() {
            return Err(GameError::EmptyHistory);
        }
        if history.len() < raw_len {
            debug!(
                symbol = %symbol,
                dropped = raw_len - history.len(),
                "dropped quotes without a usable close"
            );
        }

        let prices = closes(&history);
        let visible_len = visible_len(history.len());
        let round = Self {
            id: uuid::Uuid::new_v4().to_string(),
            analysis: analyze(&history),
            visible_analysis: analyze(&history[..visible_len]),
            macd: calculate_macd(&prices),
            bollinger: calculate_bollinger_series(&prices, BOLLINGER_PERIOD),
            symbol,
            history,
            visible_len,
            phase: RoundPhase::AwaitingGuess,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            round_id = %round.id,
            symbol = %round.symbol,
            points = round.history.len(),
            visible = round.visible_len,
            "round created"
        );
        Ok(round)
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.phase, RoundPhase::Revealed { .. })
    }

    pub fn history(&self) -> &[PricePoint] {
        &self.history
    }

    pub fn visible(&self) -> &[PricePoint] {
        &self.history[..self.visible_len]
    }

    /// Analysis of the full history.
    pub fn analysis(&self) -> Option<&StockAnalysis> {
        self.analysis.as_ref()
    }

    /// `(before, after)` prices the guess is judged on.
    pub fn price_pair(&self, anchor: ScoringAnchor) -> (f64, f64) {
        let n = self.history.len();
        let after = self.history[n - 1].price;
        let before = match anchor {
            ScoringAnchor::FinalMove if n >= 2 => self.history[n - 2].price,
            ScoringAnchor::FinalMove => after,
            ScoringAnchor::RevealPoint => self.history[self.visible_len - 1].price,
        };
        (before, after)
    }

    /// Reveal the continuation and score `guess`. Fails if the round was
    /// already revealed, so scoring happens at most once.
    pub fn submit_guess(
        &mut self,
        state: GameState,
        guess: Guess,
        anchor: ScoringAnchor,
    ) -> Result<(GameState, PredictionOutcome)> {
        if self.is_revealed() {
            return Err(GameError::AlreadyRevealed);
        }

        let (before, after) = self.price_pair(anchor);
        let (next, outcome) = resolve_prediction(state, guess, before, after);

        info!(
            round_id = %self.id,
            symbol = %self.symbol,
            %guess,
            correct = outcome.correct,
            points = outcome.points_delta,
            score = next.score(),
            streak = next.streak(),
            "round revealed"
        );

        self.phase = RoundPhase::Revealed {
            guess,
            outcome: outcome.clone(),
        };
        Ok((next, outcome))
    }

    pub fn view(&self) -> RoundView {
        let (shown, analysis) = if self.is_revealed() {
            (self.history.len(), &self.analysis)
        } else {
            (self.visible_len, &self.visible_analysis)
        };
        let (guess, outcome) = match &self.phase {
            RoundPhase::AwaitingGuess => (None, None),
            RoundPhase::Revealed { guess, outcome } => (Some(*guess), Some(outcome.clone())),
        };

        RoundView {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            revealed: self.is_revealed(),
            visible_len: self.visible_len,
            total_len: self.history.len(),
            points: self.history[..shown].to_vec(),
            macd: self.macd[..shown].to_vec(),
            bollinger: self.bollinger[..shown].to_vec(),
            analysis: analysis.clone(),
            guess,
            outcome,
        }
    }
}

/// Number of points shown before the guess for a history of `len` points.
pub fn visible_len(len: usize) -> usize {
    (len / 2 + 1).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(prices: &[f64]) -> Vec<RawQuote> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(i as i64 * 86_400_000, p).into())
            .collect()
    }

    const TEN: [f64; 10] = [100.0, 102.0, 101.0, 105.0, 103.0, 107.0, 106.0, 110.0, 108.0, 112.0];

    // ---- construction ----------------------------------------------------

    #[test]
    fn visible_split_matches_half_plus_one() {
        assert_eq!(visible_len(0), 0);
        assert_eq!(visible_len(1), 1);
        assert_eq!(visible_len(2), 2);
        assert_eq!(visible_len(9), 5);
        assert_eq!(visible_len(10), 6);
    }

    #[test]
    fn missing_and_non_finite_closes_are_dropped() {
        let mut q = quotes(&TEN);
        q.insert(3, RawQuote { time: 1, price: None });
        q.push(RawQuote { time: 2, price: Some(f64::NAN) });
        let round = Round::new("AAPL", q).unwrap();
        assert_eq!(round.history().len(), 10);
        assert_eq!(round.visible().len(), 6);
    }

    #[test]
    fn non_positive_closes_are_dropped() {
        let mut q = quotes(&TEN);
        q.insert(8, RawQuote { time: 3, price: Some(0.0) });
        q.insert(2, RawQuote { time: 4, price: Some(-5.0) });
        let mut round = Round::new("AAPL", q).unwrap();
        assert_eq!(round.history().len(), 10);
        assert!(round.history().iter().all(|p| p.price > 0.0));

        let (state, outcome) = round
            .submit_guess(GameState::new(), Guess::Up, ScoringAnchor::FinalMove)
            .unwrap();
        assert_eq!(outcome.points_delta, 38);
        assert_eq!(state.score(), 38);
    }

    #[test]
    fn empty_history_is_rejected() {
        let err = Round::new("AAPL", vec![RawQuote { time: 0, price: None }]).unwrap_err();
        assert_eq!(err, GameError::EmptyHistory);
    }

    #[test]
    fn analysis_covers_full_history() {
        let round = Round::new("MSFT", quotes(&TEN)).unwrap();
        let analysis = round.analysis().expect("ten points");
        assert_eq!(analysis.key_points.resistance, 112.0);
        assert!(Round::new("MSFT", quotes(&TEN[..9])).unwrap().analysis().is_none());
    }

    // ---- scoring ---------------------------------------------------------

    #[test]
    fn reveal_point_is_the_default_anchor() {
        assert_eq!(ScoringAnchor::default(), ScoringAnchor::RevealPoint);
    }

    #[test]
    fn final_move_anchor_uses_last_two_points() {
        let round = Round::new("AAPL", quotes(&TEN)).unwrap();
        assert_eq!(round.price_pair(ScoringAnchor::FinalMove), (108.0, 112.0));
        assert_eq!(round.price_pair(ScoringAnchor::RevealPoint), (107.0, 112.0));
    }

    #[test]
    fn single_point_compares_with_itself() {
        let round = Round::new("AAPL", quotes(&[42.0])).unwrap();
        assert_eq!(round.price_pair(ScoringAnchor::FinalMove), (42.0, 42.0));
        assert_eq!(round.price_pair(ScoringAnchor::RevealPoint), (42.0, 42.0));
    }

    #[test]
    fn guess_is_scored_exactly_once() {
        let mut round = Round::new("AAPL", quotes(&TEN)).unwrap();
        let (state, outcome) = round
            .submit_guess(GameState::new(), Guess::Up, ScoringAnchor::default())
            .unwrap();
        assert!(outcome.correct);
        // (112 - 107) / 107 = 4.6729% => ceil(46.73) = 47
        assert_eq!(outcome.points_delta, 47);
        assert_eq!(outcome.feedback_text, "Correct! +47 points (4.67% change)");
        assert_eq!(state.score(), 47);
        assert!(round.is_revealed());

        let again = round.submit_guess(state, Guess::Up, ScoringAnchor::default());
        assert_eq!(again.unwrap_err(), GameError::AlreadyRevealed);
    }

    // ---- views -----------------------------------------------------------

    #[test]
    fn view_hides_continuation_until_revealed() {
        let mut round = Round::new("NVDA", quotes(&TEN)).unwrap();
        let before = round.view();
        assert!(!before.revealed);
        assert_eq!(before.points.len(), 6);
        assert_eq!(before.macd.len(), 6);
        assert_eq!(before.bollinger.len(), 6);
        assert!(before.outcome.is_none());

        round
            .submit_guess(GameState::new(), Guess::Down, ScoringAnchor::FinalMove)
            .unwrap();
        let after = round.view();
        assert!(after.revealed);
        assert_eq!(after.points.len(), 10);
        assert_eq!(after.guess, Some(Guess::Down));
        assert!(!after.outcome.unwrap().correct);
    }

    fn without_id(view: &RoundView) -> serde_json::Value {
        let mut value = serde_json::to_value(view).unwrap();
        value.as_object_mut().unwrap().remove("id");
        value
    }

    #[test]
    fn pre_reveal_view_does_not_depend_on_hidden_points() {
        // Same 21 visible closes; the hidden tails end 108 -> 112 and 112 -> 108.
        let visible: Vec<f64> = (0..21).map(|i| 100.0 + (i % 4) as f64).collect();
        let mut rising = visible.clone();
        rising.extend((0..17).map(|i| 95.0 + i as f64 * 0.5));
        rising.extend([108.0, 112.0]);
        let mut falling = visible.clone();
        falling.extend((0..17).map(|i| 120.0 - i as f64 * 0.5));
        falling.extend([112.0, 108.0]);
        assert_eq!(visible_len(rising.len()), 21);
        assert_eq!(visible_len(falling.len()), 21);

        let up = Round::new("AAPL", quotes(&rising)).unwrap();
        let down = Round::new("AAPL", quotes(&falling)).unwrap();
        assert_eq!(up.price_pair(ScoringAnchor::FinalMove), (108.0, 112.0));
        assert_eq!(down.price_pair(ScoringAnchor::FinalMove), (112.0, 108.0));

        let (up_view, down_view) = (up.view(), down.view());
        assert_eq!(without_id(&up_view), without_id(&down_view));

        let analysis = up_view.analysis.expect("21 visible points");
        assert_eq!(analysis.key_points.resistance, 103.0);
        assert!(!analysis.reason.contains("112.00"));
        assert!(!analysis.reason.contains("108.00"));
    }

    #[test]
    fn revealed_view_carries_full_history_analysis() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let mut round = Round::new("META", quotes(&closes)).unwrap();
        assert_eq!(round.view().analysis.unwrap().key_points.resistance, 110.0);

        round
            .submit_guess(GameState::new(), Guess::Up, ScoringAnchor::default())
            .unwrap();
        let view = round.view();
        assert_eq!(view.analysis.as_ref(), round.analysis());
        assert_eq!(view.analysis.unwrap().key_points.resistance, 119.0);
    }
}
