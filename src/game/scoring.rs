// =============================================================================
// Prediction Scoring: the only transition that touches score and streak
// =============================================================================
//
//   pct     = (after - before) / before * 100
//   points  = ceil(|pct| * 10)
//   correct = (Up && after > before) || (Down && after < before)
//
//   correct   => score += points, streak += 1
//   incorrect => score -= points, streak  = 0
//
// An unchanged price is wrong for both guesses.

use serde::{Deserialize, Serialize};

use crate::types::Guess;

/// Score and streak for one player. Fields are only changed by
/// [`resolve_prediction`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    score: i64,
    streak: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}

/// Result of one resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub correct: bool,
    pub points_delta: i64,
    pub percentage_change: f64,
    pub feedback_text: String,
}

/// Score a guess against the revealed move and return the next state.
///
/// Pure: the input state is taken by value and nothing else is retained, so
/// calling this twice for the same round double-counts. Callers fire it once
/// per round.
pub fn resolve_prediction(
    state: GameState,
    guess: Guess,
    price_before: f64,
    price_after: f64,
) -> (GameState, PredictionOutcome) {
    let percentage_change = (price_after - price_before) / price_before * 100.0;
    let points = (percentage_change.abs() * 10.0).ceil() as i64;

    let correct = match guess {
        Guess::Up => price_after > price_before,
        Guess::Down => price_after < price_before,
    };

    let (next, points_delta, feedback_text) = if correct {
        (
            GameState {
                score: state.score.saturating_add(points),
                streak: state.streak.saturating_add(1),
            },
            points,
            format!("Correct! +{} points ({:.2}% change)", points, percentage_change),
        )
    } else {
        (
            GameState {
                score: state.score.saturating_sub(points),
                streak: 0,
            },
            -points,
            format!("Wrong! -{} points ({:.2}% change)", points, percentage_change),
        )
    };

    (
        next,
        PredictionOutcome {
            correct,
            points_delta,
            percentage_change,
            feedback_text,
        },
    )
}
