// =============================================================================
// Session: a player's running score and their current round
// =============================================================================

use serde::Serialize;
use tracing::info;

use super::error::{GameError, Result};
use super::round::{RawQuote, Round, RoundView, ScoringAnchor};
use super::scoring::{GameState, PredictionOutcome};
use crate::types::Guess;

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    state: GameState,
    round: Option<Round>,
    feedback: Option<String>,
    rounds_played: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Serializable session summary.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub score: i64,
    pub streak: u32,
    pub rounds_played: u64,
    pub feedback: Option<String>,
    pub round: Option<RoundView>,
    pub created_at: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: GameState::new(),
            round: None,
            feedback: None,
            rounds_played: 0,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Start a new round. A revealed round is replaced implicitly; a round
    /// still waiting for its guess is not.
    pub fn start_round(&mut self, symbol: &str, quotes: Vec<RawQuote>) -> Result<&Round> {
        if matches!(&self.round, Some(r) if !r.is_revealed()) {
            return Err(GameError::RoundInProgress);
        }
        let round = Round::new(symbol, quotes)?;
        Ok(self.round.insert(round))
    }

    /// Score `guess` on the current round and fold the result into the
    /// session's state.
    pub fn submit_guess(&mut self, guess: Guess, anchor: ScoringAnchor) -> Result<PredictionOutcome> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let (next, outcome) = round.submit_guess(self.state, guess, anchor)?;

        self.state = next;
        self.rounds_played += 1;
        self.feedback = Some(outcome.feedback_text.clone());
        Ok(outcome)
    }

    /// Close a revealed round so the next one can be requested.
    pub fn acknowledge(&mut self) -> Result<()> {
        match &self.round {
            None => Err(GameError::NoActiveRound),
            Some(r) if !r.is_revealed() => Err(GameError::NotRevealed),
            Some(_) => {
                self.round = None;
                info!(session_id = %self.id, "round acknowledged");
                Ok(())
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            score: self.state.score(),
            streak: self.state.streak(),
            rounds_played: self.rounds_played,
            feedback: self.feedback.clone(),
            round: self.round.as_ref().map(Round::view),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;

    fn quotes(prices: &[f64]) -> Vec<RawQuote> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(i as i64, p).into())
            .collect()
    }

    fn rising() -> Vec<RawQuote> {
        quotes(&[10.0, 10.5, 11.0, 11.5])
    }

    #[test]
    fn full_round_lifecycle() {
        let mut s = Session::new();
        s.start_round("AAPL", rising()).unwrap();

        let outcome = s.submit_guess(Guess::Up, ScoringAnchor::default()).unwrap();
        assert!(outcome.correct);
        assert_eq!(s.state().streak(), 1);
        assert_eq!(s.state().score(), outcome.points_delta);

        s.acknowledge().unwrap();
        assert!(s.round().is_none());

        let snap = s.snapshot();
        assert_eq!(snap.rounds_played, 1);
        assert_eq!(snap.feedback.as_deref(), Some(outcome.feedback_text.as_str()));
    }

    #[test]
    fn cannot_start_over_a_pending_round() {
        let mut s = Session::new();
        s.start_round("AAPL", rising()).unwrap();
        assert_eq!(
            s.start_round("MSFT", rising()).unwrap_err(),
            GameError::RoundInProgress
        );
    }

    #[test]
    fn revealed_round_is_replaced_by_next_start() {
        let mut s = Session::new();
        s.start_round("AAPL", rising()).unwrap();
        s.submit_guess(Guess::Down, ScoringAnchor::default()).unwrap();
        let next = s.start_round("TSLA", rising()).unwrap();
        assert_eq!(next.symbol, "TSLA");
        assert!(!next.is_revealed());
    }

    #[test]
    fn guess_without_round_fails() {
        let mut s = Session::new();
        assert_eq!(
            s.submit_guess(Guess::Up, ScoringAnchor::default()).unwrap_err(),
            GameError::NoActiveRound
        );
    }

    #[test]
    fn second_guess_does_not_rescore() {
        let mut s = Session::new();
        s.start_round("AAPL", rising()).unwrap();
        s.submit_guess(Guess::Up, ScoringAnchor::default()).unwrap();
        let score = s.state().score();
        assert_eq!(
            s.submit_guess(Guess::Up, ScoringAnchor::default()).unwrap_err(),
            GameError::AlreadyRevealed
        );
        assert_eq!(s.state().score(), score);
        assert_eq!(s.snapshot().rounds_played, 1);
    }

    #[test]
    fn acknowledge_requires_reveal() {
        let mut s = Session::new();
        assert_eq!(s.acknowledge().unwrap_err(), GameError::NoActiveRound);
        s.start_round("AAPL", rising()).unwrap();
        assert_eq!(s.acknowledge().unwrap_err(), GameError::NotRevealed);
    }

    #[test]
    fn wrong_guess_resets_streak_across_rounds() {
        let mut s = Session::new();
        for guess in [Guess::Up, Guess::Up, Guess::Down] {
            s.start_round("AAPL", rising()).unwrap();
            s.submit_guess(guess, ScoringAnchor::default()).unwrap();
        }
        assert_eq!(s.state().streak(), 0);
        // 11.0 -> 11.5 is +4.545% => 46 points, twice won and once lost.
        assert_eq!(s.state().score(), 46);
    }
}
