// =============================================================================
// Game Module
// =============================================================================
//
// The prediction game: scoring transition, round lifecycle and per-player
// sessions. Score and streak only ever change through
// `scoring::resolve_prediction`.

pub mod error;
pub mod round;
pub mod scoring;
pub mod session;

pub use error::GameError;
pub use round::{RawQuote, Round, RoundView, ScoringAnchor};
pub use scoring::{resolve_prediction, GameState, PredictionOutcome};
pub use session::{Session, SessionSnapshot};
