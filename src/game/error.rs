use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Price history has no usable points")]
    EmptyHistory,

    #[error("A round is already waiting for a guess")]
    RoundInProgress,

    #[error("No round is waiting for a guess")]
    NoActiveRound,

    #[error("This round has already been revealed")]
    AlreadyRevealed,

    #[error("This round has not been revealed yet")]
    NotRevealed,
}

pub type Result<T> = std::result::Result<T, GameError>;
