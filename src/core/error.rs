//! Engine error type.
//!
//! Only two kinds of failure surface as errors: configuration problems at
//! construction, and commands issued out of sequence. Blocked or impossible
//! moves are ordinary [`MoveOutcome`](crate::rules::MoveOutcome)s.

use super::player::PlayerId;

/// Errors returned by the public engine API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LudoError {
    #[error("player count must be between 2 and 4, got {0}")]
    InvalidPlayerCount(usize),
    #[error("dice already rolled this turn ({0})")]
    AlreadyRolled(u8),
    #[error("dice value must be between 1 and 6, got {0}")]
    InvalidDice(u8),
    #[error("dice has not been rolled yet")]
    NotRolled,
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("token index {0} out of range")]
    InvalidToken(usize),
    #[error("{player}'s token {token} has already finished")]
    TokenFinished { player: PlayerId, token: usize },
    #[error("game is over")]
    GameOver,
    #[error("game was not configured for simulation")]
    NotSimulationMode,
    #[error("simulation worker `{0}` panicked")]
    WorkerPanicked(String),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, LudoError>;
