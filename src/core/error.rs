//! Errors surfaced by the engine.
//!
//! Every error here is recoverable by the caller: reject the single
//! offending input (or call) and carry on. None of them leave `GameState`
//! half-updated.
//!
//! Broken caller contracts during resolution (a choice set that does not
//! cover the alive roster) are not represented here; they panic.

use super::config::{CHOICE_MAX, CHOICE_MIN, MAX_PLAYERS, MIN_PLAYERS};
use super::player::PlayerId;

/// How an error should be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Bad input from a player or driver. Re-prompt or reject the input.
    Validation,

    /// Call made in the wrong phase of the game (e.g. adding players mid-game).
    Lifecycle,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Lifecycle => "lifecycle",
        }
    }
}

/// Errors returned by roster, choice, and session operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("roster is full: at most {max} players allowed", max = MAX_PLAYERS)]
    Capacity,

    #[error("player name '{0}' already exists")]
    DuplicateName(String),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("number {0} is out of range: must be between {min} and {max}", min = CHOICE_MIN, max = CHOICE_MAX)]
    OutOfRange(i64),

    #[error("invalid input '{0}': please enter a whole number")]
    InvalidInput(String),

    #[error("need at least {min} players to start, have {0}", min = MIN_PLAYERS)]
    NotEnoughPlayers(usize),

    #[error("game has already started")]
    AlreadyStarted,

    #[error("game has not started")]
    NotStarted,

    #[error("game is over")]
    GameOver,

    #[error("{0} is not an alive player in this game")]
    UnknownPlayer(PlayerId),

    #[error("{0} already submitted a number this round")]
    AlreadySubmitted(PlayerId),
}

impl GameError {
    /// Classify this error for handling.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Capacity
            | Self::DuplicateName(_)
            | Self::EmptyName
            | Self::OutOfRange(_)
            | Self::InvalidInput(_)
            | Self::UnknownPlayer(_)
            | Self::AlreadySubmitted(_) => ErrorSeverity::Validation,
            Self::NotEnoughPlayers(_) | Self::AlreadyStarted | Self::NotStarted | Self::GameOver => {
                ErrorSeverity::Lifecycle
            }
        }
    }
}
