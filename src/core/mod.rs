//! Core engine types: players, choices, RNG, constants, errors, and state.
//!
//! Nothing here knows how a round is scored; that lives in `rules`.
//! `GameState` calls into `rules::RoundResolver` and applies its outcome.

pub mod player;
pub mod choice;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use player::{Player, PlayerId};
pub use choice::{Choice, Choices, Choosers};
pub use rng::{GameRng, GameRngState};
pub use config::SessionConfig;
pub use error::{ErrorSeverity, GameError};
pub use state::{GameSnapshot, GameState, Phase, RoundRecord};
