//! # king-of-diamonds
//!
//! Engine for the King of Diamonds elimination game: every alive player
//! picks a number from 0 to 100, the target is 0.8 times the average, and
//! whoever lands closest wins the round while everyone else loses points.
//! Extra rules switch on as players are eliminated.
//!
//! ## Modules
//!
//! - `core`: players, choices, RNG, constants, errors, game state
//! - `rules`: the rule catalogue and round resolution
//! - `play`: number providers, observers, and the session loop
//!
//! ## Example
//!
//! ```
//! use king_of_diamonds::core::{Choices, GameState, PlayerId};
//!
//! let mut game = GameState::new(7);
//! game.add_player("Alice").unwrap();
//! game.add_player("Bob").unwrap();
//! game.start().unwrap();
//!
//! let choices = Choices::from_pairs([(PlayerId::new(0), 30), (PlayerId::new(1), 50)]).unwrap();
//! let record = game.play_round(&choices).unwrap();
//!
//! assert_eq!(record.outcome.winner, Some(PlayerId::new(0)));
//! assert_eq!(game.players()[1].points, 9);
//! ```

pub mod core;
pub mod rules;
pub mod play;

pub use crate::core::{
    Choice, Choices, GameError, GameRng, GameState, Phase, Player, PlayerId, RoundRecord,
    SessionConfig,
};
pub use crate::rules::{Resolution, RoundOutcome, RoundResolver, Rule, TieBreaker};
pub use crate::play::{
    ChoiceProvider, GameSession, RandomProvider, RoundObserver, RoundReport, ScriptedProvider,
    SessionResult,
};
