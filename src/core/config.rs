//! Game constants and session configuration.
//!
//! The rules of King of Diamonds are fixed: every game starts players at the
//! same point total, uses the same number range, and activates the same
//! special rules at the same elimination counts. Those live here as
//! constants.
//!
//! `SessionConfig` only covers how a session is *run* (RNG seed, optional
//! round limit), never the rules themselves.

use serde::{Deserialize, Serialize};

/// Points every player starts with.
pub const STARTING_POINTS: i32 = 10;

/// Maximum roster size.
pub const MAX_PLAYERS: usize = 10;

/// Minimum roster size required to start a game.
pub const MIN_PLAYERS: usize = 2;

/// Smallest number a player may choose.
pub const CHOICE_MIN: u8 = 0;

/// Largest number a player may choose.
pub const CHOICE_MAX: u8 = 100;

/// Target = mean of all choices × this factor.
pub const TARGET_FACTOR: f64 = 0.8;

/// `TARGET_FACTOR` as an exact fraction (numerator / denominator).
///
/// Distances are compared on integers scaled by this fraction so ties and
/// exact matches are decided without rounding error.
pub const TARGET_FACTOR_FRACTION: (i64, i64) = (4, 5);

/// Points lost by every non-winner in a normal round.
pub const BASE_PENALTY: i32 = 1;

/// Points lost by every non-winner after an exact match (once the bonus rule is active).
pub const EXACT_MATCH_PENALTY: i32 = 2;

/// Additional points lost for choosing a number someone else also chose.
pub const DUPLICATE_PENALTY: i32 = 1;

/// Eliminations needed before duplicate numbers are invalidated.
pub const DUPLICATE_RULE_THRESHOLD: usize = 1;

/// Eliminations needed before exact matches double the penalty.
pub const EXACT_MATCH_RULE_THRESHOLD: usize = 2;

/// Eliminations needed before the 0 vs 100 override applies.
pub const OVERRIDE_RULE_THRESHOLD: usize = 3;

/// How a game session is run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seed for tie-breaks and randomized providers.
    /// Same seed and same choices produce the same game.
    pub seed: u64,

    /// Stop after this many rounds even if the game is not over.
    /// `None` plays until a winner (or no one) remains.
    pub max_rounds: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_rounds: None,
        }
    }
}

impl SessionConfig {
    /// Create a session config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Limit the number of rounds played.
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }
}
