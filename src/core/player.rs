//! Player identification and per-player game data.
//!
//! ## PlayerId
//!
//! Index into the roster, assigned in join order (0-based).
//!
//! ## Player
//!
//! Name, points, alive flag, and the number chosen in the current round.
//! A player is eliminated the moment their points reach zero or below;
//! elimination is one-way.

use serde::{Deserialize, Serialize};

use super::choice::Choice;
use super::config::STARTING_POINTS;
use super::error::GameError;

/// Player identifier, the player's position in the roster.
///
/// The first player to join is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw roster index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A contestant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Roster position.
    pub id: PlayerId,

    /// Display name, unique within a game (case-sensitive).
    pub name: String,

    /// Remaining points. May go negative; there is no floor.
    pub points: i32,

    /// False once points have dropped to zero or below.
    alive: bool,

    /// Number chosen this round. Overwritten every round.
    pub current_choice: Option<Choice>,
}

impl Player {
    /// Create a player with the starting point total.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            points: STARTING_POINTS,
            alive: true,
            current_choice: None,
        }
    }

    /// Whether the player is still in the game.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Record this round's number after validating its range.
    pub fn choose(&mut self, value: i64) -> Result<Choice, GameError> {
        let choice = Choice::new(value)?;
        self.current_choice = Some(choice);
        Ok(choice)
    }

    /// Deduct points, eliminating the player once they reach zero or below.
    ///
    /// Returns true if this call eliminated the player.
    pub fn lose_points(&mut self, points: i32) -> bool {
        self.points -= points;
        if self.alive && self.points <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.alive { "ALIVE" } else { "DEAD" };
        write!(f, "{}: {} points ({})", self.name, self.points, status)
    }
}
