//! Numbers chosen by players and the per-round choice set.
//!
//! ## Choice
//!
//! A number already validated to lie in `[CHOICE_MIN, CHOICE_MAX]`.
//! Range checks happen here, at submission time, never during resolution.
//!
//! ## Choices
//!
//! Number → players who picked it, in ascending number order. Players under
//! the same number keep their submission order.

use std::collections::BTreeMap;
use std::num::{IntErrorKind, ParseIntError};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{CHOICE_MAX, CHOICE_MIN};
use super::error::GameError;
use super::player::PlayerId;

/// A validated number in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Choice(u8);

impl Choice {
    /// The lowest possible choice.
    pub const ZERO: Choice = Choice(CHOICE_MIN);

    /// The highest possible choice.
    pub const HUNDRED: Choice = Choice(CHOICE_MAX);

    /// Validate a raw number.
    pub fn new(value: i64) -> Result<Self, GameError> {
        if (CHOICE_MIN as i64..=CHOICE_MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(GameError::OutOfRange(value))
        }
    }

    /// Parse player-entered text (surrounding whitespace is ignored).
    ///
    /// Non-numeric text is `InvalidInput`; numbers outside the range are
    /// `OutOfRange`. Integers too large for `i64` report `i64::MAX` (or
    /// `i64::MIN` when negative).
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let trimmed = input.trim();
        let value: i64 = trimmed.parse().map_err(|error: ParseIntError| match error.kind() {
            IntErrorKind::PosOverflow => GameError::OutOfRange(i64::MAX),
            IntErrorKind::NegOverflow => GameError::OutOfRange(i64::MIN),
            _ => GameError::InvalidInput(trimmed.to_string()),
        })?;
        Self::new(value)
    }

    /// Get the number.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Choice {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Choice> for i64 {
    fn from(choice: Choice) -> Self {
        choice.0 as i64
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Players who picked one number. Usually a single player.
pub type Choosers = SmallVec<[PlayerId; 2]>;

/// All numbers submitted in one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choices {
    by_number: BTreeMap<Choice, Choosers>,
    count: usize,
}

impl Choices {
    /// Create an empty choice set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a choice set from `(player, number)` pairs, validating each number.
    ///
    /// ```
    /// use king_of_diamonds::core::{Choices, PlayerId};
    ///
    /// let choices = Choices::from_pairs([(PlayerId::new(0), 30), (PlayerId::new(1), 30)]).unwrap();
    /// assert_eq!(choices.len(), 2);
    /// assert_eq!(choices.duplicated_numbers().count(), 1);
    /// ```
    pub fn from_pairs(pairs: impl IntoIterator<Item = (PlayerId, i64)>) -> Result<Self, GameError> {
        let mut choices = Self::new();
        for (player, value) in pairs {
            choices.submit(player, Choice::new(value)?)?;
        }
        Ok(choices)
    }

    /// Add one player's number. Each player may submit once per round.
    pub fn submit(&mut self, player: PlayerId, choice: Choice) -> Result<(), GameError> {
        if self.contains_player(player) {
            return Err(GameError::AlreadySubmitted(player));
        }
        self.by_number.entry(choice).or_default().push(player);
        self.count += 1;
        Ok(())
    }

    /// Number of submissions (one per player).
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether this player has already submitted.
    #[must_use]
    pub fn contains_player(&self, player: PlayerId) -> bool {
        self.by_number.values().any(|players| players.contains(&player))
    }

    /// The number a player submitted, if any.
    #[must_use]
    pub fn choice_of(&self, player: PlayerId) -> Option<Choice> {
        self.by_number
            .iter()
            .find(|(_, players)| players.contains(&player))
            .map(|(&choice, _)| choice)
    }

    /// Players who picked `choice` (empty if nobody did).
    #[must_use]
    pub fn players_for(&self, choice: Choice) -> &[PlayerId] {
        self.by_number.get(&choice).map(|p| p.as_slice()).unwrap_or(&[])
    }

    /// Iterate `(number, players)` in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = (Choice, &[PlayerId])> {
        self.by_number.iter().map(|(&choice, players)| (choice, players.as_slice()))
    }

    /// Every submitted player, grouped by ascending number.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.by_number.values().flat_map(|players| players.iter().copied())
    }

    /// Numbers picked by more than one player.
    pub fn duplicated_numbers(&self) -> impl Iterator<Item = (Choice, &[PlayerId])> {
        self.iter().filter(|(_, players)| players.len() > 1)
    }

    /// Sum of all submissions, one entry per player.
    #[must_use]
    pub fn sum(&self) -> i64 {
        self.by_number
            .iter()
            .map(|(choice, players)| choice.value() as i64 * players.len() as i64)
            .sum()
    }
}
