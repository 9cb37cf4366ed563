//! Round scoring for King of Diamonds.
//!
//! - `Rule`: the special rules and the elimination counts that switch them on
//! - `RoundResolver`: turns one round of choices into a `RoundOutcome`
//! - `TieBreaker`: picks the declared winner among equally close players
//!
//! Resolution is pure. `GameState` owns the mutation.

mod rule;
mod outcome;
mod resolver;

pub use rule::{active_rules, ActiveRules, Rule, BASE_RULE_TEXT};
pub use outcome::{Resolution, RoundOutcome};
pub use resolver::{RoundResolver, TieBreaker};
