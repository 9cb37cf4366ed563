//! Sources of player numbers.
//!
//! A `ChoiceProvider` yields one validated number per alive player per
//! round. Providers that talk to humans re-prompt on bad input themselves;
//! the session never retries.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::config::OVERRIDE_RULE_THRESHOLD;
use crate::core::{Choice, GameError, GameRng, Player, PlayerId};
use crate::rules::ActiveRules;

/// What a provider may know about the round when choosing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundView {
    pub round_number: u32,
    pub eliminated_count: usize,
    /// Alive players in roster order.
    pub alive: Vec<PlayerId>,
    pub active_rules: ActiveRules,
}

impl RoundView {
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }
}

/// Supplies each alive player's number for a round.
pub trait ChoiceProvider {
    /// The number `player` picks this round.
    ///
    /// Errors are `InvalidInput` (not a number) or `OutOfRange`.
    fn choose(&mut self, player: &Player, view: &RoundView) -> Result<Choice, GameError>;
}

/// Plays back fixed numbers, per player name.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    scripts: FxHashMap<String, VecDeque<i64>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue numbers for a player, one per round.
    pub fn with_script(mut self, name: impl Into<String>, numbers: impl IntoIterator<Item = i64>) -> Self {
        self.scripts.entry(name.into()).or_default().extend(numbers);
        self
    }

    /// Numbers still queued for a player.
    #[must_use]
    pub fn remaining(&self, name: &str) -> usize {
        self.scripts.get(name).map_or(0, VecDeque::len)
    }
}

impl ChoiceProvider for ScriptedProvider {
    fn choose(&mut self, player: &Player, _view: &RoundView) -> Result<Choice, GameError> {
        let next = self
            .scripts
            .get_mut(&player.name)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| GameError::InvalidInput(format!("<no number scripted for {}>", player.name)))?;
        Choice::new(next)
    }
}

/// Simulated players.
///
/// Numbers are uniform in 20..=80. Once the override rule is in force and
/// more than two players remain, each player has a 10% chance of gambling on
/// 0 or 100 instead.
///
/// With `showcase` on, a two-player endgame under the override rule
/// alternates a staged override round (first alive player on 0, second on
/// 100) with a normal bonus round drawing from 30..=70.
#[derive(Clone, Debug)]
pub struct RandomProvider {
    rng: GameRng,
    showcase: bool,
    staged_rounds: Option<(u32, bool)>,
}

impl RandomProvider {
    /// Create a provider with its own RNG stream derived from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context("players"),
            showcase: false,
            staged_rounds: None,
        }
    }

    /// Stage the 0 vs 100 rule once two players are left.
    pub fn with_showcase(mut self, showcase: bool) -> Self {
        self.showcase = showcase;
        self
    }

    /// Whether this round is a staged override round. Decided once per round.
    fn is_staged(&mut self, round_number: u32) -> bool {
        match self.staged_rounds {
            Some((round, staged)) if round == round_number => staged,
            previous => {
                let staged = !matches!(previous, Some((round, true)) if round + 1 == round_number);
                self.staged_rounds = Some((round_number, staged));
                staged
            }
        }
    }
}

impl ChoiceProvider for RandomProvider {
    fn choose(&mut self, player: &Player, view: &RoundView) -> Result<Choice, GameError> {
        let override_live = view.eliminated_count >= OVERRIDE_RULE_THRESHOLD;

        let number = if self.showcase && override_live && view.alive_count() == 2 {
            if self.is_staged(view.round_number) {
                if view.alive.first() == Some(&player.id) { 0 } else { 100 }
            } else {
                self.rng.gen_range_inclusive(30..=70)
            }
        } else if override_live && view.alive_count() > 2 && self.rng.gen_bool(0.1) {
            self.rng.choose(&[0, 100]).copied().unwrap_or(100)
        } else {
            self.rng.gen_range_inclusive(20..=80)
        };

        Choice::new(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::active_rules;

    fn view(round_number: u32, eliminated_count: usize, alive: &[u8]) -> RoundView {
        RoundView {
            round_number,
            eliminated_count,
            alive: alive.iter().map(|&i| PlayerId::new(i)).collect(),
            active_rules: active_rules(eliminated_count),
        }
    }

    #[test]
    fn test_scripted_plays_back_in_order() {
        let alice = Player::new(PlayerId::new(0), "Alice");
        let mut provider = ScriptedProvider::new().with_script("Alice", [10, 20]);
        let v = view(1, 0, &[0, 1]);

        assert_eq!(provider.choose(&alice, &v).map(Choice::value), Ok(10));
        assert_eq!(provider.remaining("Alice"), 1);
        assert_eq!(provider.choose(&alice, &v).map(Choice::value), Ok(20));
        assert!(matches!(provider.choose(&alice, &v), Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_scripted_validates_range() {
        let bob = Player::new(PlayerId::new(1), "Bob");
        let mut provider = ScriptedProvider::new().with_script("Bob", [101]);

        assert_eq!(
            provider.choose(&bob, &view(1, 0, &[0, 1])),
            Err(GameError::OutOfRange(101))
        );
    }

    #[test]
    fn test_random_stays_in_demo_band() {
        let player = Player::new(PlayerId::new(0), "Sim");
        let mut provider = RandomProvider::new(1);
        let v = view(1, 0, &[0, 1, 2]);

        for _ in 0..200 {
            let n = provider.choose(&player, &v).unwrap().value();
            assert!((20..=80).contains(&n), "{n} outside 20..=80");
        }
    }

    #[test]
    fn test_random_is_reproducible() {
        let player = Player::new(PlayerId::new(0), "Sim");
        let v = view(1, 3, &[0, 1, 2, 3]);
        let mut a = RandomProvider::new(5);
        let mut b = RandomProvider::new(5);

        for _ in 0..50 {
            assert_eq!(a.choose(&player, &v), b.choose(&player, &v));
        }
    }

    #[test]
    fn test_random_gambles_on_extremes_under_override_rule() {
        let player = Player::new(PlayerId::new(0), "Sim");
        let mut provider = RandomProvider::new(11);
        let v = view(4, 3, &[0, 1, 2]);

        let extremes = (0..500)
            .map(|_| provider.choose(&player, &v).unwrap().value())
            .filter(|&n| n == 0 || n == 100)
            .count();

        assert!(extremes > 0);
        assert!(extremes < 150);
    }

    #[test]
    fn test_showcase_alternates_staged_and_bonus_rounds() {
        let first = Player::new(PlayerId::new(2), "First");
        let second = Player::new(PlayerId::new(4), "Second");
        let mut provider = RandomProvider::new(3).with_showcase(true);

        let staged = view(7, 3, &[2, 4]);
        assert_eq!(provider.choose(&first, &staged).unwrap().value(), 0);
        assert_eq!(provider.choose(&second, &staged).unwrap().value(), 100);

        let bonus = view(8, 3, &[2, 4]);
        for player in [&first, &second] {
            let n = provider.choose(player, &bonus).unwrap().value();
            assert!((30..=70).contains(&n));
        }

        let staged_again = view(9, 3, &[2, 4]);
        assert_eq!(provider.choose(&first, &staged_again).unwrap().value(), 0);
    }
}
