//! Presentation hooks.
//!
//! Observers are told when a round starts and see it again once applied.
//! They cannot change the game; they only report it.

use tracing::info;

use crate::core::{Choices, GameState, Player, PlayerId};
use crate::rules::{Rule, RoundOutcome};

/// Everything presentation needs about one finished round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    pub round_number: u32,
    /// Eliminations before the round.
    pub eliminated_before: usize,
    pub choices: Choices,
    pub outcome: RoundOutcome,
    /// Every player after the round, in roster order.
    pub standings: Vec<Player>,
    /// Players knocked out by this round.
    pub eliminated: Vec<PlayerId>,
}

impl RoundReport {
    /// Name of a player in this report.
    #[must_use]
    pub fn name_of(&self, id: PlayerId) -> &str {
        self.standings
            .get(id.index())
            .map_or("?", |p| p.name.as_str())
    }

    /// Points lost by `id` this round.
    #[must_use]
    pub fn loss_of(&self, id: PlayerId) -> i32 {
        if self.choices.contains_player(id) {
            self.outcome.point_loss(id)
        } else {
            0
        }
    }
}

/// Receives game progress for display.
pub trait RoundObserver {
    /// The active rule set changed (also called before the first round).
    fn on_rules(&mut self, _rules: &[Rule], _eliminated_count: usize) {}

    /// A round is about to collect numbers.
    fn on_round_start(&mut self, _state: &GameState) {}

    /// A round was resolved and applied.
    fn on_round(&mut self, report: &RoundReport);

    /// The game finished.
    fn on_game_over(&mut self, _state: &GameState) {}
}

/// Reports through `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RoundObserver for TracingObserver {
    fn on_rules(&mut self, rules: &[Rule], eliminated_count: usize) {
        info!(target: "play", eliminated_count, rules = ?rules, "rules in force");
    }

    fn on_round(&mut self, report: &RoundReport) {
        let outcome = &report.outcome;
        info!(
            target: "play",
            round = report.round_number,
            target_number = format_args!("{:.2}", outcome.target),
            winner = outcome.winner.map(|id| report.name_of(id)),
            exact = outcome.exact_match,
            penalty = outcome.penalty,
            duplicates = outcome.duplicate_penalized.len(),
            eliminated = report.eliminated.len(),
            "round resolved"
        );
    }

    fn on_game_over(&mut self, state: &GameState) {
        match state.winner() {
            Some(winner) => info!(target: "play", name = %winner.name, rounds = state.history().len(), "game clear"),
            None => info!(target: "play", rounds = state.history().len(), "no winner"),
        }
    }
}
