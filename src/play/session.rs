//! Round-by-round game driver.
//!
//! `GameSession` asks a `ChoiceProvider` for every alive player's number,
//! has `GameState` resolve and apply the round, then tells a
//! `RoundObserver`. A provider error aborts the round before anything is
//! mutated.

use tracing::warn;

use crate::core::{Choices, GameError, GameState, Player, SessionConfig};
use crate::rules::active_rules;

use super::observer::{RoundObserver, RoundReport};
use super::provider::{ChoiceProvider, RoundView};

/// How a `run` ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionResult {
    /// Last player standing, if any.
    pub winner: Option<Player>,
    pub rounds_played: u32,
    /// Stopped by `SessionConfig::max_rounds` rather than by the game ending.
    pub hit_round_limit: bool,
}

/// A game plus the settings it is run with.
pub struct GameSession {
    state: GameState,
    config: SessionConfig,
    announced_rules: Option<usize>,
}

impl GameSession {
    /// Wrap a started game.
    pub fn new(state: GameState, config: SessionConfig) -> Self {
        Self {
            state,
            config,
            announced_rules: None,
        }
    }

    /// Create and start a game with the given players.
    pub fn with_players<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        config: SessionConfig,
    ) -> Result<Self, GameError> {
        let mut state = GameState::new(config.seed);
        for name in names {
            state.add_player(name)?;
        }
        state.start()?;
        Ok(Self::new(state, config))
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// What providers see this round.
    #[must_use]
    pub fn round_view(&self) -> RoundView {
        RoundView {
            round_number: self.state.round_number(),
            eliminated_count: self.state.eliminated_count(),
            alive: self.state.alive_ids(),
            active_rules: active_rules(self.state.eliminated_count()),
        }
    }

    /// Play one round.
    pub fn play_round(
        &mut self,
        provider: &mut dyn ChoiceProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<RoundReport, GameError> {
        if self.state.is_game_over() {
            return Err(GameError::GameOver);
        }

        let view = self.round_view();
        observer.on_round_start(&self.state);
        if self.announced_rules != Some(view.active_rules.len()) {
            observer.on_rules(&view.active_rules, view.eliminated_count);
            self.announced_rules = Some(view.active_rules.len());
        }

        let mut choices = Choices::new();
        for player in self.state.alive_players() {
            let choice = provider.choose(player, &view).inspect_err(|error| {
                warn!(target: "play", name = %player.name, %error, severity = error.severity().as_str(), "provider returned no number");
            })?;
            choices.submit(player.id, choice)?;
        }

        let record = self.state.play_round(&choices)?;
        let report = RoundReport {
            round_number: record.round_number,
            eliminated_before: record.eliminated_before,
            choices,
            outcome: record.outcome,
            standings: self.state.players().to_vec(),
            eliminated: record.eliminated,
        };

        observer.on_round(&report);
        if self.state.is_game_over() {
            observer.on_game_over(&self.state);
        }
        Ok(report)
    }

    /// Play until the game ends or the round limit is reached.
    pub fn run(
        &mut self,
        provider: &mut dyn ChoiceProvider,
        observer: &mut dyn RoundObserver,
    ) -> Result<SessionResult, GameError> {
        let mut rounds_played = 0;
        let mut hit_round_limit = false;

        while !self.state.is_game_over() {
            if self.config.max_rounds.is_some_and(|limit| rounds_played >= limit) {
                hit_round_limit = true;
                break;
            }
            self.play_round(provider, observer)?;
            rounds_played += 1;
        }

        Ok(SessionResult {
            winner: self.state.winner().cloned(),
            rounds_played,
            hit_round_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;
    use crate::play::provider::ScriptedProvider;
    use crate::play::TracingObserver;
    use crate::rules::Rule;

    #[derive(Default)]
    struct Recorder {
        started: Vec<u32>,
        rules: Vec<Vec<Rule>>,
        rounds: Vec<RoundReport>,
        finished: bool,
    }

    impl RoundObserver for Recorder {
        fn on_round_start(&mut self, state: &GameState) {
            self.started.push(state.round_number());
        }

        fn on_rules(&mut self, rules: &[Rule], _eliminated_count: usize) {
            self.rules.push(rules.to_vec());
        }

        fn on_round(&mut self, report: &RoundReport) {
            self.rounds.push(report.clone());
        }

        fn on_game_over(&mut self, _state: &GameState) {
            self.finished = true;
        }
    }

    #[test]
    fn test_with_players_starts_game() {
        let session = GameSession::with_players(["A", "B"], SessionConfig::default()).unwrap();
        assert_eq!(session.state().phase(), Phase::InProgress);
        assert_eq!(session.config().seed, 42);

        let err = GameSession::with_players(["A"], SessionConfig::default()).err();
        assert_eq!(err, Some(GameError::NotEnoughPlayers(1)));
    }

    #[test]
    fn test_play_round_reports() {
        let mut session = GameSession::with_players(["A", "B"], SessionConfig::default()).unwrap();
        let mut provider = ScriptedProvider::new().with_script("A", [30]).with_script("B", [50]);
        let mut observer = Recorder::default();

        let report = session.play_round(&mut provider, &mut observer).unwrap();

        assert_eq!(report.round_number, 1);
        assert_eq!(report.name_of(report.outcome.winner.unwrap()), "A");
        assert_eq!(report.standings[1].points, 9);
        assert_eq!(report.loss_of(report.standings[1].id), 1);
        assert_eq!(observer.started, vec![1]);
        assert_eq!(observer.rules, vec![Vec::<Rule>::new()]);
        assert_eq!(observer.rounds.len(), 1);
        assert_eq!(session.state().round_number(), 2);
    }

    #[test]
    fn test_provider_error_leaves_state_untouched() {
        let mut session = GameSession::with_players(["A", "B"], SessionConfig::default()).unwrap();
        let mut provider = ScriptedProvider::new().with_script("A", [30]).with_script("B", [500]);

        let result = session.play_round(&mut provider, &mut TracingObserver);

        assert_eq!(result.err(), Some(GameError::OutOfRange(500)));
        assert_eq!(session.state().round_number(), 1);
        assert!(session.state().players().iter().all(|p| p.points == 10));
    }

    #[test]
    fn test_run_to_completion() {
        let config = SessionConfig::default();
        let mut session = GameSession::with_players(["A", "B"], config).unwrap();
        let mut provider = ScriptedProvider::new()
            .with_script("A", [30; 10])
            .with_script("B", [50; 10]);
        let mut observer = Recorder::default();

        let result = session.run(&mut provider, &mut observer).unwrap();

        assert_eq!(result.rounds_played, 10);
        assert!(!result.hit_round_limit);
        assert_eq!(result.winner.map(|p| p.name), Some("A".to_string()));
        assert!(observer.finished);
        assert_eq!(
            session.play_round(&mut provider, &mut observer).err(),
            Some(GameError::GameOver)
        );
    }

    #[test]
    fn test_run_respects_round_limit() {
        let config = SessionConfig::default().with_max_rounds(3);
        let mut session = GameSession::with_players(["A", "B"], config).unwrap();
        let mut provider = ScriptedProvider::new()
            .with_script("A", [30; 10])
            .with_script("B", [50; 10]);

        let result = session.run(&mut provider, &mut TracingObserver).unwrap();

        assert_eq!(result.rounds_played, 3);
        assert!(result.hit_round_limit);
        assert_eq!(result.winner, None);
        assert_eq!(provider.remaining("A"), 7);
    }
}
