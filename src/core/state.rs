//! Game state: roster, points, eliminations, and round history.
//!
//! ## Lifecycle
//!
//! - **Lobby**: players join (`add_player`). At most `MAX_PLAYERS`, unique names.
//! - **In progress**: after `start()`. A round is either `play_round` with a
//!   full `Choices`, or one `choose` per alive player then `play_submitted`.
//! - **Finished**: once at most one player is alive. No further mutation.
//!
//! `eliminated_count` drives which special rules are in force (see
//! `rules::Rule`) and is recomputed from the roster after every round.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::choice::{Choice, Choices};
use super::config::{MAX_PLAYERS, MIN_PLAYERS};
use super::error::GameError;
use super::player::{Player, PlayerId};
use super::rng::{GameRng, GameRngState};
use crate::rules::{RoundOutcome, RoundResolver};

/// Where the game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    InProgress,
    Finished,
}

/// One applied round, kept in `GameState::history`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round this record belongs to.
    pub round_number: u32,

    /// Eliminations before the round; decides which rules applied.
    pub eliminated_before: usize,

    /// Each alive player's number, in roster order.
    pub choices: Vec<(PlayerId, Choice)>,

    pub outcome: RoundOutcome,

    /// Players eliminated by this round, in roster order.
    pub eliminated: Vec<PlayerId>,
}

/// Serializable view of a game at one moment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round_number: u32,
    pub eliminated_count: usize,
    pub players: Vec<Player>,
    pub winner: Option<PlayerId>,
    pub rng: GameRngState,
}

/// Complete game state.
///
/// Cloning is cheap: the round history is a persistent `im::Vector`.
#[derive(Clone, Debug)]
pub struct GameState {
    players: Vec<Player>,
    name_index: FxHashMap<String, PlayerId>,
    phase: Phase,
    round_number: u32,
    eliminated_count: usize,
    winner: Option<PlayerId>,
    history: Vector<RoundRecord>,
    pending: Choices,

    /// Tie-break RNG.
    pub rng: GameRng,
}

impl GameState {
    /// Create an empty game in the lobby.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            players: Vec::new(),
            name_index: FxHashMap::default(),
            phase: Phase::Lobby,
            round_number: 1,
            eliminated_count: 0,
            winner: None,
            history: Vector::new(),
            pending: Choices::new(),
            rng: GameRng::new(seed).for_context("tie-break"),
        }
    }

    // === Roster ===

    /// Add a player with the starting point total.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        let name = name.into();
        if self.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::Capacity);
        }
        if self.name_index.contains_key(&name) {
            return Err(GameError::DuplicateName(name));
        }

        let id = PlayerId::new(self.players.len() as u8);
        info!(target: "core::state", %id, name = %name, "player joined");
        self.name_index.insert(name.clone(), id);
        self.players.push(Player::new(id, name));
        Ok(id)
    }

    /// Leave the lobby. Needs at least `MIN_PLAYERS` players.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers(self.players.len()));
        }
        self.phase = Phase::InProgress;
        info!(target: "core::state", players = self.players.len(), "game started");
        Ok(())
    }

    /// All players in join order, alive or not.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Look up a player by exact (case-sensitive) name.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.name_index.get(name).and_then(|&id| self.player(id))
    }

    /// Alive players in join order.
    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    #[must_use]
    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive_players().map(|p| p.id).collect()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    // === Progress ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current round (starts at 1).
    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Players eliminated so far.
    #[must_use]
    pub fn eliminated_count(&self) -> usize {
        self.eliminated_count
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Last player standing. `None` while playing, or if everyone fell together.
    #[must_use]
    pub fn winner(&self) -> Option<&Player> {
        self.winner.and_then(|id| self.player(id))
    }

    /// Every applied round, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    // === Rounds ===

    /// Record one alive player's number for the current round.
    ///
    /// Numbers collect until `play_submitted` resolves them.
    pub fn choose(&mut self, id: PlayerId, value: i64) -> Result<Choice, GameError> {
        self.ensure_in_progress()?;
        if self.pending.contains_player(id) {
            return Err(GameError::AlreadySubmitted(id));
        }
        let player = self
            .players
            .get_mut(id.index())
            .filter(|p| p.is_alive())
            .ok_or(GameError::UnknownPlayer(id))?;

        let choice = player.choose(value)?;
        self.pending.submit(id, choice)?;
        Ok(choice)
    }

    /// Numbers recorded with `choose` so far this round.
    #[must_use]
    pub fn submitted(&self) -> &Choices {
        &self.pending
    }

    /// Resolve the numbers recorded with `choose`.
    ///
    /// # Panics
    ///
    /// If some alive player has not chosen yet.
    pub fn play_submitted(&mut self) -> Result<RoundRecord, GameError> {
        let choices = std::mem::take(&mut self.pending);
        self.play_round(&choices)
    }

    /// Resolve `choices` with the game's tie-break RNG and apply the result.
    ///
    /// # Panics
    ///
    /// If `choices` does not hold exactly one number per alive player.
    pub fn play_round(&mut self, choices: &Choices) -> Result<RoundRecord, GameError> {
        self.ensure_in_progress()?;
        self.assert_covers_alive(choices);

        let outcome = RoundResolver::resolve(choices, self.eliminated_count, &mut self.rng);
        self.record_round(choices, &outcome)
    }

    /// Apply a round resolved elsewhere: deduct points, eliminate, advance.
    ///
    /// Every alive player except the winner loses `outcome.penalty`; every
    /// duplicate chooser additionally loses one point. `choices` are the
    /// numbers `outcome` was resolved from and go into the history as-is.
    /// Returns the players eliminated by this round.
    pub fn apply_outcome(
        &mut self,
        choices: &Choices,
        outcome: &RoundOutcome,
    ) -> Result<Vec<PlayerId>, GameError> {
        self.record_round(choices, outcome).map(|record| record.eliminated)
    }

    fn record_round(&mut self, submitted: &Choices, outcome: &RoundOutcome) -> Result<RoundRecord, GameError> {
        self.ensure_in_progress()?;

        let eliminated_before = self.eliminated_count;
        let mut choices = Vec::new();
        let mut eliminated = Vec::new();

        for player in self.players.iter_mut().filter(|p| p.is_alive()) {
            player.current_choice = submitted.choice_of(player.id);
            if let Some(choice) = player.current_choice {
                choices.push((player.id, choice));
            }
            let loss = outcome.point_loss(player.id);
            if loss > 0 && player.lose_points(loss) {
                info!(target: "core::state", name = %player.name, points = player.points, "player eliminated");
                eliminated.push(player.id);
            }
        }

        self.eliminated_count = self.players.iter().filter(|p| !p.is_alive()).count();

        let record = RoundRecord {
            round_number: self.round_number,
            eliminated_before,
            choices,
            outcome: outcome.clone(),
            eliminated,
        };
        self.history.push_back(record.clone());
        self.pending = Choices::new();
        self.round_number += 1;

        if self.alive_count() <= 1 {
            self.phase = Phase::Finished;
            self.winner = self.players.iter().find(|p| p.is_alive()).map(|p| p.id);
            match self.winner() {
                Some(winner) => info!(target: "core::state", name = %winner.name, "game clear"),
                None => info!(target: "core::state", "all players eliminated, no winner"),
            }
        }

        Ok(record)
    }

    /// Capture a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round_number: self.round_number,
            eliminated_count: self.eliminated_count,
            players: self.players.clone(),
            winner: self.winner,
            rng: self.rng.state(),
        }
    }

    /// Rebuild a game from a snapshot, tie-break RNG position included.
    ///
    /// Round history is not part of a snapshot and starts empty.
    #[must_use]
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        let name_index = snapshot.players.iter().map(|p| (p.name.clone(), p.id)).collect();
        Self {
            players: snapshot.players,
            name_index,
            phase: snapshot.phase,
            round_number: snapshot.round_number,
            eliminated_count: snapshot.eliminated_count,
            winner: snapshot.winner,
            history: Vector::new(),
            pending: Choices::new(),
            rng: GameRng::from_state(&snapshot.rng),
        }
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Lobby => Err(GameError::NotStarted),
            Phase::InProgress => Ok(()),
            Phase::Finished => Err(GameError::GameOver),
        }
    }

    fn assert_covers_alive(&self, choices: &Choices) {
        let alive = self.alive_ids();
        assert_eq!(
            choices.len(),
            alive.len(),
            "round {} needs one number per alive player",
            self.round_number
        );
        for id in alive {
            assert!(
                choices.contains_player(id),
                "round {}: no number submitted for {}",
                self.round_number,
                id
            );
        }
    }
}
