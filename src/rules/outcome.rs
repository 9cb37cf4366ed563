//! Result of resolving one round.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::config::DUPLICATE_PENALTY;
use crate::core::{Choice, PlayerId};

/// How the round's winner was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// The 0 vs 100 override fired; distances were never compared.
    Override,
    /// The closest valid number won.
    Closest,
    /// Every number was invalidated as a duplicate. Nobody won.
    NoValidChoice,
}

/// Outcome of one round, ready to be applied to `GameState`.
///
/// Point loss per player is the sum of two independent parts:
/// - `penalty`, for every alive player except `winner` (only when there is a winner)
/// - `DUPLICATE_PENALTY`, for every player in `duplicate_penalized`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// 0.8 × mean of all submitted numbers.
    pub target: f64,

    pub resolution: Resolution,

    /// The single declared winner, exempt from `penalty`.
    pub winner: Option<PlayerId>,

    /// Everyone at the minimum distance, ascending by number.
    /// Only `winner` among them skips the penalty.
    pub tied_candidates: SmallVec<[PlayerId; 2]>,

    /// The winning number sits exactly on the target.
    pub exact_match: bool,

    /// Points lost by every non-winner. Zero when there is no winner.
    pub penalty: i32,

    /// Numbers removed from contention for being picked more than once.
    pub invalidated_numbers: SmallVec<[Choice; 2]>,

    /// Players who picked an invalidated number.
    pub duplicate_penalized: SmallVec<[PlayerId; 4]>,
}

impl RoundOutcome {
    /// Points `player` loses this round, assuming they were alive.
    #[must_use]
    pub fn point_loss(&self, player: PlayerId) -> i32 {
        let base = match self.winner {
            Some(winner) if winner != player => self.penalty,
            _ => 0,
        };
        let duplicate = if self.duplicate_penalized.contains(&player) {
            DUPLICATE_PENALTY
        } else {
            0
        };
        base + duplicate
    }

    /// Whether `player` was among the closest but not the declared winner.
    #[must_use]
    pub fn is_unlucky_tie(&self, player: PlayerId) -> bool {
        self.winner != Some(player) && self.tied_candidates.contains(&player)
    }
}
