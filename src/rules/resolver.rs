//! Round resolution: target, winner, and penalties.
//!
//! `RoundResolver` is a pure function of the submitted choices, the
//! number of players eliminated so far, and a tie-breaker. It never touches
//! `GameState`; the caller applies the returned `RoundOutcome`.
//!
//! ## Rule order
//!
//! 1. Target = 0.8 × mean of every submitted number (always computed).
//! 2. 0 vs 100 override (3+ eliminated). Short-circuits everything below.
//! 3. Duplicate invalidation (1+ eliminated).
//! 4. Closest valid number wins; ties broken by the `TieBreaker`.
//! 5. Exact-match bonus (2+ eliminated) raises the loser penalty to 2.
//!
//! ## Exact distances
//!
//! `|k − 4·Σ/(5·n)|` is compared as the integer `|5·n·k − 4·Σ|`, so
//! equidistant numbers tie exactly and an exact match is exactly zero.

use smallvec::SmallVec;
use tracing::debug;

use crate::core::config::{BASE_PENALTY, EXACT_MATCH_PENALTY, TARGET_FACTOR, TARGET_FACTOR_FRACTION};
use crate::core::{Choice, Choices, GameRng, PlayerId};

use super::outcome::{Resolution, RoundOutcome};
use super::rule::Rule;

/// Picks the declared winner among several equally close players.
pub trait TieBreaker {
    /// Return an index into `candidates`.
    ///
    /// Called only with two or more candidates, ordered by ascending
    /// number and then by submission order.
    fn pick(&mut self, candidates: &[PlayerId]) -> usize;
}

impl TieBreaker for GameRng {
    fn pick(&mut self, candidates: &[PlayerId]) -> usize {
        self.gen_index(candidates.len())
    }
}

/// Resolves a round of submitted numbers into a `RoundOutcome`.
pub struct RoundResolver;

impl RoundResolver {
    /// 0.8 × the mean of all submissions, or 0.0 with no submissions.
    #[must_use]
    pub fn target(choices: &Choices) -> f64 {
        if choices.is_empty() {
            return 0.0;
        }
        let average = choices.sum() as f64 / choices.len() as f64;
        average * TARGET_FACTOR
    }

    /// Resolve one round.
    ///
    /// `choices` must hold exactly one number per alive player; the
    /// resolver cannot check that and trusts the caller.
    pub fn resolve<T: TieBreaker + ?Sized>(
        choices: &Choices,
        eliminated_count: usize,
        tie_breaker: &mut T,
    ) -> RoundOutcome {
        let target = Self::target(choices);

        if Rule::ZeroHundredOverride.is_active(eliminated_count) {
            if let Some(winner) = Self::zero_hundred_winner(choices) {
                debug!(target: "rules::resolver", %winner, "0 vs 100 override fired");
                return RoundOutcome {
                    target,
                    resolution: Resolution::Override,
                    winner: Some(winner),
                    tied_candidates: SmallVec::from_elem(winner, 1),
                    exact_match: false,
                    penalty: BASE_PENALTY,
                    invalidated_numbers: SmallVec::new(),
                    duplicate_penalized: SmallVec::new(),
                };
            }
        }

        let invalidate_duplicates = Rule::DuplicateInvalidation.is_active(eliminated_count);
        let mut invalidated_numbers: SmallVec<[Choice; 2]> = SmallVec::new();
        let mut duplicate_penalized: SmallVec<[PlayerId; 4]> = SmallVec::new();

        let mut best_distance: Option<i64> = None;
        let mut tied_candidates: SmallVec<[PlayerId; 2]> = SmallVec::new();

        for (choice, players) in choices.iter() {
            if invalidate_duplicates && players.len() > 1 {
                debug!(target: "rules::resolver", number = choice.value(), count = players.len(), "duplicate number invalidated");
                invalidated_numbers.push(choice);
                duplicate_penalized.extend(players.iter().copied());
                continue;
            }

            let distance = Self::scaled_distance(choice, choices);
            match best_distance {
                Some(best) if distance > best => {}
                Some(best) if distance == best => tied_candidates.extend(players.iter().copied()),
                _ => {
                    best_distance = Some(distance);
                    tied_candidates.clear();
                    tied_candidates.extend(players.iter().copied());
                }
            }
        }

        if tied_candidates.is_empty() {
            debug!(target: "rules::resolver", "no valid numbers this round");
            return RoundOutcome {
                target,
                resolution: Resolution::NoValidChoice,
                winner: None,
                tied_candidates,
                exact_match: false,
                penalty: 0,
                invalidated_numbers,
                duplicate_penalized,
            };
        }

        let winner = if tied_candidates.len() == 1 {
            tied_candidates[0]
        } else {
            let index = tie_breaker.pick(&tied_candidates).min(tied_candidates.len() - 1);
            debug!(target: "rules::resolver", candidates = tied_candidates.len(), index, "tie broken");
            tied_candidates[index]
        };

        let exact_match = best_distance == Some(0);
        let penalty = if exact_match && Rule::ExactMatchBonus.is_active(eliminated_count) {
            EXACT_MATCH_PENALTY
        } else {
            BASE_PENALTY
        };

        RoundOutcome {
            target,
            resolution: Resolution::Closest,
            winner: Some(winner),
            tied_candidates,
            exact_match,
            penalty,
            invalidated_numbers,
            duplicate_penalized,
        }
    }

    /// The 100-chooser, if exactly one player chose 0 and exactly one chose 100.
    fn zero_hundred_winner(choices: &Choices) -> Option<PlayerId> {
        match (choices.players_for(Choice::ZERO), choices.players_for(Choice::HUNDRED)) {
            ([_], [hundred]) => Some(*hundred),
            _ => None,
        }
    }

    /// Distance to the target scaled by `5·n` so it is an exact integer.
    fn scaled_distance(choice: Choice, choices: &Choices) -> i64 {
        let (numerator, denominator) = TARGET_FACTOR_FRACTION;
        let n = choices.len() as i64;
        (denominator * n * choice.value() as i64 - numerator * choices.sum()).abs()
    }
}
