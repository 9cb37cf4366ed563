//! Special rules and when they switch on.
//!
//! The base rule is always in force. Each special rule activates once the
//! cumulative number of eliminated players reaches its threshold, and stays
//! active for the rest of the game (eliminations never go down).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::config::{
    DUPLICATE_RULE_THRESHOLD, EXACT_MATCH_RULE_THRESHOLD, OVERRIDE_RULE_THRESHOLD,
};

/// Lines describing the base rule, always in force.
pub const BASE_RULE_TEXT: &[&str] = &[
    "Choose a number between 0 and 100",
    "Average of all numbers x 0.8 = target",
    "Closest to target wins, others lose 1 point",
    "Reach 0 points = GAME OVER (eliminated)",
    "Last player standing = GAME CLEAR",
];

/// A rule layered on top of the base rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Numbers picked by several players cannot win, and cost their choosers a point.
    DuplicateInvalidation,
    /// Hitting the target exactly makes everyone else lose 2 points.
    ExactMatchBonus,
    /// One player on 0 and one on 100: the 100 wins outright.
    ZeroHundredOverride,
}

/// Rules active at some elimination count. Never more than three.
pub type ActiveRules = SmallVec<[Rule; 3]>;

impl Rule {
    /// Every special rule, in activation order.
    pub const ALL: [Rule; 3] = [
        Rule::DuplicateInvalidation,
        Rule::ExactMatchBonus,
        Rule::ZeroHundredOverride,
    ];

    /// Eliminations needed before this rule applies.
    #[must_use]
    pub const fn threshold(self) -> usize {
        match self {
            Rule::DuplicateInvalidation => DUPLICATE_RULE_THRESHOLD,
            Rule::ExactMatchBonus => EXACT_MATCH_RULE_THRESHOLD,
            Rule::ZeroHundredOverride => OVERRIDE_RULE_THRESHOLD,
        }
    }

    /// Whether this rule applies once `eliminated_count` players are out.
    #[must_use]
    pub const fn is_active(self, eliminated_count: usize) -> bool {
        eliminated_count >= self.threshold()
    }

    /// Short heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Rule::DuplicateInvalidation => "RULE 1 (1+ eliminated)",
            Rule::ExactMatchBonus => "RULE 2 (2+ eliminated)",
            Rule::ZeroHundredOverride => "RULE 3 (3+ eliminated)",
        }
    }

    /// Player-facing description, one line per bullet.
    #[must_use]
    pub const fn description(self) -> &'static [&'static str] {
        match self {
            Rule::DuplicateInvalidation => &[
                "Duplicate numbers are INVALID",
                "Players with duplicate numbers lose 1 point",
            ],
            Rule::ExactMatchBonus => &["Exact correct guess makes others lose 2 points instead of 1"],
            Rule::ZeroHundredOverride => &["If one player chooses 0, another can win by choosing 100"],
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Rules in force once `eliminated_count` players are out, in activation order.
#[must_use]
pub fn active_rules(eliminated_count: usize) -> ActiveRules {
    Rule::ALL
        .into_iter()
        .filter(|rule| rule.is_active(eliminated_count))
        .collect()
}
