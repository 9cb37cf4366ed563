//! Driving a game: where numbers come from and where results go.
//!
//! - `ChoiceProvider`: supplies each alive player's number (scripted, simulated, or human)
//! - `RoundObserver`: receives a `RoundReport` after every round
//! - `GameSession`: the loop tying them to a `GameState`
//!
//! None of this affects scoring; it only feeds `GameState::play_round`.

mod provider;
mod observer;
mod session;

pub use provider::{ChoiceProvider, RandomProvider, RoundView, ScriptedProvider};
pub use observer::{RoundObserver, RoundReport, TracingObserver};
pub use session::{GameSession, SessionResult};
