/// Typefall: type the falling words before they hit the ground
pub mod engine;
pub mod game;
pub mod renderer;
pub mod words;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use engine::{MatchEngine, RoundConfig, RoundSummary, TickResult, TypeResult, Word, WordId};
pub use game::{MatchSummary, Mode, Outcome, Screen, Settings, TypefallGame};
pub use renderer::TypefallRenderer;
pub use words::Vocabulary;

/// Seat in a hot-seat match. Single player always plays as `One`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}
