/// Typing-match and scoring rules for a single round
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Player;

pub const DEFAULT_HEALTH: i32 = 5;
pub const DEFAULT_FALL_SPEED: f64 = 0.5;
pub const DEFAULT_SPEED_STEP: f64 = 0.05;
/// Height of the play area in virtual units. The renderer maps it onto rows.
pub const DEFAULT_PLAY_HEIGHT: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(u64);

/// A falling word. Only the untyped tail of the text is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    id: WordId,
    remaining: String,
    x: u16,
    y: f64,
}

impl Word {
    pub fn id(&self) -> WordId {
        self.id
    }

    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// Horizontal slot, in play-area columns
    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn render_width(text: &str) -> u16 {
        u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
    }
}

/// Game balance knobs for one round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    pub health: i32,
    pub fall_speed: f64,
    pub speed_step: f64,
    pub play_height: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            health: DEFAULT_HEALTH,
            fall_speed: DEFAULT_FALL_SPEED,
            speed_step: DEFAULT_SPEED_STEP,
            play_height: DEFAULT_PLAY_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Active,
    Ended,
}

/// Everything that belongs to one player's round. Dropped when the round ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    words: Vec<Word>,
    focused: Option<WordId>,
    score: u32,
    health: i32,
    fall_speed: f64,
    correct_keystrokes: u32,
    total_keystrokes: u32,
}

impl RoundState {
    fn new(config: &RoundConfig) -> Self {
        Self {
            words: Vec::new(),
            focused: None,
            score: 0,
            health: config.health,
            fall_speed: config.fall_speed,
            correct_keystrokes: 0,
            total_keystrokes: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub missed: Vec<WordId>,
    pub health: i32,
    pub status: RoundStatus,
}

impl TickResult {
    pub fn round_ended(&self) -> bool {
        self.status == RoundStatus::Ended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeResult {
    /// A letter was taken off the focused word and more remain
    LetterConsumed(WordId),
    /// The last letter was typed; the word is gone and scored
    WordCompleted(WordId),
    /// A word is focused but the key was not its next letter
    Mismatch,
    /// Nothing focused and no word starts with the key
    NoMatch,
    /// The round is over; the key was not counted
    RoundOver,
}

/// Final numbers of a finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub player: Player,
    pub score: u32,
    pub accuracy: f64,
    pub correct_keystrokes: u32,
    pub total_keystrokes: u32,
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: RoundConfig,
    state: RoundState,
    next_id: u64,
}

impl MatchEngine {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            state: RoundState::new(&config),
            config,
            next_id: 0,
        }
    }

    /// Adds a word at the top of the play area, in a random slot that keeps
    /// the whole word inside `boundary_width` columns.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        text: impl Into<String>,
        boundary_width: u16,
        rng: &mut R,
    ) -> &Word {
        let text = text.into();
        let max_x = boundary_width.saturating_sub(Word::render_width(&text));
        let x = rng.random_range(0..=max_x);
        self.spawn_at(text, x)
    }

    pub fn spawn_at(&mut self, text: impl Into<String>, x: u16) -> &Word {
        let remaining = text.into();
        debug_assert!(!remaining.is_empty(), "spawned words must not be empty");

        let id = WordId(self.next_id);
        self.next_id += 1;
        self.state.words.push(Word { id, remaining, x, y: 0.0 });
        &self.state.words[self.state.words.len() - 1]
    }

    /// Moves every word down by `delta_fall` and removes the ones that fell
    /// past the bottom, one health point each.
    pub fn tick(&mut self, delta_fall: f64) -> TickResult {
        if self.status() == RoundStatus::Ended {
            return self.tick_result(Vec::new());
        }

        // f64::max also maps NaN to zero
        let delta = delta_fall.max(0.0);
        let height = self.config.play_height;
        let mut missed = Vec::new();

        self.state.words.retain_mut(|word| {
            word.y += delta;
            if word.y > height {
                missed.push(word.id);
                false
            } else {
                true
            }
        });

        if self.state.focused.is_some_and(|id| missed.contains(&id)) {
            self.state.focused = None;
        }
        self.state.health -= i32::try_from(missed.len()).unwrap_or(i32::MAX);

        self.tick_result(missed)
    }

    /// Resolves one keystroke against the focused word, or picks the oldest
    /// word starting with `ch` when nothing is focused.
    pub fn type_char(&mut self, ch: char) -> TypeResult {
        if self.status() == RoundStatus::Ended {
            return TypeResult::RoundOver;
        }

        self.state.total_keystrokes += 1;

        let index = match self.focused_index() {
            Some(index) if self.state.words[index].remaining.starts_with(ch) => index,
            Some(_) => return TypeResult::Mismatch,
            None => match self.state.words.iter().position(|w| w.remaining.starts_with(ch)) {
                Some(index) => index,
                None => return TypeResult::NoMatch,
            },
        };

        self.consume_first(index)
    }

    fn consume_first(&mut self, index: usize) -> TypeResult {
        self.state.correct_keystrokes += 1;

        let word = &mut self.state.words[index];
        word.remaining.remove(0);
        let id = word.id;

        if word.remaining.is_empty() {
            self.state.words.remove(index);
            self.state.focused = None;
            self.state.score += 1;
            self.state.fall_speed += self.config.speed_step;
            TypeResult::WordCompleted(id)
        } else {
            self.state.focused = Some(id);
            TypeResult::LetterConsumed(id)
        }
    }

    fn focused_index(&self) -> Option<usize> {
        let id = self.state.focused?;
        self.state.words.iter().position(|w| w.id == id)
    }

    fn tick_result(&self, missed: Vec<WordId>) -> TickResult {
        TickResult {
            missed,
            health: self.state.health,
            status: self.status(),
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.state.total_keystrokes == 0 {
            return 0.0;
        }
        f64::from(self.state.correct_keystrokes) / f64::from(self.state.total_keystrokes) * 100.0
    }

    pub fn status(&self) -> RoundStatus {
        if self.state.health > 0 {
            RoundStatus::Active
        } else {
            RoundStatus::Ended
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.state.words
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.state.words.iter().find(|w| w.id == id)
    }

    pub fn focused(&self) -> Option<WordId> {
        self.state.focused
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn health(&self) -> i32 {
        self.state.health
    }

    pub fn fall_speed(&self) -> f64 {
        self.state.fall_speed
    }

    pub fn correct_keystrokes(&self) -> u32 {
        self.state.correct_keystrokes
    }

    pub fn total_keystrokes(&self) -> u32 {
        self.state.total_keystrokes
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn summary(&self, player: Player) -> RoundSummary {
        RoundSummary {
            player,
            score: self.state.score,
            accuracy: self.accuracy(),
            correct_keystrokes: self.state.correct_keystrokes,
            total_keystrokes: self.state.total_keystrokes,
        }
    }
}
