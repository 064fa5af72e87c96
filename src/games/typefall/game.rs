/// Screens, turns and timers around the match engine
use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::engine::{MatchEngine, RoundConfig, RoundSummary, TypeResult};
use super::renderer::TypefallRenderer;
use super::words::Vocabulary;
use super::Player;
use crate::core::game::{Flow, Game};
use crate::core::menu::{Menu, MenuAction};

pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(50);
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Single,
    Versus,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub round: RoundConfig,
    pub tick_rate: Duration,
    pub spawn_interval: Duration,
    pub vocabulary: Vocabulary,
    /// Skip the main menu and start this mode right away
    pub start_mode: Option<Mode>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round: RoundConfig::default(),
            tick_rate: DEFAULT_TICK_RATE,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            vocabulary: Vocabulary::default(),
            start_mode: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Playing,
    Paused,
    TurnHandoff,
    GameOver,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Single,
    Versus,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseChoice {
    Resume,
    Restart,
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Player),
    Tie,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(player) => write!(f, "{player} Wins!"),
            Outcome::Tie => write!(f, "It's a Tie!"),
        }
    }
}

/// Result of a finished match, one entry per round played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub mode: Mode,
    pub rounds: Vec<RoundSummary>,
    pub outcome: Option<Outcome>,
}

impl MatchSummary {
    pub fn new(mode: Mode, rounds: Vec<RoundSummary>) -> Self {
        let outcome = match rounds.as_slice() {
            [first, second] => Some(match first.score.cmp(&second.score) {
                Ordering::Greater => Outcome::Winner(first.player),
                Ordering::Less => Outcome::Winner(second.player),
                Ordering::Equal => Outcome::Tie,
            }),
            _ => None,
        };
        Self { mode, rounds, outcome }
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for round in &self.rounds {
            writeln!(
                f,
                "{}: score {}, accuracy {:.2}% ({}/{} keys)",
                round.player, round.score, round.accuracy, round.correct_keystrokes, round.total_keystrokes
            )?;
        }
        if let Some(outcome) = self.outcome {
            writeln!(f, "{outcome}")?;
        }
        Ok(())
    }
}

/// One player's turn: the engine plus the spawn timer that feeds it
#[derive(Debug)]
pub struct Round {
    engine: MatchEngine,
    player: Player,
    since_spawn: Duration,
}

impl Round {
    fn new(config: RoundConfig, player: Player) -> Self {
        Self {
            engine: MatchEngine::new(config),
            player,
            since_spawn: Duration::ZERO,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn player(&self) -> Player {
        self.player
    }
}

pub struct TypefallGame {
    settings: Settings,
    rng: StdRng,
    screen: Screen,
    mode: Mode,
    round: Option<Round>,
    finished: Vec<RoundSummary>,
    best_score: u32,
    last_summary: Option<MatchSummary>,
    main_menu: Menu<MainChoice>,
    pause_menu: Menu<PauseChoice>,
    play_width: u16,
}

impl TypefallGame {
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    pub fn with_rng(settings: Settings, rng: StdRng) -> Self {
        let start_mode = settings.start_mode;
        let mut game = Self {
            settings,
            rng,
            screen: Screen::MainMenu,
            mode: Mode::Single,
            round: None,
            finished: Vec::new(),
            best_score: 0,
            last_summary: None,
            main_menu: Menu::new(
                " TYPEFALL ",
                vec![
                    (MainChoice::Single, "Single Player"),
                    (MainChoice::Versus, "Two Players"),
                    (MainChoice::Quit, "Quit"),
                ],
            ),
            pause_menu: Menu::new(
                " GAME PAUSED ",
                vec![
                    (PauseChoice::Resume, "Resume Game"),
                    (PauseChoice::Restart, "Restart Game"),
                    (PauseChoice::MainMenu, "Main Menu"),
                ],
            ),
            play_width: 80,
        };
        if let Some(mode) = start_mode {
            game.start_match(mode);
        }
        game
    }

    pub fn start_match(&mut self, mode: Mode) {
        info!(?mode, "match started");
        self.mode = mode;
        self.finished.clear();
        self.start_round(Player::One);
    }

    fn start_round(&mut self, player: Player) {
        info!(%player, "round started");
        self.round = Some(Round::new(self.settings.round, player));
        self.screen = Screen::Playing;
    }

    fn finish_round(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        let summary = round.engine.summary(round.player);
        info!(
            player = %round.player,
            score = summary.score,
            accuracy = summary.accuracy,
            "round finished"
        );

        self.best_score = self.best_score.max(summary.score);
        self.finished.push(summary);

        if self.mode == Mode::Versus && round.player == Player::One {
            self.screen = Screen::TurnHandoff;
            return;
        }

        self.last_summary = Some(MatchSummary::new(self.mode, std::mem::take(&mut self.finished)));
        self.screen = match self.mode {
            Mode::Single => Screen::GameOver,
            Mode::Versus => Screen::Results,
        };
    }

    fn to_main_menu(&mut self) {
        debug!("back to main menu");
        self.round = None;
        self.finished.clear();
        self.screen = Screen::MainMenu;
    }

    fn main_menu_input(&mut self, code: KeyCode) -> Flow {
        if code == KeyCode::Char('q') {
            return Flow::Quit;
        }
        match self.main_menu.handle_key(code) {
            MenuAction::Chosen(MainChoice::Single) => self.start_match(Mode::Single),
            MenuAction::Chosen(MainChoice::Versus) => self.start_match(Mode::Versus),
            MenuAction::Chosen(MainChoice::Quit) => return Flow::Quit,
            MenuAction::Back | MenuAction::Idle => {}
        }
        Flow::Continue
    }

    fn playing_input(&mut self, key: KeyEvent) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                info!("paused");
                self.pause_menu.reset();
                self.screen = Screen::Paused;
            }
            KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                // Whitespace never reaches the engine, so it does not count as a keystroke
                if ch.is_whitespace() {
                    return;
                }
                match round.engine.type_char(ch) {
                    TypeResult::WordCompleted(id) => debug!(
                        ?id,
                        score = round.engine.score(),
                        speed = round.engine.fall_speed(),
                        "word completed"
                    ),
                    result => debug!(%ch, ?result, "key typed"),
                }
            }
            _ => {}
        }
    }

    fn paused_input(&mut self, code: KeyCode) {
        match self.pause_menu.handle_key(code) {
            MenuAction::Chosen(PauseChoice::Resume) | MenuAction::Back => {
                info!("resumed");
                self.screen = Screen::Playing;
            }
            MenuAction::Chosen(PauseChoice::Restart) => {
                let player = self.round.as_ref().map_or(Player::One, |r| r.player);
                info!(%player, "round restarted");
                self.start_round(player);
            }
            MenuAction::Chosen(PauseChoice::MainMenu) => self.to_main_menu(),
            MenuAction::Idle => {}
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Rounds of the current match that already ended
    pub fn finished_rounds(&self) -> &[RoundSummary] {
        &self.finished
    }

    /// Best round score since the program started
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn last_summary(&self) -> Option<&MatchSummary> {
        self.last_summary.as_ref()
    }

    pub fn play_width(&self) -> u16 {
        self.play_width
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn main_menu(&self) -> &Menu<MainChoice> {
        &self.main_menu
    }

    pub(crate) fn pause_menu(&self) -> &Menu<PauseChoice> {
        &self.pause_menu
    }
}

impl Game for TypefallGame {
    const NAME: &'static str = "typefall";

    fn tick_rate(&self) -> Option<Duration> {
        Some(self.settings.tick_rate)
    }

    fn on_tick(&mut self, dt: Duration) {
        if self.screen != Screen::Playing {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };

        let result = round.engine.tick(round.engine.fall_speed());
        for id in &result.missed {
            debug!(?id, health = result.health, "word missed");
        }
        if result.round_ended() {
            self.finish_round();
            return;
        }

        round.since_spawn += dt;
        let interval = self.settings.spawn_interval;
        while !interval.is_zero() && round.since_spawn >= interval {
            round.since_spawn -= interval;
            let text = self.settings.vocabulary.choose(&mut self.rng);
            let word = round.engine.spawn(text, self.play_width, &mut self.rng);
            debug!(id = ?word.id(), text = word.remaining(), x = word.x(), "word spawned");
        }
    }

    fn handle_input(&mut self, key: KeyEvent) -> Flow {
        match self.screen {
            Screen::MainMenu => return self.main_menu_input(key.code),
            Screen::Playing => self.playing_input(key),
            Screen::Paused => self.paused_input(key.code),
            Screen::TurnHandoff => match key.code {
                KeyCode::Enter => self.start_round(Player::Two),
                KeyCode::Esc => self.to_main_menu(),
                _ => {}
            },
            Screen::GameOver | Screen::Results => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.to_main_menu();
                }
            }
        }
        Flow::Continue
    }

    fn on_resize(&mut self, width: u16, _height: u16) {
        // Inside the play area's borders
        self.play_width = width.saturating_sub(2);
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        TypefallRenderer::render(frame, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::typefall::engine::DEFAULT_PLAY_HEIGHT;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn game_with(words: &[&str], health: i32) -> TypefallGame {
        let settings = Settings {
            round: RoundConfig { health, ..RoundConfig::default() },
            vocabulary: Vocabulary::new(words.iter().copied()).unwrap(),
            ..Settings::default()
        };
        TypefallGame::with_rng(settings, StdRng::seed_from_u64(3))
    }

    /// Ticks until the current round ends
    fn tick_until_round_ends(game: &mut TypefallGame) {
        for _ in 0..10_000 {
            if game.screen() != Screen::Playing {
                return;
            }
            game.on_tick(DEFAULT_TICK_RATE);
        }
    }

    #[test]
    fn words_spawn_on_the_spawn_interval() {
        let mut game = game_with(&["rain"], 5);
        game.start_match(Mode::Single);

        for _ in 0..15 {
            game.on_tick(DEFAULT_TICK_RATE);
        }
        assert!(game.round().unwrap().engine().words().is_empty());

        game.on_tick(DEFAULT_TICK_RATE);
        assert_eq!(game.round().unwrap().engine().words().len(), 1);
    }

    #[test]
    fn typing_forwards_keys_but_drops_whitespace() {
        let mut game = game_with(&["rain"], 5);
        game.start_match(Mode::Single);
        for _ in 0..16 {
            game.on_tick(DEFAULT_TICK_RATE);
        }

        for c in ['r', ' ', 'a'] {
            game.handle_input(key(KeyCode::Char(c)));
        }
        let engine = game.round().unwrap().engine();
        assert_eq!(engine.total_keystrokes(), 2);
        assert_eq!(engine.words()[0].remaining(), "in");
    }

    #[test]
    fn pause_stops_the_clock() {
        let mut game = game_with(&["rain"], 5);
        game.start_match(Mode::Single);
        for _ in 0..16 {
            game.on_tick(DEFAULT_TICK_RATE);
        }
        let before = game.round().unwrap().engine().words()[0].y();

        game.handle_input(key(KeyCode::Esc));
        assert_eq!(game.screen(), Screen::Paused);
        for _ in 0..50 {
            game.on_tick(DEFAULT_TICK_RATE);
        }
        assert_eq!(game.round().unwrap().engine().words()[0].y(), before);

        game.handle_input(key(KeyCode::Esc));
        assert_eq!(game.screen(), Screen::Playing);
    }

    #[test]
    fn restart_from_pause_starts_a_fresh_round() {
        let mut game = game_with(&["rain"], 5);
        game.start_match(Mode::Single);
        for _ in 0..16 {
            game.on_tick(DEFAULT_TICK_RATE);
        }
        game.handle_input(key(KeyCode::Char('r')));

        game.handle_input(key(KeyCode::Esc));
        game.handle_input(key(KeyCode::Down));
        game.handle_input(key(KeyCode::Enter));

        assert_eq!(game.screen(), Screen::Playing);
        let engine = game.round().unwrap().engine();
        assert!(engine.words().is_empty());
        assert_eq!(engine.total_keystrokes(), 0);
    }

    #[test]
    fn single_player_ends_on_game_over() {
        let mut game = game_with(&["fun"], 1);
        game.start_match(Mode::Single);
        tick_until_round_ends(&mut game);

        assert_eq!(game.screen(), Screen::GameOver);
        let summary = game.last_summary().unwrap();
        assert_eq!(summary.mode, Mode::Single);
        assert_eq!(summary.rounds.len(), 1);
        assert_eq!(summary.outcome, None);

        game.handle_input(key(KeyCode::Enter));
        assert_eq!(game.screen(), Screen::MainMenu);
    }

    #[test]
    fn versus_hands_over_to_player_two() {
        let mut game = game_with(&["fun"], 1);
        game.start_match(Mode::Versus);
        tick_until_round_ends(&mut game);

        assert_eq!(game.screen(), Screen::TurnHandoff);
        assert_eq!(game.finished_rounds().len(), 1);

        game.handle_input(key(KeyCode::Enter));
        assert_eq!(game.round().unwrap().player(), Player::Two);
        tick_until_round_ends(&mut game);

        assert_eq!(game.screen(), Screen::Results);
        let summary = game.last_summary().unwrap();
        assert_eq!(summary.rounds.len(), 2);
        assert_eq!(summary.outcome, Some(Outcome::Tie));
    }

    #[test]
    fn main_menu_quits_on_q() {
        let mut game = game_with(&["fun"], 1);
        assert_eq!(game.handle_input(key(KeyCode::Char('q'))), Flow::Quit);
    }

    #[test]
    fn esc_after_game_over_stays_on_the_main_menu() {
        let mut game = game_with(&["fun"], 1);
        game.start_match(Mode::Single);
        tick_until_round_ends(&mut game);
        assert_eq!(game.screen(), Screen::GameOver);

        assert_eq!(game.handle_input(key(KeyCode::Esc)), Flow::Continue);
        assert_eq!(game.screen(), Screen::MainMenu);
        assert_eq!(game.handle_input(key(KeyCode::Esc)), Flow::Continue);
        assert_eq!(game.screen(), Screen::MainMenu);
    }

    #[test]
    fn start_mode_skips_the_menu() {
        let settings = Settings { start_mode: Some(Mode::Versus), ..Settings::default() };
        let game = TypefallGame::with_rng(settings, StdRng::seed_from_u64(0));
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.mode(), Mode::Versus);
    }

    #[test]
    fn summary_picks_the_higher_score() {
        let round = |player, score| RoundSummary {
            player,
            score,
            accuracy: 100.0,
            correct_keystrokes: score,
            total_keystrokes: score,
        };
        let summary = MatchSummary::new(Mode::Versus, vec![round(Player::One, 3), round(Player::Two, 7)]);
        assert_eq!(summary.outcome, Some(Outcome::Winner(Player::Two)));
        assert!(summary.to_string().contains("Player 2 Wins!"));
    }

    #[test]
    fn spawned_words_fit_the_play_width() {
        let mut game = game_with(&["keyboard"], 5);
        game.on_resize(20, 24);
        game.start_match(Mode::Single);
        for _ in 0..200 {
            game.on_tick(DEFAULT_TICK_RATE);
        }
        let engine = game.round().unwrap().engine();
        assert!(!engine.words().is_empty());
        assert!(engine.words().iter().all(|w| w.x() <= 10 && w.y() <= DEFAULT_PLAY_HEIGHT));
    }
}
