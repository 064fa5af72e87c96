use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::games::typefall::engine::{
    RoundConfig, DEFAULT_FALL_SPEED, DEFAULT_HEALTH, DEFAULT_SPEED_STEP,
};
use crate::games::typefall::{MatchSummary, Mode, Settings, Vocabulary};

#[derive(Debug, Parser)]
#[command(name = "typefall")]
#[command(about = "⌨️  Type the falling words before they hit the ground")]
#[command(version)]
pub struct Cli {
    /// Start this mode right away instead of showing the main menu
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Word list file, one word per line ('#' starts a comment)
    #[arg(short, long)]
    pub words: Option<PathBuf>,

    /// Health at the start of each round
    #[arg(long, default_value_t = DEFAULT_HEALTH)]
    pub health: i32,

    /// Milliseconds between game ticks
    #[arg(long, default_value_t = 50)]
    pub tick_ms: u64,

    /// Milliseconds between new words
    #[arg(long, default_value_t = 800)]
    pub spawn_ms: u64,

    /// Fall distance per tick at the start of a round
    #[arg(long, default_value_t = DEFAULT_FALL_SPEED, allow_negative_numbers = true)]
    pub start_speed: f64,

    /// Fall speed added for every completed word
    #[arg(long, default_value_t = DEFAULT_SPEED_STEP, allow_negative_numbers = true)]
    pub speed_step: f64,

    /// Print the last match summary after exiting
    #[arg(long, value_enum)]
    pub summary: Option<SummaryFormat>,

    /// Where to write logs (defaults to typefall.log in the temp dir)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

impl SummaryFormat {
    pub fn render(self, summary: &MatchSummary) -> Result<String> {
        match self {
            SummaryFormat::Text => Ok(summary.to_string()),
            SummaryFormat::Json => {
                serde_json::to_string_pretty(summary).context("failed to serialize match summary")
            }
        }
    }
}

impl Cli {
    /// Checks the balance flags and loads the word list
    pub fn settings(&self) -> Result<Settings> {
        if self.health < 1 {
            bail!("--health must be at least 1, got {}", self.health);
        }
        if self.tick_ms == 0 {
            bail!("--tick-ms must be at least 1");
        }
        if self.spawn_ms == 0 {
            bail!("--spawn-ms must be at least 1");
        }
        if !(self.start_speed.is_finite() && self.start_speed > 0.0) {
            bail!("--start-speed must be a positive number, got {}", self.start_speed);
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            bail!("--speed-step must not be negative, got {}", self.speed_step);
        }

        let vocabulary = match &self.words {
            Some(path) => Vocabulary::load(path)?,
            None => Vocabulary::default(),
        };

        Ok(Settings {
            round: RoundConfig {
                health: self.health,
                fall_speed: self.start_speed,
                speed_step: self.speed_step,
                ..RoundConfig::default()
            },
            tick_rate: Duration::from_millis(self.tick_ms),
            spawn_interval: Duration::from_millis(self.spawn_ms),
            vocabulary,
            start_mode: self.mode,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("typefall.log"))
    }

    /// The terminal belongs to the game, so logs go to a file
    pub fn init_tracing(&self) -> Result<()> {
        let path = self.log_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(self.log_level)
            .try_init()
            .map_err(|e| anyhow!(e))
            .context("failed to install tracing subscriber")
    }
}
