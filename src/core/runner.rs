use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::DefaultTerminal;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::game::{Flow, Game};

const RENDER_RATE: Duration = Duration::from_millis(33);

pub struct Runner<G: Game> {
    game: G,
}

impl<G: Game> Runner<G> {
    pub fn new(game: G) -> Self {
        Self { game }
    }

    /// Drives the game until it asks to quit, then hands it back so the
    /// caller can read what happened.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<G> {
        info!(game = G::NAME, "runner started");

        let size = terminal.size().context("failed to read terminal size")?;
        self.game.on_resize(size.width, size.height);

        let mut events = EventStream::new();
        let mut ticker = self.game.tick_rate().map(|rate| {
            let mut i = interval(rate);
            i.set_missed_tick_behavior(MissedTickBehavior::Delay);
            i
        });
        let mut render_timer = interval(RENDER_RATE);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                // 1. INPUT: keys and resizes from the terminal
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                                debug!("ctrl-c pressed");
                                break;
                            }
                            if self.game.handle_input(key) == Flow::Quit {
                                break;
                            }
                        }
                        Some(Ok(Event::Resize(width, height))) => self.game.on_resize(width, height),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e).context("failed to read terminal event"),
                        None => break,
                    }
                }

                // 2. TICK: game heartbeat
                _ = async {
                    match ticker.as_mut() {
                        Some(i) => { i.tick().await; }
                        None => std::future::pending::<()>().await,
                    }
                } => {
                    let now = Instant::now();
                    self.game.on_tick(now - last_tick);
                    last_tick = now;
                }

                // 3. RENDER
                _ = render_timer.tick() => {
                    terminal.draw(|f| self.game.render(f)).context("failed to draw frame")?;
                }
            }
        }

        info!(game = G::NAME, "runner stopped");
        Ok(self.game)
    }
}
