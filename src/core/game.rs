/// Core game interface for the typefall framework
use std::time::Duration;

use crossterm::event::KeyEvent;

/// What the runner should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main game trait driven by the terminal runner.
/// Every call arrives on the same task, one at a time.
pub trait Game {
    /// Shown in logs
    const NAME: &'static str;

    /// Heartbeat cadence, or `None` for games that only react to keys
    fn tick_rate(&self) -> Option<Duration>;

    /// Called once per heartbeat with the real time elapsed since the last one
    fn on_tick(&mut self, dt: Duration);

    fn handle_input(&mut self, key: KeyEvent) -> Flow;

    /// Terminal size in cells, sent once at startup and on every resize
    fn on_resize(&mut self, _width: u16, _height: u16) {}

    /// Render the current state into the Ratatui Frame
    fn render(&self, frame: &mut ratatui::Frame);
}
