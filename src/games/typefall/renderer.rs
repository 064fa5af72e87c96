use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::engine::{MatchEngine, Word};
use super::game::{Mode, Screen, TypefallGame};

#[derive(Debug)]
pub struct TypefallRenderer;

impl TypefallRenderer {
    pub fn render(frame: &mut Frame, game: &TypefallGame) {
        match game.screen() {
            Screen::MainMenu => Self::render_main_menu(frame, game),
            Screen::Playing => Self::render_round(frame, game),
            Screen::Paused => {
                Self::render_round(frame, game);
                let popup = centered(frame.area(), 30, 5);
                frame.render_widget(Clear, popup);
                game.pause_menu().render(frame, popup);
            }
            Screen::TurnHandoff => Self::render_handoff(frame, game),
            Screen::GameOver => Self::render_game_over(frame, game),
            Screen::Results => Self::render_results(frame, game),
        }
    }

    fn render_main_menu(frame: &mut Frame, game: &TypefallGame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new("⌨  TYPEFALL  ⌨")
                .block(Block::default().borders(Borders::ALL))
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            chunks[0],
        );

        game.main_menu().render(frame, centered(chunks[1], 30, 5));

        frame.render_widget(
            Paragraph::new("[↑/↓] Navigate  [Enter] Select  [Q] Quit").alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_round(frame: &mut Frame, game: &TypefallGame) {
        let Some(round) = game.round() else {
            return;
        };
        let engine = round.engine();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // HUD
                Constraint::Min(0),    // Play area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        let title = match game.mode() {
            Mode::Single => " Typefall ".to_string(),
            Mode::Versus => format!(" Typefall - {} ", round.player()),
        };
        frame.render_widget(
            Paragraph::new(hud_line(engine))
                .block(Block::default().borders(Borders::ALL).title(title))
                .alignment(Alignment::Center),
            chunks[0],
        );

        let block = Block::default().borders(Borders::ALL);
        let play_area = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        for word in engine.words() {
            let focused = engine.focused() == Some(word.id());
            render_word(frame, play_area, engine.config().play_height, word, focused);
        }

        frame.render_widget(
            Paragraph::new("Type the falling words  [Esc] Pause")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_handoff(frame: &mut Frame, game: &TypefallGame) {
        let score = game.finished_rounds().first().map_or(0, |r| r.score);
        let lines = vec![
            Line::from(format!("Player 1 scored {score}")),
            Line::from(""),
            Line::from(Span::styled(
                "Player 2, get ready!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("[Enter] Start  [Esc] Main Menu"),
        ];
        render_panel(frame, " NEXT TURN ", lines);
    }

    fn render_game_over(frame: &mut Frame, game: &TypefallGame) {
        let Some(round) = game.last_summary().and_then(|s| s.rounds.last()) else {
            return;
        };
        let lines = vec![
            Line::from(Span::styled(
                "Game Over!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Score: {}", round.score)),
            Line::from(format!("Highest Score: {}", game.best_score())),
            Line::from(format!("Accuracy: {:.2}%", round.accuracy)),
            Line::from(""),
            Line::from("[Enter] Main Menu"),
        ];
        render_panel(frame, " RESULTS ", lines);
    }

    fn render_results(frame: &mut Frame, game: &TypefallGame) {
        let Some(summary) = game.last_summary() else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::styled(
                "Multiplayer Results",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for round in &summary.rounds {
            lines.push(Line::from(format!(
                "{} Score: {}  (accuracy {:.2}%)",
                round.player, round.score, round.accuracy
            )));
        }
        if let Some(outcome) = summary.outcome {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                outcome.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("[Enter] Main Menu"));
        render_panel(frame, " RESULTS ", lines);
    }
}

/// Hearts drawn one by one before the HUD switches to a count
const MAX_HEARTS: i32 = 10;

fn hearts(health: i32) -> String {
    match health {
        i32::MIN..=0 => String::new(),
        1..=MAX_HEARTS => "❤".repeat(health as usize),
        _ => format!("❤ ×{health}"),
    }
}

fn hud_line(engine: &MatchEngine) -> Line<'static> {
    let hearts = hearts(engine.health());
    Line::from(vec![
        Span::raw(format!("Score: {}   ", engine.score())),
        Span::styled(format!("Health: {hearts}"), Style::default().fg(Color::Red)),
        Span::raw(format!(
            "   Speed: {:.2}   Accuracy: {:.2}%",
            engine.fall_speed(),
            engine.accuracy()
        )),
    ])
}

/// Maps a word's virtual height onto a row of the play area and draws it there
fn render_word(frame: &mut Frame, area: Rect, play_height: f64, word: &Word, focused: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let rows = f64::from(area.height - 1);
    let row = ((word.y() / play_height) * rows).clamp(0.0, rows) as u16;

    let width = Word::render_width(word.remaining()).min(area.width);
    let col = word.x().min(area.width - width);

    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(word.remaining().to_string(), style)),
        Rect::new(area.x + col, area.y + row, width, 1),
    );
}

fn render_panel(frame: &mut Frame, title: &str, lines: Vec<Line<'_>>) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered(frame.area(), 44, height);
    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .alignment(Alignment::Center),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
