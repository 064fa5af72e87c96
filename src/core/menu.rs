use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub enum MenuAction<T> {
    Chosen(T),
    Back,
    Idle,
}

/// Vertical list of choices with a cursor
#[derive(Debug, Clone)]
pub struct Menu<T> {
    title: &'static str,
    items: Vec<(T, &'static str)>,
    selected: usize,
}

impl<T: Copy> Menu<T> {
    pub fn new(title: &'static str, items: Vec<(T, &'static str)>) -> Self {
        assert!(!items.is_empty(), "a menu needs at least one item");
        Self { title, items, selected: 0 }
    }

    pub fn selected(&self) -> T {
        self.items[self.selected].0
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn handle_key(&mut self, code: KeyCode) -> MenuAction<T> {
        match code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                MenuAction::Idle
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(self.items.len() - 1);
                MenuAction::Idle
            }
            KeyCode::Enter => MenuAction::Chosen(self.selected()),
            KeyCode::Esc => MenuAction::Back,
            _ => MenuAction::Idle,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, (_, label))| {
                if i == self.selected {
                    ListItem::new(format!(" » {label}"))
                        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                } else {
                    ListItem::new(format!("   {label}"))
                }
            })
            .collect();

        f.render_widget(
            List::new(items).block(Block::default().title(self.title).borders(Borders::ALL)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Pick {
        A,
        B,
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut menu = Menu::new(" TEST ", vec![(Pick::A, "a"), (Pick::B, "b")]);
        menu.handle_key(KeyCode::Up);
        assert_eq!(menu.selected(), Pick::A);
        menu.handle_key(KeyCode::Down);
        menu.handle_key(KeyCode::Down);
        assert_eq!(menu.selected(), Pick::B);
        assert!(matches!(menu.handle_key(KeyCode::Enter), MenuAction::Chosen(Pick::B)));
        assert!(matches!(menu.handle_key(KeyCode::Esc), MenuAction::Back));

        menu.reset();
        assert_eq!(menu.selected(), Pick::A);
    }
}
