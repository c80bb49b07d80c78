//! SearchInput: wraps tui-input for the live station search field.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_ACCENT, C_MUTED, C_SEARCH_BG, C_SEARCH_FG};

/// Glyph of the clear affordance.
pub const CLEAR_GLYPH: &str = " ✕ ";

#[derive(Debug, PartialEq)]
pub enum SearchEvent {
    /// The text changed to this value.
    Changed(String),
    /// Esc on a non-empty field.
    Cleared,
    /// Esc on an empty field, or Enter: give focus back.
    Released,
    None,
}

pub struct SearchInput {
    input: Input,
    active: bool,
    placeholder: String,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchEvent {
        match key.code {
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.input.reset();
                SearchEvent::Cleared
            }
            KeyCode::Esc | KeyCode::Enter => {
                self.deactivate();
                SearchEvent::Released
            }
            _ => {
                let before = self.input.value().to_string();
                self.input.handle_event(&Event::Key(key));
                if self.input.value() == before {
                    SearchEvent::None
                } else {
                    SearchEvent::Changed(self.input.value().to_string())
                }
            }
        }
    }

    /// Area of the clear affordance when drawn into `area`, if visible.
    pub fn clear_button_area(&self, area: Rect) -> Option<Rect> {
        if self.input.value().is_empty() || area.width < 8 {
            return None;
        }
        let w = CLEAR_GLYPH.width() as u16;
        Some(Rect {
            x: area.x + area.width - w,
            y: area.y,
            width: w,
            height: 1,
        })
    }

    /// Render `⌕ text` with a clear button on the right while non-empty.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let clear = self.clear_button_area(area);
        let text_width = area.width.saturating_sub(clear.map_or(0, |r| r.width) + 2);
        let scroll = self.input.visual_scroll(text_width as usize);
        let value = self.input.value();

        let display = if value.is_empty() {
            Span::styled(format!("⌕ {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::styled(format!("⌕ {}", visible), Style::default().fg(C_SEARCH_FG))
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_SEARCH_BG));
        frame.render_widget(paragraph, area);

        if let Some(button) = clear {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    CLEAR_GLYPH,
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().bg(C_SEARCH_BG)),
                button,
            );
        }

        if self.active {
            let cursor_x = area.x + 2 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width.saturating_sub(1)), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_reports_full_text() {
        let mut input = SearchInput::new("search");
        input.activate();
        assert_eq!(input.handle_key(key(KeyCode::Char('j'))), SearchEvent::Changed("j".into()));
        assert_eq!(input.handle_key(key(KeyCode::Char('a'))), SearchEvent::Changed("ja".into()));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), SearchEvent::Changed("j".into()));
    }

    #[test]
    fn esc_clears_then_releases() {
        let mut input = SearchInput::new("search");
        input.activate();
        input.handle_key(key(KeyCode::Char('x')));
        assert_eq!(input.handle_key(key(KeyCode::Esc)), SearchEvent::Cleared);
        assert_eq!(input.text(), "");
        assert!(input.is_active());
        assert_eq!(input.handle_key(key(KeyCode::Esc)), SearchEvent::Released);
        assert!(!input.is_active());
    }

    #[test]
    fn clear_button_only_with_text() {
        let mut input = SearchInput::new("search");
        let area = Rect::new(0, 0, 40, 1);
        assert!(input.clear_button_area(area).is_none());
        input.handle_key(key(KeyCode::Char(' ')));
        let button = input.clear_button_area(area).expect("visible for whitespace too");
        assert_eq!(button.x + button.width, 40);
    }
}
