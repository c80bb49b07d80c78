//! SearchBar component: the live station search field and its status line.
//!
//! Every edit is reported as `SearchChanged`; the App decides whether a
//! request goes out. The clear affordance is drawn only while the field is
//! non-empty and reports `ClearSearch` when clicked.

use ratatui::crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use radiodeck_core::search::STATUS_PROMPT;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    theme::{style_muted, C_ACCENT, C_SEARCH_FG},
    widgets::search_input::{SearchEvent, SearchInput},
};

pub struct SearchBar {
    input: SearchInput,
    /// Field row from the last draw.
    field_area: Rect,
}

impl SearchBar {
    pub const HEIGHT: u16 = 2;

    pub fn new() -> Self {
        Self {
            input: SearchInput::new(STATUS_PROMPT),
            field_area: Rect::default(),
        }
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match self.input.handle_key(key) {
            SearchEvent::Changed(text) => vec![Action::SearchChanged(text)],
            SearchEvent::Cleared => vec![Action::ClearSearch],
            SearchEvent::Released => vec![Action::CloseSearch],
            SearchEvent::None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if let Some(button) = self.input.clear_button_area(self.field_area) {
            if hit(button, event.column, event.row) {
                return vec![Action::ClearSearch];
            }
        }
        if hit(self.field_area, event.column, event.row) {
            return vec![Action::OpenSearch];
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenSearch => self.input.activate(),
            Action::ClearSearch => self.input.clear(),
            Action::CloseSearch => self.input.deactivate(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        self.field_area = rows[0];

        if focused != self.input.is_active() {
            if focused {
                self.input.activate();
            } else {
                self.input.deactivate();
            }
        }
        self.input.draw(frame, rows[0]);

        // the prompt already shows as the placeholder
        let status = state.page.search.status();
        let line = if status.is_empty() {
            let count = state.page.search.results().len();
            Line::from(Span::styled(
                format!(" {} station(s)", count),
                Style::default().fg(C_SEARCH_FG),
            ))
        } else if status == STATUS_PROMPT {
            Line::from(Span::styled(" press / to search", style_muted()))
        } else {
            Line::from(Span::styled(format!(" {}", status), Style::default().fg(C_ACCENT)))
        };
        frame.render_widget(Paragraph::new(line), rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use radiodeck_core::page::Page;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn edits_report_the_whole_field() {
        let state = AppState::new(Page::default(), 0.5, true);
        let mut bar = SearchBar::new();
        bar.handle_key(key(KeyCode::Char('j')), &state);
        let actions = bar.handle_key(key(KeyCode::Char('a')), &state);
        assert!(matches!(actions.as_slice(), [Action::SearchChanged(t)] if t == "ja"));

        let actions = bar.handle_key(key(KeyCode::Esc), &state);
        assert!(matches!(actions.as_slice(), [Action::ClearSearch]));
        assert_eq!(bar.input.text(), "");

        let actions = bar.handle_key(key(KeyCode::Esc), &state);
        assert!(matches!(actions.as_slice(), [Action::CloseSearch]));
    }

    #[test]
    fn clicking_the_clear_glyph_clears() {
        let state = AppState::new(Page::default(), 0.5, true);
        let mut bar = SearchBar::new();
        bar.handle_key(key(KeyCode::Char('x')), &state);

        let mut terminal = Terminal::new(TestBackend::new(40, 2)).unwrap();
        terminal.draw(|f| bar.draw(f, f.area(), true, &state)).unwrap();

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 38,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        let actions = bar.handle_mouse(click, Rect::default(), &state);
        assert!(matches!(actions.as_slice(), [Action::ClearSearch]));
    }
}
