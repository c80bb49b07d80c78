//! Header component: 3-row top bar.
//!
//! Row 1: menu button, now-playing station, feed load state.
//! Row 2: category tabs.
//! Row 3: description of the active category.
//!
//! Not focusable; clicks on a tab or on the menu button become actions.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use radiodeck_core::nav::Category;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    theme::{
        style_muted, style_playing, style_secondary, C_ACCENT, C_LOCATION, C_PRIMARY,
        C_SELECTION_BG, C_TAB_ACTIVE,
    },
};

const MENU_BUTTON: &str = " ≡ ";

pub struct Header {
    /// Hit boxes from the last draw.
    tab_areas: Vec<(Category, Rect)>,
    menu_area: Rect,
}

impl Header {
    pub fn new() -> Self {
        Self {
            tab_areas: Vec::new(),
            menu_area: Rect::default(),
        }
    }

    pub const HEIGHT: u16 = 3;

    fn draw_now_playing(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.menu_area = Rect {
            width: (MENU_BUTTON.width() as u16).min(area.width),
            ..area
        };

        let mut spans = vec![
            Span::styled(
                MENU_BUTTON,
                Style::default().fg(C_PRIMARY).bg(C_SELECTION_BG),
            ),
            Span::styled(
                " radiodeck ",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
        ];

        match state.now_playing.as_deref() {
            Some(name) => {
                spans.push(Span::styled("▶ ", style_playing()));
                spans.push(Span::styled(name.to_string(), style_playing()));
                let country = state
                    .playing_card()
                    .and_then(|card| card.station().country.clone())
                    .filter(|c| !c.is_empty());
                if let Some(country) = country {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(country, Style::default().fg(C_LOCATION)));
                }
            }
            None => spans.push(Span::styled("■ nothing playing", style_muted())),
        }

        if state.feeds_pending > 0 {
            spans.push(Span::styled(
                format!("  loading {} feed(s)…", state.feeds_pending),
                style_secondary(),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_tabs(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.tab_areas.clear();
        let mut spans = vec![Span::raw(" ")];
        let mut x = area.x + 1;

        for category in Category::ALL {
            let label = format!(" {} ", category.label());
            let width = label.width() as u16;
            let active = state.page.nav.is_active(category);
            let style = if active {
                Style::default()
                    .fg(C_TAB_ACTIVE)
                    .bg(C_SELECTION_BG)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                style_secondary()
            };
            if x < area.x + area.width {
                let clipped = width.min(area.x + area.width - x);
                self.tab_areas.push((
                    category,
                    Rect {
                        x,
                        y: area.y,
                        width: clipped,
                        height: 1,
                    },
                ));
            }
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
            x = x.saturating_add(width + 1);
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn category_at(&self, col: u16, row: u16) -> Option<Category> {
        self.tab_areas
            .iter()
            .find(|(_, r)| hit(*r, col, row))
            .map(|(c, _)| *c)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if hit(self.menu_area, event.column, event.row) {
            return vec![Action::OpenMenu];
        }
        match self.category_at(event.column, event.row) {
            Some(category) => vec![Action::SelectCategory(category)],
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        frame.render_widget(Clear, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_now_playing(frame, rows[0], state);
        self.draw_tabs(frame, rows[1], state);

        let description = state.page.nav.visible_description().unwrap_or("");
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", description), style_muted()))),
            rows[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;
    use radiodeck_core::feeds::Feed;
    use radiodeck_core::page::Page;

    fn click(col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn clicking_a_tab_selects_its_category() {
        let state = AppState::new(Page::default(), 0.5, true);
        let mut header = Header::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 3)).unwrap();
        terminal
            .draw(|f| header.draw(f, f.area(), false, &state))
            .unwrap();

        let (_, podcast) = *header
            .tab_areas
            .iter()
            .find(|(c, _)| *c == Category::Feed(Feed::Podcast))
            .unwrap();
        let actions = header.handle_mouse(click(podcast.x + 1, podcast.y), Rect::default(), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::SelectCategory(Category::Feed(Feed::Podcast))]
        ));

        let actions = header.handle_mouse(click(1, 0), Rect::default(), &state);
        assert!(matches!(actions.as_slice(), [Action::OpenMenu]));
    }
}
