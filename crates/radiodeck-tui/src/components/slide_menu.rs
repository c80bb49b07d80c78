//! SlideMenu component: the category menu that slides in from the left.
//!
//! Open while `nav.menu_open()`. Choosing a link selects that category and
//! closes the menu in one step.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use radiodeck_core::nav::Category;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    theme::{
        style_focused_border, style_secondary, style_selected_focused, C_OVERLAY_BG, C_TAB_ACTIVE,
    },
    widgets::scroll_window::ScrollWindow,
};

const WIDTH: u16 = 28;

pub struct SlideMenu {
    cursor: ScrollWindow,
    /// Inner rect from the last draw; one row per link.
    links_area: Rect,
}

impl SlideMenu {
    pub fn new() -> Self {
        Self {
            cursor: ScrollWindow::new(),
            links_area: Rect::default(),
        }
    }

    /// Where the menu is drawn inside the full screen `area`.
    pub fn area(area: Rect) -> Rect {
        Rect {
            width: WIDTH.min(area.width),
            ..area
        }
    }

    fn chosen(&self) -> Category {
        Category::ALL[self.cursor.selected.min(Category::ALL.len() - 1)]
    }
}

impl Default for SlideMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SlideMenu {
    fn id(&self) -> ComponentId {
        ComponentId::SlideMenu
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor.down(1, Category::ALL.len());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor.up(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => return vec![Action::MenuLink(self.chosen())],
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                return vec![Action::CloseMenu]
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if !hit(self.links_area, event.column, event.row) {
            return vec![];
        }
        let row = (event.row - self.links_area.y) as usize;
        match self.cursor.index_at(row, Category::ALL.len()) {
            Some(idx) => {
                self.cursor.selected = idx;
                vec![Action::MenuLink(Category::ALL[idx])]
            }
            None => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::OpenMenu = action {
            let active = state.page.nav.active();
            self.cursor.selected = Category::ALL.iter().position(|c| *c == active).unwrap_or(0);
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if !state.page.nav.menu_open() {
            self.links_area = Rect::default();
            return;
        }
        let menu = Self::area(area);
        let block = Block::default()
            .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
            .border_style(style_focused_border())
            .title(Span::styled(" menu ", Style::default().add_modifier(Modifier::BOLD)))
            .style(Style::default().bg(C_OVERLAY_BG));
        let inner = block.inner(menu);
        self.links_area = inner;

        let lines: Vec<Line> = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, category)| {
                let marker = if state.page.nav.is_active(*category) { "● " } else { "  " };
                let style = if i == self.cursor.selected && focused {
                    style_selected_focused()
                } else if state.page.nav.is_active(*category) {
                    Style::default().fg(C_TAB_ACTIVE)
                } else {
                    style_secondary()
                };
                Line::from(Span::styled(format!(" {}{}", marker, category.label()), style))
            })
            .collect();

        frame.render_widget(Clear, menu);
        frame.render_widget(block, menu);
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;
    use radiodeck_core::feeds::Feed;
    use radiodeck_core::page::Page;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opens_on_the_active_category_and_follows_links() {
        let state = AppState::new(Page::new(Category::Feed(Feed::Voted)), 0.5, true);
        let mut menu = SlideMenu::new();
        menu.on_action(&Action::OpenMenu, &state);

        menu.handle_key(key(KeyCode::Down), &state);
        let actions = menu.handle_key(key(KeyCode::Enter), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::MenuLink(Category::Feed(Feed::Recent))]
        ));

        let actions = menu.handle_key(key(KeyCode::Esc), &state);
        assert!(matches!(actions.as_slice(), [Action::CloseMenu]));
    }
}
