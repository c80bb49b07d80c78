//! Status bar: bottom line with input mode, volume and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_MODE_MENU, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_PLAYING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Menu,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "BROWSE",
            Self::Search => "SEARCH",
            Self::Menu => "MENU",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
            Self::Menu => C_MODE_MENU,
        }
    }

    pub fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ↑↓/jk select  Enter/Space play/pause  Tab/←→ category  / search  Esc clear  +/- vol  m menu  r reload  y copy url  L logs  ? help  q quit"
            }
            Self::Search => " type to search  Esc clear (twice to leave)  Enter done  ↑↓ results",
            Self::Menu => " ↑↓ choose  Enter open  Esc/m close",
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, volume: f32, player_ready: bool) {
    let player = if player_ready {
        Span::styled("●", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        player,
        Span::styled(
            format!(" vol {:>3}% ", (volume * 100.0).round() as i64),
            Style::default().fg(C_MODE_NORMAL),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
