//! Deck component: the station cards of every displayed region.
//!
//! Regions are stacked top to bottom (all five feeds on the "All" tab, one
//! feed on a single tab, the search results while a query is active). One
//! cursor walks across them: ↑/↓ leave a region at its edge and continue in
//! the next non-empty one. The selected card is described in a detail strip
//! under the regions.

use std::collections::HashMap;
use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use radiodeck_core::card::StationCard;
use radiodeck_core::nav::CardLayout;
use radiodeck_core::page::{CardRef, RegionKey};
use radiodeck_core::playback::PlayIcon;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    theme::{
        style_muted, style_playing, style_secondary, style_selected, style_selected_focused,
        C_ACCENT, C_FALLBACK, C_LOCATION, C_MUTED, C_SEPARATOR, C_TAG, C_TOAST_INFO,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scroll_window::ScrollWindow,
    },
};

const DOUBLE_CLICK_MS: u128 = 400;
const DETAIL_HEIGHT: u16 = 4;
const PAGE: usize = 10;

pub struct Deck {
    /// Index into the displayed regions.
    current: usize,
    windows: HashMap<RegionKey, ScrollWindow>,
    /// Inner rect of each region pane from the last draw.
    region_areas: Vec<(RegionKey, Rect)>,
    last_click: Option<(CardRef, Instant)>,
}

impl Deck {
    pub fn new() -> Self {
        Self {
            current: 0,
            windows: HashMap::new(),
            region_areas: Vec::new(),
            last_click: None,
        }
    }

    fn window(&mut self, key: RegionKey) -> &mut ScrollWindow {
        self.windows.entry(key).or_default()
    }

    fn current_key(&self, state: &AppState) -> Option<RegionKey> {
        let regions = state.page.displayed_regions();
        let idx = self.current.min(regions.len().checked_sub(1)?);
        regions.get(idx).copied()
    }

    /// The card under the cursor, if the current region has any.
    pub fn selected(&self, state: &AppState) -> Option<CardRef> {
        let key = self.current_key(state)?;
        let len = state.page.region(key).len();
        if len == 0 {
            return None;
        }
        let index = self
            .windows
            .get(&key)
            .map_or(0, |w| w.selected)
            .min(len - 1);
        Some(CardRef { region: key, index })
    }

    /// Restart at the top of the first region (the displayed set changed).
    fn reset(&mut self) {
        self.current = 0;
        self.windows.clear();
        self.last_click = None;
    }

    fn move_down(&mut self, n: usize, state: &AppState) {
        let regions = state.page.displayed_regions();
        let Some(key) = self.current_key(state) else {
            return;
        };
        let len = state.page.region(key).len();
        if self.window(key).down(n, len) {
            return;
        }
        let start = self.current.min(regions.len().saturating_sub(1)) + 1;
        if let Some(next) = (start..regions.len()).find(|i| !state.page.region(regions[*i]).is_empty()) {
            self.current = next;
            self.window(regions[next]).first();
        }
    }

    fn move_up(&mut self, n: usize, state: &AppState) {
        let regions = state.page.displayed_regions();
        let Some(key) = self.current_key(state) else {
            return;
        };
        if self.window(key).up(n) {
            return;
        }
        let here = self.current.min(regions.len().saturating_sub(1));
        if let Some(prev) = (0..here).rev().find(|i| !state.page.region(regions[*i]).is_empty()) {
            self.current = prev;
            let len = state.page.region(regions[prev]).len();
            self.window(regions[prev]).last(len);
        }
    }

    fn card_at(&self, col: u16, row: u16, state: &AppState) -> Option<(usize, CardRef)> {
        let regions = state.page.displayed_regions();
        let (key, area) = self
            .region_areas
            .iter()
            .find(|(_, area)| hit(*area, col, row))?;
        let len = state.page.region(*key).len();
        let window = self.windows.get(key).cloned().unwrap_or_default();
        let index = window.index_at((row - area.y) as usize, len)?;
        let pos = regions.iter().position(|k| k == key)?;
        Some((pos, CardRef { region: *key, index }))
    }

    fn region_at(&self, col: u16, row: u16) -> Option<RegionKey> {
        self.region_areas
            .iter()
            .find(|(_, area)| hit(*area, col, row))
            .map(|(key, _)| *key)
    }

    fn highlight_if_moved(&self, before: Option<CardRef>, state: &AppState) -> Vec<Action> {
        match self.selected(state) {
            Some(now) if Some(now) != before => vec![Action::Highlight(now)],
            _ => vec![],
        }
    }

    fn draw_region(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        key: RegionKey,
        focused: bool,
        state: &AppState,
    ) {
        let region = state.page.region(key);
        let title = region_title(key);
        let badge = region_badge(key, region.len(), state);
        let block = pane_chrome(title, focused, badge, Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.region_areas.push((key, inner));

        if region.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(empty_message(key, state), style_muted())),
                inner,
            );
            return;
        }

        let expanded = state.page.nav.layout() == CardLayout::Expanded;
        let height = inner.height as usize;
        let len = region.len();
        let window = self.window(key);
        window.clamp(len);
        window.ensure_visible(height);
        let selected = window.selected;
        let range = window.visible_range(height, len);

        let lines: Vec<Line> = range
            .filter_map(|i| region.get(i).map(|card| (i, card)))
            .map(|(i, card)| card_line(card, i == selected, focused, expanded))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(C_SEPARATOR));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(card) = self.selected(state).and_then(|r| state.page.card(r)) else {
            return;
        };
        let station = card.station();

        let mut head = vec![
            Span::styled(format!(" {} ", icon_glyph(card.icon())), icon_style(card.icon())),
            Span::styled(
                card.name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        let summary = station.summary();
        if !summary.is_empty() {
            head.push(Span::raw("  "));
            head.push(Span::styled(summary, Style::default().fg(C_LOCATION)));
        }

        let mut tags = vec![Span::raw("   ")];
        for (i, tag) in station.tag_list().into_iter().enumerate() {
            if i > 0 {
                tags.push(Span::styled(" · ", Style::default().fg(C_MUTED)));
            }
            tags.push(Span::styled(tag.to_string(), Style::default().fg(C_TAG)));
        }

        let image = if card.image().is_fallback() {
            Span::styled(
                format!("{} (fallback)", card.image().src()),
                Style::default().fg(C_FALLBACK),
            )
        } else {
            Span::styled(card.image().src().to_string(), style_secondary())
        };

        let lines = vec![
            Line::from(head),
            Line::from(tags),
            Line::from(vec![Span::styled("   image ", style_muted()), image]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

fn region_title(key: RegionKey) -> &'static str {
    match key {
        RegionKey::Feed(feed) => feed.title(),
        RegionKey::SearchResults => "Search Results",
    }
}

fn region_badge(key: RegionKey, len: usize, state: &AppState) -> Option<Badge> {
    match key {
        RegionKey::Feed(feed) if state.feed_failed(feed) => Some(Badge {
            text: "ERR".into(),
            color: C_ACCENT,
        }),
        _ if len > 0 => Some(Badge {
            text: len.to_string(),
            color: C_TOAST_INFO,
        }),
        _ => None,
    }
}

fn empty_message(key: RegionKey, state: &AppState) -> String {
    match key {
        RegionKey::Feed(feed) if state.feed_failed(feed) => {
            "  could not load this feed, r to retry".to_string()
        }
        RegionKey::Feed(_) if state.feeds_pending > 0 => "  loading…".to_string(),
        RegionKey::Feed(_) => "  no stations".to_string(),
        RegionKey::SearchResults => format!("  {}", state.page.search.status()),
    }
}

fn icon_glyph(icon: PlayIcon) -> &'static str {
    match icon {
        PlayIcon::Play => "▶",
        PlayIcon::Pause => "⏸",
    }
}

fn icon_style(icon: PlayIcon) -> Style {
    match icon {
        PlayIcon::Play => style_muted(),
        PlayIcon::Pause => style_playing(),
    }
}

fn card_line(card: &StationCard, selected: bool, focused: bool, expanded: bool) -> Line<'_> {
    let playing = card.icon() == PlayIcon::Pause;
    let name_style = if playing {
        style_playing()
    } else if selected && focused {
        style_selected_focused()
    } else if selected {
        style_selected()
    } else {
        style_secondary()
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(icon_glyph(card.icon()), icon_style(card.icon())),
        Span::raw("  "),
        Span::styled(card.name().to_string(), name_style),
    ];

    if expanded {
        let summary = card.station().summary();
        if !summary.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(summary, Style::default().fg(C_LOCATION)));
        }
        let tags = card.station().tag_list();
        if !tags.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(tags.join(", "), Style::default().fg(C_TAG)));
        }
    }

    let line = Line::from(spans);
    if selected {
        line.style(style_selected())
    } else {
        line
    }
}

impl Component for Deck {
    fn id(&self) -> ComponentId {
        ComponentId::Deck
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let before = self.selected(state);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1, state),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1, state),
            KeyCode::PageDown => self.move_down(PAGE, state),
            KeyCode::PageUp => self.move_up(PAGE, state),
            KeyCode::Home | KeyCode::Char('g') => {
                if let Some(key) = self.current_key(state) {
                    self.window(key).first();
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if let Some(key) = self.current_key(state) {
                    let len = state.page.region(key).len();
                    self.window(key).last(len);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                return before.map(Action::TogglePlayback).into_iter().collect();
            }
            KeyCode::Char('y') => {
                return before
                    .and_then(|r| state.page.card(r))
                    .map(|card| Action::CopyToClipboard(card.station().url_resolved.clone()))
                    .into_iter()
                    .collect();
            }
            _ => return vec![],
        }
        self.highlight_if_moved(before, state)
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let before = self.selected(state);
        match event.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let Some(key) = self.region_at(event.column, event.row) else {
                    return vec![];
                };
                let len = state.page.region(key).len();
                let window = self.window(key);
                if event.kind == MouseEventKind::ScrollUp {
                    window.up(1);
                } else {
                    window.down(1, len);
                }
                if let Some(pos) = state.page.displayed_regions().iter().position(|k| *k == key) {
                    self.current = pos;
                }
                self.highlight_if_moved(before, state)
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((pos, at)) = self.card_at(event.column, event.row, state) else {
                    return vec![];
                };
                self.current = pos;
                self.window(at.region).selected = at.index;

                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(prev, t)| prev == at && t.elapsed().as_millis() < DOUBLE_CLICK_MS)
                    .unwrap_or(false);
                if is_double {
                    self.last_click = None;
                    return vec![Action::TogglePlayback(at)];
                }
                self.last_click = Some((at, now));
                self.highlight_if_moved(before, state)
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SelectCategory(_)
            | Action::NextCategory
            | Action::PrevCategory
            | Action::MenuLink(_)
            | Action::SearchChanged(_)
            | Action::ClearSearch => self.reset(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.region_areas.clear();
        let regions = state.page.displayed_regions();
        if regions.is_empty() {
            return;
        }
        self.current = self.current.min(regions.len() - 1);

        let [body, detail] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(DETAIL_HEIGHT)])
            .areas(area);

        let n = regions.len() as u32;
        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints(regions.iter().map(|_| Constraint::Ratio(1, n)))
            .split(body);

        for (i, (key, pane)) in regions.iter().zip(panes.iter()).enumerate() {
            self.draw_region(frame, *pane, *key, focused && i == self.current, state);
        }
        self.draw_detail(frame, detail, state);
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
    use radiodeck_core::station::Station;

    fn stations(prefix: &str, n: usize) -> Vec<Station> {
        (0..n)
            .map(|i| Station {
                name: format!("{} {}", prefix, i),
                url_resolved: format!("http://stream.example/{}/{}", prefix, i),
                ..Default::default()
            })
            .collect()
    }

    fn state_with(top: usize, voted: usize) -> AppState {
        let mut page = Page::default();
        page.on_feed_loaded(Feed::Top, Ok(stations("top", top))).unwrap();
        page.on_feed_loaded(Feed::Voted, Ok(stations("voted", voted))).unwrap();
        AppState::new(page, 0.5, true)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cursor_crosses_into_the_next_non_empty_region() {
        let state = state_with(2, 3);
        let mut deck = Deck::new();
        assert_eq!(
            deck.selected(&state),
            Some(CardRef { region: RegionKey::Feed(Feed::Top), index: 0 })
        );

        deck.handle_key(key(KeyCode::Down), &state);
        let actions = deck.handle_key(key(KeyCode::Down), &state);
        // trending is empty and skipped
        let voted = CardRef { region: RegionKey::Feed(Feed::Voted), index: 0 };
        assert!(matches!(actions.as_slice(), [Action::Highlight(r)] if *r == voted));

        let actions = deck.handle_key(key(KeyCode::Up), &state);
        let top_last = CardRef { region: RegionKey::Feed(Feed::Top), index: 1 };
        assert!(matches!(actions.as_slice(), [Action::Highlight(r)] if *r == top_last));
    }

    #[test]
    fn enter_toggles_and_y_copies_the_stream() {
        let state = state_with(2, 0);
        let mut deck = Deck::new();
        deck.handle_key(key(KeyCode::Down), &state);

        let actions = deck.handle_key(key(KeyCode::Enter), &state);
        let second = CardRef { region: RegionKey::Feed(Feed::Top), index: 1 };
        assert!(matches!(actions.as_slice(), [Action::TogglePlayback(r)] if *r == second));

        let actions = deck.handle_key(key(KeyCode::Char('y')), &state);
        assert!(matches!(
            actions.as_slice(),
            [Action::CopyToClipboard(url)] if url == "http://stream.example/top/1"
        ));
    }

    #[test]
    fn nothing_to_toggle_in_an_empty_deck() {
        let state = AppState::new(Page::default(), 0.5, true);
        let mut deck = Deck::new();
        assert!(deck.handle_key(key(KeyCode::Enter), &state).is_empty());
        assert!(deck.handle_key(key(KeyCode::Down), &state).is_empty());
    }

    #[test]
    fn double_click_toggles_the_clicked_card() {
        let state = state_with(3, 0);
        let mut deck = Deck::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 40)).unwrap();
        terminal.draw(|f| deck.draw(f, f.area(), true, &state)).unwrap();

        let (_, top) = deck.region_areas[0];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: top.x + 2,
            row: top.y + 2,
            modifiers: KeyModifiers::NONE,
        };
        let third = CardRef { region: RegionKey::Feed(Feed::Top), index: 2 };
        let actions = deck.handle_mouse(click, Rect::default(), &state);
        assert!(matches!(actions.as_slice(), [Action::Highlight(r)] if *r == third));
        let actions = deck.handle_mouse(click, Rect::default(), &state);
        assert!(matches!(actions.as_slice(), [Action::TogglePlayback(r)] if *r == third));
    }
}
