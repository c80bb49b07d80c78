//! LogPanel component: tail of radiodeck.log.
//!
//! Hidden, it is one line: the newest entry and how many warnings the tail
//! holds. Shown (`L`), it is a scrollable pane that follows new entries
//! until scrolled away from the bottom; `e` narrows it to warnings and
//! errors. Every entry is tagged with the part of the app that wrote it.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PRIMARY, C_SECONDARY, C_TAG, C_TOAST_ERROR, C_TOAST_WARNING},
    widgets::pane_chrome::{pane_chrome, Badge},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn parse(token: &str) -> Option<Level> {
        match token {
            "TRACE" => Some(Level::Trace),
            "DEBUG" => Some(Level::Debug),
            "INFO" => Some(Level::Info),
            "WARN" => Some(Level::Warn),
            "ERROR" => Some(Level::Error),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Error => C_TOAST_ERROR,
            Level::Warn => C_TOAST_WARNING,
            Level::Info => C_SECONDARY,
            Level::Debug | Level::Trace => C_MUTED,
        }
    }
}

/// Which part of the app wrote an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Feed,
    Search,
    Playback,
    Net,
    App,
}

impl Topic {
    /// From a tracing target like `radiodeck_core::feeds`.
    fn from_target(target: &str) -> Topic {
        match target.rsplit("::").next().unwrap_or(target) {
            "feeds" => Topic::Feed,
            "search" => Topic::Search,
            "playback" | "player" | "mpv" => Topic::Playback,
            "api" | "favicon" => Topic::Net,
            _ => Topic::App,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Topic::Feed => "feed",
            Topic::Search => "search",
            Topic::Playback => "play",
            Topic::Net => "net",
            Topic::App => "app",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogEntry {
    time: Option<String>,
    level: Option<Level>,
    topic: Topic,
    message: String,
}

impl LogEntry {
    /// Parse one line of the fmt subscriber's output. Lines that do not look
    /// like it (mpv noise, panics) come through whole as untagged messages.
    fn parse(raw: &str) -> LogEntry {
        let clean = strip_ansi(raw);
        let mut rest = clean.trim();

        let mut time = None;
        if let Some((tok, rem)) = split_first_token(rest) {
            if let Some(ts) = short_time(tok) {
                time = Some(ts);
                rest = rem.trim_start();
            }
        }

        let mut level = None;
        if let Some((tok, rem)) = split_first_token(rest) {
            if let Some(l) = Level::parse(tok) {
                level = Some(l);
                rest = rem.trim_start();
            }
        }

        let mut topic = Topic::App;
        if let Some((target, msg)) = rest.split_once(": ") {
            if is_target(target) {
                topic = Topic::from_target(target);
                rest = msg.trim_start();
            }
        }

        LogEntry {
            time,
            level,
            topic,
            message: rest.to_string(),
        }
    }

    fn is_problem(&self) -> bool {
        matches!(self.level, Some(Level::Warn | Level::Error))
    }

    fn to_line(&self) -> Line<'static> {
        let level = self.level.unwrap_or(Level::Info);
        let message_style = if self.is_problem() {
            Style::default().fg(C_PRIMARY)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        Line::from(vec![
            Span::styled(
                format!(" {:<8} ", self.time.as_deref().unwrap_or("")),
                Style::default().fg(C_MUTED),
            ),
            Span::styled(
                format!("{:<5} ", level.label()),
                Style::default().fg(level.color()).add_modifier(if self.is_problem() {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
            ),
            Span::styled(format!("{:<6} ", self.topic.label()), Style::default().fg(C_TAG)),
            Span::styled(self.message.clone(), message_style),
        ])
    }
}

pub struct LogPanel {
    pub expanded: bool,
    scroll: usize,
    /// Stick to the newest entry.
    follow: bool,
    problems_only: bool,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            expanded: false,
            scroll: 0,
            follow: true,
            problems_only: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
        if self.expanded {
            self.follow = true;
        }
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
        self.follow = false;
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_add(n);
    }

    fn entries(&self, state: &AppState) -> Vec<LogEntry> {
        state
            .tui_log_lines
            .iter()
            .map(|l| LogEntry::parse(l))
            .filter(|e| !self.problems_only || e.is_problem())
            .collect()
    }

    fn draw_collapsed(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let entries: Vec<LogEntry> = state.tui_log_lines.iter().map(|l| LogEntry::parse(l)).collect();
        let problems = entries.iter().filter(|e| e.is_problem()).count();

        let mut spans = vec![Span::styled(" log ", Style::default().fg(C_MUTED))];
        if problems > 0 {
            spans.push(Span::styled(
                format!("⚠ {} ", problems),
                Style::default().fg(C_TOAST_WARNING),
            ));
        }
        match entries.last() {
            Some(last) => {
                let color = last.level.map(Level::color).unwrap_or(C_SECONDARY);
                spans.push(Span::styled(
                    format!("{} {}", last.topic.label(), last.message),
                    Style::default().fg(color),
                ));
            }
            None => spans.push(Span::styled("(no log)", Style::default().fg(C_SECONDARY))),
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LogPanel {
    fn id(&self) -> ComponentId {
        ComponentId::LogPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.expanded {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_up(usize::MAX),
            KeyCode::End | KeyCode::Char('G') => self.follow = true,
            KeyCode::Char('e') => {
                self.problems_only = !self.problems_only;
                self.follow = true;
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if !self.expanded {
            return vec![];
        }
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_up(1),
            MouseEventKind::ScrollDown => self.scroll_down(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleLogs = action {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        if !self.expanded || area.height <= 2 {
            self.draw_collapsed(frame, area, state);
            return;
        }

        let entries = self.entries(state);
        let problems = entries.iter().filter(|e| e.is_problem()).count();
        let title = if self.problems_only { "log · warnings" } else { "log" };
        let badge = (problems > 0).then(|| Badge {
            text: format!("{} ⚠", problems),
            color: C_TOAST_WARNING,
        });
        let block = pane_chrome(title, focused, badge, Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if entries.is_empty() {
            let empty = if self.problems_only {
                "  no warnings"
            } else {
                "  no log entries yet"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(empty, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let max_scroll = entries.len().saturating_sub(height);
        if self.follow || self.scroll >= max_scroll {
            self.scroll = max_scroll;
            self.follow = true;
        }

        let lines: Vec<Line> = entries
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(LogEntry::to_line)
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn is_target(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 48
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'))
}

/// RFC 3339 timestamp to local wall time; older days keep their date.
fn short_time(token: &str) -> Option<String> {
    let dt = chrono::DateTime::parse_from_rfc3339(token).ok()?;
    let local = dt.with_timezone(&chrono::Local);
    let fmt = if local.date_naive() == chrono::Local::now().date_naive() {
        "%H:%M:%S"
    } else {
        "%m-%d %H:%M"
    };
    Some(local.format(fmt).to_string())
}

fn split_first_token(s: &str) -> Option<(&str, &str)> {
    let mut parts = s.splitn(2, char::is_whitespace);
    let first = parts.next()?;
    if first.is_empty() {
        return None;
    }
    Some((first, parts.next().unwrap_or("")))
}

/// Drop terminal escapes: CSI sequences (`ESC [ params final`) and
/// two-character escapes.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        if let Some('[') = chars.next() {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiodeck_core::page::Page;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::Terminal;

    fn rendered(panel: &mut LogPanel, state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal
            .draw(|f| panel.draw(f, f.area(), true, state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn strips_csi_sequences_with_parameters() {
        assert_eq!(strip_ansi("\u{1b}[1mbold\u{1b}[0m"), "bold");
        assert_eq!(strip_ansi("\u{1b}[1;32mok\u{1b}[0m done"), "ok done");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn parses_a_colored_feed_warning() {
        let raw = "\u{1b}[2m2024-03-01T10:15:30.123456Z\u{1b}[0m \u{1b}[33m WARN\u{1b}[0m radiodeck_core::feeds: failed to load Trending: HTTP status 503";
        let entry = LogEntry::parse(raw);
        assert!(entry.time.is_some());
        assert_eq!(entry.level, Some(Level::Warn));
        assert_eq!(entry.topic, Topic::Feed);
        assert_eq!(entry.message, "failed to load Trending: HTTP status 503");
        assert!(entry.is_problem());
    }

    #[test]
    fn topics_follow_the_writing_module() {
        assert_eq!(Topic::from_target("radiodeck_core::search"), Topic::Search);
        assert_eq!(Topic::from_target("radiodeck_tui::mpv"), Topic::Playback);
        assert_eq!(Topic::from_target("radiodeck_core::playback"), Topic::Playback);
        assert_eq!(Topic::from_target("radiodeck_tui::favicon"), Topic::Net);
        assert_eq!(Topic::from_target("radiodeck_tui::app"), Topic::App);
    }

    #[test]
    fn unstructured_lines_pass_through() {
        let entry = LogEntry::parse("  thread 'main' panicked ");
        assert_eq!(entry.level, None);
        assert_eq!(entry.topic, Topic::App);
        assert_eq!(entry.message, "thread 'main' panicked");
    }

    #[test]
    fn warnings_filter_hides_routine_entries() {
        let mut state = AppState::new(Page::default(), 0.5, true);
        state.tui_log_lines = vec![
            "2024-03-01T10:15:30Z  INFO radiodeck_core::feeds: feed topvote loaded: 20 stations".into(),
            "2024-03-01T10:15:31Z  WARN radiodeck_core::playback: stream not working: http://x".into(),
        ];
        let mut panel = LogPanel::new();
        panel.toggle();

        let all = rendered(&mut panel, &state);
        assert!(all.contains("topvote loaded"));
        assert!(all.contains("stream not working"));

        panel.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE), &state);
        let warnings = rendered(&mut panel, &state);
        assert!(!warnings.contains("topvote loaded"));
        assert!(warnings.contains("stream not working"));
    }

    #[test]
    fn collapsed_line_counts_warnings() {
        let mut state = AppState::new(Page::default(), 0.5, true);
        state.tui_log_lines = vec![
            "2024-03-01T10:15:31Z ERROR radiodeck_core::search: search failed".into(),
            "2024-03-01T10:15:32Z  INFO radiodeck_tui::app: feed round 2 started".into(),
        ];
        let mut panel = LogPanel::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal
            .draw(|f| panel.draw(f, f.area(), false, &state))
            .unwrap();
        let line: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(line.contains("⚠ 1"), "{}", line);
        assert!(line.contains("app feed round 2 started"), "{}", line);
    }
}
