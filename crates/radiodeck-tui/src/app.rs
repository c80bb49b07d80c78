//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks
//!   (terminal input, feed fan-out, searches, favicon probes, mpv events).
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Playback goes through the `PlaybackCoordinator`, which runs inside the loop.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use radiodeck_core::api::DirectoryClient;
use radiodeck_core::config::Config;
use radiodeck_core::error::Result as ApiResult;
use radiodeck_core::feeds::{Feed, FeedLoads};
use radiodeck_core::nav::Category;
use radiodeck_core::page::{CardRef, Page};
use radiodeck_core::playback::{ElementId, PlayState, PlaybackCoordinator};
use radiodeck_core::search::{SearchOutcome, SearchTicket};
use radiodeck_core::station::Station;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::{hit, Component},
    components::{
        deck::Deck, header::Header, help_overlay::HelpOverlay, log_panel::LogPanel,
        search_bar::SearchBar, slide_menu::SlideMenu,
    },
    favicon,
    focus::FocusStack,
    mpv::{EndReason, MpvDriver, MpvEvent},
    player::MpvPlayer,
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

const VOLUME_STEP: f32 = 0.05;
const LOG_TAIL_LINES: usize = 500;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// One feed of load round `round` finished.
    FeedLoaded {
        round: u64,
        feed: Feed,
        result: ApiResult<Vec<Station>>,
    },
    /// Every task of load round `round` has reported.
    FeedsDone { round: u64 },
    SearchDone {
        seq: u64,
        result: ApiResult<Vec<Station>>,
    },
    FaviconProbed { element: ElementId, ok: bool },
    Mpv(MpvEvent),
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Last-drawn layout rects, used by `handle_mouse` for hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    header: Rect,
    search: Rect,
    deck: Rect,
    log_panel: Rect,
    menu: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    tui_log_path: PathBuf,

    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    search_bar: SearchBar,
    deck: Deck,
    slide_menu: SlideMenu,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,

    focus: FocusStack,
    toast: ToastManager,

    // ── Services ──────────────────────────────────────────────────────────────
    client: DirectoryClient,
    favicon_client: reqwest::Client,
    coordinator: PlaybackCoordinator<MpvPlayer>,
    mpv: MpvDriver,

    /// Sender for background tasks; set once `run` starts.
    tx: Option<mpsc::Sender<AppMessage>>,
    feed_round: u64,

    should_quit: bool,
    pane_areas: PaneAreas,
}

impl App {
    pub fn new(
        config: &Config,
        initial: Category,
        client: DirectoryClient,
        favicon_client: reqwest::Client,
        tui_log_path: PathBuf,
    ) -> Self {
        let state = AppState::new(
            Page::new(initial),
            config.player.default_volume.clamp(0.0, 1.0),
            config.ui.show_keys_bar,
        );
        Self {
            tui_log_path,
            state,
            header: Header::new(),
            search_bar: SearchBar::new(),
            deck: Deck::new(),
            slide_menu: SlideMenu::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusStack::new(ComponentId::Deck),
            toast: ToastManager::new(),
            client,
            favicon_client,
            coordinator: PlaybackCoordinator::new(MpvPlayer::new()),
            mpv: MpvDriver::new(),
            tx: None,
            feed_round: 0,
            should_quit: false,
            pane_areas: PaneAreas::default(),
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.tx = Some(tx.clone());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Initial fetches, then the player ──────────────────────────────────
        self.start_feed_round();
        terminal.draw(|f| self.draw(f))?;
        self.start_mpv(&tx).await;

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry check + spinner animation
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // radiodeck.log tail refresh: only while the log panel is open
        let mut log_refresh = tokio::time::interval(Duration::from_secs(2));
        log_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut mpv_health = tokio::time::interval(Duration::from_secs(2));
        mpv_health.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    let mut redraw = self.handle_message(msg).await;
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else {
                            break;
                        };
                        drained += 1;
                        redraw |= self.handle_message(next).await;
                    }
                    needs_redraw = redraw;
                }

                _ = toast_tick.tick() => {
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }

                _ = log_refresh.tick() => {
                    self.reload_tui_log();
                    needs_redraw = true;
                }

                _ = mpv_health.tick() => {
                    needs_redraw = self.check_mpv_health();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.coordinator.stop_all().await;
        self.mpv.kill().await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("radiodeck stopped");

        Ok(())
    }

    // ── Background work ───────────────────────────────────────────────────────

    /// Fetch all five feeds in parallel. Results of an older round that
    /// arrive late are dropped.
    fn start_feed_round(&mut self) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        self.feed_round += 1;
        let round = self.feed_round;
        self.state.feeds_pending = Feed::ALL.len();
        self.state.feed_errors.clear();
        self.toast
            .progress(format!("loading feeds 0/{}", Feed::ALL.len()));
        info!("feed round {} started", round);

        let mut loads = FeedLoads::spawn(&self.client);
        tokio::spawn(async move {
            while let Some((feed, result)) = loads.next().await {
                if tx
                    .send(AppMessage::FeedLoaded {
                        round,
                        feed,
                        result,
                    })
                    .await
                    .is_err()
                {
                    return;
                }
            }
            let _ = tx.send(AppMessage::FeedsDone { round }).await;
        });
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.search(&ticket.query).await;
            let _ = tx
                .send(AppMessage::SearchDone {
                    seq: ticket.seq,
                    result,
                })
                .await;
        });
    }

    /// Fetch the favicon of a card the first time it is highlighted.
    fn probe_favicon(&mut self, at: CardRef) {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        let Some(card) = self.state.page.card_mut(at) else {
            return;
        };
        let element = card.audio().id();
        let Some(url) = card.image_mut().request_load() else {
            return;
        };
        let client = self.favicon_client.clone();
        tokio::spawn(async move {
            let ok = match favicon::probe(&client, &url).await {
                Ok(()) => true,
                Err(e) => {
                    debug!("favicon load error: {}", e);
                    false
                }
            };
            let _ = tx.send(AppMessage::FaviconProbed { element, ok }).await;
        });
    }

    async fn start_mpv(&mut self, tx: &mpsc::Sender<AppMessage>) {
        let (event_tx, mut event_rx) = mpsc::channel::<MpvEvent>(256);
        match self
            .mpv
            .spawn_and_connect(self.state.volume, event_tx)
            .await
        {
            Ok(handle) => {
                self.coordinator.backend().set_handle(Some(handle));
                self.state.player_ready = true;
                let fwd_tx = tx.clone();
                tokio::spawn(async move {
                    while let Some(ev) = event_rx.recv().await {
                        if fwd_tx.send(AppMessage::Mpv(ev)).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                warn!("mpv unavailable: {}", e);
                self.toast
                    .warning(format!("mpv unavailable ({}), playback disabled", e));
            }
        }
    }

    /// Notice a dead mpv. No restart; playback stays disabled.
    fn check_mpv_health(&mut self) -> bool {
        if !self.state.player_ready || self.mpv.process_alive() {
            return false;
        }
        self.coordinator.backend().set_handle(None);
        self.state.player_ready = false;
        if self.coordinator.stream_ended().is_some() {
            self.state.now_playing = None;
        }
        self.toast.error("mpv process died");
        true
    }

    // ── Message handling ──────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => {
                let actions = match ev {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(w, h) => vec![Action::Resize(w, h)],
                    _ => vec![],
                };
                for action in actions {
                    self.dispatch(action).await;
                }
                true
            }

            AppMessage::FeedLoaded {
                round,
                feed,
                result,
            } => {
                if round != self.feed_round {
                    debug!("feed {:?} from round {} dropped", feed, round);
                    return false;
                }
                self.state.feeds_pending = self.state.feeds_pending.saturating_sub(1);
                // the feed loader already logged the outcome
                if self.state.page.on_feed_loaded(feed, result).is_err() {
                    self.state.feed_errors.push(feed);
                    self.toast
                        .warning(format!("{} could not be loaded", feed.title()));
                }
                let total = Feed::ALL.len();
                self.toast.progress(format!(
                    "loading feeds {}/{}",
                    total - self.state.feeds_pending,
                    total
                ));
                true
            }

            AppMessage::FeedsDone { round } => {
                if round != self.feed_round {
                    return false;
                }
                self.state.feeds_pending = 0;
                let failed = self.state.feed_errors.len();
                let outcome = if failed == 0 {
                    (Severity::Success, "feeds loaded".to_string())
                } else {
                    (
                        Severity::Warning,
                        format!("{} of {} feeds failed", failed, Feed::ALL.len()),
                    )
                };
                self.toast.finish_progress(Some(outcome));
                true
            }

            AppMessage::SearchDone { seq, result } => {
                match self.state.page.on_search_response(seq, result) {
                    SearchOutcome::Shown(n) => debug!("search #{}: {} results", seq, n),
                    SearchOutcome::NotFound => debug!("search #{}: nothing found", seq),
                    SearchOutcome::Failed => warn!("search #{} failed", seq),
                    SearchOutcome::Stale => return false,
                }
                true
            }

            AppMessage::FaviconProbed { element, ok } => {
                if ok {
                    return false;
                }
                match self.state.page.card_by_element_mut(element) {
                    Some(card) => card.image_mut().on_load_error(),
                    None => false,
                }
            }

            AppMessage::Mpv(ev) => self.on_mpv_event(ev),
        }
    }

    fn on_mpv_event(&mut self, ev: MpvEvent) -> bool {
        if ev.event_name() != Some("end-file") {
            return false;
        }
        match ev.end_reason() {
            Some(EndReason::Eof) | Some(EndReason::Error) => {}
            _ => return false,
        }
        let player = self.coordinator.backend();
        if !player.owns_entry(ev.playlist_entry_id()) {
            debug!("end-file for an old entry ignored");
            return false;
        }
        player.forget_loaded();
        let Some(element) = self.coordinator.stream_ended() else {
            return false;
        };
        self.state.now_playing = None;
        let reason = ev.file_error().unwrap_or("stream ended");
        warn!("stream stopped: {} ({})", element.src(), reason);
        self.toast.warning(format!("stream stopped: {}", reason));
        true
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        let s = &self.state;
        match self.focus.current() {
            ComponentId::HelpOverlay => return self.help_overlay.handle_key(key, s),
            ComponentId::SlideMenu => return self.slide_menu.handle_key(key, s),
            ComponentId::SearchBar => {
                return match key.code {
                    KeyCode::Down | KeyCode::Tab => vec![Action::CloseSearch],
                    _ => self.search_bar.handle_key(key, s),
                };
            }
            _ => {}
        }

        // Global keys (browse mode)
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('L') => return vec![Action::ToggleLogs],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Char('/') => return vec![Action::OpenSearch],
            KeyCode::Char('m') => return vec![Action::OpenMenu],
            KeyCode::Char('r') => return vec![Action::ReloadFeeds],
            KeyCode::Char('+') | KeyCode::Char('=') => return vec![Action::VolumeUp],
            KeyCode::Char('-') => return vec![Action::VolumeDown],
            KeyCode::Tab | KeyCode::Right => return vec![Action::NextCategory],
            KeyCode::BackTab | KeyCode::Left => return vec![Action::PrevCategory],
            KeyCode::Esc if self.focus.base() == ComponentId::LogPanel => {
                return vec![Action::FocusPane(ComponentId::Deck)]
            }
            KeyCode::Esc if !s.page.search.text().is_empty() => return vec![Action::ClearSearch],
            _ => {}
        }

        match self.focus.base() {
            ComponentId::LogPanel => self.log_panel.handle_key(key, s),
            _ => self.deck.handle_key(key, s),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }

        let col = event.column;
        let row = event.row;
        let areas = self.pane_areas.clone();
        let s = &self.state;
        let left_down = event.kind == MouseEventKind::Down(MouseButton::Left);

        // Overlays first; a click outside closes them.
        if self.focus.has_overlay(ComponentId::HelpOverlay) {
            return if left_down { vec![Action::ToggleHelp] } else { vec![] };
        }
        if self.focus.has_overlay(ComponentId::SlideMenu) {
            if hit(areas.menu, col, row) {
                return self.slide_menu.handle_mouse(event, areas.menu, s);
            }
            return if left_down { vec![Action::CloseMenu] } else { vec![] };
        }

        if hit(areas.header, col, row) {
            return self.header.handle_mouse(event, areas.header, s);
        }
        if hit(areas.search, col, row) {
            return self.search_bar.handle_mouse(event, areas.search, s);
        }

        // Leaving the search field by clicking elsewhere.
        let mut actions = Vec::new();
        if self.focus.base() == ComponentId::SearchBar && left_down {
            actions.push(Action::CloseSearch);
        }

        if hit(areas.deck, col, row) {
            if self.focus.base() != ComponentId::Deck && left_down {
                actions.push(Action::FocusPane(ComponentId::Deck));
            }
            actions.extend(self.deck.handle_mouse(event, areas.deck, s));
        } else if hit(areas.log_panel, col, row) {
            if self.focus.base() != ComponentId::LogPanel && left_down {
                actions.push(Action::FocusPane(ComponentId::LogPanel));
            }
            actions.extend(self.log_panel.handle_mouse(event, areas.log_panel, s));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Broadcast to all components first; they see the state before the action.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.header.on_action(&action, s));
            out.extend(self.search_bar.on_action(&action, s));
            out.extend(self.deck.on_action(&action, s));
            out.extend(self.slide_menu.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Secondary actions are depth-limited to one level
        for a in secondary {
            self.apply_action(a).await;
        }
        self.sync_input_mode();
    }

    async fn apply_action(&mut self, action: Action) {
        match action {
            Action::TogglePlayback(at) => self.toggle_playback(at).await,

            Action::VolumeUp => self.change_volume(VOLUME_STEP).await,
            Action::VolumeDown => self.change_volume(-VOLUME_STEP).await,

            Action::Highlight(at) => self.probe_favicon(at),

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        // Truncate for toast display
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::SelectCategory(category) => self.state.page.nav.select(category),
            Action::NextCategory => {
                let next = self.state.page.nav.active().next();
                self.state.page.nav.select(next);
            }
            Action::PrevCategory => {
                let prev = self.state.page.nav.active().prev();
                self.state.page.nav.select(prev);
            }

            Action::FocusPane(id) => self.focus.focus(id),

            Action::OpenMenu => {
                self.state.page.nav.open_menu();
                self.focus.push(ComponentId::SlideMenu);
            }
            Action::CloseMenu => {
                self.state.page.nav.close_menu();
                self.focus.remove(ComponentId::SlideMenu);
            }
            Action::MenuLink(category) => {
                self.state.page.nav.follow_menu_link(category);
                self.focus.remove(ComponentId::SlideMenu);
            }

            Action::OpenSearch => self.focus.focus(ComponentId::SearchBar),
            Action::CloseSearch => self.focus.focus(ComponentId::Deck),
            Action::SearchChanged(text) => {
                if let Some(ticket) = self.state.page.on_search_input(&text) {
                    self.spawn_search(ticket);
                }
            }
            Action::ClearSearch => self.state.page.clear_search(),

            Action::ReloadFeeds => self.start_feed_round(),

            Action::ToggleLogs => {
                self.state.show_log_panel = !self.state.show_log_panel;
                if !self.state.show_log_panel && self.focus.base() == ComponentId::LogPanel {
                    self.focus.focus(ComponentId::Deck);
                }
            }
            Action::ToggleHelp => {
                if self.focus.has_overlay(ComponentId::HelpOverlay) {
                    self.focus.remove(ComponentId::HelpOverlay);
                } else {
                    self.focus.push(ComponentId::HelpOverlay);
                }
            }
            Action::ToggleKeys => self.state.show_keys_bar = !self.state.show_keys_bar,

            Action::Quit => self.should_quit = true,
            Action::Resize(_, _) => {}
        }
    }

    async fn change_volume(&mut self, delta: f32) {
        self.state.volume = (self.state.volume + delta).clamp(0.0, 1.0);
        if let Err(e) = self.coordinator.backend().set_volume(self.state.volume).await {
            warn!("set volume failed: {}", e);
        }
    }

    async fn toggle_playback(&mut self, at: CardRef) {
        let Some(card) = self.state.page.card(at) else {
            return;
        };
        let element = card.audio().clone();
        let name = card.name().to_string();
        let was_paused = element.is_paused();
        let player_ready = self.coordinator.backend().is_ready();

        match self.coordinator.toggle(&element).await {
            PlayState::Playing => {
                self.state.now_playing = Some(name.clone());
                self.toast.info(format!("▶ {}", name));
            }
            PlayState::Paused if was_paused && !player_ready => {
                self.toast.warning("mpv is not running, nothing can play");
            }
            PlayState::Paused if was_paused => {
                // the single attempt failed; the icon is back on "play"
                self.toast.error(format!("stream not working: {}", name));
            }
            PlayState::Paused => self.state.now_playing = None,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Fill the terminal with the base background colour so gaps between
        // panes are not the terminal default.
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | search | deck | log | (keys bar) ─────────
        let status_h = if self.state.show_keys_bar { 1u16 } else { 0 };
        // collapsed log is a single line
        let log_h = if self.state.show_log_panel { 10u16 } else { 1 };

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(Header::HEIGHT),
                Constraint::Length(SearchBar::HEIGHT),
                Constraint::Min(0),
                Constraint::Length(log_h),
                Constraint::Length(status_h),
            ])
            .split(area);

        self.pane_areas.header = outer[0];
        self.pane_areas.search = outer[1];
        self.pane_areas.deck = outer[2];

        self.header.draw(frame, outer[0], false, &self.state);

        let search_focused = self.focus.is_focused(ComponentId::SearchBar);
        self.search_bar
            .draw(frame, outer[1], search_focused, &self.state);

        let deck_focused = self.focus.is_focused(ComponentId::Deck);
        self.deck.draw(frame, outer[2], deck_focused, &self.state);

        let log_focused = self.focus.is_focused(ComponentId::LogPanel);
        self.log_panel
            .draw(frame, outer[3], log_focused, &self.state);
        self.pane_areas.log_panel = outer[3];

        if self.state.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                outer[4],
                self.state.input_mode,
                self.state.volume,
                self.state.player_ready,
            );
        }

        // ── Slide menu (over the left edge) ──────────────────────────────────
        if self.state.page.nav.menu_open() {
            let menu_focused = self.focus.is_focused(ComponentId::SlideMenu);
            self.slide_menu.draw(frame, area, menu_focused, &self.state);
            self.pane_areas.menu = SlideMenu::area(area);
        } else {
            self.pane_areas.menu = Rect::default();
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        if self.help_overlay.visible {
            self.help_overlay.draw(frame, area, true, &self.state);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    /// Read the last lines of radiodeck.log into state.tui_log_lines.
    fn reload_tui_log(&mut self) {
        if let Ok(content) = std::fs::read_to_string(&self.tui_log_path) {
            let lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
            let start = lines.len().saturating_sub(LOG_TAIL_LINES);
            self.state.tui_log_lines = lines[start..].to_vec();
        }
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = match self.focus.current() {
            ComponentId::SlideMenu => InputMode::Menu,
            ComponentId::SearchBar => InputMode::Search,
            _ => InputMode::Normal,
        };
    }
}
