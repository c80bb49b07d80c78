//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this; only the App event-loop writes to it.

use radiodeck_core::card::StationCard;
use radiodeck_core::feeds::Feed;
use radiodeck_core::page::{Page, RegionKey};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// Every region, the search state and the navigation state.
    pub page: Page,

    // ── Player ──────────────────────────────────────────────────────────────
    /// 0.0..=1.0, applied to mpv.
    pub volume: f32,
    /// mpv is running and connected.
    pub player_ready: bool,
    /// Name of the station in the playback slot. Outlives its card when the
    /// region is remounted underneath it.
    pub now_playing: Option<String>,

    // ── Feeds ───────────────────────────────────────────────────────────────
    /// Feeds of the current load round that have not reported yet.
    pub feeds_pending: usize,
    /// Feeds whose last load failed.
    pub feed_errors: Vec<Feed>,

    // ── UI ──────────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub show_keys_bar: bool,
    pub show_log_panel: bool,
    /// Cached lines from radiodeck.log (refreshed periodically by App).
    pub tui_log_lines: Vec<String>,
}

impl AppState {
    pub fn new(page: Page, volume: f32, show_keys_bar: bool) -> Self {
        Self {
            page,
            volume,
            player_ready: false,
            now_playing: None,
            feeds_pending: 0,
            feed_errors: Vec::new(),
            input_mode: InputMode::Normal,
            show_keys_bar,
            show_log_panel: false,
            tui_log_lines: Vec::new(),
        }
    }

    /// The card whose control currently shows "pause", wherever it is.
    pub fn playing_card(&self) -> Option<&StationCard> {
        Feed::ALL
            .into_iter()
            .map(RegionKey::Feed)
            .chain(std::iter::once(RegionKey::SearchResults))
            .flat_map(|key| self.page.region(key).cards())
            .find(|card| !card.audio().is_paused())
    }

    pub fn feed_failed(&self, feed: Feed) -> bool {
        self.feed_errors.contains(&feed)
    }
}
