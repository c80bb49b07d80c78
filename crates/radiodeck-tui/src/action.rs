//! Action enum: all user-initiated intents and internal events.

use radiodeck_core::nav::Category;
use radiodeck_core::page::CardRef;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    SearchBar,
    Deck,
    SlideMenu,
    LogPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    /// Play/pause control of one card.
    TogglePlayback(CardRef),
    VolumeUp,
    VolumeDown,

    // ── Cards ────────────────────────────────────────────────────────────────
    /// A card became the highlighted one (probe its favicon).
    Highlight(CardRef),
    CopyToClipboard(String),

    // ── Navigation ───────────────────────────────────────────────────────────
    SelectCategory(Category),
    NextCategory,
    PrevCategory,
    FocusPane(ComponentId),
    OpenMenu,
    CloseMenu,
    /// A link inside the slide menu.
    MenuLink(Category),

    // ── Search ───────────────────────────────────────────────────────────────
    OpenSearch,
    /// Search field text after an edit.
    SearchChanged(String),
    /// The clear affordance.
    ClearSearch,
    CloseSearch,

    // ── Feeds ────────────────────────────────────────────────────────────────
    ReloadFeeds,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
