pub mod pane_chrome;
pub mod scroll_window;
pub mod search_input;
pub mod status_bar;
pub mod toast;
