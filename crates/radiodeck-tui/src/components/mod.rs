pub mod deck;
pub mod header;
pub mod help_overlay;
pub mod log_panel;
pub mod search_bar;
pub mod slide_menu;
