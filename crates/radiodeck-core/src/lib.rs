//! Station-directory client core: the radio-browser API, station cards,
//! single-slot playback, feeds, live search and navigation state.
//!
//! Nothing here draws to a terminal; `radiodeck-tui` renders a [`page::Page`]
//! and drives a [`playback::PlaybackCoordinator`] over mpv.

pub mod api;
pub mod card;
pub mod config;
pub mod error;
pub mod feeds;
pub mod nav;
pub mod page;
pub mod platform;
pub mod playback;
pub mod search;
pub mod station;
