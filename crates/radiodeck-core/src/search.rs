//! Live search over station names.
//!
//! Every edit of the search field goes through [`SearchController::on_input`].
//! A non-empty query yields a [`SearchTicket`] the caller turns into one
//! request; the response comes back through
//! [`SearchController::on_response`]. Tickets carry a sequence number and a
//! response whose ticket is no longer the latest is dropped, so a slow
//! answer to an old query can never overwrite a newer one.

use tracing::debug;

use crate::card::Region;
use crate::error::Result;
use crate::station::Station;

pub const STATUS_PROMPT: &str = "Enter the radio you want to listen to...";
pub const STATUS_SEARCHING: &str = "Searching Radios";
pub const STATUS_NOT_FOUND: &str = "Radio not found";
pub const STATUS_FAILED: &str = "Sorry we cannot find your favorite radio";

pub const RESULTS_REGION_ID: &str = "search-results";

/// Trim and lower-case the field text; `None` when nothing is left.
pub fn normalize_query(text: &str) -> Option<String> {
    let q = text.trim().to_lowercase();
    if q.is_empty() {
        None
    } else {
        Some(q)
    }
}

/// One dispatched search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

/// What a response did to the results region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Cards mounted.
    Shown(usize),
    NotFound,
    Failed,
    /// A newer query was dispatched (or the field emptied) meanwhile.
    Stale,
}

#[derive(Debug)]
pub struct SearchController {
    text: String,
    seq: u64,
    results: Region,
    results_visible: bool,
    status: String,
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            seq: 0,
            results: Region::new(RESULTS_REGION_ID),
            results_visible: false,
            status: STATUS_PROMPT.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The clear affordance tracks the raw field, whitespace included.
    pub fn clear_visible(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    /// Default feed regions are shown whenever the results are not.
    pub fn defaults_visible(&self) -> bool {
        !self.results_visible
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn results(&self) -> &Region {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut Region {
        &mut self.results
    }

    /// The field changed to `text`.
    pub fn on_input(&mut self, text: &str) -> Option<SearchTicket> {
        self.text = text.to_string();
        // any edit supersedes whatever is in flight
        self.seq += 1;

        let Some(query) = normalize_query(text) else {
            self.results_visible = false;
            return None;
        };

        self.results_visible = true;
        self.status = STATUS_SEARCHING.to_string();
        self.results.clear();
        debug!("search #{} dispatched: {:?}", self.seq, query);
        Some(SearchTicket {
            seq: self.seq,
            query,
        })
    }

    /// A request finished.
    pub fn on_response(&mut self, seq: u64, result: Result<Vec<Station>>) -> SearchOutcome {
        if seq != self.seq {
            debug!("search #{} superseded by #{}, dropped", seq, self.seq);
            return SearchOutcome::Stale;
        }

        match result {
            Ok(stations) if stations.is_empty() => {
                self.status = STATUS_NOT_FOUND.to_string();
                SearchOutcome::NotFound
            }
            Ok(stations) => {
                self.status.clear();
                self.results.mount_stations(&stations);
                SearchOutcome::Shown(stations.len())
            }
            Err(e) => {
                debug!("search #{} failed: {}", seq, e);
                self.status = STATUS_FAILED.to_string();
                self.results.clear();
                SearchOutcome::Failed
            }
        }
    }

    /// The clear affordance was activated.
    pub fn clear(&mut self) {
        self.text.clear();
        self.seq += 1;
        self.results_visible = false;
        self.results.clear();
        self.status = STATUS_PROMPT.to_string();
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn stations(names: &[&str]) -> Vec<Station> {
        names
            .iter()
            .map(|n| Station {
                name: n.to_string(),
                url_resolved: format!("http://s/{}", n),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn normalizes_query() {
        assert_eq!(normalize_query("  Jazz FM "), Some("jazz fm".to_string()));
        assert_eq!(normalize_query(" \t "), None);
    }

    #[test]
    fn whitespace_only_restores_defaults_without_request() {
        let mut search = SearchController::new();
        assert!(search.on_input("jazz").is_some());
        assert!(search.results_visible());

        assert!(search.on_input("   ").is_none());
        assert!(!search.results_visible());
        assert!(search.defaults_visible());
        assert!(search.clear_visible());
    }

    #[test]
    fn dispatch_shows_searching_and_clears_previous_results() {
        let mut search = SearchController::new();
        let t = search.on_input("rock").unwrap();
        search.on_response(t.seq, Ok(stations(&["a", "b"])));
        assert_eq!(search.results().len(), 2);

        let t = search.on_input("rocks").unwrap();
        assert_eq!(t.query, "rocks");
        assert_eq!(search.status(), STATUS_SEARCHING);
        assert!(search.results().is_empty());
        assert!(!search.defaults_visible());
    }

    #[test]
    fn results_mount_in_order_and_clear_status() {
        let mut search = SearchController::new();
        let t = search.on_input("Jazz").unwrap();
        let outcome = search.on_response(t.seq, Ok(stations(&["one", "two", "three"])));
        assert_eq!(outcome, SearchOutcome::Shown(3));
        assert_eq!(search.status(), "");
        let names: Vec<&str> = search.results().cards().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn empty_array_reports_not_found() {
        let mut search = SearchController::new();
        let t = search.on_input("zzzz").unwrap();
        assert_eq!(search.on_response(t.seq, Ok(vec![])), SearchOutcome::NotFound);
        assert_eq!(search.status(), STATUS_NOT_FOUND);
        assert!(search.results().is_empty());
    }

    #[test]
    fn failure_sets_message_and_clears() {
        let mut search = SearchController::new();
        let t = search.on_input("x").unwrap();
        let err = ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(search.on_response(t.seq, Err(err)), SearchOutcome::Failed);
        assert_eq!(search.status(), STATUS_FAILED);
        assert!(search.results().is_empty());
    }

    #[test]
    fn slow_older_response_is_discarded() {
        let mut search = SearchController::new();
        let old = search.on_input("j").unwrap();
        let new = search.on_input("ja").unwrap();

        assert_eq!(search.on_response(new.seq, Ok(stations(&["jazz"]))), SearchOutcome::Shown(1));
        assert_eq!(search.on_response(old.seq, Ok(stations(&["j1", "j2"]))), SearchOutcome::Stale);
        assert_eq!(search.results().len(), 1);
        assert_eq!(search.results().cards()[0].name(), "jazz");
    }

    #[test]
    fn response_after_emptying_field_is_discarded() {
        let mut search = SearchController::new();
        let t = search.on_input("jazz").unwrap();
        search.on_input("");
        assert_eq!(search.on_response(t.seq, Ok(stations(&["a"]))), SearchOutcome::Stale);
        assert!(!search.results_visible());
    }

    #[test]
    fn clear_resets_everything() {
        let mut search = SearchController::new();
        let t = search.on_input("jazz").unwrap();
        search.on_response(t.seq, Ok(stations(&["a"])));

        search.clear();
        assert_eq!(search.text(), "");
        assert!(!search.clear_visible());
        assert!(!search.results_visible());
        assert!(search.results().is_empty());
        assert_eq!(search.status(), STATUS_PROMPT);
    }
}
