//! `Page`: all display state of the directory in one place.
//!
//! Owns the five feed regions, the search results and the navigation state,
//! and wires the search field to region visibility. Anything that draws
//! reads from here; only the owning event loop writes.

use crate::card::{Region, StationCard};
use crate::error::Result;
use crate::feeds::{Feed, FeedRegions};
use crate::playback::ElementId;
use crate::nav::{Category, NavController};
use crate::search::{SearchController, SearchOutcome, SearchTicket};
use crate::station::Station;

/// Addresses one of the six regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKey {
    Feed(Feed),
    SearchResults,
}

/// Addresses one card by region and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardRef {
    pub region: RegionKey,
    pub index: usize,
}

#[derive(Debug)]
pub struct Page {
    pub feeds: FeedRegions,
    pub search: SearchController,
    pub nav: NavController,
}

impl Page {
    pub fn new(initial: Category) -> Self {
        Self {
            feeds: FeedRegions::new(),
            search: SearchController::new(),
            nav: NavController::new(initial),
        }
    }

    /// The search field changed. Hides or restores the feed regions and
    /// returns the request to issue, if any.
    pub fn on_search_input(&mut self, text: &str) -> Option<SearchTicket> {
        let ticket = self.search.on_input(text);
        if ticket.is_some() {
            self.nav.hide_all_regions();
        } else {
            self.nav.show_all_regions();
        }
        ticket
    }

    pub fn on_search_response(&mut self, seq: u64, result: Result<Vec<Station>>) -> SearchOutcome {
        self.search.on_response(seq, result)
    }

    /// The clear affordance was activated.
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.nav.show_all_regions();
    }

    pub fn on_feed_loaded(&mut self, feed: Feed, result: Result<Vec<Station>>) -> Result<usize> {
        self.feeds.apply(feed, result)
    }

    /// Feeds currently on screen, in tab order.
    pub fn visible_feeds(&self) -> Vec<Feed> {
        self.nav.visible_regions()
    }

    /// Regions on screen, top to bottom: the search results while a query is
    /// active, then whichever feeds are visible. Typing hides every feed; a
    /// tab chosen afterwards brings its feeds back under the results.
    pub fn displayed_regions(&self) -> Vec<RegionKey> {
        let feeds = self.visible_feeds().into_iter().map(RegionKey::Feed);
        if self.search.results_visible() {
            std::iter::once(RegionKey::SearchResults).chain(feeds).collect()
        } else {
            feeds.collect()
        }
    }

    pub fn region(&self, key: RegionKey) -> &Region {
        match key {
            RegionKey::Feed(feed) => self.feeds.get(feed),
            RegionKey::SearchResults => self.search.results(),
        }
    }

    pub fn region_mut(&mut self, key: RegionKey) -> &mut Region {
        match key {
            RegionKey::Feed(feed) => self.feeds.get_mut(feed),
            RegionKey::SearchResults => self.search.results_mut(),
        }
    }

    pub fn card(&self, at: CardRef) -> Option<&StationCard> {
        self.region(at.region).get(at.index)
    }

    pub fn card_mut(&mut self, at: CardRef) -> Option<&mut StationCard> {
        self.region_mut(at.region).get_mut(at.index)
    }

    /// Find a card by its audio element, wherever it is now. Regions may have
    /// been remounted since the element was handed out.
    pub fn card_by_element_mut(&mut self, id: ElementId) -> Option<&mut StationCard> {
        let keys = Feed::ALL
            .into_iter()
            .map(RegionKey::Feed)
            .chain(std::iter::once(RegionKey::SearchResults));
        for key in keys {
            let region = self.region(key);
            if let Some(idx) = region.cards().iter().position(|c| c.audio().id() == id) {
                return self.region_mut(key).get_mut(idx);
            }
        }
        None
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Category::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn stations(n: usize) -> Vec<Station> {
        (0..n)
            .map(|i| Station {
                name: format!("s{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn searching_hides_feeds_and_emptying_restores_all_five() {
        let mut page = Page::new(Category::Feed(Feed::Podcast));
        assert_eq!(page.visible_feeds(), vec![Feed::Podcast]);

        let ticket = page.on_search_input("jazz").unwrap();
        assert!(page.visible_feeds().is_empty());
        assert!(page.search.results_visible());
        page.on_search_response(ticket.seq, Ok(stations(3)));

        assert!(page.on_search_input("").is_none());
        assert_eq!(page.visible_feeds(), Feed::ALL.to_vec());
        assert!(!page.search.results_visible());
    }

    #[test]
    fn clear_button_restores_feeds() {
        let mut page = Page::default();
        page.on_search_input("rock");
        page.clear_search();
        assert_eq!(page.visible_feeds().len(), 5);
        assert_eq!(page.search.text(), "");
    }

    #[test]
    fn displayed_regions_follow_search_and_tabs() {
        let mut page = Page::new(Category::Feed(Feed::Voted));
        assert_eq!(page.displayed_regions(), vec![RegionKey::Feed(Feed::Voted)]);

        page.on_search_input("x");
        assert_eq!(page.displayed_regions(), vec![RegionKey::SearchResults]);

        page.clear_search();
        assert_eq!(page.displayed_regions().len(), 5);
    }

    #[test]
    fn tab_chosen_during_search_shows_beside_results() {
        let mut page = Page::default();
        page.on_search_input("jazz");
        assert_eq!(page.displayed_regions(), vec![RegionKey::SearchResults]);

        page.nav.select(Category::Feed(Feed::Podcast));
        assert_eq!(
            page.displayed_regions(),
            vec![RegionKey::SearchResults, RegionKey::Feed(Feed::Podcast)]
        );

        page.nav.select(Category::All);
        let shown = page.displayed_regions();
        assert_eq!(shown.len(), 6);
        assert_eq!(shown[0], RegionKey::SearchResults);

        // the next keystroke hides the feeds again
        page.on_search_input("jazzy");
        assert_eq!(page.displayed_regions(), vec![RegionKey::SearchResults]);
    }

    #[test]
    fn finds_card_by_element_after_lookup() {
        let mut page = Page::default();
        page.on_feed_loaded(Feed::Podcast, Ok(stations(3))).unwrap();
        let at = CardRef {
            region: RegionKey::Feed(Feed::Podcast),
            index: 2,
        };
        let id = page.card(at).unwrap().audio().id();

        let card = page.card_by_element_mut(id).unwrap();
        assert_eq!(card.name(), "s2");
        assert!(card.image().is_fallback());
    }

    #[test]
    fn one_failed_feed_leaves_others_populated() {
        let mut page = Page::default();
        for feed in Feed::ALL {
            let result = if feed == Feed::Trending {
                Err(ApiError::Decode("simulated".into()))
            } else {
                Ok(stations(4))
            };
            let _ = page.on_feed_loaded(feed, result);
        }
        for feed in Feed::ALL {
            let expected = if feed == Feed::Trending { 0 } else { 4 };
            assert_eq!(page.feeds.get(feed).len(), expected, "{:?}", feed);
        }
    }
}
