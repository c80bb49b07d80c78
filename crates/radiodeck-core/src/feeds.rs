//! The five station feeds and their fan-out loader.
//!
//! All five requests start together in a [`JoinSet`]; outcomes are handed
//! back in completion order, each in its own failure domain. A failed feed
//! leaves its region exactly as it was.

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::api::DirectoryClient;
use crate::card::Region;
use crate::error::Result;
use crate::station::Station;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Most clicked.
    Top,
    /// Most recently clicked.
    Trending,
    /// Most voted.
    Voted,
    /// Most recently changed.
    Recent,
    /// Tagged `podcast`.
    Podcast,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::Top,
        Feed::Trending,
        Feed::Voted,
        Feed::Recent,
        Feed::Podcast,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Feed::Top => "/json/stations/topclick/100",
            Feed::Trending => "/json/stations/lastclick/100",
            Feed::Voted => "/json/stations/topvote/100",
            Feed::Recent => "/json/stations/lastchange/100",
            Feed::Podcast => "/json/stations/bytag/podcast",
        }
    }

    /// Identifier shared by the feed's region, its category tab and its
    /// description block.
    pub fn region_id(self) -> &'static str {
        match self {
            Feed::Top => "top",
            Feed::Trending => "trending",
            Feed::Voted => "voted",
            Feed::Recent => "added",
            Feed::Podcast => "podcast",
        }
    }

    pub fn from_region_id(id: &str) -> Option<Feed> {
        Feed::ALL.into_iter().find(|f| f.region_id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            Feed::Top => "Top Stations",
            Feed::Trending => "Trending Now",
            Feed::Voted => "Most Voted",
            Feed::Recent => "Recently Added",
            Feed::Podcast => "Podcasts",
        }
    }

    fn index(self) -> usize {
        match self {
            Feed::Top => 0,
            Feed::Trending => 1,
            Feed::Voted => 2,
            Feed::Recent => 3,
            Feed::Podcast => 4,
        }
    }
}

/// In-flight loads of all five feeds.
pub struct FeedLoads {
    tasks: JoinSet<(Feed, Result<Vec<Station>>)>,
}

impl FeedLoads {
    /// Start every feed request without waiting on any of them.
    pub fn spawn(client: &DirectoryClient) -> Self {
        let mut tasks = JoinSet::new();
        for feed in Feed::ALL {
            let client = client.clone();
            tasks.spawn(async move { (feed, client.feed(feed).await) });
        }
        Self { tasks }
    }

    /// Next finished feed, or `None` once all five have reported.
    pub async fn next(&mut self) -> Option<(Feed, Result<Vec<Station>>)> {
        loop {
            match self.tasks.join_next().await? {
                Ok(outcome) => return Some(outcome),
                // a panicked task only loses its own feed
                Err(e) => warn!("feed task aborted: {}", e),
            }
        }
    }
}

/// The five feed regions.
#[derive(Debug, Clone)]
pub struct FeedRegions {
    regions: [Region; 5],
}

impl FeedRegions {
    pub fn new() -> Self {
        Self {
            regions: Feed::ALL.map(|f| Region::new(f.region_id())),
        }
    }

    pub fn get(&self, feed: Feed) -> &Region {
        &self.regions[feed.index()]
    }

    pub fn get_mut(&mut self, feed: Feed) -> &mut Region {
        &mut self.regions[feed.index()]
    }

    /// Mount a successful load; on failure log and leave the region alone.
    /// Returns the number of cards mounted.
    pub fn apply(&mut self, feed: Feed, result: Result<Vec<Station>>) -> Result<usize> {
        match result {
            Ok(stations) => {
                let region = self.get_mut(feed);
                region.mount_stations(&stations);
                info!("feed {} loaded: {} stations", feed.region_id(), stations.len());
                Ok(stations.len())
            }
            Err(e) => {
                warn!("failed to load {}: {}", feed.title(), e);
                Err(e)
            }
        }
    }
}

impl Default for FeedRegions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_apply_logs_a_single_warning() {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .finish();

        let mut regions = FeedRegions::new();
        tracing::subscriber::with_default(subscriber, || {
            let _ = regions.apply(Feed::Trending, Err(ApiError::Decode("bad body".into())));
        });

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("WARN").count(), 1, "{}", text);
        assert!(text.contains("failed to load Trending Now"), "{}", text);
    }

    #[test]
    fn region_ids_round_trip() {
        for feed in Feed::ALL {
            assert_eq!(Feed::from_region_id(feed.region_id()), Some(feed));
        }
        assert_eq!(Feed::from_region_id("all"), None);
    }

    #[test]
    fn endpoints_match_directory_paths() {
        assert_eq!(Feed::Top.path(), "/json/stations/topclick/100");
        assert_eq!(Feed::Podcast.path(), "/json/stations/bytag/podcast");
    }

    #[test]
    fn failed_apply_keeps_previous_cards() {
        let mut regions = FeedRegions::new();
        let stations = vec![Station {
            name: "keep".into(),
            ..Default::default()
        }];
        assert_eq!(regions.apply(Feed::Voted, Ok(stations)).unwrap(), 1);

        let err = ApiError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert!(regions.apply(Feed::Voted, Err(err)).is_err());
        assert_eq!(regions.get(Feed::Voted).len(), 1);
        assert_eq!(regions.get(Feed::Voted).cards()[0].name(), "keep");
    }
}
