//! Station cards and the regions that hold them.
//!
//! Construction (`StationCard::from_station`) is pure; the only mutation is
//! [`Region::mount`], which drops a region's cards and appends new ones.

use crate::playback::{AudioElement, AudioHandle, PlayIcon};
use crate::station::Station;

/// Image shown when a station has no usable favicon or it fails to load.
pub const FALLBACK_IMAGE: &str = "img/radio.jpg";

/// A card's image source with its one-shot error handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CardImage {
    src: String,
    error_handler_armed: bool,
    load_requested: bool,
}

impl CardImage {
    pub fn for_station(station: &Station) -> Self {
        Self {
            src: station
                .usable_favicon()
                .unwrap_or(FALLBACK_IMAGE)
                .to_string(),
            error_handler_armed: true,
            load_requested: false,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_fallback(&self) -> bool {
        self.src == FALLBACK_IMAGE
    }

    /// Claim the one load of this image. Returns the source the first time
    /// for a station favicon, `None` for the fallback or once claimed. The
    /// claim lives and dies with the card.
    pub fn request_load(&mut self) -> Option<String> {
        if self.is_fallback() || self.load_requested {
            return None;
        }
        self.load_requested = true;
        Some(self.src.clone())
    }

    /// The image failed to load. Swaps to the fallback the first time and
    /// disarms itself, so a broken fallback cannot loop. Returns whether the
    /// source changed.
    pub fn on_load_error(&mut self) -> bool {
        if !self.error_handler_armed {
            return false;
        }
        self.error_handler_armed = false;
        let changed = self.src != FALLBACK_IMAGE;
        self.src = FALLBACK_IMAGE.to_string();
        changed
    }
}

/// One rendered, playable station.
#[derive(Debug, Clone)]
pub struct StationCard {
    station: Station,
    image: CardImage,
    audio: AudioHandle,
}

impl StationCard {
    pub fn from_station(station: &Station) -> Self {
        Self {
            image: CardImage::for_station(station),
            audio: AudioElement::new(station.url_resolved.clone()),
            station: station.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.station.name
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn image(&self) -> &CardImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut CardImage {
        &mut self.image
    }

    pub fn audio(&self) -> &AudioHandle {
        &self.audio
    }

    pub fn icon(&self) -> PlayIcon {
        self.audio.icon()
    }
}

/// A named container of cards (one per feed, plus search results).
#[derive(Debug, Clone)]
pub struct Region {
    id: &'static str,
    cards: Vec<StationCard>,
}

impl Region {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            cards: Vec::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Replace every card with `cards`, keeping their order.
    pub fn mount(&mut self, cards: impl IntoIterator<Item = StationCard>) {
        self.cards.clear();
        self.cards.extend(cards);
    }

    /// Build one card per station and mount them.
    pub fn mount_stations(&mut self, stations: &[Station]) {
        self.mount(stations.iter().map(StationCard::from_station));
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[StationCard] {
        &self.cards
    }

    pub fn get(&self, idx: usize) -> Option<&StationCard> {
        self.cards.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut StationCard> {
        self.cards.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
