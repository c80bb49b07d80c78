//! Single-slot playback coordination.
//!
//! Every card owns one [`AudioElement`]. At most one element across the whole
//! application may be playing; the [`PlaybackSlot`] remembers which one, and
//! the [`PlaybackCoordinator`] runs the toggle protocol:
//!
//! ```text
//!   toggle(B) while A plays:
//!     pause A, A.icon = play, slot cleared
//!     play B  ── ok ──▶ B.icon = pause, slot = B
//!             └─ err ─▶ B.icon = play,  slot stays empty
//! ```
//!
//! The media side sits behind [`AudioBackend`] so the protocol can be driven
//! by a fake in tests and by mpv in the TUI.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::PlaybackError;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Icon shown on a card's play/pause control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Pause,
}

/// Per-element playback state. `Paused` is initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Playing,
}

/// How much of the stream is fetched before playback is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preload {
    /// Nothing until `play`.
    None,
    /// Let the backend buffer ahead of time.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

/// The audio element of one card, together with the control it drives.
///
/// The element outlives its card if the slot still references it, so the
/// coordinator can reset the icon of a card whose region was refreshed.
#[derive(Debug)]
pub struct AudioElement {
    id: ElementId,
    src: String,
    preload: Preload,
    playing: AtomicBool,
    icon_pause: AtomicBool,
}

pub type AudioHandle = Arc<AudioElement>;

impl AudioElement {
    pub fn new(src: impl Into<String>) -> AudioHandle {
        Arc::new(Self {
            id: ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed)),
            src: src.into(),
            preload: Preload::None,
            playing: AtomicBool::new(false),
            icon_pause: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn preload(&self) -> Preload {
        self.preload
    }

    pub fn state(&self) -> PlayState {
        if self.playing.load(Ordering::Acquire) {
            PlayState::Playing
        } else {
            PlayState::Paused
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state() == PlayState::Paused
    }

    pub fn icon(&self) -> PlayIcon {
        if self.icon_pause.load(Ordering::Acquire) {
            PlayIcon::Pause
        } else {
            PlayIcon::Play
        }
    }

    fn mark_playing(&self) {
        self.playing.store(true, Ordering::Release);
        self.icon_pause.store(true, Ordering::Release);
    }

    fn mark_paused(&self) {
        self.playing.store(false, Ordering::Release);
        self.icon_pause.store(false, Ordering::Release);
    }
}

/// Media operations the coordinator needs.
pub trait AudioBackend {
    /// Start streaming `element.src()`. One attempt; an error means the
    /// element did not start.
    fn play(&self, element: &AudioElement) -> impl Future<Output = Result<(), PlaybackError>> + Send;

    /// Stop producing sound for `element`.
    fn pause(&self, element: &AudioElement) -> impl Future<Output = Result<(), PlaybackError>> + Send;
}

/// Registry of the one element allowed to play.
#[derive(Debug, Default)]
pub struct PlaybackSlot {
    occupant: Option<AudioHandle>,
}

impl PlaybackSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&AudioHandle> {
        self.occupant.as_ref()
    }

    pub fn is_occupied_by(&self, element: &AudioElement) -> bool {
        self.occupant
            .as_ref()
            .is_some_and(|o| o.id() == element.id())
    }

    /// Make `element` the occupant. Returns the previous occupant when it was
    /// a different element; the caller is responsible for demoting it.
    pub fn acquire(&mut self, element: &AudioHandle) -> Option<AudioHandle> {
        match self.occupant.replace(Arc::clone(element)) {
            Some(prev) if prev.id() != element.id() => Some(prev),
            _ => None,
        }
    }

    /// Clear the slot if `element` holds it. Returns whether it did.
    pub fn release(&mut self, element: &AudioElement) -> bool {
        if self.is_occupied_by(element) {
            self.occupant = None;
            true
        } else {
            false
        }
    }
}

pub struct PlaybackCoordinator<B> {
    backend: B,
    slot: PlaybackSlot,
}

impl<B: AudioBackend> PlaybackCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slot: PlaybackSlot::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn slot(&self) -> &PlaybackSlot {
        &self.slot
    }

    /// The play/pause control of the card owning `element` was activated.
    pub async fn toggle(&mut self, element: &AudioHandle) -> PlayState {
        if let Some(prev) = self
            .slot
            .current()
            .filter(|p| p.id() != element.id())
            .cloned()
        {
            self.demote(&prev).await;
            self.slot.release(&prev);
        }

        if element.is_paused() {
            match self.backend.play(element).await {
                Ok(()) => {
                    element.mark_playing();
                    if let Some(displaced) = self.slot.acquire(element) {
                        self.demote(&displaced).await;
                    }
                    info!("playing {}", element.src());
                    PlayState::Playing
                }
                Err(e) => {
                    warn!("stream not working: {} ({})", element.src(), e);
                    element.mark_paused();
                    PlayState::Paused
                }
            }
        } else {
            if let Err(e) = self.backend.pause(element).await {
                warn!("pause failed for {}: {}", element.src(), e);
            }
            element.mark_paused();
            self.slot.release(element);
            debug!("paused {}", element.src());
            PlayState::Paused
        }
    }

    /// The backend reported that the occupant's stream ended on its own
    /// (server hung up, decoder error). Returns the element that was reset.
    pub fn stream_ended(&mut self) -> Option<AudioHandle> {
        let occupant = self.slot.current().cloned()?;
        occupant.mark_paused();
        self.slot.release(&occupant);
        info!("stream ended: {}", occupant.src());
        Some(occupant)
    }

    /// Pause whatever is playing (used on shutdown).
    pub async fn stop_all(&mut self) {
        if let Some(occupant) = self.slot.current().cloned() {
            self.demote(&occupant).await;
            self.slot.release(&occupant);
        }
    }

    async fn demote(&self, element: &AudioElement) {
        if let Err(e) = self.backend.pause(element).await {
            warn!("pause failed for {}: {}", element.src(), e);
        }
        element.mark_paused();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(ElementId),
        Pause(ElementId),
    }

    /// Records calls; fails `play` for any src containing "broken".
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
    }

    impl FakeBackend {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AudioBackend for FakeBackend {
        async fn play(&self, element: &AudioElement) -> Result<(), PlaybackError> {
            self.calls.lock().unwrap().push(Call::Play(element.id()));
            if element.src().contains("broken") {
                Err(PlaybackError::Stream("unsupported".into()))
            } else {
                Ok(())
            }
        }

        async fn pause(&self, element: &AudioElement) -> Result<(), PlaybackError> {
            self.calls.lock().unwrap().push(Call::Pause(element.id()));
            Ok(())
        }
    }

    fn playing_count(elements: &[&AudioHandle]) -> usize {
        elements.iter().filter(|e| !e.is_paused()).count()
    }

    #[test]
    fn new_element_is_paused_with_play_icon() {
        let a = AudioElement::new("http://a");
        assert_eq!(a.state(), PlayState::Paused);
        assert_eq!(a.icon(), PlayIcon::Play);
        assert_eq!(a.preload(), Preload::None);
    }

    #[test]
    fn slot_acquire_returns_previous_other_occupant() {
        let a = AudioElement::new("http://a");
        let b = AudioElement::new("http://b");
        let mut slot = PlaybackSlot::new();
        assert!(slot.acquire(&a).is_none());
        assert!(slot.acquire(&a).is_none());
        let prev = slot.acquire(&b).expect("a displaced");
        assert_eq!(prev.id(), a.id());
        assert!(!slot.release(&a));
        assert!(slot.release(&b));
        assert!(slot.current().is_none());
    }

    #[tokio::test]
    async fn toggle_plays_then_pauses() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");

        assert_eq!(coord.toggle(&a).await, PlayState::Playing);
        assert_eq!(a.icon(), PlayIcon::Pause);
        assert!(coord.slot().is_occupied_by(&a));

        assert_eq!(coord.toggle(&a).await, PlayState::Paused);
        assert_eq!(a.icon(), PlayIcon::Play);
        assert!(coord.slot().current().is_none());
        assert_eq!(coord.backend().calls(), vec![Call::Play(a.id()), Call::Pause(a.id())]);
    }

    #[tokio::test]
    async fn playing_b_demotes_a_first() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");
        let b = AudioElement::new("http://b");

        coord.toggle(&a).await;
        coord.toggle(&b).await;

        assert_eq!(a.state(), PlayState::Paused);
        assert_eq!(a.icon(), PlayIcon::Play);
        assert_eq!(b.state(), PlayState::Playing);
        assert_eq!(b.icon(), PlayIcon::Pause);
        assert!(coord.slot().is_occupied_by(&b));
        assert_eq!(
            coord.backend().calls(),
            vec![Call::Play(a.id()), Call::Pause(a.id()), Call::Play(b.id())]
        );
    }

    #[tokio::test]
    async fn failed_play_resets_icon_and_leaves_slot_empty() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");
        let broken = AudioElement::new("http://broken");

        coord.toggle(&a).await;
        assert_eq!(coord.toggle(&broken).await, PlayState::Paused);

        assert_eq!(broken.icon(), PlayIcon::Play);
        assert_eq!(a.state(), PlayState::Paused);
        assert!(coord.slot().current().is_none());
    }

    #[tokio::test]
    async fn demotes_element_whose_card_was_dropped() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");
        let weak = Arc::downgrade(&a);
        coord.toggle(&a).await;
        // region refresh drops the card's handle; the slot keeps it alive
        drop(a);

        let b = AudioElement::new("http://b");
        coord.toggle(&b).await;

        let a = weak.upgrade();
        assert!(a.is_none(), "slot released the detached element");
        assert!(coord.slot().is_occupied_by(&b));
    }

    #[tokio::test]
    async fn never_more_than_one_playing() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");
        let b = AudioElement::new("http://b");
        let c = AudioElement::new("http://broken-c");
        let all = [&a, &b, &c];

        for el in [&a, &b, &b, &c, &a, &a, &b, &c, &c, &b] {
            coord.toggle(el).await;
            assert!(playing_count(&all) <= 1);
        }
    }

    #[tokio::test]
    async fn stream_end_and_stop_all_clear_slot() {
        let mut coord = PlaybackCoordinator::new(FakeBackend::default());
        let a = AudioElement::new("http://a");

        coord.toggle(&a).await;
        let ended = coord.stream_ended().expect("occupant");
        assert_eq!(ended.id(), a.id());
        assert_eq!(a.icon(), PlayIcon::Play);
        assert!(coord.stream_ended().is_none());

        coord.toggle(&a).await;
        coord.stop_all().await;
        assert!(a.is_paused());
        assert!(coord.slot().current().is_none());
    }
}
