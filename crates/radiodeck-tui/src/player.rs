//! `AudioBackend` over one shared mpv process.
//!
//! Every card has its own audio element but there is only one mpv. Playing
//! an element loads its stream; pausing it stops mpv only if that element is
//! the one loaded, so demoting a stale element never cuts off the current one.

use std::sync::Mutex;

use tracing::debug;

use radiodeck_core::error::PlaybackError;
use radiodeck_core::playback::{AudioBackend, AudioElement, ElementId};

use crate::mpv::MpvHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Loaded {
    element: ElementId,
    entry: Option<u64>,
}

#[derive(Default)]
pub struct MpvPlayer {
    handle: Mutex<Option<MpvHandle>>,
    loaded: Mutex<Option<Loaded>>,
}

impl MpvPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a freshly connected mpv, or detach with `None`.
    pub fn set_handle(&self, handle: Option<MpvHandle>) {
        *self.handle.lock().unwrap_or_else(|e| e.into_inner()) = handle;
        self.set_loaded(None);
    }

    pub fn is_ready(&self) -> bool {
        self.handle().is_some()
    }

    fn handle(&self) -> Option<MpvHandle> {
        self.handle.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn loaded(&self) -> Option<Loaded> {
        *self.loaded.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_loaded(&self, loaded: Option<Loaded>) {
        *self.loaded.lock().unwrap_or_else(|e| e.into_inner()) = loaded;
    }

    /// Whether an `end-file` for `entry` concerns the stream we loaded last.
    /// Events without an id (older mpv) are assumed to.
    pub fn owns_entry(&self, entry: Option<u64>) -> bool {
        match (self.loaded(), entry) {
            (None, _) => false,
            (Some(Loaded { entry: Some(ours), .. }), Some(theirs)) => ours == theirs,
            (Some(_), _) => true,
        }
    }

    /// The loaded stream ended on its own; nothing is loaded any more.
    pub fn forget_loaded(&self) {
        self.set_loaded(None);
    }

    pub async fn set_volume(&self, volume: f32) -> anyhow::Result<()> {
        match self.handle() {
            Some(h) => h.set_volume(volume).await,
            None => Ok(()),
        }
    }
}

impl AudioBackend for MpvPlayer {
    async fn play(&self, element: &AudioElement) -> Result<(), PlaybackError> {
        let handle = self
            .handle()
            .ok_or_else(|| PlaybackError::Unavailable("mpv is not running".into()))?;
        if element.src().trim().is_empty() {
            return Err(PlaybackError::Stream("station has no stream url".into()));
        }
        let entry = handle
            .load_stream(element.src())
            .await
            .map_err(|e| PlaybackError::Stream(e.to_string()))?;
        self.set_loaded(Some(Loaded {
            element: element.id(),
            entry,
        }));
        Ok(())
    }

    async fn pause(&self, element: &AudioElement) -> Result<(), PlaybackError> {
        if self.loaded().map(|l| l.element) != Some(element.id()) {
            debug!("pause: {} is not the loaded stream", element.src());
            return Ok(());
        }
        self.set_loaded(None);
        let handle = self
            .handle()
            .ok_or_else(|| PlaybackError::Unavailable("mpv is not running".into()))?;
        handle
            .stop()
            .await
            .map_err(|e| PlaybackError::Stream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn play_without_mpv_is_unavailable() {
        let player = MpvPlayer::new();
        let el = AudioElement::new("http://stream.example/a");
        assert!(matches!(player.play(&el).await, Err(PlaybackError::Unavailable(_))));
        assert!(!player.is_ready());
    }

    #[tokio::test]
    async fn pausing_an_unloaded_element_is_a_no_op() {
        let player = MpvPlayer::new();
        let el = AudioElement::new("http://stream.example/a");
        assert!(player.pause(&el).await.is_ok());
    }

    #[test]
    fn entry_ownership() {
        let player = MpvPlayer::new();
        assert!(!player.owns_entry(Some(1)));

        let el = AudioElement::new("http://a");
        player.set_loaded(Some(Loaded {
            element: el.id(),
            entry: Some(4),
        }));
        assert!(player.owns_entry(Some(4)));
        assert!(!player.owns_entry(Some(3)));
        assert!(player.owns_entry(None));

        player.forget_loaded();
        assert!(!player.owns_entry(Some(4)));
    }
}
