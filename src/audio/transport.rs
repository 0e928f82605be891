use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use super::backend::MediaBackend;
use super::error::TransportError;
use super::types::{Position, TransportEvent, TransportState};

/// Single point of control for the one playing stream.
///
/// Backend failures never escape: they are logged, reported as
/// `TransportEvent::Error` and leave the transport in `Unknown`.
pub struct Transport<B: MediaBackend> {
    backend: B,
    state: TransportState,
    loaded: Option<PathBuf>,
    volume: f32,
    muted: bool,
    events: Sender<TransportEvent>,
}

impl<B: MediaBackend> Transport<B> {
    pub fn new(mut backend: B, events: Sender<TransportEvent>) -> Self {
        backend.set_volume(1.0);
        backend.set_muted(false);
        Self {
            backend,
            state: TransportState::Unknown,
            loaded: None,
            volume: 1.0,
            muted: false,
            events,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    /// Play `path`, resuming it when it is already loaded.
    pub fn play(&mut self, path: &Path) {
        let resume = self.state != TransportState::Unknown && self.loaded_path() == Some(path);

        let result = if resume {
            self.backend.play()
        } else {
            self.load_and_play(path)
        };

        match result {
            Ok(()) => self.set_state(TransportState::Playing),
            Err(e) => self.fail(e),
        }
    }

    fn load_and_play(&mut self, path: &Path) -> Result<(), TransportError> {
        self.loaded = None;
        self.backend.open(path)?;
        self.loaded = Some(path.to_path_buf());
        self.backend.play()
    }

    pub fn can_pause(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn can_stop(&self) -> bool {
        matches!(self.state, TransportState::Playing | TransportState::Paused)
    }

    /// Pause the playing stream. Ignored unless `can_pause()`.
    pub fn pause(&mut self) {
        if !self.can_pause() {
            log::warn!("pause rejected in state {:?}", self.state);
            return;
        }
        match self.backend.pause() {
            Ok(()) => self.set_state(TransportState::Paused),
            Err(e) => self.fail(e),
        }
    }

    /// Stop and release the position. Ignored unless `can_stop()`.
    pub fn stop(&mut self) {
        if !self.can_stop() {
            log::warn!("stop rejected in state {:?}", self.state);
            return;
        }
        match self.backend.stop() {
            Ok(()) => self.set_state(TransportState::Stopped),
            Err(e) => self.fail(e),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip mute and return the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.backend.set_muted(self.muted);
        self.muted
    }

    /// Elapsed/total time, or `None` when stopped, idle or of unknown length.
    pub fn query_position(&self) -> Option<Position> {
        if !matches!(self.state, TransportState::Playing | TransportState::Paused) {
            return None;
        }
        let total = self.backend.duration()?;
        let elapsed = self.backend.position()?.min(total);
        Some(Position { elapsed, total })
    }

    /// Check the backend for a natural end of stream.
    ///
    /// Sends `StateChanged(Stopped)` followed by exactly one `TrackFinished`.
    pub fn poll(&mut self) {
        if self.state != TransportState::Playing || !self.backend.is_finished() {
            return;
        }

        log::debug!(
            "track finished: {}",
            self.loaded
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );

        if let Err(e) = self.backend.stop() {
            self.fail(e);
            return;
        }
        self.set_state(TransportState::Stopped);
        self.emit(TransportEvent::TrackFinished);
    }

    fn set_state(&mut self, state: TransportState) {
        log::debug!("transport {:?} -> {:?}", self.state, state);
        self.state = state;
        self.emit(TransportEvent::StateChanged(state));
    }

    fn fail(&mut self, err: TransportError) {
        log::error!("transport error: {err}");
        self.set_state(TransportState::Unknown);
        self.emit(TransportEvent::Error(err.to_string()));
    }

    fn emit(&self, event: TransportEvent) {
        let _ = self.events.send(event);
    }
}
