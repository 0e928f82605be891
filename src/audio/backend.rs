use std::path::Path;
use std::time::Duration;

use super::error::TransportError;

/// The decoder/output device behind a `Transport`.
///
/// Implementations hold at most one stream. `open` leaves it paused at the
/// start; `stop` releases it, and a later `play` reopens the last opened file
/// from the beginning.
pub trait MediaBackend {
    fn open(&mut self, path: &Path) -> Result<(), TransportError>;
    fn play(&mut self) -> Result<(), TransportError>;
    fn pause(&mut self) -> Result<(), TransportError>;
    fn stop(&mut self) -> Result<(), TransportError>;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    /// Elapsed time of the loaded stream, `None` when nothing is loaded.
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    /// True once a playing stream has run out of samples.
    fn is_finished(&self) -> bool;
}
