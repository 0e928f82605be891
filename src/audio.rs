//! Playback transport: a single stream behind a small state machine.
//!
//! `Transport` reports state changes, natural end of track and failures over
//! an `mpsc` channel; it knows nothing about playlists or repeat modes.

mod backend;
mod error;
mod sink;
mod transport;
mod types;

pub use backend::MediaBackend;
pub use error::TransportError;
pub use sink::RodioBackend;
pub use transport::Transport;
pub use types::{Position, TransportEvent, TransportState};

#[cfg(test)]
pub(crate) mod testing;
