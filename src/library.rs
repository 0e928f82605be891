//! Track library: directory scanning, flat-file playlists and the
//! "last used" defaults the player restores at startup.
//!
//! Scans run on a background worker (`ScanWorker`) so the event loop never
//! blocks on a large tree; playlist I/O is synchronous.

mod display;
mod error;
mod model;
mod playlist;
mod provider;
mod scan;
mod worker;

pub use display::{format_hms, parse_hms};
pub use error::LibraryError;
pub use model::{PlaylistEntry, Track};
pub use playlist::is_valid_playlist_name;
#[cfg(test)]
pub(crate) use playlist::write_playlist;
pub use provider::{Library, Scanner};
pub(crate) use scan::probe_duration;
pub use worker::{CancelToken, ScanReport, ScanWorker};
