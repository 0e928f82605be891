use std::path::PathBuf;

use crate::sequencer::RepeatMode;

/// Everything a front end can ask the player to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play the selected track, resuming it when it is the loaded one.
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    /// Toggle mute.
    Mute,
    SetRepeatMode(RepeatMode),
    OpenDirectory(PathBuf),
    SavePlaylist(String),
    /// Open the saved playlist at this index of `App::playlists()`.
    OpenPlaylist(usize),
}

/// Which component reported an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorSource {
    Transport,
    Library,
}

/// Notifications for the front end, drained with `App::take_events`.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Error { source: ErrorSource, message: String },
    TrackStarted(PathBuf),
    TracksReplaced { count: usize },
    PlaylistSaved(PathBuf),
}
