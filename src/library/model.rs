use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single playable file.
///
/// Identity is the `path`; two tracks with the same path are the same track
/// even when their names differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub path: PathBuf,
    pub duration: Option<Duration>,
}

impl Track {
    /// Build a track, truncating `duration` to whole seconds.
    ///
    /// Playlists persist durations as `hh:mm:ss`, so sub-second precision
    /// would not survive a save/load cycle anyway.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, duration: Option<Duration>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            duration: duration.map(|d| Duration::from_secs(d.as_secs())),
        }
    }

    pub fn same_file(&self, other: &Track) -> bool {
        self.path == other.path
    }
}

/// A saved playlist file in the playlist directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
    pub path: PathBuf,
}

impl PlaylistEntry {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?.to_string();
        Some(Self {
            name,
            path: path.to_path_buf(),
        })
    }
}
