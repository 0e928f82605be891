use std::path::{Path, PathBuf};

use crate::config::{DIR_PATH_KEY, DefaultsStore, LibrarySettings, PLAYLIST_PATH_KEY};

use super::error::LibraryError;
use super::model::{PlaylistEntry, Track};
use super::playlist::{list_playlists, playlist_file_name, read_playlist, write_playlist};
use super::scan::scan;
use super::worker::CancelToken;

/// The library's directory walk, detached so it can run on a worker thread.
#[derive(Debug, Clone)]
pub struct Scanner {
    settings: LibrarySettings,
}

impl Scanner {
    /// Blocking recursive scan of `dir` with the library's extension filter.
    pub fn scan_directory(&self, dir: &Path, cancel: &CancelToken) -> Result<Vec<Track>, LibraryError> {
        scan(dir, &self.settings, cancel)
    }
}

/// Turns directories and playlist files into track lists and remembers the
/// last used ones.
pub struct Library<S: DefaultsStore> {
    settings: LibrarySettings,
    playlist_dir: PathBuf,
    pub(super) defaults: S,
}

impl<S: DefaultsStore> Library<S> {
    pub fn new(settings: LibrarySettings, playlist_dir: PathBuf, defaults: S) -> Self {
        Self {
            settings,
            playlist_dir,
            defaults,
        }
    }

    pub fn scanner(&self) -> Scanner {
        Scanner {
            settings: self.settings.clone(),
        }
    }

    pub fn load_playlist(&self, path: &Path) -> Result<Vec<Track>, LibraryError> {
        read_playlist(path)
    }

    /// Save `tracks` as `<playlist dir>/<name>.txt` and return that path.
    pub fn save_playlist(&self, name: &str, tracks: &[Track]) -> Result<PathBuf, LibraryError> {
        let path = self.playlist_dir.join(playlist_file_name(name)?);
        write_playlist(&path, tracks)?;
        Ok(path)
    }

    pub fn list_playlists(&self) -> Result<Vec<PlaylistEntry>, LibraryError> {
        list_playlists(&self.playlist_dir)
    }

    pub fn set_default_directory(&mut self, dir: &Path) -> Result<(), LibraryError> {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        self.defaults.set(DIR_PATH_KEY, &dir.to_string_lossy())?;
        Ok(())
    }

    pub fn set_default_playlist(&mut self, path: &Path) -> Result<(), LibraryError> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        self.defaults.set(PLAYLIST_PATH_KEY, &path.to_string_lossy())?;
        Ok(())
    }

    pub fn default_directory(&self) -> Option<PathBuf> {
        self.defaults.get(DIR_PATH_KEY).map(PathBuf::from)
    }

    pub fn default_playlist(&self) -> Option<PathBuf> {
        self.defaults.get(PLAYLIST_PATH_KEY).map(PathBuf::from)
    }

    pub fn has_default_directory(&self) -> bool {
        self.default_directory().is_some()
    }

    pub fn has_default_playlist(&self) -> bool {
        self.default_playlist().is_some()
    }
}
