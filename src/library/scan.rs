use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;

use super::error::LibraryError;
use super::model::Track;
use super::worker::CancelToken;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Files before subdirectories, then by file name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Read the playing time of `path`, if lofty understands the file.
pub(crate) fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()),
        Err(e) => {
            log::debug!("no duration for {}: {e}", path.display());
            None
        }
    }
}

/// Recursively collect the audio files below `dir`.
///
/// Inside each directory, files are listed before descending into
/// subdirectories. Unreadable entries are skipped. A tree without any
/// matching file is reported as `LibraryError::NoTracks`.
pub fn scan(
    dir: &Path,
    settings: &LibrarySettings,
    cancel: &CancelToken,
) -> Result<Vec<Track>, LibraryError> {
    if dir.as_os_str().is_empty() {
        return Err(LibraryError::EmptyPath);
    }

    let meta = fs::metadata(dir).map_err(|source| LibraryError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(LibraryError::NotADirectory(dir.to_path_buf()));
    }

    let mut tracks: Vec<Track> = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by(files_first);

    for entry in walker {
        if cancel.is_cancelled() {
            return Err(LibraryError::Cancelled(dir.to_path_buf()));
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        tracks.push(Track::new(name, path, probe_duration(path)));
    }

    if tracks.is_empty() {
        return Err(LibraryError::NoTracks(dir.to_path_buf()));
    }

    log::info!("scanned {} tracks from {}", tracks.len(), dir.display());
    Ok(tracks)
}
