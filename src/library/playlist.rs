//! Flat playlist files.
//!
//! One record per three lines: name, path, duration (`hh:mm:ss` or empty).
//! A trailing partial record is ignored on read.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::display::{format_hms, parse_hms};
use super::error::LibraryError;
use super::model::{PlaylistEntry, Track};

const PLAYLIST_EXTENSION: &str = "txt";

/// Parse playlist text into tracks, in file order.
pub(crate) fn parse_playlist(text: &str) -> Vec<Track> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .chunks_exact(3)
        .map(|rec| Track::new(rec[0], rec[1], parse_hms(rec[2])))
        .collect()
}

/// Read the playlist stored at `path`.
pub fn read_playlist(path: &Path) -> Result<Vec<Track>, LibraryError> {
    let text = fs::read_to_string(path).map_err(|source| LibraryError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let tracks = parse_playlist(&text);
    log::info!("loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Write `tracks` to `path`, replacing any previous content.
///
/// Tracks whose path is not valid UTF-8 cannot be stored in the text format
/// and are left out with a warning.
pub fn write_playlist(path: &Path, tracks: &[Track]) -> Result<(), LibraryError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(fs::File::create(path)?);
    let mut written = 0;
    for track in tracks {
        let Some(track_path) = track.path.to_str() else {
            log::warn!("not saving {}: path is not UTF-8", track.path.display());
            continue;
        };
        writeln!(out, "{}", single_line(&track.name))?;
        writeln!(out, "{}", single_line(track_path))?;
        writeln!(out, "{}", track.duration.map(format_hms).unwrap_or_default())?;
        written += 1;
    }
    out.flush()?;

    log::info!("saved {written} of {} tracks to {}", tracks.len(), path.display());
    Ok(())
}

/// Enumerate the saved playlists in `dir`, sorted by name.
///
/// A missing directory simply means nothing has been saved yet.
pub fn list_playlists(dir: &Path) -> Result<Vec<PlaylistEntry>, LibraryError> {
    let read = match fs::read_dir(dir) {
        Ok(r) => r,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LibraryError::Unreadable {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut entries: Vec<PlaylistEntry> = read
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_playlist_file(p))
        .filter_map(|p| PlaylistEntry::from_path(&p))
        .collect();
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

fn is_playlist_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PLAYLIST_EXTENSION))
        .unwrap_or(false)
}

/// Validate a user supplied playlist name and turn it into a file name.
pub(crate) fn playlist_file_name(name: &str) -> Result<String, LibraryError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.chars().any(|c| matches!(c, '/' | '\\' | '\n' | '\r'));
    if bad {
        return Err(LibraryError::InvalidPlaylistName(name.to_string()));
    }
    Ok(format!("{trimmed}.{PLAYLIST_EXTENSION}"))
}

pub fn is_valid_playlist_name(name: &str) -> bool {
    playlist_file_name(name).is_ok()
}

// A newline inside a field would shift every following record.
fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}
