use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("no directory given")]
    EmptyPath,

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("no audio files found in {0}")]
    NoTracks(PathBuf),

    #[error("scan of {0} was cancelled")]
    Cancelled(PathBuf),

    #[error("invalid playlist name {0:?}")]
    InvalidPlaylistName(String),

    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("failed to store default: {0}")]
    Defaults(#[from] crate::config::DefaultsError),
}
