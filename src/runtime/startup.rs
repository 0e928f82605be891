use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app::App;
use crate::audio::RodioBackend;
use crate::config::{self, TomlDefaults};
use crate::library::Library;
use crate::sequencer::Sequencer;

const LOG_FILE: &str = "encore.log";
const STATE_FILE: &str = "state.toml";

/// Send `log` output to `<data_dir>/encore.log`; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}

/// Resolve the data directory, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    config::data_dir().unwrap_or_else(|| PathBuf::from(".encore"))
}

/// Build the player from settings: output device, defaults store and library.
pub fn build_app(
    settings: &config::Settings,
    data_dir: &Path,
) -> Result<App<RodioBackend, TomlDefaults>, Box<dyn Error>> {
    let backend = RodioBackend::open_default()?;
    let defaults = TomlDefaults::open(data_dir.join(STATE_FILE))?;
    log::info!("state file: {}", defaults.path().display());

    let playlist_dir = settings
        .playlist_dir()
        .unwrap_or_else(|| data_dir.join("playlists"));
    log::info!("playlists live in {}", playlist_dir.display());

    let library = Library::new(settings.library.clone(), playlist_dir, defaults);
    Ok(App::new(backend, library, Sequencer::new(), settings))
}
