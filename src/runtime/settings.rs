use crate::config::{self, Settings};

/// Settings for this run. A missing or rejected config falls back to defaults.
pub fn load_settings() -> Settings {
    let loaded = Settings::load()
        .map_err(|e| e.to_string())
        .and_then(|s| s.validate().map(|()| s));

    match loaded {
        Ok(settings) => {
            match config::resolve_config_path() {
                Some(path) => log::info!("settings read from {} and ENCORE__*", path.display()),
                None => log::info!("settings read from ENCORE__* only"),
            }
            settings
        }
        Err(msg) => {
            log::warn!("config rejected, using defaults: {msg}");
            Settings::default()
        }
    }
}
