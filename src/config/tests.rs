use super::load::{data_dir, default_config_path, resolve_config_path};
use super::schema::*;
use super::{DIR_PATH_KEY, DefaultsStore, PLAYLIST_PATH_KEY, TomlDefaults};
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn data_dir_resolution_order() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("ENCORE_DATA_DIR");
    let _g2 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");
    assert_eq!(
        data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-data").join("encore")
    );

    let _g3 = EnvGuard::set("ENCORE_DATA_DIR", "/tmp/encore-data");
    assert_eq!(data_dir().unwrap(), std::path::PathBuf::from("/tmp/encore-data"));
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_mode_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
repeat_mode = "repeat-one"

[audio]
initial_volume = 0.5
volume_step = 0.25

[ui]
poll_interval_ms = 250
header_text = "hello"

[library]
extensions = ["mp3", "flac"]
follow_links = false
playlist_dir = "/tmp/lists"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__UI__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.repeat_mode, RepeatModeSetting::RepeatTrack);
    assert_eq!(s.audio.initial_volume, 0.5);
    assert_eq!(s.audio.volume_step, 0.25);
    assert_eq!(s.ui.poll_interval_ms, 250);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), "flac".to_string()]);
    assert!(!s.library.follow_links);
    assert_eq!(
        s.playlist_dir().unwrap(),
        std::path::PathBuf::from("/tmp/lists")
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ui]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__UI__POLL_INTERVAL_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.ui.poll_interval_ms, 40);
}

#[test]
fn defaults_are_valid_and_match_documented_values() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.ui.poll_interval_ms, 100);
    assert_eq!(s.audio.volume_step, 0.1);
    assert_eq!(s.playback.repeat_mode, RepeatModeSetting::Normal);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.ui.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());
}

#[test]
fn toml_defaults_persist_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.toml");

    let mut store = TomlDefaults::open(&path).unwrap();
    assert_eq!(store.get(DIR_PATH_KEY), None);
    store.set(DIR_PATH_KEY, "/music").unwrap();
    store.set(PLAYLIST_PATH_KEY, "/lists/road trip.txt").unwrap();

    let reopened = TomlDefaults::open(&path).unwrap();
    assert_eq!(reopened.get(DIR_PATH_KEY).as_deref(), Some("/music"));
    assert_eq!(
        reopened.get(PLAYLIST_PATH_KEY).as_deref(),
        Some("/lists/road trip.txt")
    );
    assert_eq!(reopened.path(), path.as_path());
}

#[test]
fn toml_defaults_treat_empty_values_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "DirPath = \"\"\n").unwrap();

    let store = TomlDefaults::open(&path).unwrap();
    assert_eq!(store.get(DIR_PATH_KEY), None);
}

#[test]
fn toml_defaults_recover_from_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "DirPath = \n[[broken").unwrap();

    let mut store = TomlDefaults::open(&path).unwrap();
    assert_eq!(store.get(DIR_PATH_KEY), None);
    assert_eq!(store.get(PLAYLIST_PATH_KEY), None);

    store.set(DIR_PATH_KEY, "/music").unwrap();
    let reopened = TomlDefaults::open(&path).unwrap();
    assert_eq!(reopened.get(DIR_PATH_KEY).as_deref(), Some("/music"));
    assert!(!path.with_extension("toml.tmp").exists());
}
