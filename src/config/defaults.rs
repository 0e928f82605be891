use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Key of the last opened directory.
pub const DIR_PATH_KEY: &str = "DirPath";
/// Key of the last opened or saved playlist file.
pub const PLAYLIST_PATH_KEY: &str = "PlaylistPath";

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("defaults file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize defaults: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// String key/value storage for values the player remembers between runs.
pub trait DefaultsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DefaultsError>;
}

/// `DefaultsStore` backed by a small TOML file, rewritten on every `set`.
#[derive(Debug)]
pub struct TomlDefaults {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlDefaults {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store, and so is one that no longer parses;
    /// the damaged file is replaced on the next `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DefaultsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable state file {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), DefaultsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(&self.values)?;

        // The target is only ever replaced by rename, never truncated.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DefaultsStore for TomlDefaults {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DefaultsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryDefaults {
    pub values: BTreeMap<String, String>,
}

#[cfg(test)]
impl DefaultsStore for MemoryDefaults {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DefaultsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
