//! Configuration loader, schema types and the persisted "last used" defaults.
//!
//! `Settings` is read-only layered configuration; the `DirPath` and
//! `PlaylistPath` values the player writes back live in a separate state file
//! behind `DefaultsStore`.

mod defaults;
mod load;
mod schema;

pub use defaults::*;
pub use load::{data_dir, default_config_path, music_dir, resolve_config_path};
pub use schema::*;

#[cfg(test)]
mod tests;
