//! Path utilities for roverdb.
//!
//! All data lives under `~/.roverdb/`:
//! - `~/.roverdb/config.toml` - configuration
//! - `~/.roverdb/storage.db` - the rover database

use std::path::{Path, PathBuf};

use crate::config::HOME_DIR_NAME;

/// Returns the roverdb home directory (`~/.roverdb/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOME_DIR_NAME)
}

/// Returns the default config file path (`~/.roverdb/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Create the directory a database file will live in.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
