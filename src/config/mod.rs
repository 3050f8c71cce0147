//! Application configuration loading and validation.
//!
//! [`Config`] is read from a TOML file; every section and field is optional.
//! `ROVERDB_DATABASE` overrides `database.path`.
//!
//! # Example
//!
//! ```no_run
//! use roverdb::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod logging;

pub use logging::LoggingConfig;

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable overriding `database.path`.
pub const DATABASE_ENV: &str = "ROVERDB_DATABASE";

/// Longest retention accepted for any age setting, one century.
pub const MAX_AGE_DAYS: u32 = 36_525;
/// [`MAX_AGE_DAYS`] in seconds.
pub const MAX_AGE_SECONDS: u64 = MAX_AGE_DAYS as u64 * 86_400;

/// Name of the per-user data directory.
pub const HOME_DIR_NAME: &str = ".roverdb";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub meta: MetaConfig,
    pub logging: LoggingConfig,
}

/// SQLite connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file. A leading `~/` is expanded; `:memory:` opens a
    /// private in-memory database.
    pub path: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: format!("~/{HOME_DIR_NAME}/storage.db"),
            pool_size: 5,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL handed to Diesel.
    #[must_use]
    pub fn url(&self) -> String {
        if self.is_in_memory() {
            return self.path.clone();
        }
        expand_home(&self.path).to_string_lossy().into_owned()
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Retention of the session storage and karma loading.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Age after which `storage` rows are cleaned up.
    pub session_seconds: u64,
    /// Age a response must reach before its karma is loaded.
    pub karma_age_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_seconds: 3600,
            karma_age_days: 7,
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn session(&self) -> Duration {
        Duration::seconds(i64::try_from(self.session_seconds.min(MAX_AGE_SECONDS)).unwrap_or(0))
    }

    #[must_use]
    pub fn karma_age(&self) -> Duration {
        Duration::days(i64::from(self.karma_age_days.min(MAX_AGE_DAYS)))
    }
}

/// Meta counter buffering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetaConfig {
    pub flush_threshold: u32,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            flush_threshold: crate::service::DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

/// Expand a leading `~/` to the user's home directory.
#[must_use]
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., a zero pool size)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.resolve()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_file(path)?.resolve()
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is malformed or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_file_or_default(path)?.resolve()
    }

    /// Read `path` as written, without environment overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Ok(toml::from_str(&content).map_err(ConfigError::Parse)?)
    }

    /// Like [`Config::load_file`], falling back to the defaults when `path`
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is malformed.
    pub fn load_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load_file(path);
        }
        Ok(Self::default())
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn resolve(mut self) -> Result<Self> {
        self.apply_env();
        self.validate()?;
        Ok(self)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(DATABASE_ENV) {
            if !path.trim().is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "path",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pool_size",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.storage.session_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session_seconds",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.storage.session_seconds > MAX_AGE_SECONDS {
            return Err(ConfigError::InvalidValue {
                field: "session_seconds",
                reason: format!("must be at most {MAX_AGE_SECONDS}"),
            }
            .into());
        }
        if self.storage.karma_age_days > MAX_AGE_DAYS {
            return Err(ConfigError::InvalidValue {
                field: "karma_age_days",
                reason: format!("must be at most {MAX_AGE_DAYS}"),
            }
            .into());
        }
        if self.meta.flush_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                field: "flush_threshold",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected `pretty` or `json`, got `{}`", self.logging.format),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
