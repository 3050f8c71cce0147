//! SQLite-backed rover store.
//!
//! [`Database`] wraps a Diesel connection pool; the table-specific
//! operations live in the submodules as `impl Database` blocks:
//!
//! - [`registry`] - module registration, lookup and wipe
//! - [`seen`] - session storage of handled things
//! - [`update`] - update threads with cadence and lifetime
//! - [`ban`] - user and subreddit bans
//! - [`stats`] - response statistics and karma
//! - [`message`] - inbox message log
//! - [`meta`] - daily meta counters
//! - [`cleanup`] - pruning of stale rows

pub mod ban;
pub mod cleanup;
pub mod database;
pub mod message;
pub mod meta;
pub mod registry;
pub mod seen;
pub mod stats;
pub mod update;

use chrono::{NaiveDateTime, Timelike, Utc};
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

pub use cleanup::CleanupReport;
use database::connection::DEFAULT_BUSY_TIMEOUT_MS;
pub use database::{create_pool, DbPool};

/// Pooled connection handed out by [`Database`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Handle to the rover database.
///
/// Cheap to clone; all clones share the same pool.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    busy_timeout_ms: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connections", &self.pool.state().connections)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

impl Database {
    /// Open the database described by `config`, creating missing tables.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or migrations fail.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url();
        let pool = create_pool(&url, config.pool_size)?;
        Self::from_pool(pool, config.busy_timeout_ms)
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds a single connection, since every SQLite in-memory
    /// connection is its own database.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or migrations fail.
    pub fn in_memory() -> Result<Self> {
        let pool = create_pool(":memory:", 1)?;
        Self::from_pool(pool, DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Wrap an existing pool, creating missing tables.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be acquired or migrations fail.
    pub fn from_pool(pool: DbPool, busy_timeout_ms: u32) -> Result<Self> {
        let db = Self {
            pool,
            busy_timeout_ms,
        };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let before = database::existing_tables(&mut conn)?;
        database::run_migrations(&mut conn)?;

        for table in database::TABLES {
            if !before.contains(&table) {
                info!(table, "Table had to be generated");
            }
        }
        debug!(tables = database::TABLES.len(), "Database initialized");
        Ok(())
    }

    /// Underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check out a configured connection.
    ///
    /// # Errors
    /// Returns an error if the pool is exhausted or the pragmas fail.
    pub fn conn(&self) -> Result<DbConnection> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        database::configure_sqlite_connection(&mut conn, self.busy_timeout_ms)?;
        Ok(conn)
    }
}

/// Current UTC time at second precision, the resolution of `CURRENT_TIMESTAMP`.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_database_has_all_tables() {
        let db = Database::in_memory().unwrap();
        let mut conn = db.conn().unwrap();
        let tables = database::existing_tables(&mut conn).unwrap();
        assert_eq!(tables.len(), database::TABLES.len());
    }

    #[test]
    fn clones_share_the_same_database() {
        let db = Database::in_memory().unwrap();
        let other = db.clone();
        db.register_module("LeafeatorBot").unwrap();
        assert!(other.module_id("LeafeatorBot").unwrap().is_some());
    }

    #[test]
    fn now_has_second_precision() {
        assert_eq!(now().nanosecond(), 0);
    }
}
