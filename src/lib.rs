//! Roverdb - SQLite persistence for a Reddit bot framework.
//!
//! Bot modules share one SQLite database that remembers what they have
//! seen, which threads they revisit, whom they must ignore, how their
//! responses fared and how busy each day was.
//!
//! # Modules
//!
//! - [`store`] - The [`Database`](store::Database) handle and its table operations
//! - [`domain`] - Storage-agnostic types: modules, things, bans, stats, meta days
//! - [`port`] - Trait seams between services and the store
//! - [`service`] - Buffered meta counters
//! - [`config`] - Configuration loading from TOML files
//! - [`cli`] - The `roverdb` maintenance command line
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use roverdb::store::Database;
//!
//! # fn main() -> roverdb::error::Result<()> {
//! let db = Database::in_memory()?;
//! db.register_module("LeafeatorBot")?;
//! db.insert_into_storage("t1_cukvign", "LeafeatorBot")?;
//! assert!(db.has_seen("t1_cukvign", "LeafeatorBot")?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;
pub mod store;
