//! SQLite database plumbing.
//!
//! Provides connection management, the Diesel schema of the eight rover
//! tables, and the row types mapped onto them.

pub mod connection;
pub mod model;
pub mod schema;

pub use connection::{
    configure_sqlite_connection, create_pool, existing_tables, run_migrations, DbPool,
    MIGRATIONS, TABLES,
};
