//! Trait definitions (ports). Depend only on domain.
//!
//! Ports are the seams between the services and the SQLite store, so a
//! service can run against an in-memory double in tests.
//!
//! # Available Ports
//!
//! - [`MetaCounterStore`] - Persistence of daily meta counters

mod meta;

pub use meta::MetaCounterStore;
