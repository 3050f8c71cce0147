//! Services built on top of the store ports.

mod meta;

pub use meta::{MetaBuffer, DEFAULT_FLUSH_THRESHOLD};
