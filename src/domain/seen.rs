//! Session storage entries.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A thing recorded in `storage`: seen by a module at a point in time.
///
/// Used by bots to avoid answering the same comment or submission twice
/// within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeenThing {
    pub thing_id: String,
    /// Name of the module, `None` when the row's `bot_module` no longer
    /// resolves to a registered module.
    pub module: Option<String>,
    pub seen_at: Option<NaiveDateTime>,
}
