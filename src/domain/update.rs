//! Scheduled update threads.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// A thing a module wants to revisit every `interval` until `lifetime`.
///
/// Bots register their own replies here so they can edit them later,
/// e.g. to refresh a score table while a thread is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateThread {
    pub thing_id: String,
    pub module: Option<String>,
    pub created: Option<NaiveDateTime>,
    /// Moment after which the thread is no longer updated.
    pub lifetime: Option<NaiveDateTime>,
    pub last_updated: Option<NaiveDateTime>,
    /// Seconds between two updates.
    pub interval: Option<i32>,
}

impl UpdateThread {
    /// When the next update is due, if the row carries enough data to tell.
    #[must_use]
    pub fn next_update_at(&self) -> Option<NaiveDateTime> {
        let last = self.last_updated?;
        let interval = self.interval?;
        last.checked_add_signed(Duration::seconds(i64::from(interval)))
    }

    /// True once `interval` seconds have strictly passed since the last update.
    #[must_use]
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.next_update_at().is_some_and(|next| now > next)
    }

    /// True once `now` is strictly past the thread's lifetime.
    #[must_use]
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.lifetime.is_some_and(|lifetime| now > lifetime)
    }
}
