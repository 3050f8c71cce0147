//! Pruning of stale rows.

use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;
use tracing::info;

use super::database::schema::{storage, update_threads};
use super::{now, Database};
use crate::error::{Error, Result};

/// Rows removed by [`Database::clean_up_database`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub storage_removed: usize,
    pub updates_removed: usize,
}

impl CleanupReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.storage_removed + self.updates_removed
    }
}

impl Database {
    /// Delete storage rows strictly older than `older_than` and every update
    /// thread past its lifetime, in one transaction.
    ///
    /// # Errors
    /// Returns an error if `older_than` is out of range or the transaction
    /// fails.
    pub fn clean_up_database(&self, older_than: Duration) -> Result<CleanupReport> {
        self.clean_up_at(older_than, now())
    }

    pub(crate) fn clean_up_at(
        &self,
        older_than: Duration,
        now: NaiveDateTime,
    ) -> Result<CleanupReport> {
        let cutoff = now
            .checked_sub_signed(older_than)
            .ok_or_else(|| Error::Database(format!("cleanup age {older_than} out of range")))?;
        let mut conn = self.conn()?;

        let report = conn.transaction::<_, Error, _>(|conn| {
            let storage_removed =
                diesel::delete(storage::table.filter(storage::timestamp.lt(cutoff))).execute(conn)?;
            let updates_removed =
                diesel::delete(update_threads::table.filter(update_threads::lifetime.lt(now)))
                    .execute(conn)?;
            Ok(CleanupReport {
                storage_removed,
                updates_removed,
            })
        })?;

        info!(
            %cutoff,
            storage = report.storage_removed,
            updates = report.updates_removed,
            "Database cleaned up"
        );
        Ok(report)
    }
}
