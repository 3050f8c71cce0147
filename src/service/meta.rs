//! Buffered meta counters.
//!
//! Bots see thousands of things per hour. [`MetaBuffer`] keeps the counts in
//! memory and writes them out in one go when the cached total reaches the
//! threshold, when the wall-clock hour changes, or when forced. Counts are
//! always booked on the day of the hour they were cached in.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::config::MetaConfig;
use crate::domain::{MetaCounter, ThingKind};
use crate::error::Result;
use crate::port::MetaCounterStore;

/// Cached total that triggers a write-out.
pub const DEFAULT_FLUSH_THRESHOLD: u32 = 500;

const SECONDS_PER_HOUR: i64 = 3600;

fn hour_of(now: DateTime<Utc>) -> i64 {
    now.timestamp().div_euclid(SECONDS_PER_HOUR)
}

/// Write-behind cache for the daily meta counters.
///
/// Single owner; wrap it in a `parking_lot::Mutex` to share it. Pending
/// counts are flushed on drop.
pub struct MetaBuffer<S: MetaCounterStore> {
    store: S,
    threshold: u32,
    hour: i64,
    pending: [i32; 3],
}

impl<S: MetaCounterStore> MetaBuffer<S> {
    /// Create a buffer with the default threshold.
    pub fn new(store: S) -> Self {
        Self::with_threshold(store, DEFAULT_FLUSH_THRESHOLD)
    }

    /// Create a buffer flushing at `meta.flush_threshold`.
    pub fn from_config(store: S, config: &MetaConfig) -> Self {
        Self::with_threshold(store, config.flush_threshold)
    }

    pub fn with_threshold(store: S, threshold: u32) -> Self {
        Self {
            store,
            threshold,
            hour: hour_of(Utc::now()),
            pending: [0; 3],
        }
    }

    /// Count seen submissions.
    ///
    /// # Errors
    /// Returns an error if a triggered write-out fails.
    pub fn add_submissions(&mut self, count: i32) -> Result<()> {
        self.add_at(MetaCounter::SeenSubmissions, count, Utc::now())
    }

    /// Count seen comments.
    ///
    /// # Errors
    /// Returns an error if a triggered write-out fails.
    pub fn add_comments(&mut self, count: i32) -> Result<()> {
        self.add_at(MetaCounter::SeenComments, count, Utc::now())
    }

    /// Count completed update cycles.
    ///
    /// # Errors
    /// Returns an error if a triggered write-out fails.
    pub fn add_update_cycles(&mut self, count: i32) -> Result<()> {
        self.add_at(MetaCounter::UpdateCycles, count, Utc::now())
    }

    /// Count one seen thing by its fullname. Only comments and submissions
    /// are counted; returns whether the thing was.
    ///
    /// # Errors
    /// Returns an error if a triggered write-out fails.
    pub fn record_seen(&mut self, thing_id: &str) -> Result<bool> {
        let counter = match ThingKind::from_fullname(thing_id) {
            Some(ThingKind::Comment) => MetaCounter::SeenComments,
            Some(ThingKind::Submission) => MetaCounter::SeenSubmissions,
            _ => return Ok(false),
        };
        self.add_at(counter, 1, Utc::now())?;
        Ok(true)
    }

    /// Write out the cache if it is due, or unconditionally when `force`.
    ///
    /// # Errors
    /// Returns an error if the write-out fails.
    pub fn flush(&mut self, force: bool) -> Result<()> {
        self.flush_at(force, Utc::now())
    }

    /// Cached count of `counter`.
    #[must_use]
    pub fn pending(&self, counter: MetaCounter) -> i32 {
        self.pending[Self::slot(counter)]
    }

    /// Sum of all cached counts.
    #[must_use]
    pub fn pending_total(&self) -> i64 {
        self.pending.iter().map(|&c| i64::from(c)).sum()
    }

    /// Day the cached counts will be booked on.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp(self.hour * SECONDS_PER_HOUR, 0)
            .unwrap_or_else(Utc::now)
            .date_naive()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn add_at(&mut self, counter: MetaCounter, count: i32, now: DateTime<Utc>) -> Result<()> {
        self.flush_at(false, now)?;
        let slot = Self::slot(counter);
        self.pending[slot] = self.pending[slot].saturating_add(count);
        Ok(())
    }

    pub(crate) fn flush_at(&mut self, force: bool, now: DateTime<Utc>) -> Result<()> {
        if force || self.pending_total() >= i64::from(self.threshold) {
            self.write_out()?;
        }
        let hour = hour_of(now);
        if hour != self.hour {
            self.write_out()?;
            self.hour = hour;
        }
        Ok(())
    }

    fn write_out(&mut self) -> Result<()> {
        let day = self.day();
        for counter in MetaCounter::ALL {
            let slot = Self::slot(counter);
            let count = self.pending[slot];
            if count == 0 {
                continue;
            }
            self.store.add_to_day(day, counter, count)?;
            self.pending[slot] = 0;
        }
        debug!(%day, "Meta cache written out");
        Ok(())
    }

    const fn slot(counter: MetaCounter) -> usize {
        match counter {
            MetaCounter::SeenSubmissions => 0,
            MetaCounter::SeenComments => 1,
            MetaCounter::UpdateCycles => 2,
        }
    }
}

impl<S: MetaCounterStore> std::fmt::Debug for MetaBuffer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaBuffer")
            .field("threshold", &self.threshold)
            .field("hour", &self.hour)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<S: MetaCounterStore> Drop for MetaBuffer<S> {
    fn drop(&mut self) {
        if self.pending_total() == 0 {
            return;
        }
        if let Err(e) = self.write_out() {
            warn!(error = %e, pending = ?self.pending, "Failed to write out meta cache");
        }
    }
}
