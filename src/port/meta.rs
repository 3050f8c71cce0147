//! Meta counter port.

use chrono::NaiveDate;

use crate::domain::MetaCounter;
use crate::error::Result;

/// Destination of buffered meta counters.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `add_to_day` adds to the stored value and creates the day when missing
pub trait MetaCounterStore: Send + Sync {
    /// Add `count` to `counter` of `day`.
    fn add_to_day(&self, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()>;
}

impl<T: MetaCounterStore + ?Sized> MetaCounterStore for &T {
    fn add_to_day(&self, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()> {
        (**self).add_to_day(day, counter, count)
    }
}

impl<T: MetaCounterStore + ?Sized> MetaCounterStore for std::sync::Arc<T> {
    fn add_to_day(&self, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()> {
        (**self).add_to_day(day, counter, count)
    }
}
