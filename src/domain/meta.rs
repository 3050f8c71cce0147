//! Daily meta counters.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// One of the three counters kept per day in `meta_stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaCounter {
    SeenSubmissions,
    SeenComments,
    UpdateCycles,
}

impl MetaCounter {
    pub const ALL: [Self; 3] = [
        Self::SeenSubmissions,
        Self::SeenComments,
        Self::UpdateCycles,
    ];

    /// Column name in `meta_stats`.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::SeenSubmissions => "seen_submissions",
            Self::SeenComments => "seen_comments",
            Self::UpdateCycles => "update_cycles",
        }
    }
}

impl fmt::Display for MetaCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Aggregated counters for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyMeta {
    pub day: NaiveDate,
    pub seen_submissions: i32,
    pub seen_comments: i32,
    pub update_cycles: i32,
}

impl DailyMeta {
    #[must_use]
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            seen_submissions: 0,
            seen_comments: 0,
            update_cycles: 0,
        }
    }

    #[must_use]
    pub fn get(&self, counter: MetaCounter) -> i32 {
        match counter {
            MetaCounter::SeenSubmissions => self.seen_submissions,
            MetaCounter::SeenComments => self.seen_comments,
            MetaCounter::UpdateCycles => self.update_cycles,
        }
    }

    /// Total things seen on this day.
    #[must_use]
    pub fn seen_total(&self) -> i64 {
        i64::from(self.seen_submissions) + i64::from(self.seen_comments)
    }

    /// Share of seen things the bots responded to, as a percentage.
    ///
    /// Returns `None` when nothing was seen.
    #[must_use]
    pub fn response_rate(&self, responses: i64) -> Option<f64> {
        let seen = self.seen_total();
        if seen == 0 {
            None
        } else {
            Some(responses as f64 * 100.0 / seen as f64)
        }
    }
}
