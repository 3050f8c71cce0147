//! Daily meta counters.
//!
//! `meta_stats` has one row per day and no unique key, so additions are an
//! update followed by an insert when no row was touched, in one transaction.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{Date, Integer};
use diesel::SqliteConnection;
use tracing::debug;

use super::database::model::MetaStatsRow;
use super::database::schema::meta_stats;
use super::Database;
use crate::domain::{DailyMeta, MetaCounter};
use crate::error::{Error, Result};
use crate::port::MetaCounterStore;

fn increment(conn: &mut SqliteConnection, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<usize> {
    let column = counter.column();
    let updated = diesel::sql_query(format!(
        "UPDATE meta_stats SET {column} = COALESCE({column}, 0) + ? WHERE day = ?"
    ))
    .bind::<Integer, _>(count)
    .bind::<Date, _>(day)
    .execute(conn)?;
    Ok(updated)
}

fn insert_day(conn: &mut SqliteConnection, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()> {
    let counts = MetaCounter::ALL.map(|c| if c == counter { count } else { 0 });
    diesel::insert_into(meta_stats::table)
        .values((
            meta_stats::day.eq(day),
            meta_stats::seen_submissions.eq(counts[0]),
            meta_stats::seen_comments.eq(counts[1]),
            meta_stats::update_cycles.eq(counts[2]),
        ))
        .execute(conn)?;
    Ok(())
}

impl Database {
    /// Counters of `day`, if anything was recorded for it.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn select_day_from_meta(&self, day: NaiveDate) -> Result<Option<DailyMeta>> {
        let mut conn = self.conn()?;
        let row = meta_stats::table
            .filter(meta_stats::day.eq(day))
            .select(MetaStatsRow::as_select())
            .order(meta_stats::rowid.asc())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(DailyMeta::from))
    }

    /// Every recorded day, most recent first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_meta(&self) -> Result<Vec<DailyMeta>> {
        let mut conn = self.conn()?;
        let rows = meta_stats::table
            .select(MetaStatsRow::as_select())
            .order(meta_stats::day.desc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(DailyMeta::from).collect())
    }

    /// Add `count` to one counter of `day`, creating the day row if needed.
    ///
    /// # Errors
    /// Returns an error if the transaction fails.
    pub fn add_to_day(&self, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()> {
        let mut conn = self.conn()?;
        let created = conn.transaction::<_, Error, _>(|conn| {
            if increment(conn, day, counter, count)? > 0 {
                return Ok(false);
            }
            insert_day(conn, day, counter, count)?;
            Ok(true)
        })?;

        debug!(%day, %counter, count, created, "Meta counter incremented");
        Ok(())
    }
}

impl MetaCounterStore for Database {
    fn add_to_day(&self, day: NaiveDate, counter: MetaCounter, count: i32) -> Result<()> {
        Database::add_to_day(self, day, counter, count)
    }
}
