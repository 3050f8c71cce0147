//! Response statistics.
//!
//! Every bot response gets a `stats` row. Karma of the response and of the
//! thing it answered is loaded later, once votes have settled.

use chrono::{Duration, NaiveDate};
use diesel::prelude::*;
use tracing::debug;

use super::database::model::{NewStatRow, StatRow};
use super::database::schema::{modules, stats};
use super::registry::require_module;
use super::{now, Database};
use crate::domain::{NewResponseStat, ResponseStat, StatsSummary};
use crate::error::{Error, Result};

impl Database {
    /// Record a bot response, timestamped now and without karma.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn add_to_stats(&self, stat: &NewResponseStat) -> Result<()> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, &stat.module)?;

        diesel::insert_into(stats::table)
            .values(&NewStatRow {
                id: stat.id.clone(),
                bot_module: id.get(),
                created: now(),
                title: stat.title.clone(),
                username: stat.username.clone(),
                permalink: stat.permalink.clone(),
                subreddit: stat.subreddit.clone(),
            })
            .execute(&mut conn)?;

        debug!(id = %stat.id, module = %stat.module, "Response added to stats");
        Ok(())
    }

    /// Every recorded response, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_stats(&self) -> Result<Vec<ResponseStat>> {
        let mut conn = self.conn()?;
        let rows: Vec<StatRow> = stats::table
            .left_join(modules::table.on(stats::bot_module.eq(modules::rowid.nullable())))
            .select((
                stats::id,
                modules::module_name.nullable(),
                stats::created,
                stats::title,
                stats::username,
                stats::permalink,
                stats::subreddit,
                stats::upvotes_author,
                stats::upvotes_bot,
            ))
            .order((stats::created.asc(), stats::rowid.asc()))
            .load(&mut conn)?;

        Ok(rows.into_iter().map(ResponseStat::from).collect())
    }

    /// Per-module, per-subreddit and hourly aggregates of every response.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn stats_summary(&self) -> Result<StatsSummary> {
        Ok(StatsSummary::from_stats(&self.all_stats()?))
    }

    /// Number of responses created on `day`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn total_responses_on(&self, day: NaiveDate) -> Result<i64> {
        let start = day.and_time(chrono::NaiveTime::MIN);
        let end = day
            .succ_opt()
            .ok_or_else(|| Error::Database(format!("no day after {day}")))?
            .and_time(chrono::NaiveTime::MIN);

        let mut conn = self.conn()?;
        let total = stats::table
            .filter(stats::created.ge(start))
            .filter(stats::created.lt(end))
            .count()
            .get_result(&mut conn)?;
        Ok(total)
    }

    /// Ids of responses older than `min_age` whose karma was never loaded.
    ///
    /// # Errors
    /// Returns an error if `min_age` reaches before the earliest
    /// representable date or the query fails.
    pub fn karma_loads(&self, min_age: Duration) -> Result<Vec<String>> {
        let cutoff = now()
            .checked_sub_signed(min_age)
            .ok_or_else(|| Error::Database(format!("karma age {min_age} out of range")))?;
        let mut conn = self.conn()?;
        let ids = stats::table
            .filter(stats::upvotes_author.is_null())
            .filter(stats::created.lt(cutoff))
            .select(stats::id)
            .order((stats::created.asc(), stats::rowid.asc()))
            .load(&mut conn)?;
        Ok(ids)
    }

    /// Store the karma of response `id`. `bot` is `None` when the bot's
    /// own comment is gone, leaving its stored count untouched.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_karma(&self, id: &str, author: i32, bot: Option<i32>) -> Result<usize> {
        let mut conn = self.conn()?;
        let target = stats::table.filter(stats::id.eq(id));
        let updated = match bot {
            Some(bot) => diesel::update(target)
                .set((stats::upvotes_author.eq(author), stats::upvotes_bot.eq(bot)))
                .execute(&mut conn)?,
            None => diesel::update(target)
                .set(stats::upvotes_author.eq(author))
                .execute(&mut conn)?,
        };

        debug!(id, author, bot = ?bot, updated, "Karma updated");
        Ok(updated)
    }
}
