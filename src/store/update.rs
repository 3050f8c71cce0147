//! Update threads.
//!
//! A module registers a thing for periodic revisits with a lifetime and an
//! interval. The bot runtime polls [`Database::next_due`] and reports back
//! with [`Database::touch_update`].

use chrono::Duration;
use diesel::prelude::*;
use tracing::debug;

use super::database::model::{NewUpdateThreadRow, UpdateThreadRow};
use super::database::schema::{modules, update_threads};
use super::registry::require_module;
use super::{now, Database};
use crate::domain::UpdateThread;
use crate::error::{Error, Result};

macro_rules! update_thread_columns {
    () => {
        (
            update_threads::thing_id,
            modules::module_name.nullable(),
            update_threads::created,
            update_threads::lifetime,
            update_threads::last_updated,
            update_threads::interval,
        )
    };
}

impl Database {
    /// Schedule `thing_id` for updates by `module` every `interval_secs`
    /// seconds, for `lifetime` from now.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn insert_into_update(
        &self,
        thing_id: &str,
        module: &str,
        lifetime: Duration,
        interval_secs: i32,
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;
        let created = now();
        let expires = created
            .checked_add_signed(lifetime)
            .ok_or_else(|| Error::Database(format!("lifetime {lifetime} out of range")))?;

        diesel::insert_into(update_threads::table)
            .values(&NewUpdateThreadRow {
                thing_id: thing_id.to_string(),
                bot_module: id.get(),
                created,
                lifetime: expires,
                last_updated: created,
                interval: interval_secs,
            })
            .execute(&mut conn)?;

        debug!(
            thing_id,
            module,
            lifetime = lifetime.num_seconds(),
            interval = interval_secs,
            "Inserted into update threads"
        );
        Ok(())
    }

    /// Every update thread, least recently updated first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_updates(&self) -> Result<Vec<UpdateThread>> {
        let mut conn = self.conn()?;
        let rows: Vec<UpdateThreadRow> = update_threads::table
            .left_join(
                modules::table.on(update_threads::bot_module.eq(modules::rowid.nullable())),
            )
            .select(update_thread_columns!())
            .order((update_threads::last_updated.asc(), update_threads::rowid.asc()))
            .load(&mut conn)?;

        Ok(rows.into_iter().map(UpdateThread::from).collect())
    }

    /// Update threads of `module` whose interval has elapsed, least
    /// recently updated first.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn all_due(&self, module: &str) -> Result<Vec<UpdateThread>> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;
        let rows: Vec<UpdateThreadRow> = update_threads::table
            .inner_join(
                modules::table.on(update_threads::bot_module.eq(modules::rowid.nullable())),
            )
            .filter(update_threads::bot_module.eq(id.get()))
            .select(update_thread_columns!())
            .order((update_threads::last_updated.asc(), update_threads::rowid.asc()))
            .load(&mut conn)?;

        let now = now();
        Ok(rows
            .into_iter()
            .map(UpdateThread::from)
            .filter(|thread| thread.is_due(now))
            .collect())
    }

    /// The most overdue update thread of `module`, if any is due.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn next_due(&self, module: &str) -> Result<Option<UpdateThread>> {
        Ok(self.all_due(module)?.into_iter().next())
    }

    /// Mark `thing_id` as updated just now. Returns the number of rows touched.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn touch_update(&self, thing_id: &str, module: &str) -> Result<usize> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;
        let touched = diesel::update(
            update_threads::table
                .filter(update_threads::thing_id.eq(thing_id))
                .filter(update_threads::bot_module.eq(id.get())),
        )
        .set(update_threads::last_updated.eq(now()))
        .execute(&mut conn)?;

        debug!(thing_id, module, touched, "Updated timestamp on update thread");
        Ok(touched)
    }

    /// Delete the update thread of `thing_id` if it outlived its lifetime.
    ///
    /// Threads still within their lifetime are kept. Returns the number of
    /// rows deleted.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn delete_expired_update(&self, thing_id: &str, module: &str) -> Result<usize> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;
        let deleted = diesel::delete(
            update_threads::table
                .filter(update_threads::thing_id.eq(thing_id))
                .filter(update_threads::bot_module.eq(id.get()))
                .filter(update_threads::lifetime.lt(now())),
        )
        .execute(&mut conn)?;

        if deleted > 0 {
            debug!(thing_id, module, "Deleted expired update thread");
        }
        Ok(deleted)
    }
}
