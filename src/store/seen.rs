//! Session storage of handled things.
//!
//! Each row says "module M saw thing T at time X". Bots consult it before
//! answering so a restart does not produce double posts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::debug;

use super::database::model::{NewStorageRow, StorageRow};
use super::database::schema::{modules, storage};
use super::registry::require_module;
use super::{now, Database};
use crate::domain::SeenThing;
use crate::error::Result;

impl Database {
    /// Record that `module` has handled `thing_id` just now.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`](crate::error::Error::ModuleNotRegistered)
    /// for unknown modules.
    pub fn insert_into_storage(&self, thing_id: &str, module: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;

        diesel::insert_into(storage::table)
            .values(&NewStorageRow {
                thing_id: thing_id.to_string(),
                bot_module: id.get(),
                timestamp: now(),
            })
            .execute(&mut conn)?;

        debug!(thing_id, module, "Inserted into storage");
        Ok(())
    }

    /// Every storage row with its module name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_storage(&self) -> Result<Vec<SeenThing>> {
        let mut conn = self.conn()?;
        let rows: Vec<StorageRow> = storage::table
            .left_join(modules::table.on(storage::bot_module.eq(modules::rowid.nullable())))
            .select((
                storage::thing_id,
                modules::module_name.nullable(),
                storage::timestamp,
            ))
            .order(storage::rowid.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(SeenThing::from).collect())
    }

    /// The storage row of `thing_id` for `module`, if the module saw it.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`](crate::error::Error::ModuleNotRegistered)
    /// for unknown modules.
    pub fn retrieve_thing(&self, thing_id: &str, module: &str) -> Result<Option<SeenThing>> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, module)?;

        let row: Option<(Option<String>, Option<NaiveDateTime>)> = storage::table
            .filter(storage::thing_id.eq(thing_id))
            .filter(storage::bot_module.eq(id.get()))
            .select((storage::thing_id, storage::timestamp))
            .first(&mut conn)
            .optional()?;

        Ok(row.map(|(thing_id, seen_at)| SeenThing {
            thing_id: thing_id.unwrap_or_default(),
            module: Some(module.to_string()),
            seen_at,
        }))
    }

    /// Whether `module` has already handled `thing_id`.
    ///
    /// # Errors
    /// Same as [`Database::retrieve_thing`].
    pub fn has_seen(&self, thing_id: &str, module: &str) -> Result<bool> {
        Ok(self.retrieve_thing(thing_id, module)?.is_some())
    }

    /// Storage rows seen at or before `older_than`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn select_from_storage(&self, older_than: NaiveDateTime) -> Result<Vec<SeenThing>> {
        let mut conn = self.conn()?;
        let rows: Vec<StorageRow> = storage::table
            .left_join(modules::table.on(storage::bot_module.eq(modules::rowid.nullable())))
            .filter(storage::timestamp.le(older_than))
            .select((
                storage::thing_id,
                modules::module_name.nullable(),
                storage::timestamp,
            ))
            .order(storage::rowid.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(SeenThing::from).collect())
    }

    /// Delete storage rows seen at or before `older_than`, returning how many went.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_from_storage(&self, older_than: NaiveDateTime) -> Result<usize> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(storage::table.filter(storage::timestamp.le(older_than)))
            .execute(&mut conn)?;

        debug!(%older_than, deleted, "Deleted old storage rows");
        Ok(deleted)
    }
}
