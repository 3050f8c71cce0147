//! Module registry.
//!
//! Modules are identified by name in the API and by the `rowid` of their
//! `modules` row everywhere else. Registration is idempotent; a name
//! registered twice means the registry was edited by hand and is reported
//! as [`Error::InconsistentModule`].

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use super::database::model::NewModuleRow;
use super::database::schema::{messages, modules, stats, storage, subbans, update_threads, userbans};
use super::Database;
use crate::domain::{Module, ModuleId};
use crate::error::{Error, Result};

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    #[diesel(column_name = "id")]
    id: i64,
}

/// Resolve a module name on an open connection.
pub(crate) fn lookup_module(conn: &mut SqliteConnection, name: &str) -> Result<Option<ModuleId>> {
    let ids: Vec<i64> = modules::table
        .filter(modules::module_name.eq(name))
        .select(modules::rowid)
        .load(conn)?;

    match ids.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(ModuleId::new(*id))),
        _ => Err(Error::InconsistentModule {
            module: name.to_string(),
            count: ids.len() as i64,
        }),
    }
}

/// Resolve a module name, failing when it is not registered.
pub(crate) fn require_module(conn: &mut SqliteConnection, name: &str) -> Result<ModuleId> {
    lookup_module(conn, name)?.ok_or_else(|| Error::ModuleNotRegistered {
        module: name.to_string(),
    })
}

impl Database {
    /// Register a module, returning its id. Registering twice is a no-op.
    ///
    /// # Errors
    /// Returns an error if the registry is inconsistent or the write fails.
    pub fn register_module(&self, name: &str) -> Result<ModuleId> {
        let mut conn = self.conn()?;
        let (id, created) = conn.transaction::<_, Error, _>(|conn| {
            if let Some(id) = lookup_module(conn, name)? {
                return Ok((id, false));
            }

            diesel::insert_into(modules::table)
                .values(&NewModuleRow {
                    module_name: name.to_string(),
                })
                .execute(conn)?;
            let id = diesel::sql_query("SELECT last_insert_rowid() AS id")
                .get_result::<LastInsertRowId>(conn)?
                .id;
            Ok((ModuleId::new(id), true))
        })?;

        if created {
            debug!(module = name, id = id.get(), "Module has been registered");
        }
        Ok(id)
    }

    /// Look up a module id by name.
    ///
    /// # Errors
    /// Returns [`Error::InconsistentModule`] if the name is registered more than once.
    pub fn module_id(&self, name: &str) -> Result<Option<ModuleId>> {
        let mut conn = self.conn()?;
        lookup_module(&mut conn, name)
    }

    /// Look up a module id by name, failing when it is not registered.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`] for unknown modules.
    pub fn require_module(&self, name: &str) -> Result<ModuleId> {
        let mut conn = self.conn()?;
        require_module(&mut conn, name)
    }

    /// All registered modules, in registration order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_modules(&self) -> Result<Vec<Module>> {
        let mut conn = self.conn()?;
        let rows: Vec<(i64, Option<String>)> = modules::table
            .select((modules::rowid, modules::module_name))
            .order(modules::rowid.asc())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, name)| {
                name.map(|name| Module {
                    id: ModuleId::new(id),
                    name,
                })
            })
            .collect())
    }

    /// Remove a module and every row referring to it.
    ///
    /// Returns `false` when the module was not registered.
    ///
    /// # Errors
    /// Returns an error if the registry is inconsistent or a delete fails.
    pub fn wipe_module(&self, name: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let removed = conn.transaction::<_, Error, _>(|conn| {
            let Some(id) = lookup_module(conn, name)? else {
                return Ok(None);
            };
            let id = id.get();

            let mut removed = 0;
            removed += diesel::delete(storage::table.filter(storage::bot_module.eq(id)))
                .execute(conn)?;
            removed +=
                diesel::delete(update_threads::table.filter(update_threads::bot_module.eq(id)))
                    .execute(conn)?;
            removed += diesel::delete(userbans::table.filter(userbans::bot_module.eq(id)))
                .execute(conn)?;
            removed += diesel::delete(subbans::table.filter(subbans::bot_module.eq(id)))
                .execute(conn)?;
            removed +=
                diesel::delete(stats::table.filter(stats::bot_module.eq(id))).execute(conn)?;
            removed +=
                diesel::delete(messages::table.filter(messages::bot_module.eq(id))).execute(conn)?;
            diesel::delete(modules::table.filter(modules::rowid.eq(id))).execute(conn)?;
            Ok(Some(removed))
        })?;

        match removed {
            Some(rows) => {
                info!(module = name, rows, "Module wiped from all tables");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_module_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let first = db.register_module("LeafeatorBot").unwrap();
        let second = db.register_module("LeafeatorBot").unwrap();
        assert_eq!(first, second);
        assert_eq!(db.all_modules().unwrap().len(), 1);
    }

    #[test]
    fn modules_get_distinct_ids_in_registration_order() {
        let db = Database::in_memory().unwrap();
        let a = db.register_module("LeafeatorBot").unwrap();
        let b = db.register_module("MassdropBot").unwrap();
        assert_ne!(a, b);

        let names: Vec<String> = db
            .all_modules()
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["LeafeatorBot", "MassdropBot"]);
    }

    #[test]
    fn unknown_module_is_not_registered() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.module_id("ghost").unwrap(), None);
        assert!(matches!(
            db.require_module("ghost"),
            Err(Error::ModuleNotRegistered { module }) if module == "ghost"
        ));
    }

    #[test]
    fn duplicate_registration_is_reported() {
        let db = Database::in_memory().unwrap();
        db.register_module("LeafeatorBot").unwrap();
        {
            let mut conn = db.conn().unwrap();
            diesel::insert_into(modules::table)
                .values(&NewModuleRow {
                    module_name: "LeafeatorBot".into(),
                })
                .execute(&mut conn)
                .unwrap();
        }

        assert!(matches!(
            db.module_id("LeafeatorBot"),
            Err(Error::InconsistentModule { count: 2, .. })
        ));
    }

    #[test]
    fn wipe_module_removes_every_reference() {
        let db = Database::in_memory().unwrap();
        db.register_module("LeafeatorBot").unwrap();
        db.register_module("MassdropBot").unwrap();
        db.insert_into_storage("t1_a", "LeafeatorBot").unwrap();
        db.insert_into_storage("t1_b", "MassdropBot").unwrap();
        db.insert_into_update("t1_a", "LeafeatorBot", chrono::Duration::minutes(10), 15)
            .unwrap();

        assert!(db.wipe_module("LeafeatorBot").unwrap());

        assert_eq!(db.module_id("LeafeatorBot").unwrap(), None);
        let storage = db.all_storage().unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(storage[0].thing_id, "t1_b");
        assert!(db.all_updates().unwrap().is_empty());
    }

    #[test]
    fn wipe_unknown_module_reports_false() {
        let db = Database::in_memory().unwrap();
        assert!(!db.wipe_module("ghost").unwrap());
    }
}
