//! User and subreddit bans.
//!
//! `userbans` and `subbans` share one shape, so every operation takes a
//! [`BanTarget`] and dispatches to the matching table through
//! `on_ban_table!`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::{debug, info};

use super::database::model::{BanRow, NewSubBanRow, NewUserBanRow};
use super::database::schema::modules;
use super::registry::{lookup_module, require_module};
use super::Database;
use crate::domain::{Ban, BanScope, BanTarget};
use crate::error::Result;

/// Run `$body` with `$table` bound to the ban table of `$target` and `$name`
/// to its name column.
macro_rules! on_ban_table {
    ($target:expr, |$table:ident, $name:ident| $body:expr) => {
        match $target {
            BanTarget::User => {
                use super::database::schema::userbans as $table;
                #[allow(unused_imports)]
                use $table::username as $name;
                $body
            }
            BanTarget::Subreddit => {
                use super::database::schema::subbans as $table;
                #[allow(unused_imports)]
                use $table::subreddit as $name;
                $body
            }
        }
    };
}

fn load_bans(conn: &mut SqliteConnection, target: BanTarget, name: Option<&str>) -> Result<Vec<Ban>> {
    let rows: Vec<BanRow> = on_ban_table!(target, |table, name_column| {
        let mut query = table::table
            .left_join(modules::table.on(table::bot_module.eq(modules::rowid.nullable())))
            .select((name_column, table::bot_module, modules::module_name.nullable()))
            .order(table::rowid.asc())
            .into_boxed();
        if let Some(name) = name {
            query = query.filter(name_column.eq(name));
        }
        query.load(conn)?
    });

    Ok(rows
        .into_iter()
        .map(|row| Ban {
            target,
            global: row.bot_module.is_none(),
            name: row.name,
            module: row.module_name,
        })
        .collect())
}

impl Database {
    /// Every ban of `target`, in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_bans(&self, target: BanTarget) -> Result<Vec<Ban>> {
        let mut conn = self.conn()?;
        load_bans(&mut conn, target, None)
    }

    /// Every ban row naming `name`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn bans_for(&self, target: BanTarget, name: &str) -> Result<Vec<Ban>> {
        let mut conn = self.conn()?;
        load_bans(&mut conn, target, Some(name))
    }

    /// Whether `module` must ignore `name`: true on a ban for that module
    /// or on a global ban.
    ///
    /// An unregistered module is only subject to global bans.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn is_banned(&self, target: BanTarget, name: &str, module: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let module_id = lookup_module(&mut conn, module)?.map(|id| id.get());

        let count: i64 = on_ban_table!(target, |table, name_column| {
            let query = table::table.filter(name_column.eq(name)).into_boxed();
            let query = match module_id {
                Some(id) => query.filter(table::bot_module.is_null().or(table::bot_module.eq(id))),
                None => query.filter(table::bot_module.is_null()),
            };
            query.count().get_result(&mut conn)?
        });

        Ok(count > 0)
    }

    /// Ban `name` for one module or globally.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`](crate::error::Error::ModuleNotRegistered)
    /// when a module-scoped ban names an unknown module.
    pub fn ban(&self, target: BanTarget, name: &str, scope: &BanScope) -> Result<()> {
        let mut conn = self.conn()?;
        let bot_module = match scope {
            BanScope::Module(module) => Some(require_module(&mut conn, module)?.get()),
            BanScope::Global => None,
        };

        match target {
            BanTarget::User => {
                use super::database::schema::userbans;
                diesel::insert_into(userbans::table)
                    .values(&NewUserBanRow {
                        username: name.to_string(),
                        bot_module,
                    })
                    .execute(&mut conn)?;
            }
            BanTarget::Subreddit => {
                use super::database::schema::subbans;
                diesel::insert_into(subbans::table)
                    .values(&NewSubBanRow {
                        subreddit: name.to_string(),
                        bot_module,
                    })
                    .execute(&mut conn)?;
            }
        }

        info!(%target, name, scope = ?scope, "Ban added");
        Ok(())
    }

    /// Lift bans on `name`. A module scope removes only that module's rows;
    /// the global scope removes every row for the name.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn unban(&self, target: BanTarget, name: &str, scope: &BanScope) -> Result<usize> {
        let mut conn = self.conn()?;
        let module_id = match scope {
            BanScope::Module(module) => match lookup_module(&mut conn, module)? {
                Some(id) => Some(id.get()),
                None => return Ok(0),
            },
            BanScope::Global => None,
        };

        let removed = on_ban_table!(target, |table, name_column| {
            match module_id {
                Some(id) => diesel::delete(
                    table::table
                        .filter(name_column.eq(name))
                        .filter(table::bot_module.eq(id)),
                )
                .execute(&mut conn)?,
                None => diesel::delete(table::table.filter(name_column.eq(name))).execute(&mut conn)?,
            }
        });

        info!(%target, name, scope = ?scope, removed, "Ban lifted");
        Ok(removed)
    }

    /// Remove every ban of `target`. Returns the number of rows removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn purge_bans(&self, target: BanTarget) -> Result<usize> {
        let mut conn = self.conn()?;
        let removed = on_ban_table!(target, |table, _name_column| {
            diesel::delete(table::table).execute(&mut conn)?
        });

        debug!(%target, removed, "Ban table purged");
        Ok(removed)
    }
}
