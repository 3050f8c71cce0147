//! Database model types for Diesel ORM.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use super::schema::{messages, meta_stats, modules, stats, storage, subbans, update_threads, userbans};
use crate::domain::{DailyMeta, InboxMessage, ResponseStat, SeenThing, UpdateThread};

/// Database row for a seen thing (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = storage)]
pub struct NewStorageRow {
    pub thing_id: String,
    pub bot_module: i64,
    pub timestamp: NaiveDateTime,
}

/// `storage` joined with the owning module name.
#[derive(Queryable, Debug, Clone)]
pub struct StorageRow {
    pub thing_id: Option<String>,
    pub module_name: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
}

impl From<StorageRow> for SeenThing {
    fn from(row: StorageRow) -> Self {
        Self {
            thing_id: row.thing_id.unwrap_or_default(),
            module: row.module_name,
            seen_at: row.timestamp,
        }
    }
}

/// Database row for an update thread (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = update_threads)]
pub struct NewUpdateThreadRow {
    pub thing_id: String,
    pub bot_module: i64,
    pub created: NaiveDateTime,
    pub lifetime: NaiveDateTime,
    pub last_updated: NaiveDateTime,
    pub interval: i32,
}

/// `update_threads` joined with the owning module name.
#[derive(Queryable, Debug, Clone)]
pub struct UpdateThreadRow {
    pub thing_id: String,
    pub module_name: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub lifetime: Option<NaiveDateTime>,
    pub last_updated: Option<NaiveDateTime>,
    pub interval: Option<i32>,
}

impl From<UpdateThreadRow> for UpdateThread {
    fn from(row: UpdateThreadRow) -> Self {
        Self {
            thing_id: row.thing_id,
            module: row.module_name,
            created: row.created,
            lifetime: row.lifetime,
            last_updated: row.last_updated,
            interval: row.interval,
        }
    }
}

/// Database row for a module registration (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = modules)]
pub struct NewModuleRow {
    pub module_name: String,
}

/// Database row for a user ban (insertable). `bot_module` is `None` for global bans.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = userbans)]
pub struct NewUserBanRow {
    pub username: String,
    pub bot_module: Option<i64>,
}

/// Database row for a subreddit ban (insertable). `bot_module` is `None` for global bans.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = subbans)]
pub struct NewSubBanRow {
    pub subreddit: String,
    pub bot_module: Option<i64>,
}

/// A ban row of either table joined with the owning module name.
#[derive(Queryable, Debug, Clone)]
pub struct BanRow {
    pub name: String,
    pub bot_module: Option<i64>,
    pub module_name: Option<String>,
}

/// Database row for a response statistic (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = stats)]
pub struct NewStatRow {
    pub id: String,
    pub bot_module: i64,
    pub created: NaiveDateTime,
    pub title: Option<String>,
    pub username: Option<String>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
}

/// `stats` joined with the owning module name.
#[derive(Queryable, Debug, Clone)]
pub struct StatRow {
    pub id: String,
    pub module_name: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub username: Option<String>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub upvotes_author: Option<i32>,
    pub upvotes_bot: Option<i32>,
}

impl From<StatRow> for ResponseStat {
    fn from(row: StatRow) -> Self {
        Self {
            id: row.id,
            module: row.module_name,
            created: row.created,
            title: row.title,
            username: row.username,
            permalink: row.permalink,
            subreddit: row.subreddit,
            upvotes_author: row.upvotes_author,
            upvotes_bot: row.upvotes_bot,
        }
    }
}

/// Database row for an inbox message (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = messages)]
pub struct NewMessageRow {
    pub id: String,
    pub bot_module: i64,
    pub created: NaiveDateTime,
    pub title: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}

/// `messages` joined with the owning module name.
#[derive(Queryable, Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub module_name: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}

impl From<MessageRow> for InboxMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            module: row.module_name,
            created: row.created,
            title: row.title,
            author: row.author,
            body: row.body,
        }
    }
}

/// Database row for daily meta counters.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = meta_stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetaStatsRow {
    pub day: NaiveDate,
    pub seen_submissions: Option<i32>,
    pub seen_comments: Option<i32>,
    pub update_cycles: Option<i32>,
}

impl From<MetaStatsRow> for DailyMeta {
    fn from(row: MetaStatsRow) -> Self {
        Self {
            day: row.day,
            seen_submissions: row.seen_submissions.unwrap_or(0),
            seen_comments: row.seen_comments.unwrap_or(0),
            update_cycles: row.update_cycles.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::database::connection::run_migrations;

    fn conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn update_thread_row_roundtrip_with_db() {
        let mut conn = conn();
        let row = NewUpdateThreadRow {
            thing_id: "t1_cukvign".to_string(),
            bot_module: 1,
            created: at(12, 0, 0),
            lifetime: at(12, 10, 0),
            last_updated: at(12, 0, 0),
            interval: 15,
        };
        diesel::insert_into(update_threads::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();

        let (thing_id, bot_module, lifetime, interval): (
            String,
            Option<i64>,
            Option<NaiveDateTime>,
            Option<i32>,
        ) = update_threads::table
            .select((
                update_threads::thing_id,
                update_threads::bot_module,
                update_threads::lifetime,
                update_threads::interval,
            ))
            .first(&mut conn)
            .unwrap();

        assert_eq!(thing_id, "t1_cukvign");
        assert_eq!(bot_module, Some(1));
        assert_eq!(lifetime, Some(at(12, 10, 0)));
        assert_eq!(interval, Some(15));
    }

    #[test]
    fn timestamps_are_stored_in_current_timestamp_form() {
        let mut conn = conn();
        diesel::insert_into(storage::table)
            .values(&NewStorageRow {
                thing_id: "t3_3iyxxt".to_string(),
                bot_module: 1,
                timestamp: at(9, 5, 30),
            })
            .execute(&mut conn)
            .unwrap();

        #[derive(QueryableByName)]
        struct Raw {
            #[diesel(sql_type = diesel::sql_types::Text)]
            ts: String,
        }
        let raw = diesel::sql_query("SELECT CAST(timestamp AS TEXT) AS ts FROM storage")
            .get_result::<Raw>(&mut conn)
            .unwrap();
        assert_eq!(raw.ts, "2026-10-18 09:05:30");
    }

    #[test]
    fn meta_counters_default_to_zero() {
        let mut conn = conn();
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        diesel::insert_into(meta_stats::table)
            .values(meta_stats::day.eq(day))
            .execute(&mut conn)
            .unwrap();

        let row: MetaStatsRow = meta_stats::table
            .select(MetaStatsRow::as_select())
            .first(&mut conn)
            .unwrap();
        assert_eq!(row.seen_submissions, Some(0));
        assert_eq!(row.seen_comments, Some(0));
        assert_eq!(row.update_cycles, Some(0));
        assert_eq!(DailyMeta::from(row), DailyMeta::empty(day));
    }

    #[test]
    fn null_counters_read_as_zero() {
        let mut conn = conn();
        diesel::sql_query(
            "INSERT INTO meta_stats (day, seen_submissions) VALUES ('2026-10-18', NULL)",
        )
        .execute(&mut conn)
        .unwrap();

        let row: MetaStatsRow = meta_stats::table
            .select(MetaStatsRow::as_select())
            .first(&mut conn)
            .unwrap();
        assert_eq!(row.seen_submissions, None);
        assert_eq!(DailyMeta::from(row).seen_submissions, 0);
    }

    #[test]
    fn not_null_columns_reject_null() {
        let mut conn = conn();
        for statement in [
            "INSERT INTO update_threads (thing_id) VALUES (NULL)",
            "INSERT INTO userbans (username, bot_module) VALUES (NULL, 1)",
            "INSERT INTO subbans (subreddit, bot_module) VALUES (NULL, 1)",
            "INSERT INTO stats (id) VALUES (NULL)",
            "INSERT INTO messages (id) VALUES (NULL)",
            "INSERT INTO meta_stats (day) VALUES (NULL)",
        ] {
            let result = diesel::sql_query(statement).execute(&mut conn);
            assert!(result.is_err(), "expected NOT NULL violation: {statement}");
        }
    }

    #[test]
    fn nullable_columns_accept_null() {
        let mut conn = conn();
        for statement in [
            "INSERT INTO storage (thing_id, bot_module, timestamp) VALUES (NULL, NULL, NULL)",
            "INSERT INTO modules (module_name) VALUES (NULL)",
            "INSERT INTO userbans (username, bot_module) VALUES ('MioMoto', NULL)",
        ] {
            diesel::sql_query(statement).execute(&mut conn).unwrap();
        }
    }

    #[test]
    fn duplicate_rows_do_not_conflict() {
        let mut conn = conn();
        let row = NewUserBanRow {
            username: "MioMoto".to_string(),
            bot_module: Some(1),
        };
        diesel::insert_into(userbans::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();
        diesel::insert_into(userbans::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();

        let count: i64 = userbans::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn thing_ids_keep_leading_zeros() {
        let mut conn = conn();
        diesel::insert_into(storage::table)
            .values(&NewStorageRow {
                thing_id: "007".to_string(),
                bot_module: 1,
                timestamp: at(9, 0, 0),
            })
            .execute(&mut conn)
            .unwrap();

        let thing_id: Option<String> = storage::table
            .select(storage::thing_id)
            .first(&mut conn)
            .unwrap();
        assert_eq!(thing_id.as_deref(), Some("007"));
    }
}
