//! Handler for the `storage` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{CleanupArgs, ModuleFilterArg, StorageCommand};
use super::{output, timestamp, Context};
use crate::error::Result;
use crate::store::Database;

#[derive(Tabled)]
struct SeenRow {
    #[tabled(rename = "Thing")]
    thing_id: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Seen")]
    seen_at: String,
}

pub fn execute(command: StorageCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    match command {
        StorageCommand::List(filter) => list(&db, &filter),
        StorageCommand::Cleanup(args) => cleanup(&db, &args, ctx),
    }
}

fn list(db: &Database, filter: &ModuleFilterArg) -> Result<()> {
    let mut seen = db.all_storage()?;
    if let Some(module) = &filter.module {
        seen.retain(|s| s.module.as_deref() == Some(module.as_str()));
    }

    if output::is_json() {
        output::json_output(json!({ "command": "storage.list", "storage": seen }));
        return Ok(());
    }

    output::section("Session storage");
    if seen.is_empty() {
        output::note("Nothing seen yet");
        return Ok(());
    }
    let rows = seen.into_iter().map(|s| SeenRow {
        thing_id: s.thing_id,
        module: output::or_dash(s.module),
        seen_at: timestamp(s.seen_at),
    });
    output::lines(&Table::new(rows).to_string());
    Ok(())
}

fn cleanup(db: &Database, args: &CleanupArgs, ctx: &Context) -> Result<()> {
    let mut storage = ctx.config.storage.clone();
    if let Some(secs) = args.older_than {
        storage.session_seconds = secs;
    }
    let report = db.clean_up_database(storage.session())?;

    if output::is_json() {
        output::json_output(json!({ "command": "storage.cleanup", "report": report }));
        return Ok(());
    }

    output::success(&format!(
        "Removed {} storage rows and {} expired update threads",
        report.storage_removed, report.updates_removed
    ));
    Ok(())
}
