//! Handler for the `updates` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::UpdatesCommand;
use super::{output, timestamp, Context};
use crate::domain::UpdateThread;
use crate::error::Result;

#[derive(Tabled)]
struct UpdateRow {
    #[tabled(rename = "Thing")]
    thing_id: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Last update")]
    last_updated: String,
    #[tabled(rename = "Every (s)")]
    interval: String,
    #[tabled(rename = "Until")]
    lifetime: String,
}

impl From<UpdateThread> for UpdateRow {
    fn from(thread: UpdateThread) -> Self {
        Self {
            thing_id: thread.thing_id,
            module: output::or_dash(thread.module),
            last_updated: timestamp(thread.last_updated),
            interval: output::or_dash(thread.interval),
            lifetime: timestamp(thread.lifetime),
        }
    }
}

pub fn execute(command: UpdatesCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    let (name, title, threads) = match command {
        UpdatesCommand::List => ("updates.list", "Update threads".to_string(), db.all_updates()?),
        UpdatesCommand::Due(arg) => (
            "updates.due",
            format!("Update threads due for {}", arg.name),
            db.all_due(&arg.name)?,
        ),
    };

    if output::is_json() {
        output::json_output(json!({ "command": name, "updates": threads }));
        return Ok(());
    }

    output::section(&title);
    if threads.is_empty() {
        output::note("No update threads");
        return Ok(());
    }
    output::lines(&Table::new(threads.into_iter().map(UpdateRow::from)).to_string());
    Ok(())
}
