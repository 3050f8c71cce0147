//! Handler for the `meta` command group.

use chrono::Utc;
use serde_json::json;

use super::command::MetaCommand;
use super::{output, Context};
use crate::domain::DailyMeta;
use crate::error::Result;

pub fn execute(command: MetaCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    let MetaCommand::Show(args) = command;

    let day = args.day.unwrap_or_else(|| Utc::now().date_naive());
    let recorded = db.select_day_from_meta(day)?;
    let meta = recorded.unwrap_or_else(|| DailyMeta::empty(day));
    let responses = db.total_responses_on(day)?;
    let rate = meta.response_rate(responses);

    if output::is_json() {
        output::json_output(json!({
            "command": "meta.show",
            "day": day,
            "recorded": recorded.is_some(),
            "seen_submissions": meta.seen_submissions,
            "seen_comments": meta.seen_comments,
            "update_cycles": meta.update_cycles,
            "responses": responses,
            "rate": rate,
        }));
        return Ok(());
    }

    output::section(&format!("Meta for {day}"));
    if recorded.is_none() {
        output::note("Nothing recorded for this day");
    }
    output::field("Submissions", meta.seen_submissions);
    output::field("Comments", meta.seen_comments);
    output::field("Update cycles", meta.update_cycles);
    output::field("Responses", responses);
    output::field(
        "Response rate",
        rate.map_or_else(|| output::muted("n/a"), |r| format!("{r:.5}%")),
    );
    Ok(())
}
