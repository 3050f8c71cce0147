//! Handler for the `stats` command group.

use chrono::Duration;
use serde_json::json;
use tabled::{Table, Tabled};

use super::command::{KarmaArgs, ModuleFilterArg, StatsCommand};
use super::{output, timestamp, Context};
use crate::domain::{ModuleActivity, ResponseStat, StatsSummary, SubredditActivity};
use crate::error::Result;
use crate::store::Database;

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Subreddit")]
    subreddit: String,
    #[tabled(rename = "Author")]
    username: String,
    #[tabled(rename = "Author karma")]
    upvotes_author: String,
    #[tabled(rename = "Bot karma")]
    upvotes_bot: String,
}

impl From<ResponseStat> for StatRow {
    fn from(stat: ResponseStat) -> Self {
        Self {
            id: stat.id,
            module: output::or_dash(stat.module),
            created: timestamp(stat.created),
            subreddit: output::or_dash(stat.subreddit),
            username: output::or_dash(stat.username),
            upvotes_author: output::or_dash(stat.upvotes_author),
            upvotes_bot: output::or_dash(stat.upvotes_bot),
        }
    }
}

#[derive(Tabled)]
struct ModuleSummaryRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Responses")]
    responses: i64,
    #[tabled(rename = "Total karma")]
    total_karma: i64,
    #[tabled(rename = "Average karma")]
    average_karma: String,
}

impl From<&ModuleActivity> for ModuleSummaryRow {
    fn from(activity: &ModuleActivity) -> Self {
        Self {
            module: output::or_dash(activity.module.as_deref()),
            responses: activity.responses,
            total_karma: activity.total_karma,
            average_karma: format!("{:.2}", activity.average_karma),
        }
    }
}

#[derive(Tabled)]
struct SubredditRow {
    #[tabled(rename = "Subreddit")]
    subreddit: String,
    #[tabled(rename = "Responses")]
    responses: i64,
}

impl From<&SubredditActivity> for SubredditRow {
    fn from(activity: &SubredditActivity) -> Self {
        Self {
            subreddit: output::or_dash(activity.subreddit.as_deref()),
            responses: activity.responses,
        }
    }
}

pub fn execute(command: StatsCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    match command {
        StatsCommand::List(filter) => list(&db, &filter),
        StatsCommand::Karma(args) => karma(&db, &args, ctx),
        StatsCommand::Summary => summary(&db),
    }
}

fn list(db: &Database, filter: &ModuleFilterArg) -> Result<()> {
    let mut stats = db.all_stats()?;
    if let Some(module) = &filter.module {
        stats.retain(|s| s.module.as_deref() == Some(module.as_str()));
    }

    if output::is_json() {
        output::json_output(json!({ "command": "stats.list", "stats": stats }));
        return Ok(());
    }

    output::section("Responses");
    if stats.is_empty() {
        output::note("No responses recorded");
        return Ok(());
    }
    let pending = stats.iter().filter(|s| !s.has_karma()).count();
    output::lines(&Table::new(stats.into_iter().map(StatRow::from)).to_string());
    if pending > 0 {
        output::note(&format!("{pending} response(s) without karma"));
    }
    Ok(())
}

fn karma(db: &Database, args: &KarmaArgs, ctx: &Context) -> Result<()> {
    let min_age = match args.days {
        Some(days) => Duration::days(i64::from(days)),
        None => ctx.config.storage.karma_age(),
    };
    let ids = db.karma_loads(min_age)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "stats.karma",
            "min_age_days": min_age.num_days(),
            "ids": ids,
        }));
        return Ok(());
    }

    output::section(&format!("Karma due (older than {} days)", min_age.num_days()));
    if ids.is_empty() {
        output::note("Nothing to load");
        return Ok(());
    }
    for id in &ids {
        output::lines(id);
    }
    Ok(())
}

fn summary(db: &Database) -> Result<()> {
    let summary = db.stats_summary()?;

    if output::is_json() {
        output::json_output(json!({ "command": "stats.summary", "summary": summary }));
        return Ok(());
    }

    output::section("Modules");
    if summary.modules.is_empty() {
        output::note("No responses recorded");
        return Ok(());
    }
    output::lines(&Table::new(summary.modules.iter().map(ModuleSummaryRow::from)).to_string());

    output::section("Subreddits");
    output::lines(&Table::new(summary.subreddits.iter().map(SubredditRow::from)).to_string());

    output::section("Hourly activity");
    for line in activity_lines(&summary) {
        output::lines(&line);
    }
    Ok(())
}

/// One line per module: active span and busiest hour.
fn activity_lines(summary: &StatsSummary) -> Vec<String> {
    summary
        .histogram
        .iter()
        .filter_map(|histogram| {
            let first = histogram.hours.first()?;
            let last = histogram.hours.last()?;
            let peak = histogram.hours.iter().max_by_key(|h| h.responses)?;
            Some(format!(
                "{}: {} to {}, peak {} at {}",
                output::or_dash(histogram.module.as_deref()),
                first.hour.format("%F %H:00"),
                last.hour.format("%F %H:00"),
                peak.responses,
                peak.hour.format("%F %H:00"),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{HourlyCount, ResponseHistogram};

    #[test]
    fn activity_line_names_span_and_peak() {
        let hour = |h| {
            NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let summary = StatsSummary {
            histogram: vec![ResponseHistogram {
                module: Some("LeafeatorBot".to_string()),
                hours: vec![
                    HourlyCount { hour: hour(9), responses: 1 },
                    HourlyCount { hour: hour(10), responses: 4 },
                    HourlyCount { hour: hour(11), responses: 0 },
                ],
            }],
            ..StatsSummary::default()
        };

        assert_eq!(
            activity_lines(&summary),
            vec!["LeafeatorBot: 2026-10-18 09:00 to 2026-10-18 11:00, peak 4 at 2026-10-18 10:00"]
        );
    }
}
