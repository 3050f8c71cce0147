//! Response statistics domain types and the aggregations shown by
//! `roverdb stats summary`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// A bot response to record in `stats`.
#[derive(Debug, Clone)]
pub struct NewResponseStat {
    /// Id of the submission or comment the bot responded on.
    pub id: String,
    pub module: String,
    /// Title of the original submission.
    pub title: Option<String>,
    /// Author of the thing the bot responded on.
    pub username: Option<String>,
    pub subreddit: Option<String>,
    pub permalink: Option<String>,
}

/// A recorded response. Upvote counts stay `None` until karma is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseStat {
    pub id: String,
    pub module: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub username: Option<String>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
    pub upvotes_author: Option<i32>,
    pub upvotes_bot: Option<i32>,
}

impl ResponseStat {
    /// Whether karma has been loaded for this response.
    #[must_use]
    pub fn has_karma(&self) -> bool {
        self.upvotes_author.is_some()
    }
}

/// Most subreddits kept by [`subreddit_activity`].
pub const MAX_SUBREDDITS: usize = 16;

const SECONDS_PER_HOUR: i64 = 3600;

/// Responses and bot karma of one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleActivity {
    /// `None` for responses whose module was wiped.
    pub module: Option<String>,
    pub responses: i64,
    /// Sum of bot karma. Responses without loaded karma count as zero.
    pub total_karma: i64,
    pub average_karma: f64,
}

/// Responses posted in one subreddit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubredditActivity {
    pub subreddit: Option<String>,
    pub responses: i64,
}

/// Responses of one module started in the hour beginning at `hour`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: NaiveDateTime,
    pub responses: i64,
}

/// Hourly response counts of one module, from its first to its last active
/// hour with quiet hours filled in as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseHistogram {
    pub module: Option<String>,
    pub hours: Vec<HourlyCount>,
}

/// Aggregates over every recorded response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub modules: Vec<ModuleActivity>,
    pub subreddits: Vec<SubredditActivity>,
    pub histogram: Vec<ResponseHistogram>,
}

impl StatsSummary {
    #[must_use]
    pub fn from_stats(stats: &[ResponseStat]) -> Self {
        Self {
            modules: module_activity(stats),
            subreddits: subreddit_activity(stats, MAX_SUBREDDITS),
            histogram: response_histogram(stats),
        }
    }

    /// Number of responses summarized.
    #[must_use]
    pub fn total_responses(&self) -> i64 {
        self.modules.iter().map(|m| m.responses).sum()
    }
}

/// Response count and bot karma per module, ordered by module name.
#[must_use]
pub fn module_activity(stats: &[ResponseStat]) -> Vec<ModuleActivity> {
    let mut per_module: BTreeMap<Option<&str>, (i64, i64)> = BTreeMap::new();
    for stat in stats {
        let entry = per_module.entry(stat.module.as_deref()).or_default();
        entry.0 += 1;
        entry.1 += i64::from(stat.upvotes_bot.unwrap_or(0));
    }

    per_module
        .into_iter()
        .map(|(module, (responses, total_karma))| ModuleActivity {
            module: module.map(str::to_string),
            responses,
            total_karma,
            average_karma: total_karma as f64 / responses as f64,
        })
        .collect()
}

/// Responses per subreddit, busiest first.
///
/// While more than `limit` subreddits remain, the quietest tier is dropped:
/// first those with one response, then two, and so on. The result can end
/// up shorter than `limit`.
#[must_use]
pub fn subreddit_activity(stats: &[ResponseStat], limit: usize) -> Vec<SubredditActivity> {
    let mut per_subreddit: BTreeMap<Option<&str>, i64> = BTreeMap::new();
    for stat in stats {
        *per_subreddit.entry(stat.subreddit.as_deref()).or_default() += 1;
    }

    let mut activity: Vec<SubredditActivity> = per_subreddit
        .into_iter()
        .map(|(subreddit, responses)| SubredditActivity {
            subreddit: subreddit.map(str::to_string),
            responses,
        })
        .collect();

    let mut floor = 0;
    while activity.len() > limit {
        floor += 1;
        activity.retain(|a| a.responses > floor);
    }

    activity.sort_by(|a, b| b.responses.cmp(&a.responses));
    activity
}

/// Hourly response counts per module. Responses without a creation time
/// are left out.
#[must_use]
pub fn response_histogram(stats: &[ResponseStat]) -> Vec<ResponseHistogram> {
    let mut per_module: BTreeMap<Option<&str>, BTreeMap<i64, i64>> = BTreeMap::new();
    for stat in stats {
        let Some(created) = stat.created else {
            continue;
        };
        let hour = created.and_utc().timestamp().div_euclid(SECONDS_PER_HOUR);
        *per_module
            .entry(stat.module.as_deref())
            .or_default()
            .entry(hour)
            .or_default() += 1;
    }

    per_module
        .into_iter()
        .map(|(module, counts)| {
            let first = counts.keys().next().copied().unwrap_or_default();
            let last = counts.keys().next_back().copied().unwrap_or(first);
            let hours = (first..=last)
                .filter_map(|hour| {
                    let start = DateTime::<Utc>::from_timestamp(hour * SECONDS_PER_HOUR, 0)?;
                    Some(HourlyCount {
                        hour: start.naive_utc(),
                        responses: counts.get(&hour).copied().unwrap_or(0),
                    })
                })
                .collect();
            ResponseHistogram {
                module: module.map(str::to_string),
                hours,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn stat(id: &str, module: &str, subreddit: &str, bot_karma: Option<i32>) -> ResponseStat {
        ResponseStat {
            id: id.to_string(),
            module: Some(module.to_string()),
            created: None,
            title: None,
            username: Some("MioMoto".to_string()),
            permalink: None,
            subreddit: Some(subreddit.to_string()),
            upvotes_author: bot_karma.map(|_| 10),
            upvotes_bot: bot_karma,
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn responses_are_counted_per_module() {
        let stats = vec![
            stat("a", "LeafeatorBot", "dota2", None),
            stat("b", "MassdropBot", "dota2", None),
            stat("c", "LeafeatorBot", "Games", None),
        ];

        let activity = module_activity(&stats);
        let counts: Vec<(Option<&str>, i64)> = activity
            .iter()
            .map(|a| (a.module.as_deref(), a.responses))
            .collect();
        assert_eq!(
            counts,
            vec![(Some("LeafeatorBot"), 2), (Some("MassdropBot"), 1)]
        );
    }

    #[test]
    fn total_karma_treats_unloaded_as_zero() {
        let stats = vec![
            stat("a", "LeafeatorBot", "dota2", Some(12)),
            stat("b", "LeafeatorBot", "dota2", None),
            stat("c", "LeafeatorBot", "dota2", Some(-2)),
        ];

        let activity = module_activity(&stats);
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].total_karma, 10);
    }

    #[test]
    fn average_karma_divides_by_every_response() {
        let stats = vec![
            stat("a", "LeafeatorBot", "dota2", Some(9)),
            stat("b", "LeafeatorBot", "dota2", None),
            stat("c", "MassdropBot", "dota2", Some(4)),
            stat("d", "MassdropBot", "dota2", Some(5)),
        ];

        let activity = module_activity(&stats);
        assert!((activity[0].average_karma - 4.5).abs() < f64::EPSILON);
        assert!((activity[1].average_karma - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn wiped_modules_are_grouped_together() {
        let mut orphan = stat("a", "gone", "dota2", Some(1));
        orphan.module = None;
        let stats = vec![orphan.clone(), orphan, stat("b", "LeafeatorBot", "dota2", None)];

        let activity = module_activity(&stats);
        assert_eq!(activity[0].module, None);
        assert_eq!(activity[0].responses, 2);
    }

    #[test]
    fn subreddits_are_ordered_busiest_first() {
        let stats = vec![
            stat("a", "LeafeatorBot", "Games", None),
            stat("b", "LeafeatorBot", "dota2", None),
            stat("c", "LeafeatorBot", "dota2", None),
        ];

        let activity = subreddit_activity(&stats, MAX_SUBREDDITS);
        assert_eq!(
            activity,
            vec![
                SubredditActivity {
                    subreddit: Some("dota2".to_string()),
                    responses: 2,
                },
                SubredditActivity {
                    subreddit: Some("Games".to_string()),
                    responses: 1,
                },
            ]
        );
    }

    #[test]
    fn quiet_subreddits_are_dropped_past_the_limit() {
        let mut stats = Vec::new();
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            for n in 0..=i {
                stats.push(stat(&format!("{name}{n}"), "LeafeatorBot", name, None));
            }
        }
        stats.push(stat("e0", "LeafeatorBot", "e", None));

        // Counts: a=1 b=2 c=3 d=4 e=1. Dropping the one-response tier leaves three.
        let activity = subreddit_activity(&stats, 3);
        let names: Vec<_> = activity.iter().filter_map(|a| a.subreddit.as_deref()).collect();
        assert_eq!(names, vec!["d", "c", "b"]);

        assert_eq!(subreddit_activity(&stats, 2).len(), 2);
        assert_eq!(subreddit_activity(&stats, 5).len(), 5);
    }

    #[test]
    fn histogram_fills_quiet_hours() {
        let mut first = stat("a", "LeafeatorBot", "dota2", None);
        first.created = Some(at(9, 5));
        let mut second = first.clone();
        second.created = Some(at(9, 55));
        let mut third = first.clone();
        third.created = Some(at(12, 0));
        let mut undated = first.clone();
        undated.created = None;

        let histogram = response_histogram(&[first, second, third, undated]);
        assert_eq!(histogram.len(), 1);
        let counts: Vec<(NaiveDateTime, i64)> = histogram[0]
            .hours
            .iter()
            .map(|h| (h.hour, h.responses))
            .collect();
        assert_eq!(
            counts,
            vec![(at(9, 0), 2), (at(10, 0), 0), (at(11, 0), 0), (at(12, 0), 1)]
        );
    }

    #[test]
    fn summary_of_nothing_is_empty() {
        let summary = StatsSummary::from_stats(&[]);
        assert_eq!(summary, StatsSummary::default());
        assert_eq!(summary.total_responses(), 0);
    }
}
