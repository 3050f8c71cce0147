//! Storage-agnostic types exchanged with the rover store.
//!
//! Rows read back from SQLite are converted into these types by the
//! [`store`](crate::store) layer; callers never see Diesel row structs.

pub mod ban;
pub mod message;
pub mod meta;
pub mod module;
pub mod seen;
pub mod stats;
pub mod thing;
pub mod update;

pub use ban::{parse_ban_request, Ban, BanRequest, BanScope, BanTarget};
pub use message::{InboxMessage, NewInboxMessage};
pub use meta::{DailyMeta, MetaCounter};
pub use module::{Module, ModuleId};
pub use seen::SeenThing;
pub use stats::{
    module_activity, response_histogram, subreddit_activity, HourlyCount, ModuleActivity,
    NewResponseStat, ResponseHistogram, ResponseStat, StatsSummary, SubredditActivity,
};
pub use thing::ThingKind;
pub use update::UpdateThread;
