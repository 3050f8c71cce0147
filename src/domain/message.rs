//! Inbox messages received by bot modules.

use chrono::NaiveDateTime;
use serde::Serialize;

/// An inbox message to log in `messages`.
#[derive(Debug, Clone)]
pub struct NewInboxMessage {
    /// Reddit message id.
    pub id: String,
    pub module: String,
    /// Arrival time of the message.
    pub created: NaiveDateTime,
    /// Subject line.
    pub title: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}

/// A logged inbox message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxMessage {
    pub id: String,
    pub module: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
}
