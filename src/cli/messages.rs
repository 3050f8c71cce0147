//! Handler for the `messages` command group.

use serde_json::json;
use tabled::{Table, Tabled};

use super::command::MessagesCommand;
use super::{output, timestamp, Context};
use crate::domain::{parse_ban_request, InboxMessage};
use crate::error::Result;

const PREVIEW_CHARS: usize = 60;

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Received")]
    created: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Subject")]
    title: String,
    #[tabled(rename = "Ban request")]
    ban_request: String,
}

fn preview(text: Option<String>) -> String {
    match text {
        Some(text) if text.chars().count() > PREVIEW_CHARS => {
            let cut: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{cut}…")
        }
        Some(text) => text,
        None => "-".to_string(),
    }
}

impl From<InboxMessage> for MessageRow {
    fn from(message: InboxMessage) -> Self {
        let ban_request = message
            .body
            .as_deref()
            .and_then(parse_ban_request)
            .map_or_else(
                || "-".to_string(),
                |req| format!("/{}/{}", req.target.path_prefix(), req.name),
            );
        Self {
            id: message.id,
            module: output::or_dash(message.module),
            created: timestamp(message.created),
            author: output::or_dash(message.author),
            title: preview(message.title),
            ban_request,
        }
    }
}

pub fn execute(command: MessagesCommand, ctx: &Context) -> Result<()> {
    let db = ctx.open_database()?;
    let MessagesCommand::List(filter) = command;

    let mut messages = db.all_messages()?;
    if let Some(module) = &filter.module {
        messages.retain(|m| m.module.as_deref() == Some(module.as_str()));
    }

    if output::is_json() {
        output::json_output(json!({ "command": "messages.list", "messages": messages }));
        return Ok(());
    }

    output::section("Inbox messages");
    if messages.is_empty() {
        output::note("No messages logged");
        return Ok(());
    }
    output::lines(&Table::new(messages.into_iter().map(MessageRow::from)).to_string());
    Ok(())
}
