//! Inbox message log.

use diesel::prelude::*;
use tracing::debug;

use super::database::model::{MessageRow, NewMessageRow};
use super::database::schema::{messages, modules};
use super::registry::require_module;
use super::Database;
use crate::domain::{InboxMessage, NewInboxMessage};
use crate::error::Result;

impl Database {
    /// Log an inbox message received by a module.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotRegistered`](crate::error::Error::ModuleNotRegistered)
    /// for unknown modules.
    pub fn add_message(&self, message: &NewInboxMessage) -> Result<()> {
        let mut conn = self.conn()?;
        let id = require_module(&mut conn, &message.module)?;

        diesel::insert_into(messages::table)
            .values(&NewMessageRow {
                id: message.id.clone(),
                bot_module: id.get(),
                created: message.created,
                title: message.title.clone(),
                author: message.author.clone(),
                body: message.body.clone(),
            })
            .execute(&mut conn)?;

        debug!(id = %message.id, module = %message.module, "Message logged");
        Ok(())
    }

    /// Every logged message, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_messages(&self) -> Result<Vec<InboxMessage>> {
        let mut conn = self.conn()?;
        let rows: Vec<MessageRow> = messages::table
            .left_join(modules::table.on(messages::bot_module.eq(modules::rowid.nullable())))
            .select((
                messages::id,
                modules::module_name.nullable(),
                messages::created,
                messages::title,
                messages::author,
                messages::body,
            ))
            .order((messages::created.asc(), messages::rowid.asc()))
            .load(&mut conn)?;

        Ok(rows.into_iter().map(InboxMessage::from).collect())
    }
}
