//! Message model

use crate::db::schema::messages;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use murmur_core::common::Message;

/// A row of the `messages` table. No sender is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = messages)]
pub struct MessageRecord {
    /// Internal Database Identifier
    pub id: i32,
    /// Recipient account
    pub account_id: i32,
    /// Message text
    pub content: String,
    /// When the message was received
    pub created_at: NaiveDateTime,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            content: record.content,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(record.created_at, Utc),
        }
    }
}

/// A message about to be stored
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    /// Recipient account
    pub account_id: i32,
    /// Validated message text
    pub content: String,
    /// Server-assigned receive time
    pub created_at: NaiveDateTime,
}
