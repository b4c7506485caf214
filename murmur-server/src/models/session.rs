//! Session model

use crate::db::schema::sessions;
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// A row of the `sessions` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub struct SessionRecord {
    /// Internal Database Identifier
    pub id: i32,
    /// The signed in account
    pub account_id: i32,
    /// blake3 hash of the bearer token
    pub token_hash: String,
    /// The token is accepted strictly before this instant
    pub expires_at: NaiveDateTime,
    /// Inserted at timestamp
    pub inserted_at: NaiveDateTime,
}

impl SessionRecord {
    /// Whether the session can still be used at `now`.
    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        now < self.expires_at
    }
}

/// A session about to be stored
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    /// The signed in account
    pub account_id: i32,
    /// blake3 hash of the bearer token
    pub token_hash: String,
    /// Expiry
    pub expires_at: NaiveDateTime,
    /// Inserted at timestamp
    pub inserted_at: NaiveDateTime,
}
