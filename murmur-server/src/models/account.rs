//! Account model

use crate::{db::schema::accounts, models::verification_code::VerificationCode};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use murmur_core::{common::ProfileResponse, username::Username};

/// A row of the `accounts` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
pub struct AccountRecord {
    /// Internal Database Identifier
    pub id: i32,
    /// Unique username
    pub username: String,
    /// Unique, lower-cased email address
    pub email: String,
    /// bcrypt hash of the account password
    pub password_hash: String,
    /// The pending verification code, if any
    pub verify_code: Option<String>,
    /// When the pending verification code expires
    pub verify_code_expires_at: Option<NaiveDateTime>,
    /// Whether the email address has been verified
    pub is_verified: bool,
    /// Whether anonymous messages are currently accepted
    pub is_accepting_messages: bool,
    /// Inserted at timestamp
    pub inserted_at: NaiveDateTime,
    /// Updated at timestamp
    pub updated_at: NaiveDateTime,
}

impl AccountRecord {
    /// The stored verification code, if one is pending.
    pub fn verification_code(&self) -> Option<VerificationCode> {
        match (&self.verify_code, self.verify_code_expires_at) {
            (Some(code), Some(expires_at)) => Some(VerificationCode {
                code: code.clone(),
                expires_at,
            }),
            _ => None,
        }
    }

    /// Whether a verification code that can still be used is pending.
    pub fn has_live_code(&self, now: NaiveDateTime) -> bool {
        self.verification_code()
            .map_or(false, |code| code.is_live(now))
    }

    /// An unverified account whose code has run out. Its username and email
    /// can be claimed by a new sign up.
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        !self.is_verified && !self.has_live_code(now)
    }

    /// Whether this account keeps its username and email from being claimed.
    pub fn holds_identity(&self, now: NaiveDateTime) -> bool {
        !self.is_stale(now)
    }

    /// The public view used on the profile page.
    pub fn to_profile(&self) -> ProfileResponse {
        ProfileResponse {
            username: self.username.clone(),
            is_accepting_messages: self.is_accepting_messages,
        }
    }
}

/// New Account Struct (for creating new accounts)
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount {
    /// Unique username
    pub username: String,
    /// Lower-cased email address
    pub email: String,
    /// bcrypt hash of the account password
    pub password_hash: String,
    /// Verification code sent out on sign up
    pub verify_code: Option<String>,
    /// Expiry of the verification code
    pub verify_code_expires_at: Option<NaiveDateTime>,
    /// Always false for new accounts
    pub is_verified: bool,
    /// New accounts accept messages
    pub is_accepting_messages: bool,
    /// Inserted at timestamp
    pub inserted_at: NaiveDateTime,
    /// Updated at timestamp
    pub updated_at: NaiveDateTime,
}

impl NewAccount {
    /// Create a new, unverified account awaiting `code`.
    pub fn new(
        username: &Username,
        email: &str,
        password_hash: String,
        code: &VerificationCode,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            username: username.to_string(),
            email: normalize_email(email),
            password_hash,
            verify_code: Some(code.code.clone()),
            verify_code_expires_at: Some(code.expires_at),
            is_verified: false,
            is_accepting_messages: true,
            inserted_at: now,
            updated_at: now,
        }
    }
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
