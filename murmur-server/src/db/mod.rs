//! Database

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod postgres;

#[allow(missing_docs, unused_imports)]
pub mod schema;

pub use connection::{connect, pool, schema_version, Conn, Pool};
pub use memory::InMemoryDatabase;
pub use postgres::PgDatabase;

use crate::models::{
    account::{AccountRecord, NewAccount},
    message::{MessageRecord, NewMessage},
    session::{NewSession, SessionRecord},
    verification_code::VerificationCode,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;

diesel::table! {
    /// The table `diesel_migrations` records applied migrations in.
    /// Used in healthchecks to verify that all migrations have been applied.
    #[allow(missing_docs)]
    __diesel_schema_migrations (version) {
        version -> VarChar,
        run_on -> Timestamp,
    }
}

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique index rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    /// Anything else: connection loss, broken queries, etc.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::UniqueViolation(match info.details() {
                Some(details) => format!("{} ({details})", info.message()),
                None => info.message().to_string(),
            }),
            _ => Self::Other(err.into()),
        }
    }
}

/// Shorthand for storage results
pub type DbResult<T> = Result<T, DbError>;

/// Diagnostic information for healthchecks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseHealth {
    /// Whether the store could be reached
    pub connected: bool,
    /// Whether the newest embedded migration has been applied.
    /// `None` if that couldn't be determined.
    pub up_to_date: Option<bool>,
}

/// The persistence seam for accounts, messages and sessions.
///
/// Every method is a single atomic operation against the store.
/// Conditional updates report whether a row was affected.
#[async_trait]
pub trait Database: Clone + Send + Sync + 'static {
    /// Look up an account by its exact username
    async fn account_by_username(&self, username: &str) -> DbResult<Option<AccountRecord>>;

    /// Look up an account by its (lower-cased) email address
    async fn account_by_email(&self, email: &str) -> DbResult<Option<AccountRecord>>;

    /// Look up an account by id
    async fn account_by_id(&self, id: i32) -> DbResult<Option<AccountRecord>>;

    /// Store a new account. Fails with [`DbError::UniqueViolation`] if the
    /// username or email are taken.
    async fn insert_account(&self, account: NewAccount) -> DbResult<AccountRecord>;

    /// Remove an account together with its messages and sessions.
    async fn delete_account(&self, id: i32) -> DbResult<bool>;

    /// Replace the pending verification code of an unverified account.
    async fn set_verification_code(
        &self,
        id: i32,
        code: &VerificationCode,
        now: NaiveDateTime,
    ) -> DbResult<bool>;

    /// Mark an unverified account as verified and consume its code.
    /// Returns false if the account was already verified.
    async fn mark_verified(&self, id: i32, now: NaiveDateTime) -> DbResult<bool>;

    /// Set the accepting-messages flag.
    async fn set_accepting_messages(
        &self,
        id: i32,
        accepting: bool,
        now: NaiveDateTime,
    ) -> DbResult<bool>;

    /// Append a message to an account's inbox
    async fn insert_message(&self, message: NewMessage) -> DbResult<MessageRecord>;

    /// Look up a message by id
    async fn message_by_id(&self, id: i32) -> DbResult<Option<MessageRecord>>;

    /// Remove a message if it belongs to the given account.
    async fn delete_message(&self, id: i32, account_id: i32) -> DbResult<bool>;

    /// All messages of an account, newest first.
    async fn messages_for_account(&self, account_id: i32) -> DbResult<Vec<MessageRecord>>;

    /// Store a new session
    async fn insert_session(&self, session: NewSession) -> DbResult<SessionRecord>;

    /// Look up a session by the hash of its token
    async fn session_by_token_hash(&self, token_hash: &str) -> DbResult<Option<SessionRecord>>;

    /// Remove a session by the hash of its token
    async fn delete_session(&self, token_hash: &str) -> DbResult<bool>;

    /// Connectivity and schema diagnostics
    async fn health(&self) -> DatabaseHealth;
}
