//! In-memory [`Database`], used for local development and tests

use super::{Database, DatabaseHealth, DbError, DbResult};
use crate::models::{
    account::{AccountRecord, NewAccount},
    message::{MessageRecord, NewMessage},
    session::{NewSession, SessionRecord},
    verification_code::VerificationCode,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

/// Keeps all records behind a single mutex, so every method is atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<i32, AccountRecord>,
    messages: BTreeMap<i32, MessageRecord>,
    sessions: BTreeMap<i32, SessionRecord>,
    last_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

impl InMemoryDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn account_by_username(&self, username: &str) -> DbResult<Option<AccountRecord>> {
        let state = self.state.lock();
        Ok(state
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn account_by_email(&self, email: &str) -> DbResult<Option<AccountRecord>> {
        let state = self.state.lock();
        Ok(state
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn account_by_id(&self, id: i32) -> DbResult<Option<AccountRecord>> {
        Ok(self.state.lock().accounts.get(&id).cloned())
    }

    async fn insert_account(&self, account: NewAccount) -> DbResult<AccountRecord> {
        let mut state = self.state.lock();

        if let Some(existing) = state
            .accounts
            .values()
            .find(|a| a.username == account.username || a.email == account.email)
        {
            let column = if existing.username == account.username {
                "username"
            } else {
                "email"
            };
            return Err(DbError::UniqueViolation(format!(
                "duplicate key value violates unique constraint on accounts.{column}"
            )));
        }

        let id = state.next_id();
        let record = AccountRecord {
            id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            verify_code: account.verify_code,
            verify_code_expires_at: account.verify_code_expires_at,
            is_verified: account.is_verified,
            is_accepting_messages: account.is_accepting_messages,
            inserted_at: account.inserted_at,
            updated_at: account.updated_at,
        };
        state.accounts.insert(id, record.clone());

        Ok(record)
    }

    async fn delete_account(&self, id: i32) -> DbResult<bool> {
        let mut state = self.state.lock();

        if state.accounts.remove(&id).is_none() {
            return Ok(false);
        }

        state.messages.retain(|_, message| message.account_id != id);
        state.sessions.retain(|_, session| session.account_id != id);

        Ok(true)
    }

    async fn set_verification_code(
        &self,
        id: i32,
        code: &VerificationCode,
        now: NaiveDateTime,
    ) -> DbResult<bool> {
        let mut state = self.state.lock();

        match state.accounts.get_mut(&id) {
            Some(account) if !account.is_verified => {
                account.verify_code = Some(code.code.clone());
                account.verify_code_expires_at = Some(code.expires_at);
                account.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_verified(&self, id: i32, now: NaiveDateTime) -> DbResult<bool> {
        let mut state = self.state.lock();

        match state.accounts.get_mut(&id) {
            Some(account) if !account.is_verified => {
                account.is_verified = true;
                account.verify_code = None;
                account.verify_code_expires_at = None;
                account.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_accepting_messages(
        &self,
        id: i32,
        accepting: bool,
        now: NaiveDateTime,
    ) -> DbResult<bool> {
        let mut state = self.state.lock();

        match state.accounts.get_mut(&id) {
            Some(account) => {
                account.is_accepting_messages = accepting;
                account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_message(&self, message: NewMessage) -> DbResult<MessageRecord> {
        let mut state = self.state.lock();

        if !state.accounts.contains_key(&message.account_id) {
            return Err(DbError::Other(anyhow::anyhow!(
                "foreign key violation: no account {}",
                message.account_id
            )));
        }

        let id = state.next_id();
        let record = MessageRecord {
            id,
            account_id: message.account_id,
            content: message.content,
            created_at: message.created_at,
        };
        state.messages.insert(id, record.clone());

        Ok(record)
    }

    async fn message_by_id(&self, id: i32) -> DbResult<Option<MessageRecord>> {
        Ok(self.state.lock().messages.get(&id).cloned())
    }

    async fn delete_message(&self, id: i32, account_id: i32) -> DbResult<bool> {
        let mut state = self.state.lock();

        match state.messages.get(&id) {
            Some(message) if message.account_id == account_id => {
                state.messages.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn messages_for_account(&self, account_id: i32) -> DbResult<Vec<MessageRecord>> {
        let state = self.state.lock();

        let mut messages: Vec<_> = state
            .messages
            .values()
            .filter(|message| message.account_id == account_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(messages)
    }

    async fn insert_session(&self, session: NewSession) -> DbResult<SessionRecord> {
        let mut state = self.state.lock();

        if state
            .sessions
            .values()
            .any(|s| s.token_hash == session.token_hash)
        {
            return Err(DbError::UniqueViolation(
                "duplicate key value violates unique constraint on sessions.token_hash".into(),
            ));
        }

        let id = state.next_id();
        let record = SessionRecord {
            id,
            account_id: session.account_id,
            token_hash: session.token_hash,
            expires_at: session.expires_at,
            inserted_at: session.inserted_at,
        };
        state.sessions.insert(id, record.clone());

        Ok(record)
    }

    async fn session_by_token_hash(&self, token_hash: &str) -> DbResult<Option<SessionRecord>> {
        let state = self.state.lock();
        Ok(state
            .sessions
            .values()
            .find(|session| session.token_hash == token_hash)
            .cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> DbResult<bool> {
        let mut state = self.state.lock();
        let before = state.sessions.len();
        state
            .sessions
            .retain(|_, session| session.token_hash != token_hash);
        Ok(state.sessions.len() < before)
    }

    async fn health(&self) -> DatabaseHealth {
        DatabaseHealth {
            connected: true,
            up_to_date: Some(true),
        }
    }
}
