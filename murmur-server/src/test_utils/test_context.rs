//! Helpers for running isolated webserver instances
use crate::{
    app_state::{AppState, AppStateBuilder, Clock},
    db::{Database, InMemoryDatabase},
    models::{
        account::{AccountRecord, NewAccount},
        verification_code::VerificationCode,
    },
    router::setup_app_router,
    session::{self, AuthenticatedAccount},
    setups::test::{TestSetup, TestTextGenerator, TestVerificationCodeSender},
};
use anyhow::{anyhow, Result};
use axum::Router;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use murmur_core::username::Username;

/// A reference to a murmur server in an isolated test environment.
/// Everything lives in memory and the clock only moves when told to.
#[derive(Debug)]
pub struct TestContext {
    app: Router,
    app_state: AppState<TestSetup>,
}

impl TestContext {
    /// Create a new test context
    pub fn new() -> Self {
        Self::new_with_state(|builder| builder)
    }

    pub fn new_with_state<F>(f: F) -> Self
    where
        F: FnOnce(AppStateBuilder<TestSetup>) -> AppStateBuilder<TestSetup>,
    {
        let builder = AppStateBuilder::<TestSetup>::default()
            .with_db(InMemoryDatabase::new())
            .with_verification_code_sender(TestVerificationCodeSender::default())
            .with_text_generator(TestTextGenerator::default())
            .with_clock(Clock::fixed(Self::start_time()));

        let app_state = f(builder).finalize().unwrap();

        let app = setup_app_router(app_state.clone());

        Self { app, app_state }
    }

    /// Where the test clock starts
    pub fn start_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn app_state(&self) -> &AppState<TestSetup> {
        &self.app_state
    }

    pub fn db(&self) -> &InMemoryDatabase {
        &self.app_state.db
    }

    pub fn verification_code_sender(&self) -> &TestVerificationCodeSender {
        &self.app_state.verification_code_sender
    }

    pub fn text_generator(&self) -> &TestTextGenerator {
        &self.app_state.text_generator
    }

    pub fn now(&self) -> NaiveDateTime {
        self.app_state.clock.now()
    }

    /// Move the clock forward
    pub fn advance(&self, duration: Duration) {
        self.app_state.clock.set(self.now() + duration);
    }

    /// An unverified account `username` with email `{username}@trystero.com`,
    /// password `lot49!` and the given code expiring in 10 minutes.
    pub async fn pending_account_with_code(
        &self,
        username: &str,
        code: &str,
    ) -> Result<AccountRecord> {
        let username: Username = username.parse()?;
        let code = VerificationCode {
            code: code.to_string(),
            expires_at: self.now() + Duration::minutes(10),
        };
        let password_hash = crate::crypto::hash_password("lot49!")?;

        Ok(self
            .db()
            .insert_account(NewAccount::new(
                &username,
                &format!("{username}@trystero.com"),
                password_hash,
                &code,
                self.now(),
            ))
            .await?)
    }

    /// A verified account
    pub async fn verified_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountRecord> {
        let username: Username = username.parse()?;
        let code = VerificationCode::generate(self.now(), Duration::minutes(10));
        let password_hash = crate::crypto::hash_password(password)?;

        let account = self
            .db()
            .insert_account(NewAccount::new(
                &username,
                email,
                password_hash,
                &code,
                self.now(),
            ))
            .await?;
        self.db().mark_verified(account.id, self.now()).await?;

        self.db()
            .account_by_id(account.id)
            .await?
            .ok_or_else(|| anyhow!("account vanished"))
    }

    /// Sign in to a fresh verified account and return its bearer token
    pub async fn signed_in(&self, username: &str) -> Result<String> {
        self.verified_account(username, &format!("{username}@trystero.com"), "lot49!")
            .await?;
        let session = session::sign_in(&self.app_state, username, "lot49!").await?;
        Ok(session.token)
    }

    /// A fresh verified account, as seen by authenticated operations
    pub async fn authenticated(&self, username: &str) -> Result<AuthenticatedAccount> {
        let token = self.signed_in(username).await?;
        Ok(session::authenticate(&self.app_state, &token).await?)
    }
}
