//! The Axum Application State

use crate::{settings, setups::ServerSetup};
use anyhow::{anyhow, Result};
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
/// Global application route state.
pub struct AppState<S: ServerSetup> {
    /// Where accounts, messages and sessions live
    pub db: S::Database,
    /// The service that sends account verification codes
    pub verification_code_sender: S::VerificationCodeSender,
    /// The service answering prompts for message suggestions
    pub text_generator: S::TextGenerator,
    /// Verification code settings
    pub verification_settings: Arc<settings::Verification>,
    /// Session settings
    pub session_settings: Arc<settings::Session>,
    /// Source of the current time
    pub clock: Clock,
}

/// Where operations get "now" from.
///
/// Tests pin the clock to move across code and session expiry.
#[derive(Clone, Debug, Default)]
pub enum Clock {
    /// The system clock, in UTC
    #[default]
    System,
    /// A fixed instant, shared between clones
    Fixed(Arc<parking_lot::Mutex<NaiveDateTime>>),
}

impl Clock {
    /// A clock stuck at `now` until [`Clock::set`] moves it
    pub fn fixed(now: NaiveDateTime) -> Self {
        Self::Fixed(Arc::new(parking_lot::Mutex::new(now)))
    }

    /// The current instant, in UTC
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Utc::now().naive_utc(),
            Self::Fixed(now) => *now.lock(),
        }
    }

    /// Move a fixed clock. No effect on the system clock.
    pub fn set(&self, instant: NaiveDateTime) {
        if let Self::Fixed(now) = self {
            *now.lock() = instant;
        }
    }
}

/// Builder for [`AppState`]
#[derive(Debug)]
pub struct AppStateBuilder<S: ServerSetup> {
    db: Option<S::Database>,
    verification_code_sender: Option<S::VerificationCodeSender>,
    text_generator: Option<S::TextGenerator>,
    verification_settings: settings::Verification,
    session_settings: settings::Session,
    clock: Clock,
}

impl<S: ServerSetup> Default for AppStateBuilder<S> {
    fn default() -> Self {
        Self {
            db: None,
            verification_code_sender: None,
            text_generator: None,
            verification_settings: Default::default(),
            session_settings: Default::default(),
            clock: Default::default(),
        }
    }
}

impl<S: ServerSetup> AppStateBuilder<S> {
    /// Finalize the builder and return the [`AppState`]
    pub fn finalize(self) -> Result<AppState<S>> {
        let db = self.db.ok_or_else(|| anyhow!("db is required"))?;

        let verification_code_sender = self
            .verification_code_sender
            .ok_or_else(|| anyhow!("verification_code_sender is required"))?;

        let text_generator = self
            .text_generator
            .ok_or_else(|| anyhow!("text_generator is required"))?;

        Ok(AppState {
            db,
            verification_code_sender,
            text_generator,
            verification_settings: Arc::new(self.verification_settings),
            session_settings: Arc::new(self.session_settings),
            clock: self.clock,
        })
    }

    /// Set the database
    pub fn with_db(mut self, db: S::Database) -> Self {
        self.db = Some(db);
        self
    }

    /// Set the service that sends account verification codes
    pub fn with_verification_code_sender(
        mut self,
        verification_code_sender: S::VerificationCodeSender,
    ) -> Self {
        self.verification_code_sender = Some(verification_code_sender);
        self
    }

    /// Set the text generator used for message suggestions
    pub fn with_text_generator(mut self, text_generator: S::TextGenerator) -> Self {
        self.text_generator = Some(text_generator);
        self
    }

    /// Set verification code settings
    pub fn with_verification_settings(mut self, settings: settings::Verification) -> Self {
        self.verification_settings = settings;
        self
    }

    /// Set session settings
    pub fn with_session_settings(mut self, settings: settings::Session) -> Self {
        self.session_settings = settings;
        self
    }

    /// Set the clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl<S> std::fmt::Debug for AppState<S>
where
    S: ServerSetup,
    S::Database: std::fmt::Debug,
    S::VerificationCodeSender: std::fmt::Debug,
    S::TextGenerator: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("verification_code_sender", &self.verification_code_sender)
            .field("text_generator", &self.text_generator)
            .field("verification_settings", &self.verification_settings)
            .field("session_settings", &self.session_settings)
            .field("clock", &self.clock)
            .finish()
    }
}
