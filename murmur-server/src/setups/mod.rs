//! This abstracts murmur server side-effects into "setups".
//!
//! This module defines the traits, submodules define test & production
//! collections of implementations.
use crate::db::Database;
use anyhow::Result;
use async_trait::async_trait;

pub mod local;
pub mod prod;
#[cfg(test)]
pub mod test;

/// This trait groups type parameters to the server's `AppState` struct.
///
/// It captures the setup of the server, distinguishing between e.g.
/// unit testing & production setups.
pub trait ServerSetup: Clone + Send + Sync + 'static {
    /// Where accounts, messages and sessions are stored
    type Database: Database;
    /// Which implementation to use to send verification codes
    type VerificationCodeSender: VerificationCodeSender;
    /// What produces message suggestions
    type TextGenerator: TextGenerator;
}

/// The service that sends account verification codes
#[async_trait]
pub trait VerificationCodeSender: Clone + Send + Sync + 'static {
    /// Send the code associated with the email
    async fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()>;
}

/// A large language model, or anything else that answers prompts with text.
#[async_trait]
pub trait TextGenerator: Clone + Send + Sync + 'static {
    /// Produce a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
