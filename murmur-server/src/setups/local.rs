//! Server setup for local development & easier integration testing

use anyhow::Result;
use async_trait::async_trait;

use super::{prod::GeminiTextGenerator, ServerSetup, VerificationCodeSender};
use crate::db::InMemoryDatabase;

/// Implementation of `ServerSetup` for local environments.
/// Keeps everything in memory and prints verification codes to the log
/// instead of mailing them. Suggestions still go to Gemini.
#[derive(Debug, Clone)]
pub struct LocalSetup;

impl ServerSetup for LocalSetup {
    type Database = InMemoryDatabase;
    type VerificationCodeSender = LogCodeSender;
    type TextGenerator = GeminiTextGenerator;
}

/// A `VerificationCodeSender` that doesn't actually send emails,
/// but instead logs them via tracing.
#[derive(Debug, Clone, Default)]
pub struct LogCodeSender;

#[async_trait]
impl VerificationCodeSender for LogCodeSender {
    async fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()> {
        tracing::info!(email, username, ?code, "verification code");
        Ok(())
    }
}
