//! Test server setup code

use crate::{
    db::InMemoryDatabase,
    setups::{ServerSetup, TextGenerator, VerificationCodeSender},
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

#[derive(Clone, Debug, Default)]
pub struct TestSetup;

impl ServerSetup for TestSetup {
    type Database = InMemoryDatabase;
    type VerificationCodeSender = TestVerificationCodeSender;
    type TextGenerator = TestTextGenerator;
}

/// A sent verification email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub email: String,
    pub username: String,
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct TestVerificationCodeSender {
    emails: Arc<Mutex<Vec<SentCode>>>,
    failing: Arc<Mutex<bool>>,
}

impl TestVerificationCodeSender {
    pub fn get_emails(&self) -> Vec<SentCode> {
        self.emails.lock().clone()
    }

    /// The most recent code sent to `email`
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.emails
            .lock()
            .iter()
            .rev()
            .find(|sent| sent.email == email)
            .map(|sent| sent.code.clone())
    }

    /// Make subsequent sends fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

#[async_trait]
impl VerificationCodeSender for TestVerificationCodeSender {
    async fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()> {
        if *self.failing.lock() {
            return Err(anyhow!("mail transport unavailable"));
        }

        self.emails.lock().push(SentCode {
            email: email.to_string(),
            username: username.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

/// Answers prompts from a script of canned responses.
/// An exhausted script fails like an unreachable upstream.
#[derive(Debug, Clone, Default)]
pub struct TestTextGenerator {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl TestTextGenerator {
    /// Queue a successful completion
    pub fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.responses.lock().push_back(Err(reason.into()));
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for TestTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());

        match self.responses.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(anyhow!(reason)),
            None => Err(anyhow!("no scripted response left")),
        }
    }
}
