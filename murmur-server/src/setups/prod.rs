//! Production server setup code

use crate::{
    db::PgDatabase,
    middleware::client::Logger,
    settings,
    setups::{ServerSetup, TextGenerator, VerificationCodeSender},
};
use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use mailgun_rs::{EmailAddress, Mailgun, MailgunRegion, Message};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::{Deserialize, Serialize};
use url::Url;

/// Production implementation of `ServerSetup`.
/// Actually calls out to other HTTP services configured in `settings.toml`.
#[derive(Clone, Debug, Default)]
pub struct ProdSetup;

impl ServerSetup for ProdSetup {
    type Database = PgDatabase;
    type VerificationCodeSender = EmailVerificationCodeSender;
    type TextGenerator = GeminiTextGenerator;
}

#[derive(Debug, Clone)]
/// Sends verification codes over email
pub struct EmailVerificationCodeSender {
    settings: settings::Mailgun,
    code_ttl_minutes: i64,
}

impl EmailVerificationCodeSender {
    /// Create a new EmailVerificationCodeSender
    pub fn new(settings: settings::Mailgun, code_ttl_minutes: i64) -> Self {
        Self {
            settings,
            code_ttl_minutes,
        }
    }

    fn sender(&self) -> EmailAddress {
        EmailAddress::name_address(&self.settings.from_name, &self.settings.from_address)
    }

    fn message(&self, email: &str, username: &str, code: &str) -> Message {
        Message {
            to: vec![EmailAddress::address(email)],
            subject: self.settings.subject.clone(),
            html: render_email(username, code, self.code_ttl_minutes),
            ..Default::default()
        }
    }
}

/// The HTML body of the verification email
fn render_email(username: &str, code: &str, code_ttl_minutes: i64) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.5;">
  <h2 style="color:#144419;">Hi {username},</h2>
  <p>Thank you for signing up! Use the code below to verify your account:</p>
  <h3 style="color:#144419; font-size:22px;">{code}</h3>
  <p style="font-size:14px; color:#555;">This code will expire in {code_ttl_minutes} minutes.</p>
</div>"#
    )
}

#[async_trait]
impl VerificationCodeSender for EmailVerificationCodeSender {
    /// Sends the code to the user
    async fn send_code(&self, email: &str, username: &str, code: &str) -> Result<()> {
        let message = self.message(email, username, code);

        tracing::debug!(
            email,
            username,
            subject = %message.subject,
            "Sending verification email"
        );

        let client = Mailgun {
            message,
            api_key: self.settings.api_key.clone(),
            domain: self.settings.domain.clone(),
        };

        client
            .async_send(MailgunRegion::US, &self.sender())
            .await
            .context("Failed sending verification email via mailgun")?;

        Ok(())
    }
}

/// A [`TextGenerator`] calling the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiTextGenerator {
    client: ClientWithMiddleware,
    endpoint: Url,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiTextGenerator {
    /// Build a generator with a reqwest client configured from the
    /// http client settings.
    pub fn new(settings: &settings::Gemini, http_client: &settings::HttpClient) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(http_client.pool_idle_timeout())
            .timeout(http_client.timeout())
            .build()?;

        Self::new_with(
            ClientBuilder::new(client)
                .with(Logger { name: "gemini" })
                .build(),
            settings,
        )
    }

    /// Build a generator using the given client.
    pub fn new_with(client: ClientWithMiddleware, settings: &settings::Gemini) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            settings.model
        ))
        .context("Invalid gemini base url")?;

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };

        let response: GenerateContentResponse = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?
            // The logging middleware already fails on error statuses, but
            // clients built without it must not parse an error body.
            .error_for_status()?
            .json()
            .await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| anyhow!("Gemini response contained no text"))
    }
}
