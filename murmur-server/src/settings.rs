//! Settings / Configuration.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Names of environments for murmur-server.
/// Overrides serialization to force lower case in settings and
/// environment variables
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    /// Local environment (local testing).
    Local,
    /// Official Develop environment.
    Dev,
    /// Official environment.
    Staging,
    /// Official Production environment.
    Prod,
}

/// Implement display to force environment to lower case
impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_lowercase())
    }
}

/// Database settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    /// Database URL
    pub url: String,
    /// Connect Timeout
    pub connect_timeout: u64,
}

/// Server settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    /// Server [AppEnvironment].
    pub environment: AppEnvironment,
    /// Server port.
    pub port: u16,
    /// Server metrics port.
    pub metrics_port: u16,
    /// Server timeout in milliseconds.
    pub timeout_ms: u64,
    /// Emit logs as JSON lines instead of human readable text.
    #[serde(default)]
    pub json_logs: bool,
}

/// Email verification settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Verification {
    /// How long a verification code stays valid, in minutes.
    pub code_ttl_minutes: i64,
}

impl Default for Verification {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
        }
    }
}

impl Verification {
    /// The code lifetime as a [chrono::Duration].
    pub fn code_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.code_ttl_minutes)
    }
}

/// Sign-in session settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    /// How long a session token stays valid, in hours.
    pub ttl_hours: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self { ttl_hours: 24 * 30 }
    }
}

impl Session {
    /// The session lifetime as a [chrono::Duration].
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

/// [Mailgun] settings.
///
/// [Mailgun]: https://www.mailgun.com/
#[derive(Clone, Deserialize)]
pub struct Mailgun {
    /// Mailgun API key.
    pub api_key: String,
    /// Mailgun domain.
    pub domain: String,
    /// Mailgun Subject
    pub subject: String,
    /// Mailgun From Address
    pub from_address: String,
    /// Mailgun From Name
    pub from_name: String,
}

impl std::fmt::Debug for Mailgun {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Mailgun")
            .field("domain", &self.domain)
            .field("subject", &self.subject)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}

/// Gemini text generation settings.
#[derive(Clone, Deserialize)]
pub struct Gemini {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// Model used for message suggestions.
    pub model: String,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.debug_struct("Gemini")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Application settings.
pub struct Settings {
    /// Server settings
    pub server: Server,
    /// Database settings
    pub database: Database,
    /// Verification code settings
    #[serde(default)]
    pub verification: Verification,
    /// Session settings
    #[serde(default)]
    pub session: Session,
    /// Mailgun settings
    pub mailgun: Mailgun,
    /// Gemini settings
    pub gemini: Gemini,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http_client: HttpClient,
    /// The path where the settings file resides.
    /// This can't actually be configured in the settings file itself, for obvious reasons.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .unwrap_or(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/settings.toml"));
        // inject environment variables naming them properly on the settings
        // e.g. [database] url="foo"
        // would be injected with environment variable MURMUR_DATABASE__URL="foo"
        let s = Config::builder()
            .add_source(File::with_name(&path.as_path().display().to_string()))
            .add_source(
                Environment::with_prefix("MURMUR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let mut settings: Self = s.try_deserialize()?;
        settings.path = Some(path);
        Ok(settings)
    }
}

/// Settings for Http clients.
#[derive(Clone, Debug, Deserialize)]
pub struct HttpClient {
    /// Optional timeout for idle sockets being kept-alive.
    /// Using `None` to disable timeout.
    pub pool_idle_timeout_ms: Option<u64>,
    /// Client timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            pool_idle_timeout_ms: Some(5_000),
            timeout_ms: 30_000,
        }
    }
}

impl HttpClient {
    /// Convert `pool_idle_timeout_ms` to [Duration].
    pub fn pool_idle_timeout(&self) -> Option<Duration> {
        self.pool_idle_timeout_ms.and_then(|timeout| {
            if timeout != 0 {
                Some(Duration::from_millis(timeout))
            } else {
                None
            }
        })
    }

    /// Convert `timeout_ms` to [Duration].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn test_default_http_client_settings() {
        let settings = HttpClient::default();

        assert_eq!(
            settings.pool_idle_timeout(),
            Some(Duration::from_millis(5_000))
        );
        assert_eq!(settings.timeout(), Duration::from_millis(30_000));
    }

    #[test]
    fn test_http_client_overrides() {
        let settings = HttpClient {
            pool_idle_timeout_ms: Some(0),
            timeout_ms: 100,
        };

        assert_eq!(settings.pool_idle_timeout(), None);
        assert_eq!(settings.timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_bundled_settings() -> TestResult {
        let settings = Settings::load(None)?;

        assert_eq!(settings.verification.code_ttl(), chrono::Duration::minutes(10));
        assert_eq!(settings.session.ttl(), chrono::Duration::hours(720));
        assert_eq!(settings.gemini.model, "gemini-1.5-flash");
        assert!(settings.path.is_some());

        Ok(())
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mailgun = Mailgun {
            api_key: "key-hunter2".to_string(),
            domain: "mg.example.com".to_string(),
            subject: "Your verification code".to_string(),
            from_address: "noreply@example.com".to_string(),
            from_name: "murmur".to_string(),
        };

        assert!(!format!("{mailgun:?}").contains("hunter2"));
    }
}
