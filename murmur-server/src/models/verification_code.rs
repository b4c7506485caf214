//! Email verification codes

use crate::error::ServiceError;
use chrono::{Duration, NaiveDateTime};
use rand::Rng;

/// A verification code together with the moment it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    /// Six ASCII digits
    pub code: String,
    /// The code is accepted strictly before this instant
    pub expires_at: NaiveDateTime,
}

impl VerificationCode {
    /// Generate a fresh random code valid for `ttl` starting at `now`.
    pub fn generate(now: NaiveDateTime, ttl: Duration) -> Self {
        Self {
            code: generate_code(),
            expires_at: now + ttl,
        }
    }

    /// Whether the code can still be used at `now`.
    pub fn is_live(&self, now: NaiveDateTime) -> bool {
        now < self.expires_at
    }

    /// Check a submitted code.
    ///
    /// Expiry is checked first: an expired code is rejected even if it
    /// matches.
    pub fn check(&self, submitted: &str, now: NaiveDateTime) -> Result<(), ServiceError> {
        if !self.is_live(now) {
            return Err(ServiceError::Expired(
                "Verification code has expired, please request a new one".to_string(),
            ));
        }

        if submitted.trim() != self.code {
            return Err(ServiceError::Mismatch(
                "Incorrect verification code".to_string(),
            ));
        }

        Ok(())
    }
}

/// Generate a code that can be sent to the user.
fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}
