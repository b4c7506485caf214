//! Request and response data types that are common and useful between clients of and the murmur server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Longest accepted password, in bytes. bcrypt ignores everything past this.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// The uniform response body.
///
/// Every operation answers with this shape, both on success and on failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ApiResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human readable outcome
    pub message: String,
}

impl ApiResponse {
    /// A successful response with the given message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed response with the given message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Sign up request struct
#[derive(Deserialize, Serialize, Validate, Clone, Debug, ToSchema)]
pub struct SignUpRequest {
    /// Username for the new account
    pub username: String,
    /// Email address the verification code gets sent to
    #[validate(email)]
    pub email: String,
    /// Account password
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

/// Verification code submission
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct VerifyCodeRequest {
    /// Username of the account being verified
    pub username: String,
    /// The code from the verification email
    pub code: String,
}

/// Request to send a fresh verification code
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct ResendCodeRequest {
    /// Username of the account awaiting verification
    pub username: String,
}

/// Query parameters for the username availability check
#[derive(Deserialize, Serialize, Clone, Debug, IntoParams, ToSchema)]
pub struct CheckUsernameQuery {
    /// The candidate username
    pub username: String,
}

/// Credentials sign in request
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct SignInRequest {
    /// Username or email address
    pub identifier: String,
    /// Account password
    pub password: String,
}

/// Response to a successful sign in
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct SessionResponse {
    /// Always true
    pub success: bool,
    /// Human readable outcome
    pub message: String,
    /// Bearer token for authenticated requests
    pub token: String,
    /// Username of the signed in account
    pub username: String,
    /// When the token stops being accepted
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: DateTime<Utc>,
}

/// Anonymous message submission
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct SendMessageRequest {
    /// Recipient username
    pub username: String,
    /// Message text
    pub content: String,
}

/// A received anonymous message
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct Message {
    /// Message identifier
    pub id: i32,
    /// Message text
    pub content: String,
    /// When the message was received
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

/// The messages of the signed in account
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct MessagesResponse {
    /// Always true
    pub success: bool,
    /// Human readable outcome
    pub message: String,
    /// Messages, newest first
    pub messages: Vec<Message>,
}

/// Toggle for accepting messages
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesRequest {
    /// Whether new anonymous messages are accepted
    pub accept_messages: bool,
}

/// Current state of the accepting-messages flag
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesResponse {
    /// Always true
    pub success: bool,
    /// Human readable outcome
    pub message: String,
    /// Whether new anonymous messages are accepted
    pub is_accepting_messages: bool,
}

/// Public information about a profile
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Profile username
    pub username: String,
    /// Whether new anonymous messages are accepted
    pub is_accepting_messages: bool,
}

/// Suggested messages
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema)]
pub struct SuggestionResponse {
    /// The raw completion, suggestions separated by `||`
    pub suggestion: String,
    /// The parsed suggestions
    pub suggestions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;
    use validator::Validate;

    #[test]
    fn test_sign_up_request_validation() -> TestResult {
        let request: SignUpRequest = serde_json::from_value(serde_json::json!({
            "username": "oedipa",
            "email": "oedipa@trystero.com",
            "password": "lot49!",
        }))?;
        assert!(request.validate().is_ok());

        let bad_email = SignUpRequest {
            email: "not-an-email".to_string(),
            ..request.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignUpRequest {
            password: "12345".to_string(),
            ..request.clone()
        };
        assert!(short_password.validate().is_err());

        let longest_password = SignUpRequest {
            password: "a".repeat(MAX_PASSWORD_BYTES),
            ..request.clone()
        };
        assert!(longest_password.validate().is_ok());

        let long_password = SignUpRequest {
            password: format!("{}SECRET-TAIL", "a".repeat(MAX_PASSWORD_BYTES)),
            ..request.clone()
        };
        assert!(long_password.validate().is_err());

        // 37 characters, 74 bytes
        let multibyte_password = SignUpRequest {
            password: "é".repeat(37),
            ..request
        };
        assert!(multibyte_password.validate().is_err());

        Ok(())
    }

    #[test]
    fn test_accept_messages_wire_format() -> TestResult {
        let request: AcceptMessagesRequest =
            serde_json::from_str(r#"{ "acceptMessages": false }"#)?;
        assert!(!request.accept_messages);
        Ok(())
    }
}
