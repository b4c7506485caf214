//! Generic result/error resprentation(s).

use std::convert::Infallible;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection, TypedHeaderRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use murmur_core::common::ApiResponse;
use validator::ValidationErrors;

use crate::db::DbError;

/// Standard return type out of routes / handlers
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Result of a domain operation
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Everything a domain operation can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("{0}")]
    Invalid(String),
    /// The username or email is already held by another account
    #[error("{0}")]
    Conflict(String),
    /// The referenced entity doesn't exist
    #[error("{0}")]
    NotFound(String),
    /// The verification code is past its expiry
    #[error("{0}")]
    Expired(String),
    /// The submitted verification code is wrong
    #[error("{0}")]
    Mismatch(String),
    /// The caller may not do this
    #[error("{0}")]
    Forbidden(String),
    /// The recipient switched off accepting messages
    #[error("User is not accepting messages")]
    MessagesDisabled,
    /// Message content failed validation
    #[error("{0}")]
    InvalidContent(String),
    /// Missing, unknown or expired credentials
    #[error("{0}")]
    Unauthorized(String),
    /// A collaborator (mail, text generation) failed
    #[error("Upstream service failed: {0:#}")]
    UpstreamError(anyhow::Error),
    /// Anything unexpected, mostly storage failures
    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(details) => {
                tracing::debug!(%details, "Unique constraint violated");
                Self::Conflict("Username or email is already taken".to_string())
            }
            DbError::Other(err) => Self::Internal(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// The HTTP boundary error. Rendered as `{"success": false, "message": ...}`.
#[derive(thiserror::Error, Eq, PartialEq, Debug)]
pub struct AppError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl AppError {
    /// New instance of [AppError].
    pub fn new<M: ToString>(status: StatusCode, message: M) -> AppError {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// The status code this error is rendered with
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The client facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AppError> for (StatusCode, Json<ApiResponse>) {
    fn from(app_error: AppError) -> Self {
        (
            app_error.status,
            Json(ApiResponse::failure(app_error.message)),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_response: (StatusCode, Json<ApiResponse>) = self.into();
        error_response.into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Invalid(_)
            | ServiceError::InvalidContent(_)
            | ServiceError::Expired(_)
            | ServiceError::Mismatch(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) | ServiceError::MessagesDisabled => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::UpstreamError(e) => {
                tracing::error!(err = ?e, "Upstream service failed");
                return Self::new(StatusCode::BAD_GATEWAY, "Upstream service unavailable");
            }
            ServiceError::Internal(e) => {
                tracing::error!(err = ?e, "Internal error");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };

        Self::new(status, err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ServiceError>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        let err = match err.downcast::<DbError>() {
            Ok(err) => return Self::from(ServiceError::from(err)),
            Err(e) => e,
        };

        let err = match err.downcast::<ValidationErrors>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        Self::from(ServiceError::Internal(err))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<TypedHeaderRejection> for AppError {
    fn from(_: TypedHeaderRejection) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Missing credentials")
    }
}

impl From<Infallible> for AppError {
    fn from(the_impossible: Infallible) -> Self {
        match the_impossible {}
    }
}

// Needed to support thiserror::Error
impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

#[cfg(test)]
/// Parse the app error out of the json body
pub async fn parse_error(response: Response) -> AppError {
    let status = response.status();
    let body_bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body: ApiResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert!(!body.success);
    AppError::new(status, body.message)
}
