//! Runtime middleware.

use crate::error::AppError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use std::any::Any;

/// Turns a handler panic into a `500 Internal Server Error` with the
/// usual failure body. For use with `CatchPanicLayer::custom`.
pub fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(panic = %details, "Handler panicked");

    AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
