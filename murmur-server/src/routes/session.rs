//! Sign in / sign out routes

use crate::{
    app_state::AppState,
    error::AppResult,
    extract::json::Json,
    session::{self, AuthenticatedAccount},
    setups::ServerSetup,
};
use axum::{self, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use murmur_core::common::{ApiResponse, SessionResponse, SignInRequest};

/// POST handler for signing in with username or email and password
#[utoipa::path(
    post,
    path = "/api/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Wrong credentials", body = ApiResponse),
        (status = 403, description = "Account not verified", body = ApiResponse),
    )
)]
pub async fn sign_in<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Json(request): Json<SignInRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let session = session::sign_in(&state, &request.identifier, &request.password).await?;

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            success: true,
            message: "Signed in successfully".to_string(),
            token: session.token,
            username: session.username,
            expires_at: DateTime::<Utc>::from_naive_utc_and_offset(session.expires_at, Utc),
        }),
    ))
}

/// POST handler for ending the current session
#[utoipa::path(
    post,
    path = "/api/signout",
    security(
        ("session_bearer" = []),
    ),
    responses(
        (status = 200, description = "Signed out", body = ApiResponse),
        (status = 401, description = "Unauthorized", body = ApiResponse),
    )
)]
pub async fn sign_out<S: ServerSetup>(
    State(state): State<AppState<S>>,
    identity: AuthenticatedAccount,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    session::sign_out(&state, &identity).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok("Signed out"))))
}
