//! Sign up, verification and profile routes

use crate::{
    app_state::AppState,
    error::AppResult,
    extract::{
        json::Json,
        params::{Path, Query},
    },
    inbox,
    setups::ServerSetup,
    verification,
};
use axum::{self, extract::State, http::StatusCode};
use murmur_core::common::{
    ApiResponse, CheckUsernameQuery, ProfileResponse, ResendCodeRequest, SignUpRequest,
    VerifyCodeRequest,
};

/// POST handler for signing up
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created, verification code sent", body = ApiResponse),
        (status = 400, description = "Invalid request", body = ApiResponse),
        (status = 409, description = "Username or email taken", body = ApiResponse),
        (status = 502, description = "Verification email could not be sent", body = ApiResponse),
    )
)]
pub async fn sign_up<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    verification::request_sign_up(&state, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User registered successfully. Please verify your email.",
        )),
    ))
}

/// GET handler for checking whether a username can be signed up with
#[utoipa::path(
    get,
    path = "/api/check-username",
    params(CheckUsernameQuery),
    responses(
        (status = 200, description = "Availability, reported in `success`", body = ApiResponse),
        (status = 400, description = "Invalid username", body = ApiResponse),
    )
)]
pub async fn check_username<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Query(query): Query<CheckUsernameQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    let response = if verification::check_username_available(&state, &query.username).await? {
        ApiResponse::ok("Username is available")
    } else {
        ApiResponse::failure("Username is already taken")
    };

    Ok((StatusCode::OK, Json(response)))
}

/// POST handler for submitting a verification code
#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Account verified", body = ApiResponse),
        (status = 400, description = "Wrong or expired code", body = ApiResponse),
        (status = 404, description = "No such user", body = ApiResponse),
        (status = 409, description = "Already verified", body = ApiResponse),
    )
)]
pub async fn verify<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Json(request): Json<VerifyCodeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    verification::verify_code(&state, &request.username, &request.code).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("Account verified successfully")),
    ))
}

/// POST handler for requesting a fresh verification code
#[utoipa::path(
    post,
    path = "/api/verify/resend",
    request_body = ResendCodeRequest,
    responses(
        (status = 200, description = "New code sent", body = ApiResponse),
        (status = 404, description = "No such user", body = ApiResponse),
        (status = 409, description = "Already verified", body = ApiResponse),
        (status = 502, description = "Verification email could not be sent", body = ApiResponse),
    )
)]
pub async fn resend<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Json(request): Json<ResendCodeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    verification::resend_code(&state, &request.username).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok("A new verification code has been sent")),
    ))
}

/// GET handler for a user's public profile
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Found profile", body = ProfileResponse),
        (status = 404, description = "No such user", body = ApiResponse),
    )
)]
pub async fn get_profile<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let profile = inbox::profile(&state, &username).await?;

    Ok((StatusCode::OK, Json(profile)))
}
