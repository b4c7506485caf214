//! Inbox routes

use crate::{
    app_state::AppState,
    error::AppResult,
    extract::{json::Json, params::Path},
    inbox,
    session::AuthenticatedAccount,
    setups::ServerSetup,
};
use axum::{self, extract::State, http::StatusCode};
use murmur_core::common::{
    AcceptMessagesRequest, AcceptMessagesResponse, ApiResponse, MessagesResponse,
    SendMessageRequest,
};

/// POST handler for leaving an anonymous message
#[utoipa::path(
    post,
    path = "/api/messages/send",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse),
        (status = 400, description = "Invalid content", body = ApiResponse),
        (status = 403, description = "User is not accepting messages", body = ApiResponse),
        (status = 404, description = "No such user", body = ApiResponse),
    )
)]
pub async fn send_message<S: ServerSetup>(
    State(state): State<AppState<S>>,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    inbox::send_message(&state, &request.username, &request.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Message sent successfully")),
    ))
}

/// GET handler for the signed in user's messages
#[utoipa::path(
    get,
    path = "/api/messages",
    security(
        ("session_bearer" = []),
    ),
    responses(
        (status = 200, description = "Messages, newest first", body = MessagesResponse),
        (status = 401, description = "Unauthorized", body = ApiResponse),
    )
)]
pub async fn list_messages<S: ServerSetup>(
    State(state): State<AppState<S>>,
    identity: AuthenticatedAccount,
) -> AppResult<(StatusCode, Json<MessagesResponse>)> {
    let messages = inbox::list_messages(&state, &identity).await?;

    Ok((
        StatusCode::OK,
        Json(MessagesResponse {
            success: true,
            message: format!("{} message(s)", messages.len()),
            messages,
        }),
    ))
}

/// DELETE handler for one of the signed in user's messages
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = i32, Path, description = "Message id")),
    security(
        ("session_bearer" = []),
    ),
    responses(
        (status = 200, description = "Message deleted", body = ApiResponse),
        (status = 401, description = "Unauthorized", body = ApiResponse),
        (status = 403, description = "Message belongs to someone else", body = ApiResponse),
        (status = 404, description = "No such message", body = ApiResponse),
    )
)]
pub async fn delete_message<S: ServerSetup>(
    State(state): State<AppState<S>>,
    identity: AuthenticatedAccount,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<ApiResponse>)> {
    inbox::delete_message(&state, &identity, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok("Message deleted"))))
}

/// GET handler for the accepting-messages flag
#[utoipa::path(
    get,
    path = "/api/accept-messages",
    security(
        ("session_bearer" = []),
    ),
    responses(
        (status = 200, description = "Current flag", body = AcceptMessagesResponse),
        (status = 401, description = "Unauthorized", body = ApiResponse),
    )
)]
pub async fn get_accept_messages<S: ServerSetup>(
    State(state): State<AppState<S>>,
    identity: AuthenticatedAccount,
) -> AppResult<(StatusCode, Json<AcceptMessagesResponse>)> {
    let is_accepting_messages = inbox::accepting_messages(&state, &identity).await?;

    Ok((
        StatusCode::OK,
        Json(AcceptMessagesResponse {
            success: true,
            message: accept_messages_status(is_accepting_messages).to_string(),
            is_accepting_messages,
        }),
    ))
}

/// POST handler for toggling the accepting-messages flag
#[utoipa::path(
    post,
    path = "/api/accept-messages",
    request_body = AcceptMessagesRequest,
    security(
        ("session_bearer" = []),
    ),
    responses(
        (status = 200, description = "Flag updated", body = AcceptMessagesResponse),
        (status = 401, description = "Unauthorized", body = ApiResponse),
    )
)]
pub async fn post_accept_messages<S: ServerSetup>(
    State(state): State<AppState<S>>,
    identity: AuthenticatedAccount,
    Json(request): Json<AcceptMessagesRequest>,
) -> AppResult<(StatusCode, Json<AcceptMessagesResponse>)> {
    let is_accepting_messages =
        inbox::set_accepting_messages(&state, &identity, request.accept_messages).await?;

    Ok((
        StatusCode::OK,
        Json(AcceptMessagesResponse {
            success: true,
            message: accept_messages_status(is_accepting_messages).to_string(),
            is_accepting_messages,
        }),
    ))
}

fn accept_messages_status(accepting: bool) -> &'static str {
    if accepting {
        "Accepting messages"
    } else {
        "Not accepting messages"
    }
}
