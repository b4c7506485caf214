//! Message suggestion route

use crate::{
    app_state::AppState, error::AppResult, extract::json::Json, setups::ServerSetup, suggestion,
};
use axum::{self, extract::State, http::StatusCode};
use murmur_core::common::{ApiResponse, SuggestionResponse};

/// POST handler for AI generated conversation starters
#[utoipa::path(
    post,
    path = "/api/suggestions",
    responses(
        (status = 200, description = "Suggestions generated", body = SuggestionResponse),
        (status = 502, description = "Text generator unavailable", body = ApiResponse),
    )
)]
pub async fn suggest<S: ServerSetup>(
    State(state): State<AppState<S>>,
) -> AppResult<(StatusCode, Json<SuggestionResponse>)> {
    let response = suggestion::suggest(&state).await?;
    Ok((StatusCode::OK, Json(response)))
}
