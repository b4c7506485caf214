//! Healthcheck route.

use crate::{app_state::AppState, db::Database, error::AppResult, setups::ServerSetup};
use axum::{self, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A healthcheck response containing diagnostic information for the service
#[derive(ToSchema, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct HealthcheckResponse {
    database_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_up_to_date: Option<bool>,
}

impl HealthcheckResponse {
    /// Whether the service is healthy
    pub fn is_healthy(&self) -> bool {
        self.database_connected && self.database_up_to_date.unwrap_or_default()
    }

    /// The status code for the healthcheck response
    pub fn status_code(&self) -> StatusCode {
        if self.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET handler for checking service health.
#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "murmur-server healthy", body = HealthcheckResponse),
        (status = 503, description = "murmur-server not healthy", body = HealthcheckResponse)
    )
)]
pub async fn healthcheck<S: ServerSetup>(
    State(state): State<AppState<S>>,
) -> AppResult<(StatusCode, axum::Json<HealthcheckResponse>)> {
    let health = state.db.health().await;

    let response = HealthcheckResponse {
        database_connected: health.connected,
        database_up_to_date: health.up_to_date,
    };

    Ok((response.status_code(), axum::Json(response)))
}
