//! Fallback routes.

use crate::error::AppError;
use axum::{self, http::StatusCode};

/// 404 fallback.
pub async fn notfound_404() -> AppError {
    AppError::new(StatusCode::NOT_FOUND, "Route does not exist")
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{route_builder::RouteBuilder, test_context::TestContext};
    use http::{Method, StatusCode};
    use murmur_core::common::ApiResponse;
    use testresult::TestResult;

    #[test_log::test(tokio::test)]
    async fn test_unknown_routes() -> TestResult {
        let ctx = TestContext::new();

        for path in ["/nowhere", "/api/nowhere"] {
            let (status, body) = RouteBuilder::new(ctx.app(), Method::GET, path)
                .into_json_response::<ApiResponse>()
                .await?;

            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(!body.success);
        }

        Ok(())
    }
}
