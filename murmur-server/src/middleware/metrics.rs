//! Request metrics.

use anyhow::Result;
use axum::{extract::MatchedPath, middleware::Next, response::IntoResponse};
use http::Request;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

const EXPONENTIAL_SECONDS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the global Prometheus recorder. The handle renders the
/// `/metrics` page.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("_duration_seconds".to_string()),
            EXPONENTIAL_SECONDS,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware function for counting requests and timing them, labelled by
/// route template rather than the concrete path.
pub async fn track<B>(req: Request<B>, next: Next<B>) -> impl IntoResponse {
    let start = Instant::now();
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };
    let method = req.method().clone();

    let response = next.run(req).await;
    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("request_path", path),
        ("status", status),
    ];

    metrics::increment_counter!("http_requests_total", &labels);
    metrics::histogram!("http_request_duration_seconds", latency, &labels);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{route_builder::RouteBuilder, test_context::TestContext};
    use http::{Method, StatusCode};
    use testresult::TestResult;

    #[test_log::test(tokio::test)]
    async fn test_track_passes_responses_through() -> TestResult {
        let ctx = TestContext::new();
        let app = ctx
            .app()
            .route_layer(axum::middleware::from_fn(track));

        let (status, _) = RouteBuilder::new(app, Method::GET, "/ping")
            .into_raw_response()
            .await?;

        assert_eq!(status, StatusCode::OK);

        Ok(())
    }
}
