//! Middleware for outbound [reqwest] calls

use anyhow::anyhow;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::time::Instant;
use task_local_extensions::Extensions;

/// Logs every outbound request and turns error statuses into errors,
/// recording a counter and a latency histogram per upstream service.
#[derive(Debug, Clone)]
pub struct Logger {
    /// Label for logs and metrics, e.g. `gemini`
    pub name: &'static str,
}

#[async_trait::async_trait]
impl Middleware for Logger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let start = Instant::now();
        let method = req.method().to_string();

        tracing::info!(
            upstream = self.name,
            url = %req.url().path(),
            %method,
            "Running request"
        );

        let result = next.run(req, extensions).await;
        let latency = start.elapsed().as_secs_f64();

        let status = match &result {
            Ok(resp) => resp.status().as_u16().to_string(),
            Err(_) => "error".to_string(),
        };
        let labels = [
            ("upstream", self.name.to_string()),
            ("method", method),
            ("status", status),
        ];
        metrics::increment_counter!("http_client_requests_total", &labels);
        metrics::histogram!("http_client_request_duration_seconds", latency, &labels);

        let resp = result?;
        let status = resp.status();

        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await?;
            tracing::error!(upstream = self.name, ?status, %body, "Error on response");
            Err(anyhow!("{} responded with status code {status}: {body}", self.name).into())
        } else {
            let content_length = resp.content_length();
            tracing::info!(upstream = self.name, ?status, ?content_length, "Got response");
            Ok(resp)
        }
    }
}
