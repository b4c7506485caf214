//! murmur-server

use anyhow::{anyhow, Result};
use axum::{body::Body, headers::HeaderName, routing::get, Router};
use axum_server::Handle;
use clap::Parser;
use http::{header, Request};
use metrics_exporter_prometheus::PrometheusHandle;
use murmur_server::{
    app_state::{AppState, AppStateBuilder},
    db::{self, migrations, InMemoryDatabase, PgDatabase},
    docs::ApiDoc,
    middleware::{self, metrics::setup_metrics_recorder, request_ulid::MakeRequestUlid, runtime},
    router,
    routes::fallback::notfound_404,
    settings::{AppEnvironment, Settings},
    setups::{
        local::{LocalSetup, LogCodeSender},
        prod::{EmailVerificationCodeSender, GeminiTextGenerator, ProdSetup},
        ServerSetup,
    },
};
use std::{
    future::ready,
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    process::exit,
    time::Duration,
};
use tokio::signal::{
    self,
    unix::{signal, SignalKind},
};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    sensitive_headers::SetSensitiveHeadersLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request identifier field.
const REQUEST_ID: &str = "request_id";

/// Anonymous messaging server
#[derive(Debug, Parser)]
#[command(name = "murmur-server", version, about)]
struct Cli {
    /// Path to a settings file. Defaults to the bundled `config/settings.toml`.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (stdout_writer, _stdout_guard) = tracing_appender::non_blocking(io::stdout());

    let settings = Settings::load(cli.config)?;

    setup_tracing(stdout_writer, settings.server.json_logs);

    info!(
        subject = "app_settings",
        category = "init",
        "starting with settings: {:?}",
        settings,
    );

    let recorder_handle = setup_metrics_recorder()?;
    let cancellation_token = CancellationToken::new();

    let metrics_server = tokio::spawn(serve_metrics(
        recorder_handle,
        settings.server.metrics_port,
        cancellation_token.clone(),
    ));

    let app_server = match settings.server.environment {
        AppEnvironment::Local => {
            let app_state = local_state(&settings)?;
            tokio::spawn(serve_app(settings, app_state, cancellation_token.clone()))
        }
        AppEnvironment::Dev | AppEnvironment::Staging | AppEnvironment::Prod => {
            let app_state = prod_state(&settings).await?;
            tokio::spawn(serve_app(settings, app_state, cancellation_token.clone()))
        }
    };

    tokio::spawn(async move {
        capture_sigterm().await;

        cancellation_token.cancel();
        println!("\nCtrl+C received, shutting down. Press Ctrl+C again to force shutdown.");

        capture_sigterm().await;

        exit(130)
    });

    let (metrics, app) = tokio::try_join!(metrics_server, app_server)?;

    if let Err(e) = metrics {
        tracing::error!(error = %e, "metrics server crashed");
    }

    if let Err(e) = app {
        tracing::error!(error = %e, "app server crashed");
    }

    Ok(())
}

fn local_state(settings: &Settings) -> Result<AppState<LocalSetup>> {
    AppStateBuilder::<LocalSetup>::default()
        .with_db(InMemoryDatabase::default())
        .with_verification_code_sender(LogCodeSender)
        .with_text_generator(GeminiTextGenerator::new(
            &settings.gemini,
            &settings.http_client,
        )?)
        .with_verification_settings(settings.verification.clone())
        .with_session_settings(settings.session.clone())
        .finalize()
}

async fn prod_state(settings: &Settings) -> Result<AppState<ProdSetup>> {
    migrations::run(&settings.database.url).await?;
    let db_pool = db::pool(&settings.database.url, settings.database.connect_timeout).await?;

    AppStateBuilder::<ProdSetup>::default()
        .with_db(PgDatabase::new(db_pool))
        .with_verification_code_sender(EmailVerificationCodeSender::new(
            settings.mailgun.clone(),
            settings.verification.code_ttl_minutes,
        ))
        .with_text_generator(GeminiTextGenerator::new(
            &settings.gemini,
            &settings.http_client,
        )?)
        .with_verification_settings(settings.verification.clone())
        .with_session_settings(settings.session.clone())
        .finalize()
}

async fn serve_metrics(
    recorder_handle: PrometheusHandle,
    port: u16,
    token: CancellationToken,
) -> Result<()> {
    let metrics_router = Router::new()
        .route("/metrics", get(move || ready(recorder_handle.render())))
        .fallback(notfound_404);

    let router = metrics_router.layer(CatchPanicLayer::custom(runtime::catch_panic));

    let (server, _) = serve("Metrics", router, port).await?;

    token.cancelled().await;
    server.graceful_shutdown(None);

    Ok(())
}

async fn serve_app<S: ServerSetup>(
    settings: Settings,
    app_state: AppState<S>,
    token: CancellationToken,
) -> Result<()> {
    let req_id = HeaderName::from_static(REQUEST_ID);

    let router = router::setup_app_router(app_state)
        .route_layer(axum::middleware::from_fn(middleware::metrics::track))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default();

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set and propagate "request_id" (as a ulid) per request.
        .layer(
            ServiceBuilder::new()
                .set_request_id(req_id.clone(), MakeRequestUlid)
                .propagate_request_id(req_id),
        )
        .layer(TimeoutLayer::new(Duration::from_millis(
            settings.server.timeout_ms,
        )))
        .layer(CatchPanicLayer::custom(runtime::catch_panic))
        // Session tokens must never show up in logs.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION]))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let (server, _) = serve("Application", router, settings.server.port).await?;

    token.cancelled().await;
    server.graceful_shutdown(None);

    Ok(())
}

async fn serve(name: &str, app: Router, port: u16) -> Result<(Handle, SocketAddr)> {
    let bind_addr: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    info!(
        subject = "app_start",
        category = "init",
        "{} server listening on {}",
        name,
        bind_addr
    );

    let handle = Handle::new();

    tokio::spawn({
        let handle = handle.clone();
        async move {
            axum_server::bind(bind_addr)
                .handle(handle)
                .serve(app.into_make_service_with_connect_info::<SocketAddr>())
                .await
        }
    });

    let addr = handle
        .listening()
        .await
        .ok_or_else(|| anyhow!("{name} server failed to bind to {bind_addr}"))?;

    Ok((handle, addr))
}

/// Captures and waits for system signals.
async fn capture_sigterm() {
    let term = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await
            }
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => {},
        _ = term => {}
    };
}

/// Setup [tracing][tracing]: an env-filtered formatting layer writing to
/// `writer`, either as JSON lines or human readable text.
fn setup_tracing(writer: tracing_appender::non_blocking::NonBlocking, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("murmur_server=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json_logs {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(writer))
            .init();
    }
}
