//! Main [axum::Router] interface for webserver.

use crate::{
    app_state::AppState,
    routes::{account, fallback::notfound_404, health, messages, ping, session, suggestions},
    setups::ServerSetup,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Setup main router for application.
pub fn setup_app_router<S: ServerSetup>(app_state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
            http::header::ACCEPT,
        ])
        .allow_origin(Any);

    let api_router = Router::new()
        .route("/signup", post(account::sign_up::<S>))
        .route("/check-username", get(account::check_username::<S>))
        .route("/verify", post(account::verify::<S>))
        .route("/verify/resend", post(account::resend::<S>))
        .route("/users/:username", get(account::get_profile::<S>))
        .route("/signin", post(session::sign_in::<S>))
        .route("/signout", post(session::sign_out::<S>))
        .route("/messages", get(messages::list_messages::<S>))
        .route("/messages/send", post(messages::send_message::<S>))
        .route("/messages/:id", delete(messages::delete_message::<S>))
        .route(
            "/accept-messages",
            get(messages::get_accept_messages::<S>).post(messages::post_accept_messages::<S>),
        )
        .route("/suggestions", post(suggestions::suggest::<S>))
        .layer(cors)
        .fallback(notfound_404);

    Router::new()
        .route("/ping", get(ping::get))
        .route("/healthcheck", get(health::healthcheck::<S>))
        .nest("/api", api_router)
        .fallback(notfound_404)
        .with_state(app_state)
}
