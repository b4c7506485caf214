//! Routes for [axum::Router].

pub mod account;
pub mod fallback;
pub mod health;
pub mod messages;
pub mod ping;
pub mod session;
pub mod suggestions;
