//! Additional [axum::middleware], [tower] layers and [reqwest_middleware].

pub mod client;
pub mod metrics;
pub mod request_ulid;
pub mod runtime;
