//! Custom [axum::extract] Extractors.

pub mod authenticated;
pub mod bearer_addon;
pub mod json;
pub mod params;
