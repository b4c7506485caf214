//! AI message suggestions

use crate::{
    app_state::AppState,
    error::{ServiceError, ServiceResult},
    setups::{ServerSetup, TextGenerator},
};
use murmur_core::{
    common::SuggestionResponse,
    suggestion::{parse_suggestions, SUGGESTION_PROMPT},
};

/// Ask the text generator for a few conversation starters.
///
/// One call, no retries and no caching.
pub async fn suggest<S: ServerSetup>(state: &AppState<S>) -> ServiceResult<SuggestionResponse> {
    let suggestion = state
        .text_generator
        .generate(SUGGESTION_PROMPT)
        .await
        .map_err(|e| ServiceError::UpstreamError(e.context("Failed to generate suggestions")))?;

    let suggestions = parse_suggestions(&suggestion);

    Ok(SuggestionResponse {
        suggestion,
        suggestions,
    })
}
