//! Bearer session extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, TypedHeader},
    headers::{authorization::Bearer, Authorization},
    http::request::Parts,
    RequestPartsExt,
};

use crate::{
    app_state::AppState,
    error::AppError,
    session::{self, AuthenticatedAccount},
    setups::ServerSetup,
};

#[async_trait]
impl<S: ServerSetup> FromRequestParts<AppState<S>> for AuthenticatedAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await?;

        Ok(session::authenticate(state, bearer.token()).await?)
    }
}
