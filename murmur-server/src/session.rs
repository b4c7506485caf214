//! Credential sign in and bearer sessions

use crate::{
    app_state::AppState,
    crypto,
    db::Database,
    error::{ServiceError, ServiceResult},
    models::{account::normalize_email, session::NewSession},
    setups::ServerSetup,
};
use chrono::NaiveDateTime;

const INVALID_CREDENTIALS: &str = "Invalid username/email or password";
const INVALID_SESSION: &str = "Invalid or expired session";

/// The account behind a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    /// Internal account id
    pub account_id: i32,
    /// The account's username
    pub username: String,
    /// Hash of the token used, identifies the session
    pub token_hash: String,
}

/// A freshly created session. The token is only ever handed out here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Bearer token
    pub token: String,
    /// Signed in username
    pub username: String,
    /// End of the session
    pub expires_at: NaiveDateTime,
}

/// Sign in with a username or email and a password.
pub async fn sign_in<S: ServerSetup>(
    state: &AppState<S>,
    identifier: &str,
    password: &str,
) -> ServiceResult<IssuedSession> {
    let identifier = identifier.trim();
    let account = if identifier.contains('@') {
        state.db.account_by_email(&normalize_email(identifier)).await?
    } else {
        state.db.account_by_username(identifier).await?
    };

    let Some(account) = account else {
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password = password.to_string();
    let password_hash = account.password_hash.clone();
    let matches =
        tokio::task::spawn_blocking(move || crypto::verify_password(&password, &password_hash))
            .await
            .map_err(|e| ServiceError::Internal(e.into()))?
            .map_err(|e| ServiceError::Internal(e.into()))?;

    if !matches {
        return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    if !account.is_verified {
        return Err(ServiceError::Forbidden(
            "Please verify your account before signing in".to_string(),
        ));
    }

    let now = state.clock.now();
    let token = crypto::generate_session_token();
    let session = state
        .db
        .insert_session(NewSession {
            account_id: account.id,
            token_hash: crypto::hash_session_token(&token),
            expires_at: now + state.session_settings.ttl(),
            inserted_at: now,
        })
        .await?;

    tracing::debug!(account_id = account.id, "Signed in");

    Ok(IssuedSession {
        token,
        username: account.username,
        expires_at: session.expires_at,
    })
}

/// Resolve a bearer token into the account it was issued for.
pub async fn authenticate<S: ServerSetup>(
    state: &AppState<S>,
    token: &str,
) -> ServiceResult<AuthenticatedAccount> {
    let token_hash = crypto::hash_session_token(token);

    let session = state
        .db
        .session_by_token_hash(&token_hash)
        .await?
        .filter(|session| session.is_live(state.clock.now()))
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_SESSION.to_string()))?;

    let account = state
        .db
        .account_by_id(session.account_id)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_SESSION.to_string()))?;

    Ok(AuthenticatedAccount {
        account_id: account.id,
        username: account.username,
        token_hash,
    })
}

/// End the session the caller authenticated with.
pub async fn sign_out<S: ServerSetup>(
    state: &AppState<S>,
    identity: &AuthenticatedAccount,
) -> ServiceResult<()> {
    state.db.delete_session(&identity.token_hash).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_context::TestContext;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use testresult::TestResult;

    #[test_log::test(tokio::test)]
    async fn test_sign_in_with_username_or_email() -> TestResult {
        let ctx = TestContext::new();
        ctx.verified_account("oedipa", "oedipa@trystero.com", "lot49!")
            .await?;

        let by_username = sign_in(ctx.app_state(), "oedipa", "lot49!").await?;
        let by_email = sign_in(ctx.app_state(), "Oedipa@Trystero.com", "lot49!").await?;

        assert_eq!(by_username.username, "oedipa");
        assert_eq!(by_email.username, "oedipa");
        assert_ne!(by_username.token, by_email.token);
        assert_eq!(by_username.expires_at, ctx.now() + Duration::days(30));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_sign_in_failures_look_alike() -> TestResult {
        let ctx = TestContext::new();
        ctx.verified_account("oedipa", "oedipa@trystero.com", "lot49!")
            .await?;

        let unknown = sign_in(ctx.app_state(), "metzger", "lot49!").await;
        let wrong_password = sign_in(ctx.app_state(), "oedipa", "lot50!").await;

        assert_matches!(
            (unknown, wrong_password),
            (Err(ServiceError::Unauthorized(a)), Err(ServiceError::Unauthorized(b))) if a == b
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_sign_in_compares_whole_password() -> TestResult {
        let ctx = TestContext::new();
        let password = "a".repeat(72);
        ctx.verified_account("oedipa", "oedipa@trystero.com", &password)
            .await?;

        assert_matches!(
            sign_in(ctx.app_state(), "oedipa", &format!("{password}totally-different")).await,
            Err(ServiceError::Unauthorized(_))
        );
        sign_in(ctx.app_state(), "oedipa", &password).await?;

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_sign_in_requires_verification() -> TestResult {
        let ctx = TestContext::new();
        ctx.pending_account_with_code("oedipa", "482193").await?;

        assert_matches!(
            sign_in(ctx.app_state(), "oedipa", "lot49!").await,
            Err(ServiceError::Forbidden(_))
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_authenticate_and_sign_out() -> TestResult {
        let ctx = TestContext::new();
        let account = ctx
            .verified_account("oedipa", "oedipa@trystero.com", "lot49!")
            .await?;
        let session = sign_in(ctx.app_state(), "oedipa", "lot49!").await?;

        let identity = authenticate(ctx.app_state(), &session.token).await?;
        assert_eq!(identity.account_id, account.id);
        assert_eq!(identity.username, "oedipa");

        sign_out(ctx.app_state(), &identity).await?;

        assert_matches!(
            authenticate(ctx.app_state(), &session.token).await,
            Err(ServiceError::Unauthorized(_))
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_authenticate_rejects_unknown_and_expired_tokens() -> TestResult {
        let ctx = TestContext::new();
        ctx.verified_account("oedipa", "oedipa@trystero.com", "lot49!")
            .await?;
        let session = sign_in(ctx.app_state(), "oedipa", "lot49!").await?;

        assert_matches!(
            authenticate(ctx.app_state(), "not-a-token").await,
            Err(ServiceError::Unauthorized(_))
        );

        ctx.advance(Duration::days(30));

        assert_matches!(
            authenticate(ctx.app_state(), &session.token).await,
            Err(ServiceError::Unauthorized(_))
        );

        Ok(())
    }
}
