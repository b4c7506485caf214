//! Sign up and email verification

use crate::{
    app_state::AppState,
    crypto,
    db::Database,
    error::{ServiceError, ServiceResult},
    models::{
        account::{normalize_email, AccountRecord, NewAccount},
        verification_code::VerificationCode,
    },
    setups::{ServerSetup, VerificationCodeSender},
};
use murmur_core::{common::SignUpRequest, username::Username};
use tracing::debug;
use validator::Validate;

/// Create an unverified account and mail it a verification code.
///
/// Unverified accounts whose code ran out don't hold on to their username or
/// email: they're removed to make room for the new sign up.
pub async fn request_sign_up<S: ServerSetup>(
    state: &AppState<S>,
    request: &SignUpRequest,
) -> ServiceResult<AccountRecord> {
    let username = Username::try_from(request.username.clone())?;
    request.validate()?;

    let email = normalize_email(&request.email);
    let now = state.clock.now();

    let by_email = state.db.account_by_email(&email).await?;
    let by_username = state.db.account_by_username(username.as_str()).await?;

    if let Some(existing) = &by_email {
        if existing.is_verified {
            return Err(ServiceError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        if existing.has_live_code(now) {
            return Err(ServiceError::Conflict(
                "A sign up for this email is awaiting verification".to_string(),
            ));
        }
    }

    if let Some(existing) = &by_username {
        if existing.holds_identity(now) {
            return Err(ServiceError::Conflict(
                "Username is already taken".to_string(),
            ));
        }
    }

    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| ServiceError::Internal(e.into()))?
        .map_err(ServiceError::Internal)?;

    // Only stale accounts are left at this point
    let mut stale: Vec<i32> = by_email.iter().chain(&by_username).map(|a| a.id).collect();
    stale.dedup();
    for account_id in stale {
        debug!(account_id, "Removing stale unverified account");
        state.db.delete_account(account_id).await?;
    }

    let code = VerificationCode::generate(now, state.verification_settings.code_ttl());

    let account = state
        .db
        .insert_account(NewAccount::new(&username, &email, password_hash, &code, now))
        .await?;

    send_code(state, &account, &code).await?;

    Ok(account)
}

/// Whether `candidate` can be used for a new sign up.
pub async fn check_username_available<S: ServerSetup>(
    state: &AppState<S>,
    candidate: &str,
) -> ServiceResult<bool> {
    let username = Username::try_from(candidate.to_string())?;

    let available = match state.db.account_by_username(username.as_str()).await? {
        Some(account) => !account.holds_identity(state.clock.now()),
        None => true,
    };

    Ok(available)
}

/// Verify an account with the code it was sent. The code can be used once.
pub async fn verify_code<S: ServerSetup>(
    state: &AppState<S>,
    username: &str,
    code: &str,
) -> ServiceResult<AccountRecord> {
    let account = find_account(state, username).await?;

    if account.is_verified {
        return Err(ServiceError::Conflict(
            "Account is already verified".to_string(),
        ));
    }

    let now = state.clock.now();

    account
        .verification_code()
        .ok_or_else(|| {
            ServiceError::Expired(
                "Verification code has expired, please request a new one".to_string(),
            )
        })?
        .check(code, now)?;

    if !state.db.mark_verified(account.id, now).await? {
        // verified concurrently
        return Err(ServiceError::Conflict(
            "Account is already verified".to_string(),
        ));
    }

    debug!(account_id = account.id, "Account verified");

    state
        .db
        .account_by_id(account.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}

/// Replace the pending code with a fresh one and send it.
pub async fn resend_code<S: ServerSetup>(
    state: &AppState<S>,
    username: &str,
) -> ServiceResult<()> {
    let account = find_account(state, username).await?;

    if account.is_verified {
        return Err(ServiceError::Conflict(
            "Account is already verified".to_string(),
        ));
    }

    let now = state.clock.now();
    let code = VerificationCode::generate(now, state.verification_settings.code_ttl());

    if !state
        .db
        .set_verification_code(account.id, &code, now)
        .await?
    {
        return Err(ServiceError::Conflict(
            "Account is already verified".to_string(),
        ));
    }

    send_code(state, &account, &code).await
}

async fn find_account<S: ServerSetup>(
    state: &AppState<S>,
    username: &str,
) -> ServiceResult<AccountRecord> {
    state
        .db
        .account_by_username(username)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
}

async fn send_code<S: ServerSetup>(
    state: &AppState<S>,
    account: &AccountRecord,
    code: &VerificationCode,
) -> ServiceResult<()> {
    state
        .verification_code_sender
        .send_code(&account.email, &account.username, &code.code)
        .await
        .map_err(|e| ServiceError::UpstreamError(e.context("Failed to send verification email")))
}
