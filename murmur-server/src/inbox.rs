//! Anonymous message inbox

use crate::{
    app_state::AppState,
    db::Database,
    error::{ServiceError, ServiceResult},
    models::{
        account::AccountRecord,
        message::{MessageRecord, NewMessage},
    },
    session::AuthenticatedAccount,
    setups::ServerSetup,
};
use murmur_core::{
    common::{Message, ProfileResponse},
    message::MessageContent,
};

/// Leave an anonymous message for `target_username`.
///
/// Nothing about the sender is stored.
pub async fn send_message<S: ServerSetup>(
    state: &AppState<S>,
    target_username: &str,
    content: &str,
) -> ServiceResult<MessageRecord> {
    let recipient = verified_account(state, target_username).await?;

    if !recipient.is_accepting_messages {
        return Err(ServiceError::MessagesDisabled);
    }

    let content = MessageContent::try_from(content.to_string())
        .map_err(|e| ServiceError::InvalidContent(e.to_string()))?;

    let message = state
        .db
        .insert_message(NewMessage {
            account_id: recipient.id,
            content: content.into(),
            created_at: state.clock.now(),
        })
        .await?;

    tracing::debug!(message_id = message.id, "Message delivered");

    Ok(message)
}

/// Delete one of the owner's messages.
pub async fn delete_message<S: ServerSetup>(
    state: &AppState<S>,
    owner: &AuthenticatedAccount,
    message_id: i32,
) -> ServiceResult<()> {
    let message = state
        .db
        .message_by_id(message_id)
        .await?
        .ok_or_else(message_not_found)?;

    if message.account_id != owner.account_id {
        return Err(ServiceError::Forbidden(
            "You can only delete your own messages".to_string(),
        ));
    }

    if !state.db.delete_message(message_id, owner.account_id).await? {
        // deleted concurrently
        return Err(message_not_found());
    }

    Ok(())
}

/// The owner's messages, newest first.
pub async fn list_messages<S: ServerSetup>(
    state: &AppState<S>,
    owner: &AuthenticatedAccount,
) -> ServiceResult<Vec<Message>> {
    let messages = state.db.messages_for_account(owner.account_id).await?;
    Ok(messages.into_iter().map(Message::from).collect())
}

/// Whether the owner currently accepts messages.
pub async fn accepting_messages<S: ServerSetup>(
    state: &AppState<S>,
    owner: &AuthenticatedAccount,
) -> ServiceResult<bool> {
    let account = state
        .db
        .account_by_id(owner.account_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(account.is_accepting_messages)
}

/// Switch accepting messages on or off. Returns the new state.
pub async fn set_accepting_messages<S: ServerSetup>(
    state: &AppState<S>,
    owner: &AuthenticatedAccount,
    accepting: bool,
) -> ServiceResult<bool> {
    if !state
        .db
        .set_accepting_messages(owner.account_id, accepting, state.clock.now())
        .await?
    {
        return Err(user_not_found());
    }

    Ok(accepting)
}

/// The public profile of a verified account.
pub async fn profile<S: ServerSetup>(
    state: &AppState<S>,
    username: &str,
) -> ServiceResult<ProfileResponse> {
    Ok(verified_account(state, username).await?.to_profile())
}

async fn verified_account<S: ServerSetup>(
    state: &AppState<S>,
    username: &str,
) -> ServiceResult<AccountRecord> {
    state
        .db
        .account_by_username(username)
        .await?
        .filter(|account| account.is_verified)
        .ok_or_else(user_not_found)
}

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

fn message_not_found() -> ServiceError {
    ServiceError::NotFound("Message not found".to_string())
}
