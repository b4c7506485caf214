//! OpenAPI doc generation.

use crate::{
    extract::bearer_addon::BearerAddon,
    routes::{account, health, messages, ping, session, suggestions},
};
use murmur_core::common::{
    AcceptMessagesRequest, AcceptMessagesResponse, ApiResponse, Message, MessagesResponse,
    ProfileResponse, ResendCodeRequest, SendMessageRequest, SessionResponse, SignInRequest,
    SignUpRequest, SuggestionResponse, VerifyCodeRequest,
};
use utoipa::OpenApi;

/// API documentation generator.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck,
        ping::get,
        account::sign_up,
        account::check_username,
        account::verify,
        account::resend,
        account::get_profile,
        session::sign_in,
        session::sign_out,
        messages::send_message,
        messages::list_messages,
        messages::delete_message,
        messages::get_accept_messages,
        messages::post_accept_messages,
        suggestions::suggest,
    ),
    components(
        schemas(
            ApiResponse,
            SignUpRequest,
            VerifyCodeRequest,
            ResendCodeRequest,
            SignInRequest,
            SessionResponse,
            SendMessageRequest,
            Message,
            MessagesResponse,
            AcceptMessagesRequest,
            AcceptMessagesResponse,
            ProfileResponse,
            SuggestionResponse,
            health::HealthcheckResponse
        )
    ),
    modifiers(&BearerAddon),
)]

/// Tied to OpenAPI documentation.
#[derive(Debug)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_every_route() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/signup",
            "/api/check-username",
            "/api/verify",
            "/api/verify/resend",
            "/api/users/{username}",
            "/api/signin",
            "/api/signout",
            "/api/messages",
            "/api/messages/send",
            "/api/messages/{id}",
            "/api/accept-messages",
            "/api/suggestions",
            "/ping",
            "/healthcheck",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let security_schemes = doc
            .components
            .map(|components| components.security_schemes)
            .unwrap_or_default();
        assert!(security_schemes.contains_key("session_bearer"));
    }
}
