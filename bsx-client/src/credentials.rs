//! Credential flow: register, login, logout

use bsx_common::api::{registration_error_message, CredentialsRequest};
use bsx_common::{ClientEvent, StatusMessage};
use tracing::{debug, error, info};

use crate::controller::ClientContext;
use crate::messages;

/// Create an account
///
/// Empty username or password fails locally without a request. A server
/// rejection shows the most specific message the server gave (field error,
/// then general message, then a generic fallback). Success does not log in.
pub async fn register(ctx: &ClientContext, username: &str, password: &str) -> StatusMessage {
    if username.is_empty() || password.is_empty() {
        debug!("Registration rejected locally: missing username or password");
        return ctx.status.warning(messages::MISSING_CREDENTIALS);
    }

    info!(username, "Attempting registration");

    let credentials = CredentialsRequest::new(username, password);
    match ctx.backend.register(&credentials).await {
        Ok(()) => {
            info!(username, "Registration succeeded");
            ctx.status.success(messages::REGISTERED)
        }
        Err(err) => {
            error!(
                username,
                status = ?err.status(),
                error = %err,
                body = ?err.body(),
                "Registration failed"
            );
            let text = err
                .body()
                .and_then(registration_error_message)
                .unwrap_or_else(|| messages::REGISTER_FAILED.to_string());
            ctx.status.error(text)
        }
    }
}

/// Log in and store the issued token
///
/// No local validation; the server decides. Failures never surface server
/// detail to the user.
pub async fn login(ctx: &ClientContext, username: &str, password: &str) -> StatusMessage {
    info!(username, "Attempting login");

    let credentials = CredentialsRequest::new(username, password);
    match ctx.backend.login(&credentials).await {
        Ok(token) => {
            let session_id = {
                let mut state = ctx.write_state();
                state.session.set_token(token);
                state.session_id
            };
            info!(%session_id, username, "Logged in");
            ctx.events
                .emit_lossy(ClientEvent::SessionChanged { authenticated: true });
            ctx.status.success(messages::LOGGED_IN)
        }
        Err(err) => {
            error!(
                username,
                status = ?err.status(),
                error = %err,
                body = ?err.body(),
                "Login failed"
            );
            ctx.status.error(messages::LOGIN_FAILED)
        }
    }
}

/// Drop the session and everything tied to it
///
/// Local only. Token, selected file, recommendation input and result are
/// cleared under one write lock.
pub fn logout(ctx: &ClientContext) -> StatusMessage {
    let session_id = {
        let mut state = ctx.write_state();
        state.reset();
        state.session_id
    };

    info!(%session_id, "Logged out");
    ctx.events
        .emit_lossy(ClientEvent::SessionChanged {
            authenticated: false,
        });
    ctx.status.info(messages::LOGGED_OUT)
}
