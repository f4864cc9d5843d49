//! Auth backend: async session checks and logout.
//! Requests run off the render thread; results sent via mpsc.

use std::sync::Arc;

use eventx_auth::{check_session, AuthClient, Session};
use tokio_util::sync::CancellationToken;

/// Error type for auth operations
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Session check failed; carries the message to surface.
    Session(String),
    Logout(String),
    Login(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Session(s) => write!(f, "Session check failed: {}", s),
            AuthError::Logout(s) => write!(f, "Logout failed: {}", s),
            AuthError::Login(s) => write!(f, "Sign-in failed: {}", s),
        }
    }
}

impl std::error::Error for AuthError {}

/// Messages sent from async operations back to the render thread
#[derive(Debug)]
pub enum AuthServiceMessage {
    /// Result of a session check. `generation` orders overlapping checks.
    CheckDone {
        generation: u64,
        result: Result<Session, AuthError>,
    },
    /// Logout finished, successfully or not.
    LogoutDone(Result<(), AuthError>),
}

/// Request a two-step session check.
pub fn request_check(
    tx: &std::sync::mpsc::Sender<AuthServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<AuthClient>,
    cancel: CancellationToken,
    generation: u64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = check_session(&client) => result,
        };

        let result = result.map_err(|e| {
            tracing::warn!("Session check failed: {}", e);
            AuthError::Session(e.user_message())
        });
        let _ = tx.send(AuthServiceMessage::CheckDone { generation, result });
    });
}

/// Request a logout. `LogoutDone` is sent whatever the outcome.
pub fn request_logout(
    tx: &std::sync::mpsc::Sender<AuthServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<AuthClient>,
    cancel: CancellationToken,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = client.logout() => result,
        };

        let result = result.map_err(|e| {
            tracing::warn!("Logout request failed: {}", e);
            AuthError::Logout(e.user_message())
        });
        let _ = tx.send(AuthServiceMessage::LogoutDone(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        assert!(format!("{}", AuthError::Session("timeout".into())).contains("Session"));
        assert!(format!("{}", AuthError::Logout("503".into())).contains("Logout"));
        assert!(format!("{}", AuthError::Login("no browser".into())).contains("no browser"));
    }

    #[tokio::test]
    async fn logout_reports_failure() {
        let (tx, rx) = std::sync::mpsc::channel();
        let client = Arc::new(AuthClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap());

        request_logout(
            &tx,
            &tokio::runtime::Handle::current(),
            client,
            CancellationToken::new(),
        );

        let msg = tokio::task::spawn_blocking(move || {
            rx.recv_timeout(std::time::Duration::from_secs(5))
        })
        .await
        .unwrap()
        .unwrap();
        assert!(matches!(msg, AuthServiceMessage::LogoutDone(Err(AuthError::Logout(_)))));
    }
}
