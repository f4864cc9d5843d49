//! Two-step session check: status first, then the profile.

use thiserror::Error;

use crate::client::AuthClient;
use crate::error::AuthError;

/// Shown when `/auth/status` fails without a backend `detail`.
pub const STATUS_FALLBACK_MESSAGE: &str = "Unable to check sign-in status.";
/// Shown when `/user/me` fails without a backend `detail`.
pub const PROFILE_FALLBACK_MESSAGE: &str = "Signed in, but your profile could not be loaded.";

/// Outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated { email: String },
    Anonymous,
}

/// Which step of the check failed.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Status check failed: {0}")]
    Status(#[source] AuthError),

    #[error("Profile fetch failed: {0}")]
    Profile(#[source] AuthError),
}

impl SessionError {
    /// Most specific message available: backend detail, else the step's fallback.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Status(e) => e.detail().unwrap_or(STATUS_FALLBACK_MESSAGE).to_string(),
            SessionError::Profile(e) => e.detail().unwrap_or(PROFILE_FALLBACK_MESSAGE).to_string(),
        }
    }
}

/// Resolve the current session.
///
/// A positive status is followed by a profile fetch for the email; a
/// profile failure is reported as such even though the status succeeded.
pub async fn check_session(client: &AuthClient) -> Result<Session, SessionError> {
    let status = client.status().await.map_err(SessionError::Status)?;
    if !status.authenticated {
        tracing::debug!("Backend reports no session");
        return Ok(Session::Anonymous);
    }

    let profile = client.me().await.map_err(SessionError::Profile)?;
    tracing::info!(email = %profile.email, "Session resolved");
    Ok(Session::Authenticated {
        email: profile.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_status(server: &MockServer, authenticated: bool) {
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "authenticated": authenticated })),
            )
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> AuthClient {
        AuthClient::new(reqwest::Client::new(), &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_authenticated_session() {
        let server = MockServer::start().await;
        mock_status(&server, true).await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"email": "ada@example.com"})),
            )
            .mount(&server)
            .await;

        let session = check_session(&client_for(&server)).await.unwrap();
        assert_eq!(
            session,
            Session::Authenticated {
                email: "ada@example.com".into()
            }
        );
    }

    #[tokio::test]
    async fn test_anonymous_skips_profile() {
        let server = MockServer::start().await;
        mock_status(&server, false).await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = check_session(&client_for(&server)).await.unwrap();
        assert_eq!(session, Session::Anonymous);
    }

    #[tokio::test]
    async fn test_profile_failure_is_distinct_from_status_failure() {
        let server = MockServer::start().await;
        mock_status(&server, true).await;
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = check_session(&client_for(&server)).await.unwrap_err();
        assert!(matches!(err, SessionError::Profile(_)));
        assert_eq!(err.user_message(), PROFILE_FALLBACK_MESSAGE);
        assert_ne!(err.user_message(), STATUS_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_status_failure_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(serde_json::json!({"detail": "Token store offline"})),
            )
            .mount(&server)
            .await;

        let err = check_session(&client_for(&server)).await.unwrap_err();
        assert!(matches!(err, SessionError::Status(_)));
        assert_eq!(err.user_message(), "Token store offline");
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_status_fallback() {
        let client = AuthClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        let err = check_session(&client).await.unwrap_err();
        assert_eq!(err.user_message(), STATUS_FALLBACK_MESSAGE);
    }
}
