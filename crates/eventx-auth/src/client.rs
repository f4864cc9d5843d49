//! Client for the backend's session routes.
//!
//! The backend owns the Google OAuth flow and keeps the session in a cookie;
//! this client only asks about it.

use serde::Deserialize;
use tracing::instrument;

use crate::error::AuthError;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// `client` should carry a cookie store shared with the other backend clients.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, AuthError> {
        url::Url::parse(base_url).map_err(|e| AuthError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Navigation target that starts the backend's Google sign-in.
    pub fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url)
    }

    /// `GET /auth/status`
    #[instrument(skip(self), level = "debug")]
    pub async fn status(&self) -> Result<AuthStatusResponse, AuthError> {
        let url = format!("{}/auth/status", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// `GET /user/me`
    #[instrument(skip(self), level = "debug")]
    pub async fn me(&self) -> Result<UserProfile, AuthError> {
        let url = format!("{}/user/me", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    /// `POST /auth/logout`. The body, if any, is ignored.
    #[instrument(skip(self), level = "info")]
    pub async fn logout(&self) -> Result<(), AuthError> {
        let url = format!("{}/auth/logout", self.base_url);
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::backend_error(response).await)
        }
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| AuthError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else {
            Err(Self::backend_error(response).await)
        }
    }

    async fn backend_error(response: reqwest::Response) -> AuthError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let detail = eventx_core::backend_detail(&text);
        AuthError::Backend { status, detail }
    }
}
