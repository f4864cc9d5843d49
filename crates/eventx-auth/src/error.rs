//! Errors from the backend's session routes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Backend answered with a non-success status.
    #[error("Backend returned {status}{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Backend { status: u16, detail: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to open login page: {0}")]
    Navigation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl AuthError {
    /// The backend's `detail` text, when it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AuthError::Backend { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to show the user: the backend's detail when present.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            AuthError::Backend { status, .. } if *status >= 500 => {
                "The EvenetX backend is having trouble. Please try again later.".to_string()
            }
            AuthError::Backend { .. } => "The backend rejected the request.".to_string(),
            AuthError::InvalidResponse(_) => {
                "Received an unexpected response from the backend.".to_string()
            }
            AuthError::InvalidBaseUrl(_) => "The backend URL is misconfigured.".to_string(),
            AuthError::Navigation(reason) => {
                format!("Could not open the sign-in page: {}", reason)
            }
            AuthError::Network(_) => "Unable to reach the EvenetX backend.".to_string(),
        }
    }
}
