//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Authentication required{}", detail_suffix(.0))]
    AuthRequired(Option<String>),

    #[error("API error ({status}){}", detail_suffix(.detail))]
    ApiError { status: u16, detail: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl CalendarError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired(_) => "Please sign in to your Google account".to_string(),
            Self::ApiError { detail: Some(d), .. } => format!("Calendar error: {}", d),
            Self::ApiError { status, .. } if *status >= 500 => {
                "The calendar service is unavailable. Please try again later.".to_string()
            }
            Self::ApiError { .. } => "The calendar request failed.".to_string(),
            Self::InvalidResponse(_) => "Received an unexpected response.".to_string(),
            Self::InvalidBaseUrl(_) => "The backend URL is misconfigured.".to_string(),
            Self::Cancelled => "Request cancelled".to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Backend-supplied detail, when the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::AuthRequired(d) | Self::ApiError { detail: d, .. } => d.as_deref(),
            _ => None,
        }
    }
}
