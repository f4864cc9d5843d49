//! Sending the user to the backend's sign-in page.

use crate::error::AuthError;

/// Something that can take the user to a URL.
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str) -> Result<(), AuthError>;
}

/// Opens URLs in the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        tracing::info!("Opening browser for sign-in: {}", url);
        webbrowser::open(url).map_err(|e| AuthError::Navigation(e.to_string()))
    }
}

/// Logs the URL for the user to open by hand (headless setups).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        tracing::info!("Sign in by visiting: {}", url);
        Ok(())
    }
}
