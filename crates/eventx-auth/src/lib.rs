//! Session handling against the EvenetX backend.
//!
//! The backend runs the Google OAuth flow and keeps the session in a
//! cookie; this crate checks, starts and ends that session.

pub mod client;
pub mod error;
pub mod navigator;
pub mod session;

pub use client::{AuthClient, AuthStatusResponse, UserProfile};
pub use error::AuthError;
pub use navigator::{BrowserNavigator, LogNavigator, Navigator};
pub use session::{
    check_session, Session, SessionError, PROFILE_FALLBACK_MESSAGE, STATUS_FALLBACK_MESSAGE,
};
