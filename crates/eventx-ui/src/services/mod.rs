pub mod auth_service;
pub mod calendar_service;

pub use auth_service::{
    request_check as request_auth_check, request_logout as request_auth_logout, AuthError,
    AuthServiceMessage,
};
pub use calendar_service::{
    request_create_meet as request_calendar_create_meet,
    request_fetch_events as request_calendar_fetch_events, CalendarError, CalendarServiceMessage,
};
