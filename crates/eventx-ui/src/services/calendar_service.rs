//! Calendar backend: async operations on the shared runtime, channel pattern.
//! All network work runs off the render thread; results sent via mpsc.

use std::sync::Arc;

use eventx_calendar::{CalendarEvent, EventsClient};
use tokio_util::sync::CancellationToken;

/// Error type for Calendar operations.
#[derive(Debug, Clone)]
pub enum CalendarError {
    Network(String),
    Auth(String),
}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::Network(s) => write!(f, "Calendar error: {}", s),
            CalendarError::Auth(s) => write!(f, "Calendar auth error: {}", s),
        }
    }
}

impl std::error::Error for CalendarError {}

impl CalendarError {
    pub fn user_message(&self) -> String {
        match self {
            CalendarError::Network(s) | CalendarError::Auth(s) => s.clone(),
        }
    }
}

impl From<eventx_calendar::CalendarError> for CalendarError {
    fn from(e: eventx_calendar::CalendarError) -> Self {
        match &e {
            eventx_calendar::CalendarError::AuthRequired(_) => {
                CalendarError::Auth(e.user_message())
            }
            _ => CalendarError::Network(e.user_message()),
        }
    }
}

/// Messages sent from async operations back to the render thread.
#[derive(Debug)]
pub enum CalendarServiceMessage {
    /// Result of fetching the event collection. `mount` identifies the
    /// init/dispose cycle that issued it.
    FetchEventsDone {
        mount: u64,
        result: Result<Vec<CalendarEvent>, CalendarError>,
    },
    /// Result of creating an instant Meet event.
    CreateMeetDone(Result<String, CalendarError>),
}

/// Request the full event collection. Nothing is sent if `cancel` fires first.
pub fn request_fetch_events(
    tx: &std::sync::mpsc::Sender<CalendarServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<EventsClient>,
    cancel: CancellationToken,
    mount: u64,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(mount, "Event fetch cancelled");
                return;
            }
            result = client.list_events() => result.map_err(CalendarError::from),
        };

        let _ = tx.send(CalendarServiceMessage::FetchEventsDone { mount, result });
    });
}

/// Request creation of an instant Meet event.
pub fn request_create_meet(
    tx: &std::sync::mpsc::Sender<CalendarServiceMessage>,
    runtime: &tokio::runtime::Handle,
    client: Arc<EventsClient>,
    cancel: CancellationToken,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = client.create_meet() => result.map_err(CalendarError::from),
        };

        let _ = tx.send(CalendarServiceMessage::CreateMeetDone(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_error_display() {
        assert!(format!("{}", CalendarError::Network("down".into())).contains("down"));
        assert!(format!("{}", CalendarError::Auth("x".into())).contains("auth"));
    }

    #[test]
    fn maps_auth_required() {
        let err: CalendarError = eventx_calendar::CalendarError::AuthRequired(None).into();
        assert!(matches!(err, CalendarError::Auth(_)));
        assert!(err.user_message().contains("sign in"));
    }

    #[tokio::test]
    async fn cancelled_fetch_sends_nothing() {
        let (tx, rx) = std::sync::mpsc::channel();
        let client = Arc::new(
            EventsClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        request_fetch_events(&tx, &tokio::runtime::Handle::current(), client, cancel, 1);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(rx.try_recv().is_err());
    }
}
