//! Client for the backend's calendar routes.

use reqwest::StatusCode;
use tracing::instrument;

use crate::error::CalendarError;
use crate::types::{CalendarEvent, MeetResponse};

/// Calendar API client.
///
/// Authentication rides on the session cookie held by the shared
/// `reqwest::Client`, so build that client with a cookie store.
#[derive(Debug, Clone)]
pub struct EventsClient {
    client: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, CalendarError> {
        url::Url::parse(base_url).map_err(|e| CalendarError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full event collection, in backend order.
    ///
    /// An absent, `null` or non-array body yields an empty list; array
    /// entries that are not event objects are skipped.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(&self) -> Result<Vec<CalendarEvent>, CalendarError> {
        let url = format!("{}/calendar/events", self.base_url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        Ok(parse_event_list(&body))
    }

    /// Create an instant Google Meet event and return its link.
    #[instrument(skip(self), level = "info")]
    pub async fn create_meet(&self) -> Result<String, CalendarError> {
        let url = format!("{}/calendar/meet", self.base_url);

        let response = self.client.post(&url).send().await?;
        let response = Self::check_status(response).await?;

        let meet: MeetResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::InvalidResponse(format!("JSON parse error: {}", e)))?;
        Ok(meet.meet_link)
    }

    /// Map non-success statuses to typed errors, carrying the backend's `detail`.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let detail = eventx_core::backend_detail(&text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(CalendarError::AuthRequired(detail))
            }
            _ => Err(CalendarError::ApiError {
                status: status.as_u16(),
                detail,
            }),
        }
    }
}

fn parse_event_list(body: &str) -> Vec<CalendarEvent> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<CalendarEvent>(item) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("Skipping malformed event: {}", e);
                    None
                }
            })
            .collect(),
        Ok(serde_json::Value::Null) => Vec::new(),
        Ok(other) => {
            tracing::warn!(
                "Expected an event array, got {}; treating as empty",
                json_kind(&other)
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Event list is not JSON ({}); treating as empty", e);
            Vec::new()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
