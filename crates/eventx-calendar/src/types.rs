//! Calendar event types as returned by the backend.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Event as returned by `GET /calendar/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventStart,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Start of an event. `date` for all-day events, `date_time` for timed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

/// Parsed start of an event, resolved against the viewer's time zone.
#[derive(Debug, Clone, PartialEq)]
pub enum StartKind<Tz: TimeZone> {
    Timed(DateTime<Tz>),
    AllDay(NaiveDate),
    Unscheduled,
}

/// Response body of `POST /calendar/meet`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetResponse {
    pub meet_link: String,
}

impl EventStart {
    /// All-day date, when present and well formed.
    pub fn all_day_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Timed start converted into `tz`.
    ///
    /// Values with an offset are read as instants; values without one are
    /// read as wall time in `tz`.
    pub fn timed_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let raw = self.date_time.as_deref()?;
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(tz));
        }
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()?;
        tz.from_local_datetime(&naive).earliest()
    }

    /// Classify the start. A present `dateTime` wins over `date`.
    pub fn kind_in<Tz: TimeZone>(&self, tz: &Tz) -> StartKind<Tz> {
        if let Some(dt) = self.timed_in(tz) {
            return StartKind::Timed(dt);
        }
        match self.all_day_date() {
            Some(date) => StartKind::AllDay(date),
            None => StartKind::Unscheduled,
        }
    }
}

impl CalendarEvent {
    /// Title for display, with a placeholder for untitled events.
    pub fn display_title(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "(No title)",
        }
    }
}
