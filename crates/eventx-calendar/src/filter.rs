//! Selecting and describing the events that fall on a given day.

use chrono::{NaiveDate, TimeZone};

use crate::types::{CalendarEvent, StartKind};

/// `YYYY-MM-DD` key used by all-day events.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whether `event` starts on `date` as seen from `tz`.
///
/// All-day events match on their date string; timed events match on the
/// calendar date of their instant in `tz`.
pub fn occurs_on<Tz: TimeZone>(event: &CalendarEvent, date: NaiveDate, tz: &Tz) -> bool {
    let key = date_key(date);
    if event.start.date.as_deref() == Some(key.as_str()) {
        return true;
    }
    event
        .start
        .timed_in(tz)
        .is_some_and(|dt| dt.date_naive() == date)
}

/// Events on `date`, in their original order.
pub fn events_on<'a, Tz: TimeZone>(
    events: &'a [CalendarEvent],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a CalendarEvent> {
    events.iter().filter(|e| occurs_on(e, date, tz)).collect()
}

/// When an event happens, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventWhen {
    /// Local start time, e.g. "9:30 AM".
    At(String),
    AllDay,
}

impl std::fmt::Display for EventWhen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventWhen::At(time) => f.write_str(time),
            EventWhen::AllDay => f.write_str("All day"),
        }
    }
}

/// One line of the day's event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: Option<String>,
    pub title: String,
    pub when: EventWhen,
    pub location: Option<String>,
}

impl EventRow {
    /// Describe `event` for display in `tz`. Unscheduled events have no row.
    pub fn describe<Tz: TimeZone>(event: &CalendarEvent, tz: &Tz) -> Option<Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        let when = match event.start.kind_in(tz) {
            StartKind::Timed(dt) => EventWhen::At(dt.format("%-I:%M %p").to_string()),
            StartKind::AllDay(_) => EventWhen::AllDay,
            StartKind::Unscheduled => return None,
        };
        Some(Self {
            id: event.id.clone(),
            title: event.display_title().to_string(),
            when,
            location: event.location.clone(),
        })
    }
}

/// Rows for every event on `date`, in fetch order.
pub fn rows_on<Tz: TimeZone>(events: &[CalendarEvent], date: NaiveDate, tz: &Tz) -> Vec<EventRow>
where
    Tz::Offset: std::fmt::Display,
{
    events_on(events, date, tz)
        .into_iter()
        .filter_map(|e| EventRow::describe(e, tz))
        .collect()
}

/// Header of the day panel: "Today's Events" or e.g. "Mar 5's Events".
pub fn day_header(selected: NaiveDate, today: NaiveDate) -> String {
    if selected == today {
        "Today's Events".to_string()
    } else {
        format!("{}'s Events", selected.format("%b %-d"))
    }
}
