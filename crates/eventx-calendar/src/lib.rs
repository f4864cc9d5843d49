//! Calendar support for EvenetX.
//!
//! Provides the backend events client, month-grid arithmetic and
//! day filtering.

pub mod client;
pub mod error;
pub mod filter;
pub mod grid;
pub mod types;

pub use client::EventsClient;
pub use error::CalendarError;
pub use filter::{date_key, day_header, events_on, occurs_on, rows_on, EventRow, EventWhen};
pub use grid::{GridCell, MonthGrid, YearMonth, WEEKDAY_LABELS};
pub use types::{CalendarEvent, EventStart, StartKind};
