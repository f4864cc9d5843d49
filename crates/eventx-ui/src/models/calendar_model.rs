//! Calendar model: month grid, day selection and the selected day's events.
//!
//! Uses the shared runtime and channel pattern. Front ends call
//! [`CalendarModel::poll`] on their render tick to apply finished requests
//! and pending refresh notifications.

use std::fmt::Display;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use eventx_calendar::{
    day_header, rows_on, CalendarEvent, EventRow, EventsClient, MonthGrid, YearMonth,
    WEEKDAY_LABELS,
};
use tokio_util::sync::CancellationToken;

use crate::app_services::ServiceContext;
use crate::services::{request_calendar_fetch_events, CalendarServiceMessage};
use crate::store::{EventStore, EventSubscription};

/// Placeholder shown when the selected day has no events.
pub const NO_EVENTS_MESSAGE: &str = "No events for this day";

/// Body of the events panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody {
    Loading,
    Empty,
    Events(Vec<EventRow>),
}

/// Events panel for the selected day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsPanel {
    pub header: String,
    pub body: PanelBody,
}

/// Everything needed to draw the calendar widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub title: String,
    pub weekday_labels: [&'static str; 7],
    pub grid: MonthGrid,
    pub panel: EventsPanel,
}

/// Lifetime of one init/dispose cycle.
struct Mount {
    id: u64,
    cancel: CancellationToken,
    subscription: EventSubscription,
}

pub struct CalendarModel<Tz: TimeZone = Local> {
    tz: Tz,
    today: NaiveDate,
    /// Clock date when `today` was last reconciled with the clock.
    clock_day: NaiveDate,
    current_month: YearMonth,
    selected_date: NaiveDate,
    all_events: Vec<CalendarEvent>,
    in_flight: usize,

    runtime: tokio::runtime::Handle,
    client: Arc<EventsClient>,
    store: Arc<EventStore>,
    parent_cancel: CancellationToken,
    mount: Option<Mount>,
    mounts: u64,

    tx: Sender<CalendarServiceMessage>,
    rx: Receiver<CalendarServiceMessage>,
}

impl CalendarModel<Local> {
    /// Calendar in the system's local time zone.
    pub fn new(ctx: &ServiceContext) -> Self {
        Self::with_zone(ctx, Local)
    }
}

impl<Tz> CalendarModel<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Calendar that interprets event instants in `tz`.
    pub fn with_zone(ctx: &ServiceContext, tz: Tz) -> Self {
        let today = Utc::now().with_timezone(&tz).date_naive();
        let (tx, rx) = std::sync::mpsc::channel();

        Self {
            tz,
            today,
            clock_day: today,
            current_month: YearMonth::of(today),
            selected_date: today,
            all_events: Vec::new(),
            in_flight: 0,
            runtime: ctx.runtime.clone(),
            client: ctx.events.clone(),
            store: ctx.store.clone(),
            parent_cancel: ctx.shutdown.clone(),
            mount: None,
            mounts: 0,
            tx,
            rx,
        }
    }

    // =========== Lifecycle ===========

    /// Subscribe to event changes and issue the initial fetch.
    pub fn on_init(&mut self) {
        if self.mount.is_some() {
            tracing::debug!("CalendarModel already initialized");
            return;
        }

        self.mounts += 1;
        self.mount = Some(Mount {
            id: self.mounts,
            cancel: self.parent_cancel.child_token(),
            subscription: self.store.subscribe(),
        });
        tracing::debug!(mount = self.mounts, "CalendarModel initialized");

        self.fetch_events();
    }

    /// Cancel outstanding requests, unsubscribe and drop fetched state.
    pub fn on_dispose(&mut self) {
        if let Some(mount) = self.mount.take() {
            mount.cancel.cancel();
            tracing::debug!(mount = mount.id, "CalendarModel disposed");
        }
        self.all_events.clear();
        self.in_flight = 0;
    }

    pub fn is_initialized(&self) -> bool {
        self.mount.is_some()
    }

    // =========== Fetching ===========

    /// Fetch the full event collection. Overlapping fetches are not
    /// de-duplicated; whichever finishes last wins.
    pub fn fetch_events(&mut self) {
        let Some(mount) = &self.mount else {
            tracing::warn!("fetch_events called before on_init");
            return;
        };

        self.in_flight += 1;
        request_calendar_fetch_events(
            &self.tx,
            &self.runtime,
            self.client.clone(),
            mount.cancel.clone(),
            mount.id,
        );
    }

    /// Apply pending refresh notifications and finished fetches.
    ///
    /// Also moves "today" forward when the clock has crossed midnight.
    ///
    /// Returns true when visible state changed.
    pub fn poll(&mut self) -> bool {
        let now = self.clock_date();
        let mut changed = self.observe_clock(now);

        let mut refreshes = 0;
        if let Some(mount) = self.mount.as_mut() {
            while let Some(change) = mount.subscription.try_next() {
                tracing::debug!(signal = change.name(), "Refreshing events");
                refreshes += 1;
            }
        }
        for _ in 0..refreshes {
            self.fetch_events();
            changed = true;
        }

        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                CalendarServiceMessage::FetchEventsDone { mount, result } => {
                    if self.mount.as_ref().map(|m| m.id) != Some(mount) {
                        tracing::debug!(mount, "Dropping result from a disposed mount");
                        continue;
                    }
                    self.in_flight = self.in_flight.saturating_sub(1);
                    match result {
                        Ok(events) => {
                            tracing::debug!(count = events.len(), "Events fetched");
                            self.all_events = events;
                        }
                        Err(e) => {
                            tracing::error!("Failed to fetch events: {}", e);
                            self.all_events.clear();
                        }
                    }
                    changed = true;
                }
                CalendarServiceMessage::CreateMeetDone(_) => {}
            }
        }

        changed
    }

    // =========== Navigation & selection ===========

    pub fn prev_month(&mut self) {
        match self.current_month.prev() {
            Some(month) => self.current_month = month,
            None => tracing::warn!("No month before {}", self.current_month.title()),
        }
    }

    pub fn next_month(&mut self) {
        match self.current_month.next() {
            Some(month) => self.current_month = month,
            None => tracing::warn!("No month after {}", self.current_month.title()),
        }
    }

    /// Show today's month and select today.
    pub fn go_to_today(&mut self) {
        self.current_month = YearMonth::of(self.today);
        self.selected_date = self.today;
    }

    /// Show `date`'s month and select it.
    pub fn show_date(&mut self, date: NaiveDate) {
        self.current_month = YearMonth::of(date);
        self.selected_date = date;
    }

    /// Select `day` of the displayed month. Returns false if no such day.
    pub fn select_day(&mut self, day: u32) -> bool {
        match self.current_month.day(day) {
            Some(date) => {
                self.selected_date = date;
                true
            }
            None => {
                tracing::warn!(day, month = %self.current_month.title(), "No such day");
                false
            }
        }
    }

    fn clock_date(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Follow the clock to `now` if it changed day since the last look.
    /// A date pinned with `set_today` holds until then.
    fn observe_clock(&mut self, now: NaiveDate) -> bool {
        if now == self.clock_day {
            return false;
        }
        tracing::debug!(from = %self.today, to = %now, "Date changed");
        self.clock_day = now;
        self.today = now;
        true
    }

    /// Pin "today" to `date`, moving the display and selection there.
    pub fn set_today(&mut self, date: NaiveDate) {
        self.today = date;
        self.go_to_today();
    }

    // =========== State ===========

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_month(&self) -> YearMonth {
        self.current_month
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn all_events(&self) -> &[CalendarEvent] {
        &self.all_events
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    // =========== Rendering ===========

    pub fn month_grid(&self) -> MonthGrid {
        MonthGrid::build(self.current_month, self.today, self.selected_date)
    }

    pub fn events_panel(&self) -> EventsPanel {
        let header = day_header(self.selected_date, self.today);
        let body = if self.is_loading() {
            PanelBody::Loading
        } else {
            let rows = rows_on(&self.all_events, self.selected_date, &self.tz);
            if rows.is_empty() {
                PanelBody::Empty
            } else {
                PanelBody::Events(rows)
            }
        };
        EventsPanel { header, body }
    }

    pub fn view(&self) -> CalendarView {
        CalendarView {
            title: self.current_month.title(),
            weekday_labels: WEEKDAY_LABELS,
            grid: self.month_grid(),
            panel: self.events_panel(),
        }
    }
}

impl<Tz: TimeZone> Drop for CalendarModel<Tz> {
    fn drop(&mut self) {
        if let Some(mount) = self.mount.take() {
            mount.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventx_auth::LogNavigator;

    fn offline_context(rt: &tokio::runtime::Runtime) -> ServiceContext {
        ServiceContext::new(
            rt.handle().clone(),
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            Arc::new(LogNavigator),
        )
        .unwrap()
    }

    fn utc_model(rt: &tokio::runtime::Runtime) -> CalendarModel<Utc> {
        CalendarModel::with_zone(&offline_context(rt), Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_follows_clock_across_midnight() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut model = utc_model(&rt);
        let start = model.clock_day;

        assert!(!model.observe_clock(start));
        assert_eq!(model.today(), start);

        let tomorrow = start.succ_opt().unwrap();
        assert!(model.observe_clock(tomorrow));
        assert_eq!(model.today(), tomorrow);
        assert_eq!(
            model.events_panel().header,
            format!("{}'s Events", start.format("%b %-d"))
        );
        assert_eq!(model.selected_date(), start);
    }

    #[test]
    fn pinned_today_survives_polling_same_day() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut model = utc_model(&rt);
        model.set_today(date(2024, 3, 15));

        let clock = model.clock_day;
        assert!(!model.observe_clock(clock));
        assert_eq!(model.today(), date(2024, 3, 15));
    }

    #[test]
    fn navigation_stops_at_range_edge() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut model = utc_model(&rt);

        model.show_date(NaiveDate::MAX);
        let last = model.current_month();
        model.next_month();
        assert_eq!(model.current_month(), last);
        model.prev_month();
        assert_eq!(model.current_month().month(), 11);

        model.show_date(NaiveDate::MIN);
        let first = model.current_month();
        model.prev_month();
        assert_eq!(model.current_month(), first);
    }
}
