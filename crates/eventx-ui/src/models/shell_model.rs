//! Shell model: session state, navigation bar, the static event form and
//! the embedded calendar.

use std::fmt::Display;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::{Local, TimeZone};
use eventx_auth::{AuthClient, Navigator, Session};
use eventx_calendar::EventsClient;
use tokio_util::sync::CancellationToken;

use crate::app_services::ServiceContext;
use crate::models::calendar_model::{CalendarModel, CalendarView};
use crate::services::{
    request_auth_check, request_auth_logout, request_calendar_create_meet, AuthError,
    AuthServiceMessage, CalendarServiceMessage,
};
use crate::store::EventStore;

pub const BRAND: &str = "EvenetX";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Checking,
    Authenticated { email: String },
    Anonymous,
}

/// Session state plus the last error to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    pub error: Option<String>,
}

impl AuthState {
    fn checking() -> Self {
        Self {
            status: AuthStatus::Checking,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::Authenticated { email } => Some(email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    SignIn,
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    pub brand: &'static str,
    pub user_email: Option<String>,
    /// `None` while the session is being checked.
    pub action: Option<NavAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// The event-creation form. Display only; it has no submit handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFormView {
    pub heading: &'static str,
    pub fields: &'static [FormField],
    pub submit_label: &'static str,
}

const EVENT_FORM_FIELDS: &[FormField] = &[
    FormField {
        name: "summary",
        label: "Title",
        kind: FieldKind::Text,
    },
    FormField {
        name: "date",
        label: "Date",
        kind: FieldKind::Date,
    },
    FormField {
        name: "time",
        label: "Time",
        kind: FieldKind::Time,
    },
    FormField {
        name: "location",
        label: "Location",
        kind: FieldKind::Text,
    },
];

pub const EVENT_FORM: EventFormView = EventFormView {
    heading: "Create Event",
    fields: EVENT_FORM_FIELDS,
    submit_label: "Add Event",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub nav: NavView,
    pub error: Option<String>,
    pub meet_link: Option<String>,
    pub event_form: EventFormView,
    pub calendar: CalendarView,
}

pub struct ShellModel<Tz: TimeZone = Local> {
    auth: AuthState,
    meet_link: Option<String>,
    calendar: CalendarModel<Tz>,

    runtime: tokio::runtime::Handle,
    auth_client: Arc<AuthClient>,
    events_client: Arc<EventsClient>,
    navigator: Arc<dyn Navigator>,
    store: Arc<EventStore>,
    parent_cancel: CancellationToken,
    cancel: Option<CancellationToken>,
    check_generation: u64,

    auth_tx: Sender<AuthServiceMessage>,
    auth_rx: Receiver<AuthServiceMessage>,
    meet_tx: Sender<CalendarServiceMessage>,
    meet_rx: Receiver<CalendarServiceMessage>,
}

impl ShellModel<Local> {
    pub fn new(ctx: &ServiceContext) -> Self {
        Self::with_calendar(ctx, CalendarModel::new(ctx))
    }
}

impl<Tz> ShellModel<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Shell whose calendar interprets event instants in `tz`.
    pub fn with_zone(ctx: &ServiceContext, tz: Tz) -> Self {
        Self::with_calendar(ctx, CalendarModel::with_zone(ctx, tz))
    }

    /// Shell embedding `calendar`.
    pub fn with_calendar(ctx: &ServiceContext, calendar: CalendarModel<Tz>) -> Self {
        let (auth_tx, auth_rx) = std::sync::mpsc::channel();
        let (meet_tx, meet_rx) = std::sync::mpsc::channel();

        Self {
            auth: AuthState::checking(),
            meet_link: None,
            calendar,
            runtime: ctx.runtime.clone(),
            auth_client: ctx.auth.clone(),
            events_client: ctx.events.clone(),
            navigator: ctx.navigator.clone(),
            store: ctx.store.clone(),
            parent_cancel: ctx.shutdown.clone(),
            cancel: None,
            check_generation: 0,
            auth_tx,
            auth_rx,
            meet_tx,
            meet_rx,
        }
    }

    // =========== Lifecycle ===========

    pub fn on_init(&mut self) {
        if self.cancel.is_some() {
            return;
        }
        self.cancel = Some(self.parent_cancel.child_token());
        self.calendar.on_init();
        self.check_auth();
    }

    pub fn on_dispose(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.calendar.on_dispose();
    }

    // =========== Session ===========

    /// Re-derive the session from the backend.
    pub fn check_auth(&mut self) {
        let Some(cancel) = &self.cancel else {
            tracing::warn!("check_auth called before on_init");
            return;
        };

        self.check_generation += 1;
        self.auth = AuthState::checking();
        request_auth_check(
            &self.auth_tx,
            &self.runtime,
            self.auth_client.clone(),
            cancel.clone(),
            self.check_generation,
        );
    }

    /// Send the user to the backend's sign-in page, then re-check.
    ///
    /// The check usually reports anonymous until sign-in completes in the
    /// browser; call [`ShellModel::check_auth`] again when the user returns.
    pub fn login(&mut self) {
        let url = self.auth_client.login_url();
        match self.navigator.open(&url) {
            Ok(()) => self.check_auth(),
            Err(e) => {
                tracing::error!("Failed to start sign-in: {}", e);
                self.auth.error = Some(AuthError::Login(e.user_message()).to_string());
            }
        }
    }

    /// Log out. Local state is cleared and re-checked whatever the backend says.
    pub fn logout(&mut self) {
        let Some(cancel) = &self.cancel else {
            tracing::warn!("logout called before on_init");
            return;
        };

        request_auth_logout(
            &self.auth_tx,
            &self.runtime,
            self.auth_client.clone(),
            cancel.clone(),
        );
    }

    /// Ask the backend for an instant Meet event. On success every
    /// subscribed calendar is told an event was added.
    pub fn create_meet(&mut self) {
        let Some(cancel) = &self.cancel else {
            tracing::warn!("create_meet called before on_init");
            return;
        };

        request_calendar_create_meet(
            &self.meet_tx,
            &self.runtime,
            self.events_client.clone(),
            cancel.clone(),
        );
    }

    /// Apply finished requests here and in the embedded calendar.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(msg) = self.auth_rx.try_recv() {
            match msg {
                AuthServiceMessage::CheckDone { generation, result } => {
                    if generation != self.check_generation {
                        tracing::debug!(generation, "Ignoring superseded session check");
                        continue;
                    }
                    self.auth = match result {
                        Ok(Session::Authenticated { email }) => AuthState {
                            status: AuthStatus::Authenticated { email },
                            error: None,
                        },
                        Ok(Session::Anonymous) => AuthState {
                            status: AuthStatus::Anonymous,
                            error: None,
                        },
                        Err(AuthError::Session(message)) => AuthState {
                            status: AuthStatus::Anonymous,
                            error: Some(message),
                        },
                        Err(other) => AuthState {
                            status: AuthStatus::Anonymous,
                            error: Some(other.to_string()),
                        },
                    };
                    changed = true;
                }
                AuthServiceMessage::LogoutDone(result) => {
                    if let Err(e) = result {
                        tracing::warn!("Continuing after failed logout: {}", e);
                    }
                    self.auth = AuthState {
                        status: AuthStatus::Anonymous,
                        error: None,
                    };
                    self.check_auth();
                    changed = true;
                }
            }
        }

        while let Ok(msg) = self.meet_rx.try_recv() {
            if let CalendarServiceMessage::CreateMeetDone(result) = msg {
                match result {
                    Ok(link) => {
                        tracing::info!("Meet created: {}", link);
                        self.meet_link = Some(link);
                        self.store.notify_added();
                    }
                    Err(e) => {
                        tracing::error!("Failed to create Meet: {}", e);
                        self.auth.error = Some(e.user_message());
                    }
                }
                changed = true;
            }
        }

        self.calendar.poll() || changed
    }

    // =========== State ===========

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn meet_link(&self) -> Option<&str> {
        self.meet_link.as_deref()
    }

    pub fn calendar(&self) -> &CalendarModel<Tz> {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarModel<Tz> {
        &mut self.calendar
    }

    pub fn view(&self) -> ShellView {
        let action = match self.auth.status {
            AuthStatus::Checking => None,
            AuthStatus::Authenticated { .. } => Some(NavAction::SignOut),
            AuthStatus::Anonymous => Some(NavAction::SignIn),
        };

        ShellView {
            nav: NavView {
                brand: BRAND,
                user_email: self.auth.email().map(str::to_string),
                action,
            },
            error: self.auth.error.clone(),
            meet_link: self.meet_link.clone(),
            event_form: EVENT_FORM,
            calendar: self.calendar.view(),
        }
    }
}

impl<Tz: TimeZone> Drop for ShellModel<Tz> {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}
