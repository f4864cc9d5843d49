pub mod calendar_model;
pub mod shell_model;

pub use calendar_model::{CalendarModel, CalendarView, EventsPanel, PanelBody, NO_EVENTS_MESSAGE};
pub use shell_model::{
    AuthState, AuthStatus, EventFormView, FieldKind, FormField, NavAction, NavView, ShellModel,
    ShellView, BRAND, EVENT_FORM,
};
