//! Headless view models for the EvenetX dashboard.
//!
//! Models own their state and expose render structs; front ends drive them
//! through `on_init`, `poll` and `on_dispose`.

pub mod app_services;
pub mod models;
pub mod services;
pub mod store;

pub use app_services::{build_http_client, AppServices, ServiceContext};
pub use models::{CalendarModel, ShellModel};
pub use store::{EventStore, EventSubscription, EventsChanged};
