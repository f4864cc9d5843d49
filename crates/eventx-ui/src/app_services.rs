//! Centralized application services.
//!
//! `AppServices` owns the tokio runtime and the backend clients; view models
//! receive a cloneable [`ServiceContext`] that points at them. All backend
//! clients share one `reqwest::Client` so the session cookie set by the
//! auth routes is sent to the calendar routes too.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use eventx_auth::{AuthClient, BrowserNavigator, LogNavigator, Navigator};
use eventx_calendar::EventsClient;
use eventx_core::{AppError, Config, NetworkError, ReqwestErrorExt};
use tokio_util::sync::CancellationToken;

use crate::models::{CalendarModel, ShellModel};
use crate::store::EventStore;

/// Handles a view model needs to talk to the backend.
#[derive(Clone)]
pub struct ServiceContext {
    pub runtime: tokio::runtime::Handle,
    pub events: Arc<EventsClient>,
    pub auth: Arc<AuthClient>,
    pub store: Arc<EventStore>,
    pub navigator: Arc<dyn Navigator>,
    /// Parent of every model's cancellation token.
    pub shutdown: CancellationToken,
}

impl ServiceContext {
    /// Build a context against `base_url` on an existing runtime.
    pub fn new(
        runtime: tokio::runtime::Handle,
        http: reqwest::Client,
        base_url: &str,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let events = EventsClient::new(http.clone(), base_url)
            .map_err(|e| AppError::Service(e.to_string()))?;
        let auth =
            AuthClient::new(http, base_url).map_err(|e| AppError::Service(e.to_string()))?;

        Ok(Self {
            runtime,
            events: Arc::new(events),
            auth: Arc::new(auth),
            store: Arc::new(EventStore::new()),
            navigator,
            shutdown: CancellationToken::new(),
        })
    }
}

/// HTTP client with a cookie jar, as every backend client expects.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, NetworkError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .user_agent(concat!("eventx/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| e.into_network_error())
}

/// Application-wide services container.
pub struct AppServices {
    runtime: tokio::runtime::Runtime,
    context: ServiceContext,
}

impl AppServices {
    /// Start the runtime and build the backend clients from `config`.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("eventx-tokio")
            .build()?;

        let http = build_http_client(Duration::from_secs(config.backend.timeout_secs))?;

        let navigator: Arc<dyn Navigator> = if config.ui.open_browser {
            Arc::new(BrowserNavigator)
        } else {
            Arc::new(LogNavigator)
        };

        let context = ServiceContext::new(
            runtime.handle().clone(),
            http,
            &config.backend.base_url,
            navigator,
        )?;

        tracing::info!(backend = %config.backend.base_url, "AppServices initialized");
        Ok(Self { runtime, context })
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    pub fn store(&self) -> Arc<EventStore> {
        self.context.store.clone()
    }

    /// A new shell (with embedded calendar) in the local time zone.
    pub fn shell(&self) -> ShellModel<Local> {
        ShellModel::new(&self.context)
    }

    /// A standalone calendar in the local time zone.
    pub fn calendar(&self) -> CalendarModel<Local> {
        CalendarModel::new(&self.context)
    }

    /// Cancel every outstanding request issued through this container.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.context.shutdown.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.context.shutdown.is_cancelled()
    }
}
