//! Shared harness: a mock backend plus a service context pointing at it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use eventx_auth::{AuthError, LogNavigator, Navigator};
use eventx_ui::{build_http_client, ServiceContext};
use tokio::runtime::Runtime;
use wiremock::MockServer;

// Field order is drop order: the runtime goes last.
pub struct Harness {
    pub ctx: ServiceContext,
    pub server: MockServer,
    pub rt: Runtime,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_navigator(Arc::new(LogNavigator))
    }

    pub fn with_navigator(navigator: Arc<dyn Navigator>) -> Self {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::start());
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let ctx = ServiceContext::new(rt.handle().clone(), http, &server.uri(), navigator).unwrap();
        Self { ctx, server, rt }
    }

    /// Mount `mock` on the backend.
    pub fn mount(&self, mock: wiremock::Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Check every `expect(..)` set on mounted mocks.
    pub fn verify(&self) {
        self.rt.block_on(self.server.verify());
    }

    pub fn hits(&self, route: &str) -> usize {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }
}

/// Run `step` until it returns true, failing after a few seconds.
pub fn settle(mut step: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !step() {
        assert!(Instant::now() < deadline, "model did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Let pending work run without waiting on a condition.
pub fn idle(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}

/// Records every URL it is asked to open.
#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Always fails to open, like a machine with no browser.
pub struct FailingNavigator;

impl Navigator for FailingNavigator {
    fn open(&self, _url: &str) -> Result<(), AuthError> {
        Err(AuthError::Navigation("no browser available".into()))
    }
}
