//! End-to-end tests for ShellModel: session checks, login, logout and Meet.

mod common;

use std::sync::Arc;

use common::{settle, FailingNavigator, Harness, RecordingNavigator};
use eventx_auth::PROFILE_FALLBACK_MESSAGE;
use eventx_ui::models::{AuthStatus, NavAction, ShellModel, BRAND};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn status_mock(authenticated: bool) -> Mock {
    Mock::given(method("GET"))
        .and(path("/auth/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "authenticated": authenticated })),
        )
}

fn me_mock(email: &str) -> Mock {
    Mock::given(method("GET"))
        .and(path("/user/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": email })))
}

fn empty_events() -> Mock {
    Mock::given(method("GET"))
        .and(path("/calendar/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
}

fn settle_auth(shell: &mut ShellModel) {
    settle(|| {
        shell.poll();
        shell.auth().status != AuthStatus::Checking && !shell.calendar().is_loading()
    });
}

#[test]
fn signed_in_user_sees_email_and_sign_out() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(status_mock(true));
    h.mount(me_mock("ada@example.com"));

    let mut shell = ShellModel::new(&h.ctx);
    assert_eq!(shell.view().nav.action, None);

    shell.on_init();
    settle_auth(&mut shell);

    assert!(shell.auth().is_authenticated());
    let view = shell.view();
    assert_eq!(view.nav.brand, BRAND);
    assert_eq!(view.nav.user_email.as_deref(), Some("ada@example.com"));
    assert_eq!(view.nav.action, Some(NavAction::SignOut));
    assert_eq!(view.error, None);
    assert_eq!(view.event_form.submit_label, "Add Event");
    assert_eq!(view.event_form.fields.len(), 4);
}

#[test]
fn anonymous_session_skips_profile() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(status_mock(false));
    h.mount(me_mock("nobody@example.com").expect(0));

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    assert_eq!(shell.auth().status, AuthStatus::Anonymous);
    assert_eq!(shell.auth().error, None);
    assert_eq!(shell.view().nav.action, Some(NavAction::SignIn));
    h.verify();
}

#[test]
fn profile_failure_reports_fallback_message() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(status_mock(true));
    h.mount(
        Mock::given(method("GET"))
            .and(path("/user/me"))
            .respond_with(ResponseTemplate::new(500)),
    );

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    assert_eq!(shell.auth().status, AuthStatus::Anonymous);
    assert_eq!(shell.auth().error.as_deref(), Some(PROFILE_FALLBACK_MESSAGE));
}

#[test]
fn status_failure_surfaces_backend_detail() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(
        Mock::given(method("GET"))
            .and(path("/auth/status"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({ "detail": "Backend down" })),
            ),
    );

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    assert_eq!(shell.auth().status, AuthStatus::Anonymous);
    assert_eq!(shell.view().error.as_deref(), Some("Backend down"));
}

#[test]
fn failed_logout_still_signs_out_and_rechecks() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(status_mock(true).up_to_n_times(1));
    h.mount(status_mock(false));
    h.mount(me_mock("ada@example.com"));
    h.mount(
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1),
    );

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);
    assert!(shell.auth().is_authenticated());

    shell.logout();
    settle(|| {
        shell.poll();
        shell.auth().status == AuthStatus::Anonymous
    });

    assert_eq!(shell.auth().error, None);
    assert_eq!(shell.view().nav.user_email, None);
    assert_eq!(h.hits("/auth/status"), 2);
    h.verify();
}

#[test]
fn login_opens_backend_sign_in_and_rechecks() {
    let navigator = Arc::new(RecordingNavigator::default());
    let h = Harness::with_navigator(navigator.clone());
    h.mount(empty_events());
    h.mount(status_mock(false));

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    shell.login();
    assert_eq!(shell.auth().status, AuthStatus::Checking);
    settle_auth(&mut shell);

    let opened = navigator.opened.lock().unwrap().clone();
    assert_eq!(opened, [format!("{}/auth/login", h.server.uri())]);
    assert_eq!(h.hits("/auth/status"), 2);
}

#[test]
fn login_without_browser_shows_error() {
    let h = Harness::with_navigator(Arc::new(FailingNavigator));
    h.mount(empty_events());
    h.mount(status_mock(false));

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    shell.login();
    assert_eq!(shell.auth().status, AuthStatus::Anonymous);
    let error = shell.auth().error.clone().unwrap();
    assert!(error.contains("no browser available"), "{error}");
}

#[test]
fn created_meet_refreshes_calendar() {
    let h = Harness::new();
    h.mount(status_mock(false));
    h.mount(empty_events().expect(2));
    h.mount(
        Mock::given(method("POST"))
            .and(path("/calendar/meet"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "meet_link": "https://meet.google.com/abc-defg-hij" })),
            ),
    );

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    shell.create_meet();
    settle(|| {
        shell.poll();
        shell.meet_link().is_some() && !shell.calendar().is_loading()
    });

    assert_eq!(
        shell.view().meet_link.as_deref(),
        Some("https://meet.google.com/abc-defg-hij")
    );
    h.verify();
}

#[test]
fn failed_meet_sets_error_without_refresh() {
    let h = Harness::new();
    h.mount(status_mock(false));
    h.mount(empty_events().expect(1));
    h.mount(
        Mock::given(method("POST"))
            .and(path("/calendar/meet"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "detail": "Not authenticated" })),
            ),
    );

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    settle_auth(&mut shell);

    shell.create_meet();
    settle(|| {
        shell.poll();
        shell.auth().error.is_some()
    });

    assert_eq!(shell.meet_link(), None);
    h.verify();
}

#[test]
fn dispose_tears_down_calendar() {
    let h = Harness::new();
    h.mount(empty_events());
    h.mount(status_mock(false));

    let mut shell = ShellModel::new(&h.ctx);
    shell.on_init();
    assert_eq!(h.ctx.store.subscriber_count(), 1);

    shell.on_dispose();
    assert_eq!(h.ctx.store.subscriber_count(), 0);
    assert!(!shell.calendar().is_initialized());
}
