use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use eventx_calendar::GridCell;
use eventx_ui::models::{AuthStatus, NavAction, PanelBody, ShellView, NO_EVENTS_MESSAGE};
use eventx_ui::AppServices;

fn main() -> Result<()> {
    eventx_core::init()?;

    let selected = std::env::args()
        .nth(1)
        .map(|arg| {
            NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
                .with_context(|| format!("Expected a date as YYYY-MM-DD, got {:?}", arg))
        })
        .transpose()?;

    let app = match eventx_core::App::new() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };
    app.initialize();

    let services = AppServices::new(app.config())?;
    let mut shell = services.shell();
    if let Some(date) = selected {
        shell.calendar_mut().show_date(date);
    }
    shell.on_init();

    let poll_interval = Duration::from_millis(app.config().ui.poll_interval_ms);
    let deadline = Instant::now() + Duration::from_secs(app.config().backend.timeout_secs + 2);
    loop {
        shell.poll();
        let settled =
            shell.auth().status != AuthStatus::Checking && !shell.calendar().is_loading();
        if settled {
            break;
        }
        if Instant::now() >= deadline {
            tracing::warn!("Backend did not answer in time; showing what we have");
            break;
        }
        std::thread::sleep(poll_interval);
    }

    render(&shell.view());

    shell.on_dispose();
    services.shutdown();
    app.shutdown();

    Ok(())
}

fn render(view: &ShellView) {
    let account = match (&view.nav.user_email, view.nav.action) {
        (Some(email), _) => email.clone(),
        (None, Some(NavAction::SignIn)) => "Not signed in".to_string(),
        _ => "Checking sign-in...".to_string(),
    };
    println!("{} | {}", view.nav.brand, account);
    if let Some(error) = &view.error {
        println!("! {}", error);
    }
    if let Some(link) = &view.meet_link {
        println!("Meet: {}", link);
    }

    let calendar = &view.calendar;
    println!();
    println!("{:^34}", calendar.title);
    println!(
        "{}",
        calendar
            .weekday_labels
            .iter()
            .map(|label| format!("{:>4}", label))
            .collect::<String>()
    );
    for week in calendar.grid.weeks() {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                GridCell::Placeholder => "    ".to_string(),
                GridCell::Day {
                    day, is_selected: true, ..
                } => format!("[{:>2}]", day),
                GridCell::Day {
                    day, is_today: true, ..
                } => format!(" {:>2}*", day),
                GridCell::Day { day, .. } => format!(" {:>2} ", day),
            })
            .collect();
        println!("{}", line);
    }

    println!();
    println!("{}", calendar.panel.header);
    match &calendar.panel.body {
        PanelBody::Loading => println!("  Loading..."),
        PanelBody::Empty => println!("  {}", NO_EVENTS_MESSAGE),
        PanelBody::Events(rows) => {
            for row in rows {
                let when = row.when.to_string();
                match &row.location {
                    Some(location) => println!("  {:>8}  {} ({})", when, row.title, location),
                    None => println!("  {:>8}  {}", when, row.title),
                }
            }
        }
    }
}
