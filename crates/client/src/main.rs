//! `uks-client` entry point.
//!
//! Prints the dashboard, grouped notifications and today's visit report.
//! With `--watch` it keeps the dashboard mounted and prints every refresh
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;

use uks_client::{ClientConfig, DashboardController, DashboardView, PatientController, build_backend};
use uks_core::{Clock, SystemClock};

fn print_dashboard(view: &DashboardView) {
    let stats = &view.stats;
    println!("Total medicines:   {}", stats.total_medicines);
    println!("Visits today:      {}", stats.visits_today);
    println!("Low stock:         {}", stats.low_stock);
    println!("Expired medicines: {}", stats.expired);
    println!();

    let ages = view.notification_ages(view.fetched_at);
    for (note, age) in view.notifications.iter().zip(ages) {
        println!("[{}] {} ({age})", note.severity.title(), note.message);
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    uks_observability::init();

    let watch = std::env::args().skip(1).any(|arg| arg == "--watch");

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::info!(mode = ?config.mode, base_url = %config.base_url, "starting uks-client");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let backend = build_backend(&config, clock.clone()).context("failed to build backend")?;

    if !backend.health().await {
        tracing::warn!(base_url = %config.base_url, "backend health probe failed");
    }

    let dashboard = DashboardController::new(backend.clone(), clock.clone(), config.refresh_interval);
    let patients = PatientController::new(backend, clock.clone());

    let view = if watch {
        dashboard.mount().await
    } else {
        dashboard.load().await
    };
    let view = view.map_err(|err| anyhow::anyhow!(err.user_message()))?;
    print_dashboard(&view);

    patients
        .load()
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    println!("{}", patients.daily_report(clock.today()));

    if watch {
        let mut updates = dashboard.subscribe();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = updates.borrow_and_update().clone();
                    if let Some(view) = latest {
                        print_dashboard(&view);
                    }
                }
            }
        }
        dashboard.unmount().await;
    }

    Ok(())
}
