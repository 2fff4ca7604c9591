//! Dashboard cards and notification panel.
//!
//! Nothing here is cached between loads: every load asks the backend for
//! fresh stats and notifications and publishes the result on a `watch`
//! channel. While mounted, a [`RefreshHandle`] reloads on a fixed period.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use uks_core::Clock;
use uks_dashboard::{DashboardStats, Notification, group_by_severity, relative_time_label};

use super::ControllerError;
use crate::backend::ClinicBackend;
use crate::envelope::BackendError;
use crate::refresh::{RefreshHandle, spawn_refresh};
use crate::sequencer::RequestSequencer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// Grouped danger, warning, info, success.
    pub notifications: Vec<Notification>,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardView {
    /// Relative age of each notification at `now`, in display order.
    pub fn notification_ages(&self, now: DateTime<Utc>) -> Vec<String> {
        self.notifications
            .iter()
            .map(|n| relative_time_label(n.timestamp.unwrap_or(self.fetched_at), now))
            .collect()
    }
}

struct Shared {
    backend: Arc<dyn ClinicBackend>,
    clock: Arc<dyn Clock>,
    view: watch::Sender<Option<DashboardView>>,
    loads: RequestSequencer,
}

impl Shared {
    async fn load(&self) -> Result<DashboardView, ControllerError> {
        let ticket = self.loads.issue();
        let (stats, notifications) =
            tokio::join!(self.backend.dashboard_stats(), self.backend.notifications());

        let stats = stats
            .map_err(BackendError::from)
            .and_then(|env| env.into_data());
        let notifications = notifications
            .map_err(BackendError::from)
            .and_then(|env| env.into_data());

        let (stats, notifications) = match (stats, notifications) {
            (Ok(s), Ok(n)) => (s, n),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(error = %err, "dashboard load failed");
                return Err(err.into());
            }
        };

        let view = DashboardView {
            stats,
            notifications: group_by_severity(&notifications),
            fetched_at: self.clock.now(),
        };

        if self.loads.is_current(ticket) {
            self.view.send_replace(Some(view.clone()));
            tracing::debug!(
                notifications = view.notifications.len(),
                "dashboard view published"
            );
        } else {
            tracing::debug!(?ticket, "discarding stale dashboard response");
        }
        Ok(view)
    }
}

pub struct DashboardController {
    shared: Arc<Shared>,
    interval: Duration,
    refresh: Mutex<Option<RefreshHandle>>,
}

impl DashboardController {
    pub fn new(backend: Arc<dyn ClinicBackend>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (view, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                backend,
                clock,
                view,
                loads: RequestSequencer::new(),
            }),
            interval,
            refresh: Mutex::new(None),
        }
    }

    /// Fetch stats and notifications and publish them. A failed load keeps
    /// the previously published view.
    pub async fn load(&self) -> Result<DashboardView, ControllerError> {
        self.shared.load().await
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardView>> {
        self.shared.view.subscribe()
    }

    /// Last published view.
    pub fn current(&self) -> Option<DashboardView> {
        self.shared.view.borrow().clone()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.interval
    }

    /// Load now and start the periodic refresh, replacing any running one.
    ///
    /// The refresh keeps running even when this first load fails. A zero
    /// interval is rejected before anything is loaded or spawned.
    pub async fn mount(&self) -> Result<DashboardView, ControllerError> {
        let shared = self.shared.clone();
        let handle = spawn_refresh("dashboard", self.interval, move || {
            let shared = shared.clone();
            async move { shared.load().await.map(|_| ()) }
        })
        .map_err(|err| ControllerError::InvalidInput(err.to_string()))?;

        let previous = self
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if previous.is_some() {
            tracing::debug!("replacing running dashboard refresh");
        }
        drop(previous);

        self.load().await
    }

    pub async fn unmount(&self) {
        let handle = self
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(RefreshHandle::is_running)
    }
}
