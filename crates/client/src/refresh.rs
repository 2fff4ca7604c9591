//! Cancellable periodic refresh.
//!
//! The task sleeps one full period before its first run; callers that want
//! an immediate load do it themselves before spawning.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owner of a running refresh task. Stopping or dropping it ends the task.
#[derive(Debug)]
pub struct RefreshHandle {
    name: &'static str,
    shutdown: Arc<Notify>,
    join: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Signal shutdown and wait for the task to exit.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(join) = self.join.take() {
            if let Err(err) = join.await {
                tracing::warn!(task = self.name, error = %err, "refresh task ended abnormally");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            self.shutdown.notify_one();
            join.abort();
            tracing::debug!(task = self.name, "refresh task dropped");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh period must be greater than zero")]
    ZeroPeriod,
}

/// Spawn `tick` every `period` until the returned handle is stopped or dropped.
///
/// A tick that fails is logged and the schedule continues. Missed ticks are
/// skipped, never replayed in a burst.
pub fn spawn_refresh<F, Fut, E>(
    name: &'static str,
    period: Duration,
    mut tick: F,
) -> Result<RefreshHandle, RefreshError>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    if period.is_zero() {
        return Err(RefreshError::ZeroPeriod);
    }

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();

    let join = tokio::spawn(async move {
        tracing::info!(task = name, ?period, "refresh task started");

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = signal.notified() => {
                    tracing::info!(task = name, "refresh task received shutdown signal");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(err) = tick().await {
                        tracing::warn!(task = name, error = %err, "refresh failed; keeping last view");
                    }
                }
            }
        }
    });

    Ok(RefreshHandle {
        name,
        shutdown,
        join: Some(join),
    })
}
