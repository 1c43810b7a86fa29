//! Automatic background sync
//!
//! Two independent periodic tasks: a full sync, and a lighter check that
//! only reports remote-only quotes. Stopping auto-sync stops both.

use crate::engine::{SyncEngine, SyncReport, SyncStep};
use crate::scheduler::{TaskHandle, TaskScheduler};
use quote_model::Quote;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default period of the full sync
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Default period of the new-quote check
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Events emitted by background tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A scheduled sync completed
    Synced(SyncReport),

    /// A scheduled sync suspended for resolution
    ConflictsDetected {
        /// Category conflicts found
        conflicts: usize,
        /// Remote-only quotes found
        new_server: usize,
    },

    /// The check found remote quotes not present locally
    NewQuotesAvailable(Vec<Quote>),

    /// A scheduled sync was skipped because another one is running or pending
    Skipped(String),

    /// A scheduled run failed
    Failed(String),
}

/// Periods for [`AutoSync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSyncConfig {
    /// Full sync period
    pub sync_interval: Duration,
    /// New-quote check period
    pub check_interval: Duration,
}

impl Default for AutoSyncConfig {
    fn default() -> Self {
        Self {
            sync_interval: DEFAULT_SYNC_INTERVAL,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Running auto-sync
#[derive(Debug)]
pub struct AutoSync {
    scheduler: TaskScheduler,
    sync_task: TaskHandle,
    check_task: TaskHandle,
}

impl AutoSync {
    /// Schedule both tasks; events arrive on the returned receiver
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn start(engine: SyncEngine, config: AutoSyncConfig) -> (Self, mpsc::Receiver<SyncEvent>) {
        let scheduler = TaskScheduler::new();
        let (tx, rx) = mpsc::channel(100);

        let sync_engine = engine.clone();
        let sync_tx = tx.clone();
        let sync_task = scheduler.spawn_periodic("auto-sync", config.sync_interval, move || {
            let engine = sync_engine.clone();
            let tx = sync_tx.clone();
            async move {
                let event = match engine.sync().await {
                    Ok(SyncStep::Synced(report)) => SyncEvent::Synced(report),
                    Ok(SyncStep::NeedsResolution(pending)) => SyncEvent::ConflictsDetected {
                        conflicts: pending.conflicts.conflicts.len(),
                        new_server: pending.conflicts.new_server.len(),
                    },
                    Err(e) if e.is_busy() => SyncEvent::Skipped(e.to_string()),
                    Err(e) => SyncEvent::Failed(e.to_string()),
                };
                // Receiver gone means nobody is listening any more.
                let _ = tx.send(event).await;
            }
        });

        let check_task = scheduler.spawn_periodic("new-quote-check", config.check_interval, move || {
            let engine = engine.clone();
            let tx = tx.clone();
            async move {
                let event = match engine.check_for_new().await {
                    Ok(fresh) if fresh.is_empty() => return,
                    Ok(fresh) => SyncEvent::NewQuotesAvailable(fresh),
                    Err(e) => SyncEvent::Failed(e.to_string()),
                };
                let _ = tx.send(event).await;
            }
        });

        tracing::info!(
            sync_secs = config.sync_interval.as_secs(),
            check_secs = config.check_interval.as_secs(),
            "auto-sync started"
        );
        (
            Self {
                scheduler,
                sync_task,
                check_task,
            },
            rx,
        )
    }

    /// Stop both tasks, returning how many were still running
    pub fn stop(&self) -> usize {
        let stopped = self.scheduler.cancel_all();
        tracing::info!(stopped, "auto-sync stopped");
        stopped
    }

    /// Whether either task is still scheduled
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sync_task.is_active() || self.check_task.is_active()
    }

    /// Scheduler owning the tasks
    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }
}

impl Drop for AutoSync {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
