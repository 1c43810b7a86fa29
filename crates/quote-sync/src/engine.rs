//! Sync engine
//!
//! Drives one sync at a time through the state machine. A sync that finds
//! category conflicts or remote-only quotes suspends in
//! [`SyncState::AwaitingResolution`] holding the diff, and resumes when
//! [`SyncEngine::resolve`] or [`SyncEngine::abandon`] is called.

use crate::error::SyncError;
use crate::remote::{fallback_server_quotes, PushReceipt, RemoteQuoteSource};
use crate::state_machine::{validate_transition, SyncState};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use quote_composition::{detect_conflicts, ConflictSet, Resolution, StrategyRegistry};
use quote_model::Quote;
use quote_store::QuoteStore;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Diff and snapshots held while waiting for a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResolution {
    /// Local list the diff was computed from
    pub local: Vec<Quote>,

    /// Remote snapshot
    pub remote: Vec<Quote>,

    /// Differences found
    pub conflicts: ConflictSet,

    /// Whether `remote` is the hardcoded fallback
    pub used_fallback: bool,
}

/// Outcome of a completed sync or resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Policy applied, `None` when nothing needed resolving
    pub resolution: Option<Resolution>,

    /// Size of the new local list
    pub quote_count: usize,

    /// Local categories replaced by remote ones
    pub categories_overwritten: usize,

    /// Remote-only quotes appended
    pub appended: usize,

    /// Whether the remote acknowledged the push
    pub pushed: bool,

    /// Whether the remote snapshot was the hardcoded fallback
    pub used_fallback: bool,

    /// Completion time
    pub synced_at: DateTime<Utc>,
}

/// Result of [`SyncEngine::sync`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    /// Finished without user input
    Synced(SyncReport),

    /// Suspended until [`SyncEngine::resolve`] or [`SyncEngine::abandon`]
    NeedsResolution(PendingResolution),
}

/// Snapshot of engine progress for status display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Current state
    pub state: SyncState,

    /// Last completed sync
    pub last_sync: Option<DateTime<Utc>>,

    /// Whether the last completed sync reached the remote
    pub synced: bool,

    /// Completed syncs, resolved or not
    pub syncs_completed: u64,

    /// Resolutions applied
    pub conflicts_resolved: u64,

    /// Human-readable status line
    pub message: String,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::Idle,
            last_sync: None,
            synced: false,
            syncs_completed: 0,
            conflicts_resolved: 0,
            message: "Not synced yet".to_string(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Syncing,
    AwaitingResolution(PendingResolution),
    Synced,
}

impl Phase {
    fn state(&self) -> SyncState {
        match self {
            Self::Idle => SyncState::Idle,
            Self::Syncing => SyncState::Syncing,
            Self::AwaitingResolution(_) => SyncState::AwaitingResolution,
            Self::Synced => SyncState::Synced,
        }
    }
}

/// Phase lock held for the duration of [`SyncEngine::sync`]
///
/// Dropping it while still `Syncing` (the sync future was cancelled) puts the
/// engine back to `Idle`.
struct SyncingSection<'a> {
    phase: MutexGuard<'a, Phase>,
    status: &'a RwLock<SyncStatus>,
}

impl Deref for SyncingSection<'_> {
    type Target = Phase;

    fn deref(&self) -> &Phase {
        &self.phase
    }
}

impl DerefMut for SyncingSection<'_> {
    fn deref_mut(&mut self) -> &mut Phase {
        &mut self.phase
    }
}

impl Drop for SyncingSection<'_> {
    fn drop(&mut self) {
        if matches!(*self.phase, Phase::Syncing) {
            tracing::warn!("sync interrupted before completing, returning to idle");
            *self.phase = Phase::Idle;
            let mut status = self.status.write();
            status.state = SyncState::Idle;
            status.message = "Sync interrupted".to_string();
        }
    }
}

/// Reconciles a [`QuoteStore`] with a [`RemoteQuoteSource`]
///
/// Cheap to clone; clones share state, so a manual sync and a scheduled one
/// can never run at the same time.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    store: QuoteStore,
    remote: Arc<dyn RemoteQuoteSource>,
    strategies: Arc<StrategyRegistry>,
    phase: Arc<Mutex<Phase>>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncEngine {
    /// Engine with the default resolution strategies
    #[must_use]
    pub fn new(store: QuoteStore, remote: Arc<dyn RemoteQuoteSource>) -> Self {
        Self {
            store,
            remote,
            strategies: Arc::new(StrategyRegistry::with_defaults()),
            phase: Arc::new(Mutex::new(Phase::Idle)),
            status: Arc::new(RwLock::new(SyncStatus::default())),
        }
    }

    /// Store being synced
    #[inline]
    #[must_use]
    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Status snapshot; never waits on a running sync
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status.read().clone()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.status.read().state
    }

    /// Diff waiting for a resolution, if any
    #[must_use]
    pub fn pending(&self) -> Option<PendingResolution> {
        let phase = self.phase.try_lock().ok()?;
        match &*phase {
            Phase::AwaitingResolution(pending) => Some(pending.clone()),
            _ => None,
        }
    }

    /// Run one sync
    ///
    /// A failed fetch falls back to [`fallback_server_quotes`]; a failed push
    /// still completes locally with `pushed = false`.
    ///
    /// # Errors
    /// - [`SyncError::InProgress`] if another sync or resolution is running
    /// - [`SyncError::ResolutionPending`] if a previous sync is suspended
    /// - [`SyncError::Store`] if the result cannot be persisted
    pub async fn sync(&self) -> Result<SyncStep, SyncError> {
        let guard = self.phase.try_lock().map_err(|_| SyncError::InProgress)?;
        if matches!(*guard, Phase::AwaitingResolution(_)) {
            return Err(SyncError::ResolutionPending);
        }
        let mut phase = SyncingSection {
            phase: guard,
            status: &self.status,
        };
        self.enter(&mut phase, Phase::Syncing, "Syncing with server...".to_string())?;

        let (remote, used_fallback) = self.fetch_or_fallback().await;
        let local = self.store.snapshot().into_vec();
        let conflicts = detect_conflicts(&local, &remote);

        if conflicts.requires_resolution() {
            let message = format!(
                "{} conflict(s) and {} new server quote(s) need a resolution",
                conflicts.conflicts.len(),
                conflicts.new_server.len()
            );
            tracing::info!(
                conflicts = conflicts.conflicts.len(),
                new_server = conflicts.new_server.len(),
                "sync suspended for resolution"
            );
            let pending = PendingResolution {
                local,
                remote,
                conflicts,
                used_fallback,
            };
            self.enter(&mut phase, Phase::AwaitingResolution(pending.clone()), message)?;
            return Ok(SyncStep::NeedsResolution(pending));
        }

        let receipt = self.publish(&local).await;
        if let Err(e) = self.store.save() {
            let err = SyncError::from(e);
            self.fail(&mut phase, &err);
            return Err(err);
        }

        let report = SyncReport {
            resolution: None,
            quote_count: local.len(),
            categories_overwritten: 0,
            appended: 0,
            pushed: receipt.is_some(),
            used_fallback,
            synced_at: Utc::now(),
        };
        self.finish(&mut phase, &report)?;
        Ok(SyncStep::Synced(report))
    }

    /// Apply `resolution` to the suspended sync
    ///
    /// If the local list changed while waiting, the diff is recomputed
    /// against the held remote snapshot first.
    ///
    /// # Errors
    /// - [`SyncError::NothingToResolve`] outside `AwaitingResolution`
    /// - [`SyncError::InProgress`] if another call holds the engine
    /// - strategy or storage failures; the sync then stays suspended
    pub async fn resolve(&self, resolution: Resolution) -> Result<SyncReport, SyncError> {
        let mut phase = self.phase.try_lock().map_err(|_| SyncError::InProgress)?;
        let Phase::AwaitingResolution(pending) = &*phase else {
            return Err(SyncError::NothingToResolve);
        };
        let pending = pending.clone();

        let local = self.store.snapshot().into_vec();
        let conflicts = if local == pending.local {
            pending.conflicts
        } else {
            tracing::debug!("local quotes changed while awaiting resolution, re-diffing");
            detect_conflicts(&local, &pending.remote)
        };

        let resolved = match self
            .strategies
            .resolve(resolution, &local, &pending.remote, &conflicts)
        {
            Ok(resolved) => resolved,
            Err(e) => return Err(self.note_failure(e.into())),
        };

        let receipt = self.publish(&resolved.quotes).await;
        if let Err(e) = self.store.replace(resolved.quotes.clone()) {
            return Err(self.note_failure(e.into()));
        }

        let report = SyncReport {
            resolution: Some(resolution),
            quote_count: resolved.quotes.len(),
            categories_overwritten: resolved.categories_overwritten,
            appended: resolved.appended,
            pushed: receipt.is_some(),
            used_fallback: pending.used_fallback,
            synced_at: Utc::now(),
        };
        self.status.write().conflicts_resolved += 1;
        self.finish(&mut phase, &report)?;
        tracing::info!(
            resolution = %resolution,
            overwritten = report.categories_overwritten,
            appended = report.appended,
            "resolution applied"
        );
        Ok(report)
    }

    /// Drop the suspended sync without touching local quotes
    ///
    /// # Errors
    /// [`SyncError::NothingToResolve`] outside `AwaitingResolution`;
    /// [`SyncError::InProgress`] if another call holds the engine.
    pub async fn abandon(&self) -> Result<(), SyncError> {
        let mut phase = self.phase.try_lock().map_err(|_| SyncError::InProgress)?;
        if !matches!(*phase, Phase::AwaitingResolution(_)) {
            return Err(SyncError::NothingToResolve);
        }
        self.enter(
            &mut phase,
            Phase::Idle,
            "Sync cancelled; local quotes unchanged".to_string(),
        )?;
        tracing::info!("pending resolution abandoned");
        Ok(())
    }

    /// Remote quotes whose text is not in the local list
    ///
    /// Nothing is merged. Runs alongside a sync without contending for it.
    ///
    /// # Errors
    /// [`SyncError::Remote`] if the fetch fails; no fallback is used.
    pub async fn check_for_new(&self) -> Result<Vec<Quote>, SyncError> {
        let remote = self.remote.fetch().await?;
        let fresh = self
            .store
            .with_quotes(|local| detect_conflicts(local.as_slice(), &remote).new_server);
        tracing::debug!(count = fresh.len(), "checked for new remote quotes");
        Ok(fresh)
    }

    async fn fetch_or_fallback(&self) -> (Vec<Quote>, bool) {
        match self.remote.fetch().await {
            Ok(quotes) => (quotes, false),
            Err(e) => {
                tracing::warn!(error = %e, "remote fetch failed, using fallback quotes");
                (fallback_server_quotes(), true)
            }
        }
    }

    async fn publish(&self, quotes: &[Quote]) -> Option<PushReceipt> {
        match self.remote.push(quotes).await {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                tracing::warn!(error = %e, "push to remote failed, continuing unsynced");
                None
            }
        }
    }

    fn enter(&self, phase: &mut Phase, next: Phase, message: String) -> Result<(), SyncError> {
        let to = next.state();
        validate_transition(phase.state(), to)?;
        *phase = next;

        let mut status = self.status.write();
        status.state = to;
        status.message = message;
        Ok(())
    }

    fn finish(&self, phase: &mut Phase, report: &SyncReport) -> Result<(), SyncError> {
        let message = if report.pushed {
            format!("Synced with server ({} quotes)", report.quote_count)
        } else {
            format!("Saved locally; server unreachable ({} quotes)", report.quote_count)
        };
        self.enter(phase, Phase::Synced, message)?;

        let mut status = self.status.write();
        status.last_sync = Some(report.synced_at);
        status.synced = report.pushed;
        status.syncs_completed += 1;
        drop(status);

        tracing::info!(
            count = report.quote_count,
            pushed = report.pushed,
            fallback = report.used_fallback,
            "sync completed"
        );
        Ok(())
    }

    /// Syncing falls back to Idle on failure
    fn fail(&self, phase: &mut Phase, err: &SyncError) {
        tracing::error!(error = %err, "sync failed");
        if let Err(e) = self.enter(phase, Phase::Idle, format!("Sync failed: {err}")) {
            tracing::error!(error = %e, "could not reset sync state");
        }
    }

    /// Resolution failures keep the sync suspended
    fn note_failure(&self, err: SyncError) -> SyncError {
        tracing::error!(error = %err, "resolution failed");
        self.status.write().message = format!("Resolution failed: {err}");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Offline;

    #[async_trait]
    impl RemoteQuoteSource for Offline {
        async fn fetch(&self) -> Result<Vec<Quote>, RemoteError> {
            Err(RemoteError::Unavailable("offline".to_string()))
        }

        async fn push(&self, _quotes: &[Quote]) -> Result<PushReceipt, RemoteError> {
            Err(RemoteError::Unavailable("offline".to_string()))
        }
    }

    fn engine() -> SyncEngine {
        SyncEngine::new(QuoteStore::in_memory(), Arc::new(Offline))
    }

    #[test]
    fn starts_idle() {
        let engine = engine();
        let status = engine.status();
        assert_eq!(status.state, SyncState::Idle);
        assert!(!status.synced);
        assert!(status.last_sync.is_none());
        assert!(engine.pending().is_none());
    }

    #[test]
    fn phase_maps_to_state() {
        assert_eq!(Phase::Idle.state(), SyncState::Idle);
        assert_eq!(Phase::Syncing.state(), SyncState::Syncing);
        assert_eq!(Phase::Synced.state(), SyncState::Synced);
    }

    #[tokio::test]
    async fn offline_sync_uses_fallback_and_suspends() {
        let engine = engine();

        let step = engine.sync().await.unwrap();

        let SyncStep::NeedsResolution(pending) = step else {
            panic!("expected a pending resolution");
        };
        assert!(pending.used_fallback);
        assert_eq!(pending.conflicts.new_server.len(), fallback_server_quotes().len());
        assert_eq!(engine.state(), SyncState::AwaitingResolution);
    }

    #[tokio::test]
    async fn offline_resolution_completes_unsynced() {
        let engine = engine();
        let before = engine.store().len();
        engine.sync().await.unwrap();

        let report = engine.resolve(Resolution::Merge).await.unwrap();

        assert!(!report.pushed);
        assert_eq!(report.appended, fallback_server_quotes().len());
        assert_eq!(engine.store().len(), before + report.appended);
        let status = engine.status();
        assert_eq!(status.state, SyncState::Synced);
        assert!(!status.synced);
        assert_eq!(status.conflicts_resolved, 1);
    }

    #[tokio::test]
    async fn check_for_new_does_not_fall_back() {
        let err = engine().check_for_new().await.unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));
    }

    #[tokio::test]
    async fn resolve_without_pending_is_rejected() {
        let err = engine().resolve(Resolution::Local).await.unwrap_err();
        assert!(matches!(err, SyncError::NothingToResolve));
    }
}
