use pretty_assertions::assert_eq;
use quote_composition::Resolution;
use quote_sync::{SyncError, SyncState, SyncStep};
use quote_test_utils::{quotes, scripted_engine, server_quote};
use std::time::Duration;

#[tokio::test]
async fn test_no_differences_pushes_and_completes() {
    let local = quotes(&[("A", "X"), ("B", "Y")]);
    let (engine, remote) = scripted_engine(local.clone(), local.clone());

    let step = engine.sync().await.unwrap();

    let SyncStep::Synced(report) = step else {
        panic!("expected a completed sync");
    };
    assert!(report.pushed);
    assert!(report.resolution.is_none());
    assert_eq!(remote.pushes(), vec![local]);

    let status = engine.status();
    assert_eq!(status.state, SyncState::Synced);
    assert!(status.synced);
    assert_eq!(status.syncs_completed, 1);
    assert!(status.last_sync.is_some());
}

#[tokio::test]
async fn test_local_only_quotes_do_not_block() {
    let (engine, remote) = scripted_engine(quotes(&[("A", "X"), ("Mine", "Y")]), quotes(&[("A", "X")]));

    assert!(matches!(engine.sync().await.unwrap(), SyncStep::Synced(_)));
    assert_eq!(remote.pushes()[0].len(), 2);
}

#[tokio::test]
async fn test_conflict_suspends_until_merge() {
    let (engine, remote) = scripted_engine(
        quotes(&[("A", "X")]),
        vec![server_quote(1, "A", "Y"), server_quote(2, "B", "Server")],
    );

    let SyncStep::NeedsResolution(pending) = engine.sync().await.unwrap() else {
        panic!("expected a pending resolution");
    };
    assert_eq!(pending.conflicts.conflicts.len(), 1);
    assert_eq!(pending.conflicts.new_server.len(), 1);
    assert_eq!(engine.state(), SyncState::AwaitingResolution);
    assert!(remote.pushes().is_empty());

    let report = engine.resolve(Resolution::Merge).await.unwrap();

    assert_eq!(report.categories_overwritten, 1);
    assert_eq!(report.appended, 1);
    let texts: Vec<(String, String)> = engine
        .store()
        .snapshot()
        .into_iter()
        .map(|q| (q.text, q.category))
        .collect();
    assert_eq!(
        texts,
        vec![
            ("A".to_string(), "Y".to_string()),
            ("B".to_string(), "Server".to_string())
        ]
    );
    assert_eq!(remote.pushes().len(), 1);
    assert_eq!(engine.status().conflicts_resolved, 1);
    assert!(engine.pending().is_none());
}

#[tokio::test]
async fn test_server_resolution_replaces_local() {
    let server = vec![server_quote(1, "S", "Server")];
    let (engine, _remote) = scripted_engine(quotes(&[("L", "Local")]), server.clone());

    engine.sync().await.unwrap();
    engine.resolve(Resolution::Server).await.unwrap();

    assert_eq!(engine.store().snapshot().into_vec(), server);
}

#[tokio::test]
async fn test_local_resolution_keeps_local() {
    let local = quotes(&[("L", "Local")]);
    let (engine, remote) = scripted_engine(local.clone(), vec![server_quote(1, "S", "Server")]);

    engine.sync().await.unwrap();
    engine.resolve(Resolution::Local).await.unwrap();

    assert_eq!(engine.store().snapshot().into_vec(), local.clone());
    assert_eq!(remote.pushes(), vec![local]);
}

#[tokio::test]
async fn test_sync_while_pending_is_rejected() {
    let (engine, _remote) = scripted_engine(quotes(&[("A", "X")]), quotes(&[("A", "Y")]));
    engine.sync().await.unwrap();

    let err = engine.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::ResolutionPending));
    assert!(err.is_busy());
}

#[tokio::test]
async fn test_abandon_returns_to_idle_without_changes() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), quotes(&[("A", "Y")]));
    engine.sync().await.unwrap();

    engine.abandon().await.unwrap();

    assert_eq!(engine.state(), SyncState::Idle);
    assert_eq!(engine.store().snapshot().into_vec(), local);
    assert!(remote.pushes().is_empty());
    assert!(matches!(engine.abandon().await, Err(SyncError::NothingToResolve)));

    // A new sync can start again
    assert!(matches!(engine.sync().await.unwrap(), SyncStep::NeedsResolution(_)));
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_syncs_are_rejected() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), local);
    remote.set_delay(Duration::from_secs(1));

    let (first, second) = tokio::join!(engine.sync(), engine.sync());

    assert!(matches!(first.unwrap(), SyncStep::Synced(_)));
    assert!(matches!(second, Err(SyncError::InProgress)));
    assert_eq!(remote.fetch_count(), 1);
}

#[tokio::test]
async fn test_fetch_failure_uses_fallback() {
    let (engine, remote) = scripted_engine(quotes(&[("A", "X")]), Vec::new());
    remote.fail_fetch(true);

    let SyncStep::NeedsResolution(pending) = engine.sync().await.unwrap() else {
        panic!("fallback quotes should need a resolution");
    };
    assert!(pending.used_fallback);
    assert!(pending.remote.iter().all(|q| q.is_remote()));
}

#[tokio::test]
async fn test_push_failure_completes_unsynced() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), local);
    remote.fail_push(true);

    let SyncStep::Synced(report) = engine.sync().await.unwrap() else {
        panic!("expected a completed sync");
    };
    assert!(!report.pushed);
    let status = engine.status();
    assert_eq!(status.state, SyncState::Synced);
    assert!(!status.synced);
}

#[tokio::test]
async fn test_resolution_rediffs_after_local_change() {
    let (engine, _remote) = scripted_engine(quotes(&[("A", "X")]), quotes(&[("A", "Y")]));
    engine.sync().await.unwrap();

    // Local list changes while the prompt is open
    engine
        .store()
        .replace(quotes(&[("Z", "Q"), ("A", "X")]))
        .unwrap();

    let report = engine.resolve(Resolution::Merge).await.unwrap();

    assert_eq!(report.categories_overwritten, 1);
    let snapshot = engine.store().snapshot().into_vec();
    assert_eq!(snapshot, quotes(&[("Z", "Q"), ("A", "Y")]));
}

#[tokio::test]
async fn test_check_for_new_reports_without_merging() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), quotes(&[("A", "X"), ("B", "Server")]));

    let fresh = engine.check_for_new().await.unwrap();

    assert_eq!(fresh, quotes(&[("B", "Server")]));
    assert_eq!(engine.store().snapshot().into_vec(), local);
    assert_eq!(engine.state(), SyncState::Idle);
    assert!(remote.pushes().is_empty());
}

#[tokio::test]
async fn test_resync_after_success() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), local.clone());

    engine.sync().await.unwrap();
    remote.set_snapshot(quotes(&[("A", "X"), ("B", "Y")]));

    assert!(matches!(engine.sync().await.unwrap(), SyncStep::NeedsResolution(_)));
    assert_eq!(engine.status().syncs_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_sync_returns_to_idle() {
    let local = quotes(&[("A", "X")]);
    let (engine, remote) = scripted_engine(local.clone(), local);
    remote.set_delay(Duration::from_secs(5));

    let cancelled = tokio::time::timeout(Duration::from_secs(1), engine.sync()).await;
    assert!(cancelled.is_err());

    let status = engine.status();
    assert_eq!(status.state, SyncState::Idle);
    assert_eq!(status.message, "Sync interrupted");

    assert!(matches!(engine.sync().await.unwrap(), SyncStep::Synced(_)));
    assert_eq!(remote.fetch_count(), 2);
}
