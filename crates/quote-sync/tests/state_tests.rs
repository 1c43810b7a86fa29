use proptest::prelude::*;
use quote_sync::state_machine::{allowed_transitions, validate_transition, SyncState};

#[test]
fn test_idle_transitions() {
    assert!(validate_transition(SyncState::Idle, SyncState::Syncing).is_ok());

    // Invalid
    assert!(validate_transition(SyncState::Idle, SyncState::Synced).is_err());
    assert!(validate_transition(SyncState::Idle, SyncState::AwaitingResolution).is_err());
}

#[test]
fn test_syncing_cannot_restart() {
    assert!(validate_transition(SyncState::Syncing, SyncState::Syncing).is_err());
    assert!(validate_transition(SyncState::Syncing, SyncState::Idle).is_ok());
}

#[test]
fn test_awaiting_resolution_exits() {
    assert!(validate_transition(SyncState::AwaitingResolution, SyncState::Synced).is_ok());
    assert!(validate_transition(SyncState::AwaitingResolution, SyncState::Idle).is_ok());

    assert!(validate_transition(SyncState::AwaitingResolution, SyncState::Syncing).is_err());
}

#[test]
fn test_every_state_can_reach_idle_except_idle() {
    for state in SyncState::ALL {
        let reaches_idle = allowed_transitions(state).contains(&SyncState::Idle);
        assert_eq!(reaches_idle, state != SyncState::Idle, "{state}");
    }
}

fn any_state() -> impl Strategy<Value = SyncState> {
    prop_oneof![
        Just(SyncState::Idle),
        Just(SyncState::Syncing),
        Just(SyncState::AwaitingResolution),
        Just(SyncState::Synced),
    ]
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_no_self_loops(state in any_state()) {
        prop_assert!(validate_transition(state, state).is_err());
    }
}
