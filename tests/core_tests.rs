use rollcall::core::dedup::is_marked;
use rollcall::core::{
    Command, ConnectivityMonitor, DrainReport, NullJournal, Outcome, RawIdentifier, Reconciler,
    RosterIndex, RosterRow, SessionContext, SyncQueue, Transition, normalize_identifier,
};
use rollcall::errors::{CaptureError, RemoteError};
use rollcall::models::{CaptureMethod, SyncState};
use rollcall::remote::RemoteAck;

mod common;
use common::{MockRemote, engine_with, offline_engine, roster_rows};

fn loaded_roster() -> RosterIndex {
    let mut roster = RosterIndex::new();
    roster.load(roster_rows());
    roster
}

fn pending_ids(session: &SessionContext) -> Vec<String> {
    session.pending().map(|r| r.identifier.clone()).collect()
}

/// The queue must always be the pending subsequence of the records.
fn assert_queue_consistent(session: &SessionContext) {
    let from_records: Vec<String> = session
        .records()
        .iter()
        .filter(|r| r.is_pending())
        .map(|r| r.identifier.clone())
        .collect();
    assert_eq!(pending_ids(session), from_records);
}

// ---------------------------------------------------------------------------
// roster
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_identifier() {
    assert_eq!(normalize_identifier("101"), "101");
    assert_eq!(normalize_identifier(" 101 "), "101");
    assert_eq!(normalize_identifier("101.0"), "101");
    assert_eq!(normalize_identifier("101.000"), "101");
    assert_eq!(normalize_identifier("101.5"), "101.5");
    assert_eq!(normalize_identifier("007"), "007");
    assert_eq!(normalize_identifier("CS-2024-17"), "CS-2024-17");
}

#[test]
fn test_roster_load_skips_blank_and_repeated_ids() {
    let mut roster = RosterIndex::new();
    let loaded = roster.load(vec![
        RosterRow::new("101", "Asha"),
        RosterRow::new("  ", "Nobody"),
        RosterRow::new("101", "Asha again"),
        RosterRow::new("102", "Ravi"),
    ]);

    assert_eq!(loaded, 2);
    assert_eq!(roster.lookup("101").unwrap().display_name, "Asha");

    let order: Vec<&str> = roster.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(order, vec!["101", "102"]);
}

#[test]
fn test_roster_numeric_cells_match_text_input() {
    let mut roster = RosterIndex::new();
    roster.load(vec![
        RosterRow {
            identifier: RawIdentifier::Float(101.0),
            display_name: "Asha".into(),
        },
        RosterRow::new(102_i64, "Ravi"),
    ]);

    assert_eq!(roster.lookup("101").unwrap().identifier, "101");
    assert_eq!(roster.lookup("102.0").unwrap().display_name, "Ravi");
}

#[test]
fn test_roster_lookup_errors() {
    let empty = RosterIndex::new();
    assert_eq!(empty.lookup("101"), Err(CaptureError::RosterNotLoaded));

    let roster = loaded_roster();
    assert_eq!(
        roster.lookup("999"),
        Err(CaptureError::UnknownStudent("999".into()))
    );
}

#[test]
fn test_reload_replaces_roster() {
    let mut roster = loaded_roster();
    roster.load(vec![RosterRow::new("900", "Zoya")]);

    assert_eq!(roster.len(), 1);
    assert!(roster.lookup("101").is_err());
}

// ---------------------------------------------------------------------------
// session store + dedup
// ---------------------------------------------------------------------------

#[test]
fn test_capture_appends_pending_record() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");

    let record = session.capture("101", CaptureMethod::Scan, &roster).unwrap();

    assert_eq!(record.identifier, "101");
    assert_eq!(record.display_name, "Asha");
    assert_eq!(record.method, CaptureMethod::Scan);
    assert_eq!(record.sync_state, SyncState::Pending);
    assert_eq!(session.records().len(), 1);
    assert_eq!(pending_ids(&session), vec!["101"]);
}

#[test]
fn test_capture_validation_order() {
    let roster = loaded_roster();
    let mut no_sheet = SessionContext::new();

    assert_eq!(
        no_sheet.capture("   ", CaptureMethod::Manual, &roster),
        Err(CaptureError::EmptyIdentifier)
    );
    assert_eq!(
        no_sheet.capture("101", CaptureMethod::Manual, &roster),
        Err(CaptureError::NoActiveSession)
    );

    let mut session = SessionContext::with_sheet("Day1");
    assert_eq!(
        session.capture("101", CaptureMethod::Scan, &RosterIndex::new()),
        Err(CaptureError::RosterNotLoaded)
    );
    assert!(session.records().is_empty());
}

#[test]
fn test_unknown_student_leaves_records_unchanged() {
    let mut roster = RosterIndex::new();
    roster.load(vec![RosterRow::new("101", "Asha")]);
    let mut session = SessionContext::with_sheet("Day1");

    let err = session.capture("999", CaptureMethod::Scan, &roster).unwrap_err();

    assert_eq!(err, CaptureError::UnknownStudent("999".into()));
    assert!(session.records().is_empty());
    assert_eq!(session.pending_len(), 0);
}

#[test]
fn test_duplicate_capture_rejected_without_mutation() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");

    session.capture("101", CaptureMethod::Scan, &roster).unwrap();
    let err = session
        .capture("101.0", CaptureMethod::Manual, &roster)
        .unwrap_err();

    assert_eq!(err, CaptureError::DuplicateCapture("101.0".into()));
    assert_eq!(session.records().len(), 1);
    assert!(is_marked(" 101 ", session.records()));
    assert!(!is_marked("102", session.records()));
}

#[test]
fn test_duplicate_after_sync_is_still_rejected() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");

    let r = session.capture("101", CaptureMethod::Scan, &roster).unwrap();
    assert!(session.mark_synced(&r.identifier, r.captured_at));

    assert_eq!(
        session.capture("101", CaptureMethod::Scan, &roster),
        Err(CaptureError::DuplicateCapture("101".into()))
    );
}

#[test]
fn test_records_keep_capture_order_and_queue_stays_consistent() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");

    let a = session.capture("101", CaptureMethod::Scan, &roster).unwrap();
    session.capture("102", CaptureMethod::Manual, &roster).unwrap();
    assert_queue_consistent(&session);

    session.mark_synced(&a.identifier, a.captured_at);
    assert_queue_consistent(&session);

    session.capture("103", CaptureMethod::Scan, &roster).unwrap();
    assert_queue_consistent(&session);

    let order: Vec<&str> = session
        .records()
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();
    assert_eq!(order, vec!["101", "102", "103"]);
    assert_eq!(pending_ids(&session), vec!["102", "103"]);
    assert_eq!(session.synced_len(), 1);
}

#[test]
fn test_mark_synced_is_monotonic() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");
    let r = session.capture("101", CaptureMethod::Scan, &roster).unwrap();

    assert!(session.mark_synced(&r.identifier, r.captured_at));
    assert!(!session.mark_synced(&r.identifier, r.captured_at));
    assert_eq!(session.records()[0].sync_state, SyncState::Synced);
    assert_eq!(session.pending_len(), 0);
}

#[test]
fn test_mark_head_synced_always_advances_the_queue() {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");
    assert!(session.mark_head_synced().is_none());

    session.capture("101", CaptureMethod::Scan, &roster).unwrap();
    session.capture("102", CaptureMethod::Scan, &roster).unwrap();

    let first = session.mark_head_synced().unwrap();
    assert_eq!(first.identifier, "101");
    assert_eq!(first.sync_state, SyncState::Synced);
    assert_eq!(pending_ids(&session), vec!["102"]);
    assert_queue_consistent(&session);

    assert_eq!(session.mark_head_synced().unwrap().identifier, "102");
    assert!(session.mark_head_synced().is_none());
    assert_eq!(session.synced_len(), 2);
}

#[test]
fn test_select_sheet_guards_pending_records() {
    let roster = loaded_roster();
    let mut session = SessionContext::new();

    assert_eq!(
        session.select_sheet("  ", false),
        Err(CaptureError::NoActiveSession)
    );

    session.select_sheet("Day1", false).unwrap();
    session.capture("101", CaptureMethod::Scan, &roster).unwrap();

    // reselecting the same sheet keeps the session
    session.select_sheet("Day1", false).unwrap();
    assert_eq!(session.records().len(), 1);

    assert_eq!(
        session.select_sheet("Day2", false),
        Err(CaptureError::PendingRecords(1))
    );
    assert_eq!(session.active_sheet(), Some("Day1"));

    session.select_sheet("Day2", true).unwrap();
    assert_eq!(session.active_sheet(), Some("Day2"));
    assert!(session.records().is_empty());

    // a new session may mark the same student again
    session.capture("101", CaptureMethod::Scan, &roster).unwrap();
}

// ---------------------------------------------------------------------------
// sync queue + reconciler
// ---------------------------------------------------------------------------

fn session_with(ids: &[&str]) -> SessionContext {
    let roster = loaded_roster();
    let mut session = SessionContext::with_sheet("Day1");
    for id in ids {
        session.capture(id, CaptureMethod::Scan, &roster).unwrap();
    }
    session
}

#[test]
fn test_drain_stops_at_first_failure() {
    let mut session = session_with(&["101", "102", "103"]);
    let remote = MockRemote::scripted(vec![Err(RemoteError::Transport("timeout".into()))]);
    let reconciler = Reconciler::new(remote, "coord-1");

    let report = SyncQueue::new().drain(&mut session, &reconciler, &NullJournal);

    assert_eq!(
        report,
        DrainReport::Halted {
            delivered: 0,
            identifier: "101".into(),
            error: RemoteError::Transport("timeout".into()),
            remaining: 3,
        }
    );
    // B and C are never attempted while A fails
    assert_eq!(reconciler.remote().pushed_ids(), vec!["101"]);
    assert_eq!(pending_ids(&session), vec!["101", "102", "103"]);
    assert_queue_consistent(&session);
}

#[test]
fn test_drain_delivers_everything_on_success() {
    let mut session = session_with(&["101", "102"]);
    let reconciler = Reconciler::new(MockRemote::new(), "coord-1");

    let report = SyncQueue::new().drain(&mut session, &reconciler, &NullJournal);

    assert_eq!(report, DrainReport::Completed { delivered: 2 });
    assert_eq!(reconciler.remote().pushed_ids(), vec!["101", "102"]);
    assert_eq!(session.pending_len(), 0);
    assert!(
        session
            .records()
            .iter()
            .all(|r| r.sync_state == SyncState::Synced)
    );
}

#[test]
fn test_rejection_midway_keeps_tail_queued() {
    let mut session = session_with(&["101", "102", "103"]);
    let remote = MockRemote::scripted(vec![
        Ok(RemoteAck::ok()),
        Ok(RemoteAck::failed("Sheet not found")),
    ]);
    let reconciler = Reconciler::new(remote, "coord-1");

    let report = SyncQueue::new().drain(&mut session, &reconciler, &NullJournal);

    assert_eq!(report.delivered(), 1);
    assert!(report.is_halted());
    assert_eq!(pending_ids(&session), vec!["102", "103"]);
    assert_eq!(session.records()[0].sync_state, SyncState::Synced);

    // next pass resumes at the failed head
    let report = SyncQueue::new().drain(&mut session, &reconciler, &NullJournal);
    assert_eq!(report, DrainReport::Completed { delivered: 2 });
    assert_eq!(
        reconciler.remote().pushed_ids(),
        vec!["101", "102", "102", "103"]
    );
}

#[test]
fn test_drain_is_idle_without_pending() {
    let mut session = session_with(&[]);
    let reconciler = Reconciler::new(MockRemote::new(), "coord-1");

    let report = SyncQueue::new().drain(&mut session, &reconciler, &NullJournal);

    assert_eq!(report, DrainReport::Idle);
    assert!(reconciler.remote().pushed_ids().is_empty());
}

#[test]
fn test_second_drain_while_one_is_live_is_dropped() {
    let mut session = session_with(&["101"]);
    let reconciler = Reconciler::new(MockRemote::new(), "coord-1");
    let queue = SyncQueue::new();

    {
        let _pass = queue.begin().expect("first pass");
        assert!(queue.is_draining());
        assert!(queue.begin().is_none());

        let report = queue.drain(&mut session, &reconciler, &NullJournal);
        assert_eq!(report, DrainReport::Busy);
        assert!(reconciler.remote().pushed_ids().is_empty());
    }

    assert!(!queue.is_draining());
    let report = queue.drain(&mut session, &reconciler, &NullJournal);
    assert_eq!(report, DrainReport::Completed { delivered: 1 });
}

#[test]
fn test_payload_matches_remote_contract() {
    let session = session_with(&["101"]);
    let reconciler = Reconciler::new(MockRemote::new(), "coord-1");

    let payload = reconciler.payload(&session.records()[0], "Day1");
    assert_eq!(payload.student_id, "101");
    assert_eq!(payload.student_name, "Asha");
    assert_eq!(payload.sheet_name, "Day1");
    assert_eq!(payload.marked_by, "coord-1");
    assert_eq!(payload.method, "scanner");

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["studentId"], "101");
    assert_eq!(json["markedBy"], "coord-1");
}

#[test]
fn test_blank_operator_defaults_to_system() {
    let reconciler = Reconciler::new(MockRemote::new(), "   ");
    assert_eq!(reconciler.marked_by(), "System");
}

#[test]
fn test_negative_ack_becomes_rejection() {
    assert_eq!(RemoteAck::ok().into_result(), Ok(()));
    assert_eq!(
        RemoteAck::failed("quota").into_result(),
        Err(RemoteError::Rejected("quota".into()))
    );

    let silent: RemoteAck = serde_json::from_str(r#"{"success": false}"#).unwrap();
    assert!(matches!(silent.into_result(), Err(RemoteError::Rejected(_))));
}

// ---------------------------------------------------------------------------
// connectivity
// ---------------------------------------------------------------------------

#[test]
fn test_connectivity_transitions() {
    let mut monitor = ConnectivityMonitor::new(false);

    assert_eq!(monitor.observe(false), Transition::Unchanged);
    assert_eq!(monitor.observe(true), Transition::CameOnline);
    assert_eq!(monitor.observe(true), Transition::Unchanged);
    assert_eq!(monitor.observe(false), Transition::WentOffline);

    assert!(ConnectivityMonitor::should_drain(Transition::CameOnline, 2));
    assert!(!ConnectivityMonitor::should_drain(Transition::CameOnline, 0));
    assert!(!ConnectivityMonitor::should_drain(Transition::Unchanged, 2));
}

#[test]
fn test_status_line() {
    let online = ConnectivityMonitor::new(true);
    let offline = ConnectivityMonitor::new(false);

    assert_eq!(online.status(0).to_string(), "Online");
    assert_eq!(online.status(2).to_string(), "Syncing (2 pending)");
    assert_eq!(offline.status(3).to_string(), "Offline (3 pending)");
}

// ---------------------------------------------------------------------------
// engine
// ---------------------------------------------------------------------------

#[test]
fn test_offline_capture_then_reconnect_syncs() {
    let (mut engine, journal) = offline_engine(MockRemote::new());

    let outcome = engine.dispatch(Command::scan("101")).unwrap();
    let Outcome::Captured { record, drain } = outcome else {
        panic!("expected a capture outcome");
    };
    assert_eq!(record.identifier, "101");
    assert_eq!(record.display_name, "Asha");
    assert_eq!(record.method, CaptureMethod::Scan);
    assert_eq!(record.sync_state, SyncState::Pending);
    assert_eq!(drain, None);
    assert!(engine.reconciler().remote().pushed_ids().is_empty());
    assert_eq!(engine.status().to_string(), "Offline (1 pending)");

    let outcome = engine.dispatch(Command::ConnectivityChanged(true)).unwrap();
    assert_eq!(
        outcome,
        Outcome::Connectivity {
            transition: Transition::CameOnline,
            status: engine.status(),
            drain: Some(DrainReport::Completed { delivered: 1 }),
        }
    );
    assert_eq!(engine.records()[0].sync_state, SyncState::Synced);
    assert_eq!(engine.session().pending_len(), 0);
    assert_eq!(engine.status().to_string(), "Online");

    assert_eq!(journal.operations(), vec!["select_sheet", "capture", "connectivity", "sync"]);
}

#[test]
fn test_online_capture_pushes_immediately() {
    let (mut engine, _journal) = engine_with(MockRemote::new(), true, true);

    let outcome = engine.dispatch(Command::manual("102")).unwrap();

    let Outcome::Captured { drain, .. } = outcome else {
        panic!("expected a capture outcome");
    };
    assert_eq!(drain, Some(DrainReport::Completed { delivered: 1 }));

    let pushes = engine.reconciler().remote().pushes.borrow().clone();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].method, "manual");
    assert_eq!(pushes[0].sheet_name, "Day1");
}

#[test]
fn test_without_auto_sync_only_explicit_drain_pushes() {
    let (mut engine, _journal) = engine_with(MockRemote::new(), true, false);

    engine.dispatch(Command::scan("101")).unwrap();
    engine.dispatch(Command::scan("102")).unwrap();
    assert!(engine.reconciler().remote().pushed_ids().is_empty());

    let outcome = engine.dispatch(Command::DrainRequested).unwrap();
    assert_eq!(
        outcome,
        Outcome::Drained(DrainReport::Completed { delivered: 2 })
    );
}

#[test]
fn test_explicit_drain_is_not_gated_by_connectivity() {
    let (mut engine, _journal) = offline_engine(MockRemote::new());
    engine.dispatch(Command::scan("101")).unwrap();

    let outcome = engine.dispatch(Command::DrainRequested).unwrap();

    assert_eq!(
        outcome,
        Outcome::Drained(DrainReport::Completed { delivered: 1 })
    );
}

#[test]
fn test_failed_push_is_retried_on_next_reconnect() {
    let remote = MockRemote::scripted(vec![Err(RemoteError::Transport("reset".into()))]);
    let (mut engine, journal) = offline_engine(remote);

    engine.dispatch(Command::scan("101")).unwrap();
    engine.dispatch(Command::scan("102")).unwrap();

    let outcome = engine.dispatch(Command::ConnectivityChanged(true)).unwrap();
    let Outcome::Connectivity { drain: Some(report), .. } = outcome else {
        panic!("expected a drain on reconnect");
    };
    assert!(report.is_halted());
    assert_eq!(engine.session().pending_len(), 2);

    // still online: another online signal is not a transition
    let outcome = engine.dispatch(Command::ConnectivityChanged(true)).unwrap();
    assert!(matches!(outcome, Outcome::Connectivity { drain: None, .. }));

    engine.dispatch(Command::ConnectivityChanged(false)).unwrap();
    engine.dispatch(Command::ConnectivityChanged(true)).unwrap();

    assert_eq!(engine.session().pending_len(), 0);
    assert_eq!(
        engine.reconciler().remote().pushed_ids(),
        vec!["101", "101", "102"]
    );
    assert!(journal.operations().contains(&"sync_transport".to_string()));
}

#[test]
fn test_reconnect_without_pending_does_not_drain() {
    let (mut engine, _journal) = offline_engine(MockRemote::new());

    let outcome = engine.dispatch(Command::ConnectivityChanged(true)).unwrap();

    assert!(matches!(outcome, Outcome::Connectivity { drain: None, .. }));
    assert!(engine.is_online());
}

#[test]
fn test_rejected_push_is_journaled_apart_from_transport() {
    let remote = MockRemote::scripted(vec![Ok(RemoteAck::failed("Sheet not found"))]);
    let (mut engine, journal) = engine_with(remote, true, true);

    let outcome = engine.dispatch(Command::scan("103")).unwrap();
    let Outcome::Captured { drain: Some(report), .. } = outcome else {
        panic!("expected an immediate drain");
    };
    assert!(report.is_halted());

    let entries = journal.entries.borrow();
    let (op, target, message) = entries.last().unwrap();
    assert_eq!(op, "sync_rejected");
    assert_eq!(target, "103");
    assert!(message.contains("Sheet not found"));
}

#[test]
fn test_capture_errors_surface_from_dispatch() {
    let (mut engine, journal) = offline_engine(MockRemote::new());

    engine.dispatch(Command::scan("101")).unwrap();

    assert_eq!(
        engine.dispatch(Command::scan("101")),
        Err(CaptureError::DuplicateCapture("101".into()))
    );
    assert_eq!(
        engine.dispatch(Command::manual("")),
        Err(CaptureError::EmptyIdentifier)
    );
    assert_eq!(
        engine.dispatch(Command::scan("999")),
        Err(CaptureError::UnknownStudent("999".into()))
    );
    assert_eq!(engine.records().len(), 1);
    assert_eq!(
        journal
            .operations()
            .iter()
            .filter(|op| *op == "capture")
            .count(),
        1
    );
}

#[test]
fn test_engine_sheet_switch_and_reset() {
    let (mut engine, _journal) = offline_engine(MockRemote::new());
    engine.dispatch(Command::scan("101")).unwrap();

    assert_eq!(
        engine.select_sheet("Day2", false),
        Err(CaptureError::PendingRecords(1))
    );

    engine.reset();
    assert!(engine.records().is_empty());
    assert_eq!(engine.session().active_sheet(), Some("Day1"));

    engine.select_sheet("Day2", false).unwrap();
    assert_eq!(engine.roster().len(), 3);
}
