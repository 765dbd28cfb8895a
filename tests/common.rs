#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rollcall::core::{Engine, EngineOptions, Journal, Reconciler, RosterRow};
use rollcall::errors::RemoteError;
use rollcall::remote::{AttendancePayload, ConnectivityProbe, RemoteAck, RemoteStore, SheetInfo};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub fn rc() -> Command {
    cargo_bin_cmd!("rollcall")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write a small CSV roster (101 Asha, 102 Ravi, 103 Meera) and return its path
pub fn write_roster(name: &str) -> String {
    let path = temp_out(&format!("{}_roster", name), "csv");
    fs::write(&path, "Enrollment,Name\n101,Asha\n102,Ravi\n103,Meera\n").expect("write roster");
    path
}

/// Init the DB in test mode (no config file written)
pub fn init_db(db_path: &str) {
    rc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

pub fn roster_rows() -> Vec<RosterRow> {
    vec![
        RosterRow::new("101", "Asha"),
        RosterRow::new("102", "Ravi"),
        RosterRow::new("103", "Meera"),
    ]
}

/// Remote store double: pops scripted answers for each push (default: ok).
#[derive(Default)]
pub struct MockRemote {
    pub script: RefCell<VecDeque<Result<RemoteAck, RemoteError>>>,
    pub pushes: RefCell<Vec<AttendancePayload>>,
    pub reachable: Cell<bool>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(answers: Vec<Result<RemoteAck, RemoteError>>) -> Self {
        Self {
            script: RefCell::new(answers.into()),
            ..Self::default()
        }
    }

    pub fn then(&self, answer: Result<RemoteAck, RemoteError>) {
        self.script.borrow_mut().push_back(answer);
    }

    pub fn pushed_ids(&self) -> Vec<String> {
        self.pushes
            .borrow()
            .iter()
            .map(|p| p.student_id.clone())
            .collect()
    }
}

impl RemoteStore for MockRemote {
    fn append_attendance(&self, payload: &AttendancePayload) -> Result<RemoteAck, RemoteError> {
        self.pushes.borrow_mut().push(payload.clone());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(RemoteAck::ok()))
    }

    fn list_sheets(&self) -> Result<Vec<SheetInfo>, RemoteError> {
        Ok(Vec::new())
    }

    fn sheet_data(&self, _sheet: &str) -> Result<Vec<Vec<String>>, RemoteError> {
        Ok(Vec::new())
    }

    fn create_sheet(&self, _sheet: &str) -> Result<(), RemoteError> {
        Ok(())
    }

    fn delete_sheet(&self, _sheet: &str) -> Result<(), RemoteError> {
        Ok(())
    }

    fn set_visibility(&self, _sheet: &str, _visible: bool) -> Result<(), RemoteError> {
        Ok(())
    }
}

impl ConnectivityProbe for MockRemote {
    fn is_reachable(&self) -> bool {
        self.reachable.get()
    }
}

/// Journal that keeps (operation, target, message) rows in memory.
#[derive(Clone, Default)]
pub struct MemoryJournal {
    pub entries: Rc<RefCell<Vec<(String, String, String)>>>,
}

impl MemoryJournal {
    pub fn operations(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(op, _, _)| op.clone())
            .collect()
    }
}

impl Journal for MemoryJournal {
    fn record(&self, operation: &str, target: &str, message: &str) {
        self.entries.borrow_mut().push((
            operation.to_string(),
            target.to_string(),
            message.to_string(),
        ));
    }
}

/// Engine with the default roster, sheet "Day1" selected, offline.
pub fn offline_engine(remote: MockRemote) -> (Engine<MockRemote>, MemoryJournal) {
    engine_with(remote, false, true)
}

pub fn engine_with(
    remote: MockRemote,
    online: bool,
    auto_sync: bool,
) -> (Engine<MockRemote>, MemoryJournal) {
    let journal = MemoryJournal::default();
    let mut engine = Engine::new(
        Reconciler::new(remote, "coord-1"),
        Box::new(journal.clone()),
        EngineOptions { online, auto_sync },
    );
    engine.load_roster(roster_rows());
    engine.select_sheet("Day1", false).expect("select sheet");
    (engine, journal)
}
