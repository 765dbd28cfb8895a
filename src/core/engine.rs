//! Command dispatch into the capture-and-reconciliation core.
//!
//! The host (CLI loop, tests) turns input events into [`Command`]s and reacts
//! to the returned [`Outcome`]. All state is owned here; nothing is global.

use super::connectivity::{ConnectivityMonitor, ConnectivityStatus, Transition};
use super::journal::Journal;
use super::roster::{RosterIndex, RosterRow};
use super::store::SessionContext;
use super::sync::{DrainReport, Reconciler, SyncQueue};
use crate::errors::CaptureError;
use crate::models::{AttendanceRecord, CaptureMethod};
use crate::remote::RemoteStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capture { raw: String, method: CaptureMethod },
    ConnectivityChanged(bool),
    DrainRequested,
}

impl Command {
    pub fn scan(raw: &str) -> Self {
        Command::Capture {
            raw: raw.to_string(),
            method: CaptureMethod::Scan,
        }
    }

    pub fn manual(raw: &str) -> Self {
        Command::Capture {
            raw: raw.to_string(),
            method: CaptureMethod::Manual,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Captured {
        record: AttendanceRecord,
        drain: Option<DrainReport>,
    },
    Connectivity {
        transition: Transition,
        status: ConnectivityStatus,
        drain: Option<DrainReport>,
    },
    Drained(DrainReport),
}

pub struct EngineOptions {
    pub online: bool,
    /// Push right after a capture when online.
    pub auto_sync: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            online: false,
            auto_sync: true,
        }
    }
}

pub struct Engine<R> {
    session: SessionContext,
    roster: RosterIndex,
    monitor: ConnectivityMonitor,
    queue: SyncQueue,
    reconciler: Reconciler<R>,
    journal: Box<dyn Journal>,
    auto_sync: bool,
}

impl<R: RemoteStore> Engine<R> {
    pub fn new(reconciler: Reconciler<R>, journal: Box<dyn Journal>, opts: EngineOptions) -> Self {
        Self {
            session: SessionContext::new(),
            roster: RosterIndex::new(),
            monitor: ConnectivityMonitor::new(opts.online),
            queue: SyncQueue::new(),
            reconciler,
            journal,
            auto_sync: opts.auto_sync,
        }
    }

    pub fn dispatch(&mut self, cmd: Command) -> Result<Outcome, CaptureError> {
        match cmd {
            Command::Capture { raw, method } => self.capture(&raw, method),
            Command::ConnectivityChanged(online) => Ok(self.connectivity_changed(online)),
            Command::DrainRequested => Ok(Outcome::Drained(self.drain())),
        }
    }

    fn capture(&mut self, raw: &str, method: CaptureMethod) -> Result<Outcome, CaptureError> {
        let record = self.session.capture(raw, method, &self.roster)?;

        self.journal.record(
            "capture",
            &record.identifier,
            &format!(
                "{} marked via {} on sheet {}",
                record.display_name,
                method.as_str(),
                self.session.active_sheet().unwrap_or_default()
            ),
        );

        let drain = if self.monitor.is_online() && self.auto_sync {
            Some(self.drain())
        } else {
            None
        };

        Ok(Outcome::Captured { record, drain })
    }

    fn connectivity_changed(&mut self, online: bool) -> Outcome {
        let transition = self.monitor.observe(online);

        if transition != Transition::Unchanged {
            self.journal.record(
                "connectivity",
                if online { "online" } else { "offline" },
                &format!("{} pending", self.session.pending_len()),
            );
        }

        let drain = if ConnectivityMonitor::should_drain(transition, self.session.pending_len()) {
            Some(self.drain())
        } else {
            None
        };

        Outcome::Connectivity {
            transition,
            status: self.status(),
            drain,
        }
    }

    fn drain(&mut self) -> DrainReport {
        self.queue
            .drain(&mut self.session, &self.reconciler, self.journal.as_ref())
    }

    /// Replace the roster; returns how many students were loaded.
    pub fn load_roster(&mut self, rows: Vec<RosterRow>) -> usize {
        self.roster.load(rows)
    }

    pub fn select_sheet(&mut self, name: &str, discard_pending: bool) -> Result<(), CaptureError> {
        self.session.select_sheet(name, discard_pending)?;
        self.journal
            .record("select_sheet", name.trim(), "Active sheet selected");
        Ok(())
    }

    /// Discard the session records (explicit session change).
    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn status(&self) -> ConnectivityStatus {
        self.monitor.status(self.session.pending_len())
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        self.session.records()
    }

    pub fn roster(&self) -> &RosterIndex {
        &self.roster
    }

    pub fn reconciler(&self) -> &Reconciler<R> {
        &self.reconciler
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }
}
