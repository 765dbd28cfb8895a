//! Sync queue drain and the reconciler that talks to the remote store.
//!
//! A drain pass delivers pending records strictly in capture order, one push
//! at a time, and stops at the first failure. The failed head and everything
//! behind it stay queued for the next pass.

use super::journal::Journal;
use super::store::SessionContext;
use crate::errors::RemoteError;
use crate::models::AttendanceRecord;
use crate::remote::{AttendancePayload, RemoteStore};
use std::cell::Cell;

/// Operator recorded in `markedBy` when nobody is logged in.
pub const DEFAULT_MARKED_BY: &str = "System";

pub struct Reconciler<R> {
    remote: R,
    marked_by: String,
}

impl<R: RemoteStore> Reconciler<R> {
    pub fn new(remote: R, marked_by: &str) -> Self {
        let marked_by = if marked_by.trim().is_empty() {
            DEFAULT_MARKED_BY
        } else {
            marked_by.trim()
        };

        Self {
            remote,
            marked_by: marked_by.to_string(),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn marked_by(&self) -> &str {
        &self.marked_by
    }

    pub fn payload(&self, record: &AttendanceRecord, sheet: &str) -> AttendancePayload {
        AttendancePayload {
            student_id: record.identifier.clone(),
            student_name: record.display_name.clone(),
            sheet_name: sheet.to_string(),
            marked_by: self.marked_by.clone(),
            method: record.method.to_wire_str().to_string(),
        }
    }

    /// Deliver one record. `Ok` only on an explicit positive acknowledgment.
    pub fn push(&self, record: &AttendanceRecord, sheet: &str) -> Result<(), RemoteError> {
        let payload = self.payload(record, sheet);
        self.remote.append_attendance(&payload)?.into_result()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrainReport {
    /// Nothing was pending.
    Idle,
    /// Another pass is still running; this trigger was dropped.
    Busy,
    Completed {
        delivered: usize,
    },
    Halted {
        delivered: usize,
        identifier: String,
        error: RemoteError,
        remaining: usize,
    },
}

impl DrainReport {
    pub fn delivered(&self) -> usize {
        match self {
            DrainReport::Completed { delivered } | DrainReport::Halted { delivered, .. } => {
                *delivered
            }
            DrainReport::Idle | DrainReport::Busy => 0,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, DrainReport::Halted { .. })
    }
}

/// Serializes drain passes behind an in-progress flag.
#[derive(Debug, Default)]
pub struct SyncQueue {
    in_progress: Cell<bool>,
}

/// Live drain pass; clears the in-progress flag when dropped.
pub struct DrainPass<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for DrainPass<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl SyncQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to drain. `None` while another pass is live.
    pub fn begin(&self) -> Option<DrainPass<'_>> {
        if self.in_progress.replace(true) {
            return None;
        }
        Some(DrainPass {
            flag: &self.in_progress,
        })
    }

    pub fn is_draining(&self) -> bool {
        self.in_progress.get()
    }

    pub fn drain<R: RemoteStore>(
        &self,
        session: &mut SessionContext,
        reconciler: &Reconciler<R>,
        journal: &dyn Journal,
    ) -> DrainReport {
        let Some(_pass) = self.begin() else {
            return DrainReport::Busy;
        };

        if session.pending_len() == 0 {
            return DrainReport::Idle;
        }

        let sheet = session.active_sheet().unwrap_or_default().to_string();
        let mut delivered = 0;

        while let Some(head) = session.head().cloned() {
            match reconciler.push(&head, &sheet) {
                Ok(()) => {
                    session.mark_head_synced();
                    delivered += 1;
                    journal.record(
                        "sync",
                        &head.identifier,
                        &format!("{} delivered to sheet {}", head.display_name, sheet),
                    );
                }
                Err(error) => {
                    journal.record(error.operation(), &head.identifier, &error.to_string());
                    return DrainReport::Halted {
                        delivered,
                        identifier: head.identifier,
                        error,
                        remaining: session.pending_len(),
                    };
                }
            }
        }

        DrainReport::Completed { delivered }
    }
}
