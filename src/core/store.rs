//! Record lifecycle store.
//!
//! `SessionContext` owns the attendance records of the active session and
//! the queue of records still waiting for a remote acknowledgment. The queue
//! holds positions into `records`, so a record's state lives in one place
//! and the queue is always the pending subsequence of `records`.

use super::dedup::is_marked;
use super::roster::RosterIndex;
use crate::errors::CaptureError;
use crate::models::{AttendanceRecord, CaptureMethod, SyncState};
use chrono::{DateTime, Local};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct SessionContext {
    active_sheet: Option<String>,
    records: Vec<AttendanceRecord>,
    queue: VecDeque<usize>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet: &str) -> Self {
        Self {
            active_sheet: Some(sheet.to_string()),
            ..Self::default()
        }
    }

    pub fn active_sheet(&self) -> Option<&str> {
        self.active_sheet.as_deref()
    }

    /// Select the sheet attendance is recorded against.
    ///
    /// Switching to another sheet starts a new session. While records are
    /// still pending this fails unless `discard_pending` is set, so nothing
    /// is dropped silently.
    pub fn select_sheet(&mut self, name: &str, discard_pending: bool) -> Result<(), CaptureError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CaptureError::NoActiveSession);
        }

        if self.active_sheet.as_deref() == Some(name) {
            return Ok(());
        }

        if !self.queue.is_empty() && !discard_pending {
            return Err(CaptureError::PendingRecords(self.queue.len()));
        }

        self.reset();
        self.active_sheet = Some(name.to_string());
        Ok(())
    }

    /// Validate and append a new pending record.
    ///
    /// Only successful captures mutate the session.
    pub fn capture(
        &mut self,
        identifier: &str,
        method: CaptureMethod,
        roster: &RosterIndex,
    ) -> Result<AttendanceRecord, CaptureError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(CaptureError::EmptyIdentifier);
        }

        if self.active_sheet.is_none() {
            return Err(CaptureError::NoActiveSession);
        }

        if is_marked(identifier, &self.records) {
            return Err(CaptureError::DuplicateCapture(identifier.to_string()));
        }

        let student = roster.lookup(identifier)?;
        let record = AttendanceRecord::pending(student, method);

        self.records.push(record.clone());
        self.queue.push_back(self.records.len() - 1);

        Ok(record)
    }

    /// Flip the record matching both fields to `Synced` and drop it from the
    /// queue. Returns false if there was no pending record to flip.
    pub fn mark_synced(&mut self, identifier: &str, captured_at: DateTime<Local>) -> bool {
        let Some(idx) = self
            .records
            .iter()
            .position(|r| r.identifier == identifier && r.captured_at == captured_at)
        else {
            return false;
        };

        if self.records[idx].sync_state.is_synced() {
            return false;
        }

        self.records[idx].sync_state = SyncState::Synced;
        self.queue.retain(|&i| i != idx);
        true
    }

    /// Flip the queue head to `Synced` and pop it. Always advances the queue.
    pub fn mark_head_synced(&mut self) -> Option<&AttendanceRecord> {
        let idx = self.queue.pop_front()?;
        let record = &mut self.records[idx];
        record.sync_state = SyncState::Synced;
        Some(&*record)
    }

    /// Drop every record and the queue. The active sheet is kept.
    pub fn reset(&mut self) {
        self.records.clear();
        self.queue.clear();
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Oldest record still waiting for delivery.
    pub fn head(&self) -> Option<&AttendanceRecord> {
        self.queue.front().map(|&i| &self.records[i])
    }

    pub fn pending(&self) -> impl Iterator<Item = &AttendanceRecord> {
        self.queue.iter().map(|&i| &self.records[i])
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn synced_len(&self) -> usize {
        self.records.len() - self.queue.len()
    }
}
