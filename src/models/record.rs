use super::{capture_method::CaptureMethod, student::Student, sync_state::SyncState};
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub identifier: String,
    pub display_name: String,
    pub captured_at: DateTime<Local>,
    pub method: CaptureMethod,
    pub sync_state: SyncState,
}

impl AttendanceRecord {
    /// Fresh record for a roster hit, stamped now and not yet delivered.
    pub fn pending(student: &Student, method: CaptureMethod) -> Self {
        Self::pending_at(student, method, Local::now())
    }

    pub fn pending_at(student: &Student, method: CaptureMethod, at: DateTime<Local>) -> Self {
        Self {
            identifier: student.identifier.clone(),
            display_name: student.display_name.clone(),
            captured_at: at,
            method,
            sync_state: SyncState::Pending,
        }
    }

    pub fn time_str(&self) -> String {
        self.captured_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Short clock time for the live attendance list.
    pub fn clock_str(&self) -> String {
        self.captured_at.format("%H:%M:%S").to_string()
    }

    pub fn is_pending(&self) -> bool {
        self.sync_state.is_pending()
    }
}
