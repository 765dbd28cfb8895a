//! Remote sheet store boundary.
//!
//! The backend is a web-hook style spreadsheet script: one POST appends an
//! attendance row, a few GET/POST actions manage the sheets themselves.

mod http;

pub use http::HttpRemote;

use crate::errors::RemoteError;
use serde::{Deserialize, Serialize};

/// Body of the append-attendance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayload {
    pub student_id: String,
    pub student_name: String,
    pub sheet_name: String,
    pub marked_by: String,
    pub method: String,
}

/// `{success, error?}` acknowledgment returned by every write action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl RemoteAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(reason: &str) -> Self {
        Self {
            success: false,
            error: Some(reason.to_string()),
        }
    }

    /// Turn a negative acknowledgment into `RemoteError::Rejected`.
    pub fn into_result(self) -> Result<(), RemoteError> {
        if self.success {
            Ok(())
        } else {
            Err(RemoteError::Rejected(
                self.error
                    .unwrap_or_else(|| "no error message from remote store".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SheetInfo {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

pub trait RemoteStore {
    /// One remote write. `Err` only for transport problems; a negative
    /// acknowledgment comes back as `Ok(RemoteAck { success: false, .. })`.
    fn append_attendance(&self, payload: &AttendancePayload) -> Result<RemoteAck, RemoteError>;

    fn list_sheets(&self) -> Result<Vec<SheetInfo>, RemoteError>;

    /// Sheet contents as rows of cells, header row included.
    fn sheet_data(&self, sheet: &str) -> Result<Vec<Vec<String>>, RemoteError>;

    fn create_sheet(&self, sheet: &str) -> Result<(), RemoteError>;

    fn delete_sheet(&self, sheet: &str) -> Result<(), RemoteError>;

    fn set_visibility(&self, sheet: &str, visible: bool) -> Result<(), RemoteError>;
}

/// Host-side reachability check feeding the connectivity monitor.
pub trait ConnectivityProbe {
    fn is_reachable(&self) -> bool;
}
