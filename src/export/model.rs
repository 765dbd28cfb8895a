// src/export/model.rs

use crate::models::AttendanceRecord;
use serde::Serialize;

/// Flat row for attendance exports, in the fixed column order.
#[derive(Serialize, Clone, Debug)]
pub struct RecordExport {
    pub identifier: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub time: String,
    pub method: String,
    #[serde(rename = "syncState")]
    pub sync_state: String,
}

impl From<&AttendanceRecord> for RecordExport {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            identifier: r.identifier.clone(),
            display_name: r.display_name.clone(),
            time: r.time_str(),
            method: r.method.as_str().to_string(),
            sync_state: r.sync_state.as_str().to_string(),
        }
    }
}

/// Header shared by CSV / XLSX.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["identifier", "displayName", "time", "method", "syncState"]
}

pub(crate) fn record_to_row(e: &RecordExport) -> Vec<String> {
    vec![
        e.identifier.clone(),
        e.display_name.clone(),
        e.time.clone(),
        e.method.clone(),
        e.sync_state.clone(),
    ]
}

pub(crate) fn records_to_export(records: &[AttendanceRecord]) -> Vec<RecordExport> {
    records.iter().map(RecordExport::from).collect()
}
