// src/export/logic.rs

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::csv::write_csv;
use crate::export::fs_utils::{Overwrite, ensure_writable};
use crate::export::json::write_json;
use crate::export::xlsx::write_xlsx;
use crate::models::AttendanceRecord;
use crate::ui::messages::warning;
use chrono::Local;
use std::path::{Path, PathBuf};

/// High-level export of the session records.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `records` to `path` in `format`. Records are never modified.
    pub fn export(
        records: &[AttendanceRecord],
        format: ExportFormat,
        path: &Path,
        overwrite: Overwrite,
    ) -> AppResult<()> {
        ensure_writable(path, overwrite)?;

        if records.is_empty() {
            warning("No attendance records yet; writing the header only.");
        }

        match format {
            ExportFormat::Csv => write_csv(records, path),
            ExportFormat::Json => write_json(records, path),
            ExportFormat::Xlsx => write_xlsx(records, path),
        }
    }

    /// `attendance_<sheet>_<YYYY-MM-DD>.<ext>`, `session` when no sheet is set.
    pub fn default_file_name(sheet: Option<&str>, format: ExportFormat) -> PathBuf {
        let label: String = sheet
            .unwrap_or("session")
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        PathBuf::from(format!(
            "attendance_{}_{}.{}",
            label,
            Local::now().format("%Y-%m-%d"),
            format.as_str()
        ))
    }
}
