use crate::errors::{AppError, AppResult};
use crate::export::model::{get_headers, record_to_row, records_to_export};
use crate::export::notify_export_success;
use crate::models::AttendanceRecord;
use crate::ui::messages::info;
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::path::Path;

/// Render the records as a CSV table, in stored order, every field quoted.
///
/// Read-only: never touches sync state.
pub fn export_csv(records: &[AttendanceRecord]) -> AppResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    wtr.write_record(get_headers())?;

    for item in records_to_export(records) {
        wtr.write_record(record_to_row(&item))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;

    String::from_utf8(bytes).map_err(|e| AppError::Export(format!("CSV encoding error: {e}")))
}

pub(crate) fn write_csv(records: &[AttendanceRecord], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    fs::write(path, export_csv(records)?)?;

    notify_export_success("CSV", path);
    Ok(())
}

/// Dump raw sheet rows (as returned by the remote store) to a CSV file.
pub fn write_sheet_csv(rows: &[Vec<String>], path: &Path) -> AppResult<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_path(path)?;

    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    notify_export_success("Sheet CSV", path);
    Ok(())
}
