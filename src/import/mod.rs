//! Roster import from spreadsheet exports.
//!
//! Accepts CSV (header row required), JSON (array of objects) or an Excel
//! workbook (first worksheet, header row required). Column names are
//! matched case-insensitively against a few common aliases.

use crate::core::{RawIdentifier, RosterRow};
use crate::errors::{AppError, AppResult};
use calamine::{Data, Reader, open_workbook_auto};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

const ID_COLUMNS: &[&str] = &["identifier", "enrollment", "id", "student_id", "studentid"];
const NAME_COLUMNS: &[&str] = &["displayname", "display_name", "name", "student_name", "studentname"];

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
}

pub fn load_roster_file(path: &Path) -> AppResult<Vec<RosterRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => parse_roster_csv(fs::File::open(path)?),
        "json" => parse_roster_json(&fs::read_to_string(path)?),
        "xlsx" | "xls" => parse_roster_xlsx(path),
        other => Err(AppError::Import(format!(
            "Unsupported roster format '{}' ({}). Use .csv, .json or .xlsx",
            other,
            path.display()
        ))),
    }
}

pub fn parse_roster_csv<R: Read>(reader: R) -> AppResult<Vec<RosterRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| AppError::Import(format!("Cannot read header row: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let id_col = find_column(&headers, ID_COLUMNS).ok_or_else(|| {
        AppError::Import(format!("Missing identifier column (one of: {})", ID_COLUMNS.join(", ")))
    })?;
    let name_col = find_column(&headers, NAME_COLUMNS).ok_or_else(|| {
        AppError::Import(format!("Missing name column (one of: {})", NAME_COLUMNS.join(", ")))
    })?;

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| AppError::Import(format!("Row {}: {}", line + 2, e)))?;

        let id = record.get(id_col).unwrap_or_default();
        let name = record.get(name_col).unwrap_or_default();

        rows.push(RosterRow::new(id, name));
    }

    Ok(rows)
}

/// Read the first worksheet of a workbook. Numeric id cells keep their
/// number type so `101.0` normalizes like any other spreadsheet id.
pub fn parse_roster_xlsx(path: &Path) -> AppResult<Vec<RosterRow>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::Import(format!("Cannot open {}: {e}", path.display())))?;

    let Some(first) = workbook.sheet_names().first().cloned() else {
        return Err(AppError::Import(format!("{} has no worksheets", path.display())));
    };
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| AppError::Import(format!("Cannot read sheet '{first}': {e}")))?;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .ok_or_else(|| AppError::Import(format!("Sheet '{first}' is empty")))?
        .iter()
        .map(|c| c.to_string())
        .collect();

    let id_col = find_column(&headers, ID_COLUMNS).ok_or_else(|| {
        AppError::Import(format!("Missing identifier column (one of: {})", ID_COLUMNS.join(", ")))
    })?;
    let name_col = find_column(&headers, NAME_COLUMNS).ok_or_else(|| {
        AppError::Import(format!("Missing name column (one of: {})", NAME_COLUMNS.join(", ")))
    })?;

    let mut rows = Vec::new();
    for row in cells {
        let identifier = match row.get(id_col) {
            Some(Data::Int(n)) => RawIdentifier::Integer(*n),
            Some(Data::Float(x)) => RawIdentifier::Float(*x),
            Some(Data::String(s)) => RawIdentifier::Text(s.clone()),
            Some(Data::Empty) | None => continue,
            Some(other) => RawIdentifier::Text(other.to_string()),
        };
        let display_name = row
            .get(name_col)
            .map(|c| c.to_string().trim().to_string())
            .unwrap_or_default();

        rows.push(RosterRow {
            identifier,
            display_name,
        });
    }

    Ok(rows)
}

pub fn parse_roster_json(content: &str) -> AppResult<Vec<RosterRow>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| AppError::Import(format!("Invalid JSON roster: {e}")))?;

    let Value::Array(items) = value else {
        return Err(AppError::Import("JSON roster must be an array of objects".into()));
    };

    let mut rows = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let Value::Object(map) = item else {
            return Err(AppError::Import(format!("Entry {} is not an object", i + 1)));
        };

        let pick = |aliases: &[&str]| {
            map.iter()
                .find(|(k, _)| aliases.contains(&k.trim().to_lowercase().as_str()))
                .map(|(_, v)| v.clone())
        };

        let identifier = match pick(ID_COLUMNS) {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => RawIdentifier::Integer(i),
                None => RawIdentifier::Float(n.as_f64().unwrap_or_default()),
            },
            Some(Value::String(s)) => RawIdentifier::Text(s),
            _ => continue,
        };

        let display_name = match pick(NAME_COLUMNS) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        rows.push(RosterRow {
            identifier,
            display_name,
        });
    }

    Ok(rows)
}
