use super::roster::normalize_identifier;
use crate::models::AttendanceRecord;

/// True when `identifier` already has a record in this session.
///
/// Plain scan over the records: sessions hold at most a few thousand entries.
pub fn is_marked(identifier: &str, records: &[AttendanceRecord]) -> bool {
    let key = normalize_identifier(identifier);
    records.iter().any(|r| r.identifier == key)
}
