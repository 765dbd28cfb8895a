use crate::core::Journal;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Journal that appends core events to the `log` table.
pub struct DbJournal {
    conn: Connection,
}

impl DbJournal {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Journal for DbJournal {
    fn record(&self, operation: &str, target: &str, message: &str) {
        // Non-blocking: a broken log table must not stop attendance capture.
        if let Err(e) = ttlog(&self.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {}", e));
        }
    }
}
