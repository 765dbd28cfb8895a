//! Key-value persistence of the logged-in identity.
//!
//! Only the identity survives between runs (operator, role, selected sheet).
//! Captured records live in memory for the duration of one capture session.

use crate::errors::{AppError, AppResult};
use chrono::Local;
use clap::ValueEnum;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// Fixed key under which the session identity is stored.
pub const SESSION_KEY: &str = "rollcall.session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coordinator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coordinator => "coordinator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub operator: String,
    pub role: Role,
    #[serde(default)]
    pub active_sheet: Option<String>,
}

pub fn kv_get(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM session_kv WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO session_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn kv_delete(conn: &Connection, key: &str) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM session_kv WHERE key = ?1", [key])?;
    Ok(n > 0)
}

pub fn load_identity(conn: &Connection) -> AppResult<Option<SessionIdentity>> {
    match kv_get(conn, SESSION_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AppError::Other(format!("Corrupt session entry: {e}"))),
        None => Ok(None),
    }
}

pub fn save_identity(conn: &Connection, identity: &SessionIdentity) -> AppResult<()> {
    let raw = serde_json::to_string(identity)?;
    kv_set(conn, SESSION_KEY, &raw)
}

pub fn clear_identity(conn: &Connection) -> AppResult<bool> {
    kv_delete(conn, SESSION_KEY)
}
