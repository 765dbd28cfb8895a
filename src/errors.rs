//! Unified application error types.
//! Capture validation failures and remote failures have their own enums so
//! the core can match on them; everything else funnels into AppError.

use std::io;
use thiserror::Error;

/// Local validation failures raised by the capture path.
/// Never retried: the operator has to fix the condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Please enter an identifier")]
    EmptyIdentifier,

    #[error("No active sheet selected")]
    NoActiveSession,

    #[error("Roster not loaded, upload a roster file first")]
    RosterNotLoaded,

    #[error("Student {0} not found in roster")]
    UnknownStudent(String),

    #[error("Student {0} already marked present")]
    DuplicateCapture(String),

    #[error("{0} record(s) still pending sync")]
    PendingRecords(usize),
}

/// Failures while talking to the remote sheet store.
/// Both kinds are retryable; they are kept apart for diagnosis.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rejected by remote store: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Journal operation name for this failure kind.
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteError::Transport(_) => "sync_transport",
            RemoteError::Rejected(_) => "sync_rejected",
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Capture / sync
    // ---------------------------
    #[error("{0}")]
    Capture(#[from] CaptureError),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Roster import / export
    // ---------------------------
    #[error("Roster import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {e}"))
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Other(format!("CSV error: {e}"))
    }
}

pub type AppResult<T> = Result<T, AppError>;
