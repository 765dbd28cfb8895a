use crate::core::ConnectivityStatus;
use std::fmt;
use std::io::{self, Write};

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";
const FG_CYAN: &str = "\x1b[36m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_ONLINE: &str = "📶";
const ICON_OFFLINE: &str = "📴";
const ICON_SYNC: &str = "🔄";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}=== {} ==={}", FG_BLUE, BOLD, msg, RESET);
}

/// Connection indicator, e.g. `📴 Offline (3 pending)`.
pub fn status(st: &ConnectivityStatus) {
    let (icon, color) = match (st.online, st.pending) {
        (true, 0) => (ICON_ONLINE, FG_GREEN),
        (true, _) => (ICON_SYNC, FG_CYAN),
        (false, _) => (ICON_OFFLINE, FG_YELLOW),
    };
    println!("{}{} {}{}", color, icon, st, RESET);
}

/// Input prompt for the capture loop (no trailing newline).
pub fn prompt(label: &str) {
    print!("{}{}>{} ", BOLD, label, RESET);
    io::stdout().flush().ok();
}
