/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Sync state cell: green when synced, yellow while pending.
pub fn colorize_sync_state(state: &str) -> String {
    match state {
        "synced" => format!("{GREEN}{state}{RESET}"),
        "pending" => format!("{YELLOW}{state}{RESET}"),
        _ => state.to_string(),
    }
}

/// Visible / hidden flag for sheet listings.
pub fn colorize_visibility(visible: bool) -> String {
    if visible {
        format!("{GREEN}yes{RESET}")
    } else {
        format!("{GREY}no{RESET}")
    }
}

static ANSI_ESCAPE: std::sync::LazyLock<regex::Regex> =
    std::sync::LazyLock::new(|| regex::Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));

pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}
