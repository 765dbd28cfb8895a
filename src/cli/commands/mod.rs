pub mod capture;
pub mod config;
pub mod init;
pub mod log;
pub mod roster;
pub mod session;
pub mod sheets;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::remote::HttpRemote;
use crate::ui::messages::warning;
use std::io::{self, Write};

/// Remote client for commands that cannot work without one.
pub(crate) fn require_remote(cfg: &Config) -> AppResult<HttpRemote> {
    if cfg.remote_url.trim().is_empty() {
        return Err(AppError::Config(
            "remote_url is not set (edit the config or pass --remote)".into(),
        ));
    }
    Ok(HttpRemote::new(&cfg.remote_url, cfg.request_timeout_secs)?)
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
