//! Path utilities: expand `~`, resolve relative paths against the cwd.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Expand `~` and make the path absolute relative to the current directory.
pub fn resolve(path: &str) -> PathBuf {
    let p = expand_tilde(path.trim());
    if p.is_absolute() {
        return p;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&p))
        .unwrap_or(p)
}
