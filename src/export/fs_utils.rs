// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, Write};
use std::path::Path;

/// What to do when the export target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Prompt on stdin.
    Ask,
    Force,
    /// Fail without prompting (stdin is busy, e.g. inside the capture loop).
    Refuse,
}

impl Overwrite {
    pub fn from_force(force: bool) -> Self {
        if force { Overwrite::Force } else { Overwrite::Ask }
    }
}

/// Check whether a file may be created or overwritten.
pub fn ensure_writable(path: &Path, mode: Overwrite) -> AppResult<()> {
    if !path.exists() || mode == Overwrite::Force {
        return Ok(());
    }

    if mode == Overwrite::Refuse {
        return Err(AppError::Export(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "Export cancelled: existing file not overwritten".into(),
        ))
    }
}
