use super::{ask_confirmation, require_remote};
use crate::cli::parser::{Commands, SheetAction};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::session;
use crate::errors::{AppError, AppResult};
use crate::export::{Overwrite, ensure_writable, write_sheet_csv};
use crate::remote::RemoteStore;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_visibility;
use crate::utils::path::resolve;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Sheets { action } = cmd else {
        return Ok(());
    };

    match action {
        SheetAction::List => list(cfg),
        SheetAction::Create { name } => create(cfg, name),
        SheetAction::Delete { name, force } => delete(cfg, name, *force),
        SheetAction::Toggle { name } => toggle(cfg, name),
        SheetAction::Select { name } => select(cfg, name),
        SheetAction::Download { name, file, force } => download(cfg, name, file, *force),
    }
}

fn non_empty(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("sheet name cannot be empty".into()));
    }
    Ok(name)
}

fn list(cfg: &Config) -> AppResult<()> {
    let remote = require_remote(cfg)?;
    let sheets = remote.list_sheets()?;

    if sheets.is_empty() {
        warning("No sheets found in the spreadsheet.");
        return Ok(());
    }

    let mut table = Table::new(&["name", "visible"]);
    for s in &sheets {
        table.add_row(vec![s.name.clone(), colorize_visibility(s.visible)]);
    }
    print!("{}", table.render());
    Ok(())
}

fn create(cfg: &Config, name: &str) -> AppResult<()> {
    let name = non_empty(name)?;
    let remote = require_remote(cfg)?;
    remote.create_sheet(name)?;

    let pool = DbPool::new(&cfg.database)?;
    ttlog(&pool.conn, "sheet_create", name, "Sheet created")?;
    success(format!("Sheet \"{}\" created successfully", name));
    Ok(())
}

fn delete(cfg: &Config, name: &str, force: bool) -> AppResult<()> {
    let name = non_empty(name)?;

    if !force
        && !ask_confirmation(&format!(
            "Are you sure you want to delete \"{}\"? This cannot be undone.",
            name
        ))
    {
        info("Operation cancelled.");
        return Ok(());
    }

    let remote = require_remote(cfg)?;
    remote.delete_sheet(name)?;

    let pool = DbPool::new(&cfg.database)?;
    ttlog(&pool.conn, "sheet_delete", name, "Sheet deleted")?;

    // A deleted sheet can no longer be the capture target.
    if let Some(mut identity) = session::load_identity(&pool.conn)?
        && identity.active_sheet.as_deref() == Some(name)
    {
        identity.active_sheet = None;
        session::save_identity(&pool.conn, &identity)?;
        warning("The deleted sheet was selected for capture; selection cleared.");
    }

    success(format!("Sheet \"{}\" deleted successfully", name));
    Ok(())
}

fn toggle(cfg: &Config, name: &str) -> AppResult<()> {
    let name = non_empty(name)?;
    let remote = require_remote(cfg)?;

    let sheet = remote
        .list_sheets()?
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| AppError::InvalidInput(format!("Sheet \"{}\" not found", name)))?;

    let visible = !sheet.visible;
    remote.set_visibility(name, visible)?;

    let label = if visible { "visible" } else { "hidden" };
    let pool = DbPool::new(&cfg.database)?;
    ttlog(&pool.conn, "sheet_visibility", name, &format!("Set {}", label))?;

    success(format!("Sheet \"{}\" visibility set to {}", name, label));
    Ok(())
}

/// Persist the capture sheet in the session. Requires a logged-in operator.
fn select(cfg: &Config, name: &str) -> AppResult<()> {
    let name = non_empty(name)?;
    let pool = DbPool::new(&cfg.database)?;

    let mut identity = session::load_identity(&pool.conn)?.ok_or_else(|| {
        AppError::InvalidInput("No active session: run `rollcall login` first".into())
    })?;

    identity.active_sheet = Some(name.to_string());
    session::save_identity(&pool.conn, &identity)?;
    ttlog(&pool.conn, "select_sheet", name, &format!("Selected by {}", identity.operator))?;

    success(format!("Active sheet set to: {}", name));
    Ok(())
}

fn download(cfg: &Config, name: &str, file: &str, force: bool) -> AppResult<()> {
    let name = non_empty(name)?;
    let path = resolve(file);

    ensure_writable(&path, Overwrite::from_force(force))?;

    let remote = require_remote(cfg)?;
    let rows = remote.sheet_data(name)?;

    if rows.is_empty() {
        warning(format!("No data found in sheet \"{}\"", name));
        return Ok(());
    }

    write_sheet_csv(&rows, &path)?;
    Ok(())
}
