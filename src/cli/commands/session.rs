use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::session::{self, SessionIdentity};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};

/// `login`: persist the operator identity under the session key.
pub fn handle_login(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { operator, role } = cmd {
        let operator = operator.trim();
        if operator.is_empty() {
            return Err(AppError::InvalidInput("operator id cannot be empty".into()));
        }

        let pool = DbPool::new(&cfg.database)?;

        // Keep the selected sheet when the same operator logs in again.
        let active_sheet = session::load_identity(&pool.conn)?
            .filter(|prev| prev.operator == operator)
            .and_then(|prev| prev.active_sheet);

        let identity = SessionIdentity {
            operator: operator.to_string(),
            role: *role,
            active_sheet,
        };
        session::save_identity(&pool.conn, &identity)?;
        ttlog(&pool.conn, "login", operator, &format!("Logged in as {}", role.as_str()))?;

        success(format!("Logged in as {} ({})", operator, role.as_str()));
    }
    Ok(())
}

pub fn handle_logout(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;

    match session::load_identity(&pool.conn)? {
        Some(identity) => {
            session::clear_identity(&pool.conn)?;
            ttlog(&pool.conn, "logout", &identity.operator, "Session cleared")?;
            success(format!("Logged out {}", identity.operator));
        }
        None => info("No active session."),
    }
    Ok(())
}

pub fn handle_whoami(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;

    match session::load_identity(&pool.conn)? {
        Some(identity) => {
            println!("Operator : {}", identity.operator);
            println!("Role     : {}", identity.role.as_str());
            println!(
                "Sheet    : {}",
                identity.active_sheet.as_deref().unwrap_or("(none selected)")
            );
        }
        None => info("No active session."),
    }
    Ok(())
}
