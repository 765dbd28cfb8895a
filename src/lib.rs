//! rollcall library root.
//! Exposes the CLI parser, the capture core, and the high-level run() function.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod import;
pub mod models;
pub mod remote;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Login { .. } => commands::session::handle_login(&cli.command, cfg),
        Commands::Logout => commands::session::handle_logout(cfg),
        Commands::Whoami => commands::session::handle_whoami(cfg),
        Commands::Roster { .. } => commands::roster::handle(&cli.command),
        Commands::Sheets { .. } => commands::sheets::handle(&cli.command, cfg),
        Commands::Capture { .. } => commands::capture::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; command-line overrides win
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(url) = &cli.remote {
        cfg.remote_url = url.clone();
    }

    dispatch(&cli, &cfg)
}
