use crate::db::session::Role;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rollcall
#[derive(Parser)]
#[command(
    name = "rollcall",
    version = env!("CARGO_PKG_VERSION"),
    about = "Offline-tolerant attendance capture: scan or type student IDs and sync them to a remote sheet",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the remote sheet store URL
    #[arg(global = true, long = "remote")]
    pub remote: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only show one operation (e.g. capture, sync_transport)")]
        operation: Option<String>,
    },

    /// Start a session as an operator
    Login {
        #[arg(long = "operator", help = "Operator id recorded as 'markedBy'")]
        operator: String,

        #[arg(long, value_enum, default_value = "coordinator")]
        role: Role,
    },

    /// End the current session
    Logout,

    /// Show the persisted session
    Whoami,

    /// Validate a roster file and print a summary
    Roster {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "list", help = "Print every student")]
        list: bool,
    },

    /// Manage sheets on the remote store
    Sheets {
        #[command(subcommand)]
        action: SheetAction,
    },

    /// Interactive attendance capture (one scanned code per line)
    Capture {
        #[arg(long, value_name = "FILE", help = "Roster file (.csv, .json or .xlsx)")]
        roster: String,

        #[arg(long, help = "Sheet to record into (defaults to the selected sheet)")]
        sheet: Option<String>,

        #[arg(long, help = "Start offline: queue records without contacting the remote")]
        offline: bool,

        #[arg(long, value_name = "FILE", help = "Export the session when the loop ends")]
        export: Option<String>,

        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        #[arg(long, short = 'f', help = "Overwrite existing export files")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SheetAction {
    /// List sheets and their visibility
    List,

    /// Create a new sheet
    Create { name: String },

    /// Delete a sheet (irreversible)
    Delete {
        name: String,

        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },

    /// Flip a sheet's visibility
    Toggle { name: String },

    /// Select the sheet used by `capture`
    Select { name: String },

    /// Download a sheet as CSV
    Download {
        name: String,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
