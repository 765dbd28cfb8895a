//! Interactive capture loop.
//!
//! Keyboard-wedge barcode scanners type the decoded code followed by Enter,
//! so every plain input line is a scan. Lines starting with `/` are loop
//! commands (manual entry, connectivity, sync, export).

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{Command, DrainReport, Engine, EngineOptions, Outcome, Reconciler};
use crate::db::log::DbJournal;
use crate::db::pool::DbPool;
use crate::db::session;
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportLogic, Overwrite, ensure_writable};
use crate::import::load_roster_file;
use crate::remote::{ConnectivityProbe, HttpRemote, RemoteStore};
use crate::ui::messages::{error, header, info, prompt, status, success, warning};
use crate::utils::colors::colorize_sync_state;
use crate::utils::path::resolve;
use crate::utils::table::Table;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const HELP: &str = "\
  <code>              record a scanned identifier
  /manual <id>        record a typed identifier
  /online, /offline   report a network change
  /check              probe the remote store and sync if reachable
  /sync               push pending records now
  /status             connection and pending count
  /list               records of this session
  /sheet <name>       switch sheet (only when nothing is pending)
  /export [file] [csv|json|xlsx]
  /reset              discard this session's records
  /quit               leave (pending records are reported)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineAction {
    Engine(Command),
    Check,
    Status,
    List,
    Sheet(String),
    Export {
        path: Option<String>,
        format: Option<ExportFormat>,
    },
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// Map one input line to an action. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<LineAction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Some(LineAction::Engine(Command::scan(line)));
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((w, a)) => (w, a.trim()),
        None => (rest, ""),
    };

    let action = match word.to_ascii_lowercase().as_str() {
        "manual" | "m" => LineAction::Engine(Command::manual(arg)),
        "online" => LineAction::Engine(Command::ConnectivityChanged(true)),
        "offline" => LineAction::Engine(Command::ConnectivityChanged(false)),
        "sync" => LineAction::Engine(Command::DrainRequested),
        "check" => LineAction::Check,
        "status" => LineAction::Status,
        "list" => LineAction::List,
        "sheet" if !arg.is_empty() => LineAction::Sheet(arg.to_string()),
        "export" => {
            let mut parts = arg.split_whitespace();
            let path = parts.next().map(str::to_string);
            let format = parts.next().and_then(ExportFormat::from_str_opt);
            LineAction::Export { path, format }
        }
        "reset" => LineAction::Reset,
        "help" | "?" => LineAction::Help,
        "quit" | "exit" | "q" => LineAction::Quit,
        _ => LineAction::Unknown(line.to_string()),
    };

    Some(action)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Capture {
        roster,
        sheet,
        offline,
        export,
        format,
        force,
    } = cmd
    else {
        return Ok(());
    };

    // Refuse an unusable export target before anything is captured.
    let export_target = match export {
        Some(file) => {
            let path = resolve(file);
            let mode = if *force {
                Overwrite::Force
            } else {
                Overwrite::Refuse
            };
            ensure_writable(&path, mode)?;
            let fmt = pick_format(*format, &path, cfg);
            Some((path, fmt, mode))
        }
        None => None,
    };

    let pool = DbPool::new(&cfg.database)?;
    let identity = session::load_identity(&pool.conn)?;

    let operator = identity
        .as_ref()
        .map(|i| i.operator.clone())
        .unwrap_or_else(|| cfg.default_operator.clone());
    let sheet_name = sheet
        .clone()
        .or_else(|| identity.as_ref().and_then(|i| i.active_sheet.clone()));

    let remote = HttpRemote::new(&cfg.remote_url, cfg.request_timeout_secs)?;
    let online = !*offline && remote.is_reachable();

    let journal = DbJournal::new(DbPool::open_journal_conn(&cfg.database)?);
    let mut engine = Engine::new(
        Reconciler::new(remote, &operator),
        Box::new(journal),
        EngineOptions {
            online,
            auto_sync: cfg.auto_sync,
        },
    );

    let roster_path = resolve(roster);
    let loaded = engine.load_roster(load_roster_file(&roster_path)?);
    if loaded == 0 {
        warning(format!(
            "No students found in {}; every capture will be refused",
            roster_path.display()
        ));
    } else {
        success(format!("Successfully loaded {} student records", loaded));
    }

    match &sheet_name {
        Some(name) => engine.select_sheet(name, false)?,
        None => warning("Please select an active sheet first (/sheet <name>)"),
    }

    header(format!(
        "Capture session: sheet {} | operator {}",
        engine.session().active_sheet().unwrap_or("-"),
        operator
    ));
    status(&engine.status());
    info("Scan a code or type /help.");

    let stdin = io::stdin();
    run_loop(&mut engine, stdin.lock())?;

    let export_failure = match export_target {
        Some((path, fmt, mode)) => export_session(&engine, &path, fmt, mode).err(),
        None => None,
    };

    let session = engine.session();
    info(format!(
        "{} captured, {} synced",
        session.records().len(),
        session.synced_len()
    ));

    let pending = session.pending_len();
    if pending > 0 {
        warning(format!(
            "{} record(s) still pending sync; they are not kept after this session ends",
            pending
        ));
    }

    match export_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Export at the end of the session. When the requested target fails, the
/// records go to the default file name in the current directory instead.
fn export_session<R: RemoteStore>(
    engine: &Engine<R>,
    path: &Path,
    fmt: ExportFormat,
    mode: Overwrite,
) -> AppResult<()> {
    let Err(e) = ExportLogic::export(engine.records(), fmt, path, mode) else {
        return Ok(());
    };
    error(format!("Export to {} failed: {}", path.display(), e));

    let fallback = ExportLogic::default_file_name(engine.session().active_sheet(), fmt);
    let fallback = resolve(&fallback.to_string_lossy());
    if fallback.as_path() == path {
        return Err(e);
    }

    warning(format!("Saving the session to {} instead", fallback.display()));
    ExportLogic::export(engine.records(), fmt, &fallback, Overwrite::Refuse)
}

fn pick_format(explicit: Option<ExportFormat>, path: &Path, cfg: &Config) -> ExportFormat {
    explicit
        .or_else(|| ExportFormat::from_path(path))
        .or_else(|| ExportFormat::from_str_opt(&cfg.export_format))
        .unwrap_or(ExportFormat::Csv)
}

/// Feed input lines into the engine until `/quit` or end of input.
pub fn run_loop<R, B>(engine: &mut Engine<R>, input: B) -> AppResult<()>
where
    R: RemoteStore + ConnectivityProbe,
    B: BufRead,
{
    prompt(engine.session().active_sheet().unwrap_or("rollcall"));

    for line in input.lines() {
        let line = line?;

        match parse_line(&line) {
            None => {}
            Some(LineAction::Quit) => break,
            Some(action) => {
                if let Err(e) = apply(engine, action) {
                    error(e);
                }
            }
        }

        prompt(engine.session().active_sheet().unwrap_or("rollcall"));
    }
    println!();

    Ok(())
}

fn apply<R>(engine: &mut Engine<R>, action: LineAction) -> AppResult<()>
where
    R: RemoteStore + ConnectivityProbe,
{
    match action {
        LineAction::Engine(cmd) => match engine.dispatch(cmd) {
            Ok(outcome) => report_outcome(&outcome),
            // validation failures are shown, never fatal for the loop
            Err(e) => warning(e),
        },
        LineAction::Check => {
            let reachable = engine.reconciler().remote().is_reachable();
            let outcome = engine.dispatch(Command::ConnectivityChanged(reachable))?;
            report_outcome(&outcome);

            let drained = matches!(outcome, Outcome::Connectivity { drain: Some(_), .. });
            if reachable && !drained && engine.session().pending_len() > 0 {
                let outcome = engine.dispatch(Command::DrainRequested)?;
                report_outcome(&outcome);
            }
        }
        LineAction::Status => status(&engine.status()),
        LineAction::List => print_records(engine),
        LineAction::Sheet(name) => {
            engine.select_sheet(&name, false)?;
            success(format!("Active sheet set to: {}", name));
        }
        LineAction::Export { path, format } => {
            let path: PathBuf = match path {
                Some(p) => resolve(&p),
                None => {
                    let name = ExportLogic::default_file_name(
                        engine.session().active_sheet(),
                        format.unwrap_or(ExportFormat::Csv),
                    );
                    resolve(&name.to_string_lossy())
                }
            };
            let fmt = format
                .or_else(|| ExportFormat::from_path(&path))
                .unwrap_or(ExportFormat::Csv);
            ExportLogic::export(engine.records(), fmt, &path, Overwrite::Refuse)?;
        }
        LineAction::Reset => {
            let dropped = engine.session().pending_len();
            engine.reset();
            if dropped > 0 {
                warning(format!("Session reset; {} unsynced record(s) discarded", dropped));
            } else {
                info("Session reset.");
            }
        }
        LineAction::Help => println!("{HELP}"),
        LineAction::Unknown(line) => warning(format!("Unknown command '{}' (try /help)", line)),
        LineAction::Quit => {}
    }

    Ok(())
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Captured { record, drain } => {
            success(format!(
                "{} ({}) marked present via {}",
                record.display_name,
                record.identifier,
                record.method.as_str()
            ));
            if let Some(report) = drain {
                report_drain(report);
            }
        }
        Outcome::Connectivity { status: st, drain, .. } => {
            status(st);
            if let Some(report) = drain {
                report_drain(report);
            }
        }
        Outcome::Drained(report) => report_drain(report),
    }
}

fn report_drain(report: &DrainReport) {
    match report {
        DrainReport::Idle => info("Nothing to sync."),
        DrainReport::Busy => warning("A sync pass is already running."),
        DrainReport::Completed { delivered } => {
            success(format!("Synced {} record(s).", delivered));
        }
        DrainReport::Halted {
            delivered,
            identifier,
            error,
            remaining,
        } => {
            warning(format!(
                "Sync stopped at {} after {} delivered: {} ({} pending)",
                identifier, delivered, error, remaining
            ));
        }
    }
}

fn print_records<R: RemoteStore>(engine: &Engine<R>) {
    let records = engine.records();
    if records.is_empty() {
        info("No attendance records yet.");
        return;
    }

    let mut table = Table::new(&["#", "identifier", "name", "time", "method", "status"]);
    for (i, r) in records.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            r.identifier.clone(),
            r.display_name.clone(),
            r.clock_str(),
            r.method.as_str().to_string(),
            colorize_sync_state(r.sync_state.as_str()),
        ]);
    }
    print!("{}", table.render());
    status(&engine.status());
}
