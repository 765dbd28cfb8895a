use crate::cli::parser::Commands;
use crate::core::RosterIndex;
use crate::errors::AppResult;
use crate::import::load_roster_file;
use crate::ui::messages::{success, warning};
use crate::utils::path::resolve;
use crate::utils::table::Table;

/// `roster --file`: parse a roster the same way `capture` would.
pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Roster { file, list } = cmd {
        let path = resolve(file);
        let rows = load_roster_file(&path)?;
        let total_rows = rows.len();

        let mut index = RosterIndex::new();
        let loaded = index.load(rows);

        if loaded == 0 {
            warning(format!("No students found in {}", path.display()));
            return Ok(());
        }

        success(format!(
            "Loaded {} student records from {} ({} rows)",
            loaded,
            path.display(),
            total_rows
        ));

        if loaded < total_rows {
            warning(format!(
                "{} row(s) skipped: blank or repeated identifiers",
                total_rows - loaded
            ));
        }

        if *list {
            let mut table = Table::new(&["identifier", "name"]);
            for student in index.iter() {
                table.add_row(vec![student.identifier.clone(), student.display_name.clone()]);
            }
            print!("{}", table.render());
        }
    }
    Ok(())
}
