//! Import command: restore a JSON backup, replacing the store contents.

use crate::cli::ImportArgs;
use crate::cli::commands::confirm;
use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::store::snapshot::{self, Snapshot};
use crate::util::progress::SavingIndicator;
use std::fs;

/// Execute the import command.
///
/// # Errors
///
/// Returns an I/O or JSON error for an unreadable backup file, a
/// `Validation` error for an unsupported snapshot version, or store errors
/// mid-restore.
pub fn execute(args: &ImportArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let config = Config::resolve(overrides)?;
    let contents = fs::read_to_string(&args.file)?;
    let snapshot: Snapshot = serde_json::from_str(&contents)?;

    if !args.yes
        && !confirm(&format!(
            "Replace the store contents with '{}'?",
            args.file.display()
        ))?
    {
        println!("Aborted.");
        return Ok(());
    }

    let mut store = config.open_store()?;
    let indicator = SavingIndicator::start("Importing backup...");
    let summary = snapshot::import_snapshot(store.as_mut(), &snapshot);
    indicator.finish();
    let summary = summary?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Imported {} clients, {} tasks, {} jobs, {} templates",
            summary.clients, summary.tasks, summary.jobs, summary.job_templates
        );
    }
    Ok(())
}
