//! Export command: dump the whole store to one JSON backup document.

use crate::cli::ExportArgs;
use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::store::snapshot;
use serde_json::json;
use std::fs;
use tracing::info;

/// Execute the export command.
///
/// # Errors
///
/// Returns `StoreUnavailable` if a table cannot be read, or an I/O error
/// if the output file cannot be written.
pub fn execute(args: &ExportArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let config = Config::resolve(overrides)?;
    let store = config.open_store()?;
    let snapshot = snapshot::export_snapshot(store.as_ref())?;
    let contents = serde_json::to_string_pretty(&snapshot)?;

    match &args.output {
        Some(path) => {
            fs::write(path, contents)?;
            info!(path = %path.display(), "Wrote backup");
            if json {
                println!(
                    "{}",
                    json!({
                        "path": path,
                        "clients": snapshot.clients.len(),
                        "tasks": snapshot.tasks.len(),
                        "jobs": snapshot.jobs.len(),
                        "job_templates": snapshot.job_templates.len(),
                    })
                );
            } else {
                println!(
                    "Exported {} clients, {} tasks, {} jobs, {} templates to {}",
                    snapshot.clients.len(),
                    snapshot.tasks.len(),
                    snapshot.jobs.len(),
                    snapshot.job_templates.len(),
                    path.display()
                );
            }
        }
        // The snapshot is already JSON, so stdout gets the document itself.
        None => println!("{contents}"),
    }
    Ok(())
}
