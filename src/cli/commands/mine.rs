//! Mine command: open job tasks assigned to the configured actor.

use crate::cli::commands::due::format_due_line;
use crate::cli::commands::load_engine;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report;

/// Execute the mine command.
///
/// # Errors
///
/// Returns `MissingActor` when no actor is configured, or store errors on
/// load.
pub fn execute(json: bool, overrides: &CliOverrides) -> Result<()> {
    let (config, engine) = load_engine(overrides)?;
    let actor = config.require_actor()?;
    let mine = report::assigned_to(engine.tasks(), actor);

    if json {
        println!("{}", serde_json::to_string_pretty(&mine)?);
        return Ok(());
    }
    if mine.is_empty() {
        println!("Nothing assigned to {actor}.");
        return Ok(());
    }
    println!("Open tasks for {actor}:");
    for task in mine {
        println!("{}", format_due_line(&engine, task));
    }
    Ok(())
}
