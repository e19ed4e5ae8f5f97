//! Toggle command: flip one task's completion state.

use crate::cli::ToggleArgs;
use crate::cli::commands::load_engine;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::util::progress::SavingIndicator;

/// Execute the toggle command.
///
/// # Errors
///
/// Returns `MissingActor` when no actor is configured, identity errors for
/// unknown clients/items, or `WriteFailed` if the store write fails.
pub fn execute(args: &ToggleArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let (config, mut engine) = load_engine(overrides)?;
    let actor = config.require_actor()?.to_string();
    let client = engine.resolve_client(&args.client)?.clone();

    let indicator = SavingIndicator::start("Saving...");
    let task = engine.toggle_completion(&client.id, &args.item, args.job.as_deref(), &actor);
    indicator.finish();
    let task = task?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
        return Ok(());
    }

    let label = match engine.catalogue().item(&task.task_id) {
        Some((_, item)) => item.text,
        None if task.notes.is_empty() => task.task_id.as_str(),
        None => task.notes.as_str(),
    };
    if task.completed {
        println!("[x] {label} (by {actor})");
    } else {
        println!("[ ] {label}");
    }
    Ok(())
}
