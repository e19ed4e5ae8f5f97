//! Task commands: custom tasks, assignment, due dates.

use crate::cli::TaskCommands;
use crate::cli::commands::load_engine;
use crate::config::CliOverrides;
use crate::error::{Result, SprintError};
use crate::util::parse_date;
use crate::util::progress::SavingIndicator;

/// Execute a task subcommand.
///
/// # Errors
///
/// Returns identity or validation errors, or store failures.
pub fn execute(command: &TaskCommands, json: bool, overrides: &CliOverrides) -> Result<()> {
    match command {
        TaskCommands::Add { client, label } => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(client)?.clone();
            let indicator = SavingIndicator::start("Saving task...");
            let task = engine.add_custom_task(&client.id, label);
            indicator.finish();
            let task = task?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Added custom task '{}' ({})", task.notes, task.task_id);
            }
            Ok(())
        }
        TaskCommands::Assign(args) => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(&args.client)?.clone();
            let assignee = match (&args.assignee, args.clear) {
                (Some(a), _) => Some(a.as_str()),
                (None, true) => None,
                (None, false) => {
                    return Err(SprintError::validation(
                        "assignee",
                        "provide an assignee or --clear",
                    ));
                }
            };
            let indicator = SavingIndicator::start("Saving assignment...");
            let task = engine.assign_task(&client.id, &args.item, args.job.as_deref(), assignee);
            indicator.finish();
            let task = task?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                match &task.assigned_to {
                    Some(who) => println!("Assigned '{}' to {who}", args.item),
                    None => println!("Cleared assignment on '{}'", args.item),
                }
            }
            Ok(())
        }
        TaskCommands::Due(args) => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(&args.client)?.clone();
            let due = match (&args.date, args.clear) {
                (Some(d), _) => Some(parse_date(d, "date")?),
                (None, true) => None,
                (None, false) => {
                    return Err(SprintError::validation("date", "provide a date or --clear"));
                }
            };
            let indicator = SavingIndicator::start("Saving due date...");
            let task = engine.set_due_date(&client.id, &args.item, args.job.as_deref(), due);
            indicator.finish();
            let task = task?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                match task.due_date {
                    Some(date) => println!("'{}' due {date}", args.item),
                    None => println!("Cleared due date on '{}'", args.item),
                }
            }
            Ok(())
        }
    }
}
