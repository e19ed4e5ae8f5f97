//! Client management commands.

use crate::cli::ClientCommands;
use crate::cli::commands::{confirm, load_engine, pad};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::FailureMode;
use crate::report;
use crate::util::parse_date;
use crate::util::progress::SavingIndicator;
use serde_json::json;

/// Execute a client subcommand.
///
/// # Errors
///
/// Returns an error on bad identity, duplicate names without `--merge`, or
/// store failures.
pub fn execute(command: &ClientCommands, json: bool, overrides: &CliOverrides) -> Result<()> {
    match command {
        ClientCommands::Add(args) => {
            let (_, mut engine) = load_engine(overrides)?;
            let start_date = parse_date(&args.start_date, "start-date")?;
            let indicator = SavingIndicator::start("Saving client...");
            let client = engine.create_client(&args.name, start_date, args.merge);
            indicator.finish();
            let client = client?;
            if json {
                println!("{}", serde_json::to_string_pretty(&client)?);
            } else {
                println!("Added client '{}' (sprint starts {})", client.name, client.start_date);
            }
            Ok(())
        }
        ClientCommands::List => {
            let (_, engine) = load_engine(overrides)?;
            if json {
                let entries: Vec<_> = engine
                    .clients()
                    .iter()
                    .map(|c| {
                        let progress =
                            report::overall_progress(engine.catalogue(), engine.tasks(), &c.id);
                        json!({
                            "client": c,
                            "progress": progress,
                            "percent": progress.percent(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if engine.clients().is_empty() {
                println!("No clients yet. Add one with: sd client add <name>");
                return Ok(());
            }
            let name_width = engine
                .clients()
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(6)
                .max(6);
            println!(
                "{}  {}  {}  {}  {}",
                pad("CLIENT", name_width),
                pad("START", 10),
                pad("STATUS", 8),
                pad("SPRINT", 8),
                "FAILURE MODE"
            );
            for client in engine.clients() {
                let progress =
                    report::overall_progress(engine.catalogue(), engine.tasks(), &client.id);
                let sprint = if client.has_sprint {
                    format!("{}%", progress.percent())
                } else {
                    "-".to_string()
                };
                println!(
                    "{}  {}  {}  {}  {}",
                    pad(&client.name, name_width),
                    client.start_date,
                    pad(client.status.as_str(), 8),
                    pad(&sprint, 8),
                    client
                        .failure_mode
                        .map_or("-", FailureMode::display_name)
                );
            }
            Ok(())
        }
        ClientCommands::Delete { name, yes } => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(name)?.clone();
            if !yes && !confirm(&format!("Delete client '{}' and all its records?", client.name))? {
                println!("Aborted.");
                return Ok(());
            }
            let indicator = SavingIndicator::start("Deleting client...");
            let result = engine.delete_client(&client.id);
            indicator.finish();
            result?;
            if json {
                println!("{}", json!({"deleted": client.name}));
            } else {
                println!("Deleted client '{}'", client.name);
            }
            Ok(())
        }
        ClientCommands::RemoveSprint { name } => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(name)?.clone();
            let indicator = SavingIndicator::start("Removing sprint...");
            let client = engine.remove_sprint(&client.id);
            indicator.finish();
            let client = client?;
            if json {
                println!("{}", serde_json::to_string_pretty(&client)?);
            } else {
                println!("Removed sprint from '{}' (jobs kept)", client.name);
            }
            Ok(())
        }
        ClientCommands::FailureMode { name, mode, clear } => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(name)?.clone();

            if mode.is_none() && !clear {
                // Read-only: show the current diagnosis.
                match client.failure_mode {
                    Some(m) if json => println!(
                        "{}",
                        json!({"mode": m.as_str(), "name": m.display_name(), "control": m.control()})
                    ),
                    Some(m) => println!("{} ({}) -> {}", m.display_name(), m.as_str(), m.control()),
                    None if json => println!("{}", json!({"mode": null})),
                    None => println!("No failure mode declared for '{}'", client.name),
                }
                return Ok(());
            }

            let new_mode = mode.as_deref().map(str::parse).transpose()?;
            let indicator = SavingIndicator::start("Saving diagnosis...");
            let client = engine.set_failure_mode(&client.id, new_mode);
            indicator.finish();
            let client = client?;
            if json {
                println!("{}", serde_json::to_string_pretty(&client)?);
            } else {
                match client.failure_mode {
                    Some(m) => println!(
                        "Declared '{}' for {} -> run {}",
                        m.display_name(),
                        client.name,
                        m.control()
                    ),
                    None => println!("Cleared failure mode for '{}'", client.name),
                }
            }
            Ok(())
        }
    }
}
