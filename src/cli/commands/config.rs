//! Configuration management command.
//!
//! Reads and writes the project config file (.sprintdeck/config.toml).
//! Environment variables and CLI flags still take precedence over anything
//! set here; `sd config list` shows the file's values, not the resolved
//! ones.

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::config::{CliOverrides, ConfigFile, discover_dir};
use crate::error::{Result, SprintError};
use serde_json::json;

/// Execute the config command.
///
/// # Errors
///
/// Returns `NotInitialized` when no workspace is found, or a config error
/// for unknown keys.
pub fn execute(args: &ConfigArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let dir = discover_dir(overrides.dir.as_deref())?;
    let mut file = ConfigFile::load(&dir)?;

    match &args.command {
        ConfigCommands::Get { key } => {
            let value = get_key(&file, key)?;
            if json {
                println!("{}", json!({ key: value }));
            } else {
                println!("{}", value.unwrap_or_default());
            }
        }
        ConfigCommands::Set { key, value } => {
            set_key(&mut file, key, value)?;
            file.save(&dir)?;
            if json {
                println!("{}", json!({ key: value }));
            } else {
                println!("Set {key} = {value}");
            }
        }
        ConfigCommands::List => {
            if json {
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                println!("backend   = {}", file.backend.as_str());
                println!("endpoint  = {}", file.endpoint.as_deref().unwrap_or("-"));
                println!("actor     = {}", file.actor.as_deref().unwrap_or("-"));
                println!("view-mode = {}", file.view_mode.as_str());
            }
        }
    }
    Ok(())
}

fn get_key(file: &ConfigFile, key: &str) -> Result<Option<String>> {
    match key {
        "backend" => Ok(Some(file.backend.as_str().to_string())),
        "endpoint" => Ok(file.endpoint.clone()),
        "actor" => Ok(file.actor.clone()),
        "view-mode" | "view_mode" => Ok(Some(file.view_mode.as_str().to_string())),
        other => Err(SprintError::Config(format!("unknown config key '{other}'"))),
    }
}

fn set_key(file: &mut ConfigFile, key: &str, value: &str) -> Result<()> {
    match key {
        "backend" => file.backend = value.parse()?,
        "endpoint" => file.endpoint = Some(value.to_string()),
        "actor" => file.actor = Some(value.to_string()),
        "view-mode" | "view_mode" => file.view_mode = value.parse()?,
        other => return Err(SprintError::Config(format!("unknown config key '{other}'"))),
    }
    Ok(())
}
