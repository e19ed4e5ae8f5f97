//! Critical command: open critical-path items for one client.

use crate::cli::CriticalArgs;
use crate::cli::commands::load_engine;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::report;
use serde_json::json;

/// Execute the critical command.
///
/// # Errors
///
/// Returns `ClientNotFound` for an unknown name or store errors on load.
pub fn execute(args: &CriticalArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let (_, engine) = load_engine(overrides)?;
    let client = engine.resolve_client(&args.client)?;
    let open = report::critical_incomplete(engine.catalogue(), engine.tasks(), &client.id);

    if json {
        let entries: Vec<_> = open
            .iter()
            .map(|c| {
                json!({
                    "id": c.item.id,
                    "text": c.item.text,
                    "section": c.section_title,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if open.is_empty() {
        println!("All critical items complete for '{}'.", client.name);
        return Ok(());
    }

    println!("{} open critical items for '{}':\n", open.len(), client.name);
    let mut last_section = "";
    for entry in &open {
        if entry.section_title != last_section {
            println!("{}", entry.section_title);
            last_section = entry.section_title;
        }
        println!("  [!] {} ({})", entry.item.text, entry.item.id);
    }
    Ok(())
}
