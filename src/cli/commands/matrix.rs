//! Matrix command: every catalogue item crossed with every active sprint.

use crate::cli::commands::load_engine;
use crate::config::CliOverrides;
use crate::engine::Engine;
use crate::error::Result;
use crate::report;
use serde_json::json;

/// Execute the matrix command.
///
/// # Errors
///
/// Returns store errors on load.
pub fn execute(json: bool, overrides: &CliOverrides) -> Result<()> {
    let (_, engine) = load_engine(overrides)?;
    render(&engine, json)
}

/// Render the matrix for an already-loaded projection. Also used by
/// `sd status` when the configured all-clients view mode is `matrix`.
///
/// # Errors
///
/// Returns a JSON error if serialization fails.
pub(crate) fn render(engine: &Engine, json: bool) -> Result<()> {
    let matrix = report::client_matrix(engine.catalogue(), engine.clients(), engine.tasks());

    if json {
        let groups: Vec<_> = matrix
            .iter()
            .map(|group| {
                let items: Vec<_> = group
                    .items
                    .iter()
                    .map(|item| {
                        json!({
                            "id": item.item.id,
                            "text": item.item.text,
                            "critical": item.item.critical,
                            "clients": item.cells,
                        })
                    })
                    .collect();
                json!({
                    "phase": group.phase.id,
                    "section": group.section.id,
                    "title": group.section.title,
                    "items": items,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let active = engine.clients().iter().filter(|c| c.in_sprint_scope()).count();
    if active == 0 {
        println!("No active sprints.");
        return Ok(());
    }

    let mut last_phase = "";
    for group in &matrix {
        if group.phase.id != last_phase {
            println!("\n== {} ({}) ==", group.phase.name, group.phase.subtitle);
            last_phase = group.phase.id;
        }
        println!("{}", group.section.title);
        for item in &group.items {
            let cells: Vec<String> = item
                .cells
                .iter()
                .map(|cell| {
                    if cell.completed {
                        match &cell.completed_by {
                            Some(by) => format!("{} [x {by}]", cell.client_name),
                            None => format!("{} [x]", cell.client_name),
                        }
                    } else {
                        format!("{} [ ]", cell.client_name)
                    }
                })
                .collect();
            let marker = if item.item.critical { "!" } else { " " };
            println!("  {marker} {:<45} {}", item.item.text, cells.join("  "));
        }
    }
    Ok(())
}
