//! Status command: sprint progress bars.

use crate::cli::StatusArgs;
use crate::cli::commands::{load_engine, matrix, pad, render_bar};
use crate::config::{CliOverrides, ViewMode};
use crate::engine::Engine;
use crate::error::Result;
use crate::model::Client;
use crate::report;
use serde_json::json;

/// Execute the status command.
///
/// # Errors
///
/// Returns `ClientNotFound` for an unknown name or store errors on load.
pub fn execute(args: &StatusArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let (config, engine) = load_engine(overrides)?;

    match &args.client {
        Some(name) => {
            let client = engine.resolve_client(name)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&client_status_json(&engine, client))?
                );
            } else {
                print_client_status(&engine, client);
            }
        }
        None => {
            // The configured all-clients view mode picks the rendering.
            if config.view_mode == ViewMode::Matrix {
                return matrix::render(&engine, json);
            }
            let sprints: Vec<&Client> = engine
                .clients()
                .iter()
                .filter(|c| c.in_sprint_scope())
                .collect();
            if json {
                let entries: Vec<_> = sprints
                    .iter()
                    .map(|c| client_status_json(&engine, c))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if sprints.is_empty() {
                println!("No active sprints.");
                return Ok(());
            }
            let name_width = sprints.iter().map(|c| c.name.len()).max().unwrap_or(6);
            for client in sprints {
                let overall =
                    report::overall_progress(engine.catalogue(), engine.tasks(), &client.id);
                println!(
                    "{}  {} {:>3}%  ({}/{})",
                    pad(&client.name, name_width),
                    render_bar(overall.percent()),
                    overall.percent(),
                    overall.completed,
                    overall.total
                );
            }
        }
    }
    Ok(())
}

fn client_status_json(engine: &Engine, client: &Client) -> serde_json::Value {
    let catalogue = engine.catalogue();
    let overall = report::overall_progress(catalogue, engine.tasks(), &client.id);
    let phases: Vec<_> = catalogue
        .phases()
        .iter()
        .map(|phase| {
            let progress = report::phase_progress(catalogue, phase, engine.tasks(), &client.id);
            let sections: Vec<_> = phase
                .sections
                .iter()
                .filter_map(|sid| catalogue.section(sid))
                .map(|section| {
                    let p = report::section_progress(section, engine.tasks(), &client.id);
                    json!({"id": section.id, "title": section.title, "progress": p, "percent": p.percent()})
                })
                .collect();
            json!({
                "id": phase.id,
                "name": phase.name,
                "subtitle": phase.subtitle,
                "progress": progress,
                "percent": progress.percent(),
                "sections": sections,
            })
        })
        .collect();
    let custom = report::custom_progress(engine.tasks(), &client.id);
    json!({
        "client": client,
        "overall": overall,
        "percent": overall.percent(),
        "phases": phases,
        "custom_tasks": custom,
    })
}

fn print_client_status(engine: &Engine, client: &Client) {
    let catalogue = engine.catalogue();
    let overall = report::overall_progress(catalogue, engine.tasks(), &client.id);

    println!("{} (sprint started {})", client.name, client.start_date);
    if let Some(mode) = client.failure_mode {
        println!("Failure mode: {} -> {}", mode.display_name(), mode.control());
    }
    println!(
        "Overall  {} {:>3}%  ({}/{})\n",
        render_bar(overall.percent()),
        overall.percent(),
        overall.completed,
        overall.total
    );

    for phase in catalogue.phases() {
        let progress = report::phase_progress(catalogue, phase, engine.tasks(), &client.id);
        println!(
            "{} - {}  {} {:>3}%",
            phase.name,
            phase.subtitle,
            render_bar(progress.percent()),
            progress.percent()
        );
        for section in phase.sections.iter().filter_map(|sid| catalogue.section(sid)) {
            let p = report::section_progress(section, engine.tasks(), &client.id);
            println!("  {:<40} {}/{}", section.title, p.completed, p.total);
        }
    }

    let custom = report::custom_progress(engine.tasks(), &client.id);
    if custom.total > 0 {
        println!(
            "\n{}  {}/{}",
            report::CUSTOM_SECTION_TITLE,
            custom.completed,
            custom.total
        );
        for task in engine
            .tasks()
            .iter()
            .filter(|t| t.client_id == client.id && t.is_custom())
        {
            let mark = if task.completed { "x" } else { " " };
            println!("  [{mark}] {}", task.notes);
        }
    }
}
