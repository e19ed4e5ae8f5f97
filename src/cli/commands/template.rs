//! Job template commands.

use crate::cli::TemplateCommands;
use crate::cli::commands::{load_engine, pad};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::util::progress::SavingIndicator;
use serde_json::json;

/// Execute a template subcommand.
///
/// # Errors
///
/// Returns `TemplateNotFound` for unknown ids or store failures.
pub fn execute(command: &TemplateCommands, json: bool, overrides: &CliOverrides) -> Result<()> {
    match command {
        TemplateCommands::Add(args) => {
            let (_, mut engine) = load_engine(overrides)?;
            let sub_tasks = args.tasks.join("\n");
            let indicator = SavingIndicator::start("Saving template...");
            let template = engine.create_template(&args.name, &args.category, &sub_tasks);
            indicator.finish();
            let template = template?;
            if json {
                println!("{}", serde_json::to_string_pretty(&template)?);
            } else {
                println!(
                    "Added template '{}' ({}) with {} sub-tasks",
                    template.name,
                    template.id,
                    template.sub_task_lines().len()
                );
            }
            Ok(())
        }
        TemplateCommands::List => {
            let (_, engine) = load_engine(overrides)?;
            if json {
                println!("{}", serde_json::to_string_pretty(engine.templates())?);
                return Ok(());
            }
            if engine.templates().is_empty() {
                println!("No templates.");
                return Ok(());
            }
            for template in engine.templates() {
                let category = if template.category.is_empty() {
                    "-"
                } else {
                    template.category.as_str()
                };
                println!(
                    "{}  {}  {}  ({} sub-tasks)",
                    pad(&template.id, 10),
                    pad(&template.name, 24),
                    pad(category, 12),
                    template.sub_task_lines().len()
                );
            }
            Ok(())
        }
        TemplateCommands::Show { id } => {
            let (_, engine) = load_engine(overrides)?;
            let template = engine.resolve_template(id)?;
            if json {
                println!(
                    "{}",
                    json!({
                        "template": template,
                        "sub_tasks": template.sub_task_lines(),
                    })
                );
                return Ok(());
            }
            println!("{} ({})", template.name, template.id);
            if !template.category.is_empty() {
                println!("Category: {}", template.category);
            }
            for line in template.sub_task_lines() {
                println!("  - {line}");
            }
            Ok(())
        }
    }
}
