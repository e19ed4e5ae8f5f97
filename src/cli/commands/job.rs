//! Job management commands.

use crate::cli::JobCommands;
use crate::cli::commands::{load_engine, pad};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::JobType;
use crate::util::progress::SavingIndicator;
use serde_json::json;

/// Execute a job subcommand.
///
/// # Errors
///
/// Returns identity errors for unknown clients/jobs/templates or store
/// failures.
pub fn execute(command: &JobCommands, json: bool, overrides: &CliOverrides) -> Result<()> {
    match command {
        JobCommands::Create(args) => {
            let (_, mut engine) = load_engine(overrides)?;
            let client = engine.resolve_client(&args.client)?.clone();
            let job_type: JobType = args.job_type.parse()?;

            let indicator = SavingIndicator::start("Creating job...");
            let result =
                engine.materialize_job(&client.id, &args.name, job_type, args.template.as_deref());
            indicator.finish();
            let (job, tasks) = result?;

            if json {
                println!("{}", json!({"job": job, "tasks": tasks}));
            } else {
                println!("Created job '{}' ({}) for {}", job.name, job.id, client.name);
                for task in &tasks {
                    println!("  [ ] {} ({})", task.notes, task.task_id);
                }
            }
            Ok(())
        }
        JobCommands::List { client } => {
            let (_, engine) = load_engine(overrides)?;
            let client_id = client
                .as_deref()
                .map(|name| engine.resolve_client(name).map(|c| c.id.clone()))
                .transpose()?;

            let jobs: Vec<_> = engine
                .jobs()
                .iter()
                .filter(|j| client_id.as_deref().is_none_or(|id| j.client_id == id))
                .collect();

            if json {
                let entries: Vec<_> = jobs
                    .iter()
                    .map(|job| {
                        let tasks = engine.job_tasks(&job.id);
                        let done = tasks.iter().filter(|t| t.completed).count();
                        json!({"job": job, "tasks_total": tasks.len(), "tasks_completed": done})
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if jobs.is_empty() {
                println!("No jobs.");
                return Ok(());
            }
            for job in jobs {
                let client_name = engine
                    .clients()
                    .iter()
                    .find(|c| c.id == job.client_id)
                    .map_or(job.client_id.as_str(), |c| c.name.as_str());
                let tasks = engine.job_tasks(&job.id);
                let done = tasks.iter().filter(|t| t.completed).count();
                println!(
                    "{}  {}  {}  [{}] {}/{} tasks  {}",
                    pad(&job.id, 10),
                    pad(client_name, 20),
                    pad(job.job_type.as_str(), 9),
                    job.status,
                    done,
                    tasks.len(),
                    job.name
                );
            }
            Ok(())
        }
        JobCommands::Delete { id } => {
            let (_, mut engine) = load_engine(overrides)?;
            let job = engine.resolve_job(id)?.clone();
            let indicator = SavingIndicator::start("Deleting job...");
            let result = engine.delete_job(&job.id);
            indicator.finish();
            result?;
            if json {
                println!("{}", json!({"deleted": job.id}));
            } else {
                println!("Deleted job '{}'", job.name);
            }
            Ok(())
        }
        JobCommands::Done { id } => {
            let (_, mut engine) = load_engine(overrides)?;
            let indicator = SavingIndicator::start("Saving...");
            let job = engine.complete_job(id);
            indicator.finish();
            let job = job?;
            if json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                println!("Marked job '{}' complete", job.name);
            }
            Ok(())
        }
    }
}
