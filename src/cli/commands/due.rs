//! Due command: job tasks due within a window.

use crate::cli::DueArgs;
use crate::cli::commands::{load_engine, pad};
use crate::config::CliOverrides;
use crate::engine::Engine;
use crate::error::Result;
use crate::model::TaskRecord;
use crate::report;
use crate::util::time;

/// Execute the due command.
///
/// # Errors
///
/// Returns store errors on load.
pub fn execute(args: &DueArgs, json: bool, overrides: &CliOverrides) -> Result<()> {
    let (_, engine) = load_engine(overrides)?;
    let today = time::today();
    let due = report::due_soon(engine.tasks(), today, args.days);

    if json {
        println!("{}", serde_json::to_string_pretty(&due)?);
        return Ok(());
    }
    if due.is_empty() {
        println!("Nothing due in the next {} days.", args.days);
        return Ok(());
    }
    for task in due {
        let mut line = format_due_line(&engine, task);
        if task.due_date.is_some_and(|d| d < today) {
            line.push_str("  OVERDUE");
        }
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn format_due_line(engine: &Engine, task: &TaskRecord) -> String {
    let client = engine
        .clients()
        .iter()
        .find(|c| c.id == task.client_id)
        .map_or("?", |c| c.name.as_str());
    let job = task
        .job_id
        .as_deref()
        .and_then(|id| engine.jobs().iter().find(|j| j.id == id))
        .map_or("?", |j| j.name.as_str());
    let due = task
        .due_date
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    format!(
        "{}  {}  {}  {}",
        pad(&due, 10),
        pad(client, 20),
        pad(job, 20),
        task.notes
    )
}
