//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// 30-day sprint checklist and job tracker
#[derive(Parser, Debug)]
#[command(name = "sd", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory (auto-discover .sprintdeck if not set)
    #[arg(long, global = true, env = "SPRINTDECK_DIR")]
    pub dir: Option<PathBuf>,

    /// Actor name stamped on completions
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a sprintdeck workspace
    Init(InitArgs),

    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Toggle completion of a checklist item or job task
    Toggle(ToggleArgs),

    /// Show sprint progress for a client
    Status(StatusArgs),

    /// List open critical items for a client
    Critical(CriticalArgs),

    /// Cross-client completion matrix
    Matrix,

    /// Manage jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Manage job templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// Manage tasks (custom tasks, assignment, due dates)
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// List job tasks due soon
    Due(DueArgs),

    /// List job tasks assigned to you
    Mine,

    /// Export the whole store to a JSON backup
    Export(ExportArgs),

    /// Import a JSON backup, replacing the store contents
    Import(ImportArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Store backend
    #[arg(long, default_value = "local")]
    pub backend: String,

    /// Overwrite an existing workspace
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Add a client with an active 30-day sprint
    Add(ClientAddArgs),

    /// List clients
    List,

    /// Delete a client and all of its records
    Delete {
        /// Client name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Remove the sprint from a client, keeping jobs
    RemoveSprint {
        /// Client name
        name: String,
    },

    /// Declare the diagnosed failure mode
    FailureMode {
        /// Client name
        name: String,

        /// Mode: not-seen, not-trusted, still-compared, no-action
        mode: Option<String>,

        /// Clear the diagnosis
        #[arg(long, conflicts_with = "mode")]
        clear: bool,
    },
}

#[derive(Args, Debug)]
pub struct ClientAddArgs {
    /// Client name
    pub name: String,

    /// Sprint start date (YYYY-MM-DD, today, tomorrow, +Nd, +Nw)
    #[arg(long, default_value = "today")]
    pub start_date: String,

    /// Re-enable the sprint if the client already exists
    #[arg(long)]
    pub merge: bool,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Client name
    pub client: String,

    /// Checklist item id (or job task token with --job)
    pub item: String,

    /// Job id the task belongs to
    #[arg(long)]
    pub job: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Client name (all clients when omitted)
    pub client: Option<String>,
}

#[derive(Args, Debug)]
pub struct CriticalArgs {
    /// Client name
    pub client: String,
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Create a job, optionally materialized from a template
    Create(JobCreateArgs),

    /// List jobs
    List {
        /// Only this client's jobs
        #[arg(long)]
        client: Option<String>,
    },

    /// Delete a job and its tasks
    Delete {
        /// Job id
        id: String,
    },

    /// Mark a job complete
    Done {
        /// Job id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct JobCreateArgs {
    /// Client name
    pub client: String,

    /// Job name
    pub name: String,

    /// Job type: job, recurring, sprint
    #[arg(long = "type", default_value = "job")]
    pub job_type: String,

    /// Template id or name to materialize sub-tasks from
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Add a job template
    Add(TemplateAddArgs),

    /// List templates
    List,

    /// Show one template's sub-tasks
    Show {
        /// Template id or name
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct TemplateAddArgs {
    /// Template name
    pub name: String,

    /// Category label
    #[arg(long, default_value = "")]
    pub category: String,

    /// Sub-task line (repeatable, expanded in order)
    #[arg(long = "task")]
    pub tasks: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a custom sprint task for a client
    Add {
        /// Client name
        client: String,

        /// Task label
        label: String,
    },

    /// Assign a task to a person
    Assign(TaskAssignArgs),

    /// Set a task's due date
    Due(TaskDueArgs),
}

#[derive(Args, Debug)]
pub struct TaskAssignArgs {
    /// Client name
    pub client: String,

    /// Checklist item id or job task token
    pub item: String,

    /// Assignee name
    pub assignee: Option<String>,

    /// Job id the task belongs to
    #[arg(long)]
    pub job: Option<String>,

    /// Clear the assignment
    #[arg(long, conflicts_with = "assignee")]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct TaskDueArgs {
    /// Client name
    pub client: String,

    /// Checklist item id or job task token
    pub item: String,

    /// Due date (YYYY-MM-DD, today, tomorrow, +Nd, +Nw)
    pub date: Option<String>,

    /// Job id the task belongs to
    #[arg(long)]
    pub job: Option<String>,

    /// Clear the due date
    #[arg(long, conflicts_with = "date")]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct DueArgs {
    /// Window in days
    #[arg(long, default_value_t = 7)]
    pub days: u64,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Backup file produced by `sd export`
    pub file: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print one config value
    Get {
        /// Key: backend, endpoint, actor, view-mode
        key: String,
    },

    /// Set one config value
    Set {
        /// Key: backend, endpoint, actor, view-mode
        key: String,

        /// New value
        value: String,
    },

    /// List all config values
    List,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
