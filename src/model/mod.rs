//! Core data types for `sprintdeck`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Client` - A client being onboarded (sprint and/or job tracker)
//! - `TaskRecord` - One persisted completion record (sprint or job task)
//! - `Job` - An ad-hoc job, optionally instantiated from a template
//! - `JobTemplate` - A recipe expanded into task records
//!
//! Identity rules: a sprint task record is keyed by `(client_id, task_id)`
//! where `task_id` is a catalogue item id and `job_id` is `None`; a job task
//! record is keyed by its own record id and carries a generated opaque token
//! as `task_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Archived,
}

impl ClientStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = crate::error::SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(crate::error::SprintError::validation(
                "status",
                format!("unknown client status '{other}'"),
            )),
        }
    }
}

/// The dominant failure mode diagnosed for a client during week 1.
///
/// Each mode maps to the control program the agency runs to counter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    NotSeen,
    NotTrusted,
    StillCompared,
    NoAction,
}

impl FailureMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSeen => "not-seen",
            Self::NotTrusted => "not-trusted",
            Self::StillCompared => "still-compared",
            Self::NoAction => "no-action",
        }
    }

    /// Display name shown in diagnosis output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::NotSeen => "Not Seen When Decisions Are Made",
            Self::NotTrusted => "Seen But Not Trusted",
            Self::StillCompared => "Trusted But Still Compared",
            Self::NoAction => "Intended Choice, No Action",
        }
    }

    /// The control program that counters this failure mode.
    #[must_use]
    pub const fn control(self) -> &'static str {
        match self {
            Self::NotSeen => "Presence Control",
            Self::NotTrusted => "Confidence Control",
            Self::StillCompared => "Comparison Control",
            Self::NoAction => "Momentum Control",
        }
    }

    /// All modes, in diagnosis order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::NotSeen,
            Self::NotTrusted,
            Self::StillCompared,
            Self::NoAction,
        ]
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FailureMode {
    type Err = crate::error::SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not-seen" => Ok(Self::NotSeen),
            "not-trusted" => Ok(Self::NotTrusted),
            "still-compared" => Ok(Self::StillCompared),
            "no-action" => Ok(Self::NoAction),
            other => Err(crate::error::SprintError::InvalidFailureMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Job category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Job,
    Recurring,
    Sprint,
}

impl JobType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Job => "job",
            Self::Recurring => "recurring",
            Self::Sprint => "sprint",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = crate::error::SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "job" => Ok(Self::Job),
            "recurring" => Ok(Self::Recurring),
            "sprint" => Ok(Self::Sprint),
            other => Err(crate::error::SprintError::InvalidJobType {
                value: other.to_string(),
            }),
        }
    }
}

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Complete,
}

impl JobStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = crate::error::SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "complete" | "done" => Ok(Self::Complete),
            other => Err(crate::error::SprintError::validation(
                "status",
                format!("unknown job status '{other}'"),
            )),
        }
    }
}

/// A client being onboarded.
///
/// Clearing `has_sprint` soft-deletes the sprint scope (client and job data
/// are kept); a hard delete cascades over all dependent records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    /// Store-assigned record id.
    pub id: String,

    /// Display name, non-empty, case-insensitively unique among clients.
    pub name: String,

    /// Sprint start date.
    pub start_date: NaiveDate,

    #[serde(default)]
    pub status: ClientStatus,

    /// Whether this client has an active 30-day sprint.
    #[serde(default)]
    pub has_sprint: bool,

    /// Diagnosed failure mode, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_mode: Option<FailureMode>,
}

impl Client {
    /// Normalized name used for duplicate detection and lookup.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_client_name(&self.name)
    }

    /// Is this client part of the active sprint scope?
    #[must_use]
    pub const fn in_sprint_scope(&self) -> bool {
        self.has_sprint && matches!(self.status, ClientStatus::Active)
    }
}

/// Normalize a client name for case-insensitive comparison.
#[must_use]
pub fn normalize_client_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One persisted completion record.
///
/// Sprint tasks (`job_id` absent) are lazily materialized: no record means
/// "incomplete". Job tasks are created up front when a job is instantiated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    /// Store-assigned record id.
    pub id: String,

    /// Owning client.
    pub client_id: String,

    /// Owning job; `None` means this is a sprint task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Catalogue item id for sprint tasks; generated token for job tasks.
    pub task_id: String,

    #[serde(default)]
    pub completed: bool,

    /// Date of completion; cleared again when the task is un-completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDate>,

    /// Display name of whoever completed the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,

    /// Job-task description text; for legacy custom sprint tasks, the label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl TaskRecord {
    /// Is this a sprint task (no job reference)?
    #[must_use]
    pub const fn is_sprint_task(&self) -> bool {
        self.job_id.is_none()
    }

    /// Does this sprint record belong to the catalogue, or is it a legacy
    /// custom task?
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.is_sprint_task() && self.task_id.starts_with("custom-")
    }
}

/// An ad-hoc job for a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    /// Store-assigned record id.
    pub id: String,

    pub name: String,

    pub client_id: String,

    /// Template this job was instantiated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    #[serde(default)]
    pub job_type: JobType,

    #[serde(default)]
    pub status: JobStatus,

    pub created: DateTime<Utc>,
}

/// A recipe of sub-tasks, one per line, expanded when a job is instantiated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobTemplate {
    /// Store-assigned record id.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Raw sub-task text, one task per line.
    #[serde(default)]
    pub sub_tasks: String,
}

impl JobTemplate {
    /// The template's sub-task lines, trimmed, blank lines skipped,
    /// original order preserved.
    #[must_use]
    pub fn sub_task_lines(&self) -> Vec<&str> {
        self.sub_tasks
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}
