//! Error types and handling for `sprintdeck`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for wrapped one-off errors
//! - Provides recovery hints for user-facing errors
//!
//! The taxonomy follows the three failure classes the tracker cares about:
//! store connectivity failures on load (fatal for that load), store write
//! failures during a mutation (recoverable, projection stays at the last
//! confirmed state), and invalid user input (rejected before any store call).

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `sprintdeck` operations.
#[derive(Error, Debug)]
pub enum SprintError {
    // === Store Errors ===
    /// The record store could not be reached or read on initial load.
    #[error("Record store unavailable: {detail}")]
    StoreUnavailable { detail: String },

    /// A store write (create/update/delete) failed mid-mutation.
    #[error("Store write failed for table '{table}': {detail}")]
    WriteFailed { table: String, detail: String },

    /// A record's fields violated the table's field contract.
    #[error("Bad record in table '{table}': field '{field}': {reason}")]
    FieldContract {
        table: String,
        field: String,
        reason: String,
    },

    // === Entity Errors ===
    /// Client with the given name was not found.
    #[error("Client not found: {name}")]
    ClientNotFound { name: String },

    /// Client record id no longer present in the projection.
    #[error("Client record not found: {id}")]
    ClientRecordNotFound { id: String },

    /// A client with the same (case-insensitive) name already exists.
    #[error("Client already exists: {name}")]
    DuplicateClient { name: String },

    /// Catalogue has no item with this id.
    #[error("Checklist item not found: {id}")]
    ItemNotFound { id: String },

    /// Job with the given id was not found.
    #[error("Job not found: {id}")]
    JobNotFound { id: String },

    /// Job template with the given id or name was not found.
    #[error("Job template not found: {id}")]
    TemplateNotFound { id: String },

    /// Task record with the given task id was not found.
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    // === Input Errors ===
    /// A completion was attempted without an actor identity.
    #[error("No actor identity set")]
    MissingActor,

    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid job type value.
    #[error("Invalid job type: {value}")]
    InvalidJobType { value: String },

    /// Invalid failure mode value.
    #[error("Invalid failure mode: {value}")]
    InvalidFailureMode { value: String },

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Sprintdeck workspace not initialized.
    #[error("Sprintdeck not initialized: run 'sd init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error against the hosted store.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Wrapped anyhow error for one-off failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SprintError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::ClientNotFound { .. }
                | Self::ClientRecordNotFound { .. }
                | Self::DuplicateClient { .. }
                | Self::ItemNotFound { .. }
                | Self::JobNotFound { .. }
                | Self::TemplateNotFound { .. }
                | Self::TaskNotFound { .. }
                | Self::MissingActor
                | Self::Validation { .. }
                | Self::InvalidJobType { .. }
                | Self::InvalidFailureMode { .. }
        )
    }

    /// Is this a transient store failure worth retrying?
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::WriteFailed { .. } | Self::Http(_)
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: sd init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::StoreUnavailable { .. } => {
                Some("Check the store backend and retry the command")
            }
            Self::WriteFailed { .. } => Some("The change was not saved; re-run the command"),
            Self::DuplicateClient { .. } => {
                Some("Use --merge to add a sprint to the existing client")
            }
            Self::MissingActor => {
                Some("Set your name with 'sd config set actor <name>' or pass --actor")
            }
            Self::InvalidJobType { .. } => Some("Valid types: job, recurring, sprint"),
            Self::InvalidFailureMode { .. } => {
                Some("Valid modes: not-seen, not-trusted, still-compared, no-action")
            }
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a field-contract error for a record boundary failure.
    #[must_use]
    pub fn field_contract(
        table: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::FieldContract {
            table: table.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `SprintError`.
pub type Result<T> = std::result::Result<T, SprintError>;
