//! Record store abstraction.
//!
//! The tracker persists to a generic tabular record store: named tables of
//! records, each record an opaque id plus a map of named fields. The engine
//! consumes only this narrow interface; whether records live in a local JSON
//! document or a hosted backend over HTTP is a configuration concern.
//!
//! Raw field maps never leak past this module: `fields` converts them
//! to/from the typed entities and validates at the boundary.

pub mod fields;
mod http;
mod local;
pub mod snapshot;

pub use http::HttpStore;
pub use local::LocalStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tables the tracker consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Clients,
    Tasks,
    Jobs,
    JobTemplates,
}

impl Table {
    /// The store-side table name. This is part of the field contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "Clients",
            Self::Tasks => "Tasks",
            Self::Jobs => "Jobs",
            Self::JobTemplates => "Job Templates",
        }
    }

    /// All tables, in load order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Clients, Self::Tasks, Self::Jobs, Self::JobTemplates]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record's field map: field name to JSON value.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// One raw record as the store hands it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: FieldMap,
}

/// One pending update: record id plus the fields to overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub id: String,
    pub fields: FieldMap,
}

/// Generic create/read/update/delete against named tables.
///
/// `delete_record` returns `Ok(false)` when the id did not exist; cascade
/// deletes treat that as success so an interrupted cascade can be re-run.
pub trait RecordStore {
    /// List every record in a table.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the table cannot be read.
    fn list_records(&self, table: Table) -> Result<Vec<Record>>;

    /// Create records; the store assigns ids and returns canonical records
    /// in input order.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the write does not land.
    fn create_records(&mut self, table: Table, fields: Vec<FieldMap>) -> Result<Vec<Record>>;

    /// Apply field updates; returns the canonical post-update records.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the write does not land or an id is unknown.
    fn update_records(&mut self, table: Table, updates: Vec<RecordUpdate>) -> Result<Vec<Record>>;

    /// Delete one record. Returns whether the id existed.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` only for transport/storage failures, never for
    /// a missing id.
    fn delete_record(&mut self, table: Table, id: &str) -> Result<bool>;
}
