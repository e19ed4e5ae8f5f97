//! Local JSON-file record store.
//!
//! All four tables live in one JSON document at `.sprintdeck/store.json`.
//! Mutations are applied to a working copy and only committed in memory once
//! the document has been written out, so a failed write leaves the store at
//! its last persisted state.
//!
//! `in_memory()` gives tests the same store without a backing file.

use crate::error::{Result, SprintError};
use crate::store::{FieldMap, Record, RecordStore, RecordUpdate, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    clients: Vec<Record>,
    #[serde(default)]
    tasks: Vec<Record>,
    #[serde(default)]
    jobs: Vec<Record>,
    #[serde(default)]
    job_templates: Vec<Record>,
    #[serde(default)]
    next_id: u64,
}

impl Document {
    fn table(&self, table: Table) -> &Vec<Record> {
        match table {
            Table::Clients => &self.clients,
            Table::Tasks => &self.tasks,
            Table::Jobs => &self.jobs,
            Table::JobTemplates => &self.job_templates,
        }
    }

    fn table_mut(&mut self, table: Table) -> &mut Vec<Record> {
        match table {
            Table::Clients => &mut self.clients,
            Table::Tasks => &mut self.tasks,
            Table::Jobs => &mut self.jobs,
            Table::JobTemplates => &mut self.job_templates,
        }
    }
}

/// JSON-file backed record store.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    doc: Document,
}

impl LocalStore {
    /// Open an existing store file.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if the file does not exist and
    /// `StoreUnavailable` if it cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SprintError::NotInitialized);
        }
        let contents = fs::read_to_string(path).map_err(|e| SprintError::StoreUnavailable {
            detail: format!("{}: {e}", path.display()),
        })?;
        let doc: Document =
            serde_json::from_str(&contents).map_err(|e| SprintError::StoreUnavailable {
                detail: format!("{}: {e}", path.display()),
            })?;
        debug!(path = %path.display(), "Opened local store");
        Ok(Self {
            path: Some(path.to_path_buf()),
            doc,
        })
    }

    /// Create a fresh, empty store file.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if the file exists (unless `force`),
    /// or an I/O error if it cannot be written.
    pub fn create(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(SprintError::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }
        let store = Self {
            path: Some(path.to_path_buf()),
            doc: Document::default(),
        };
        store.persist(&store.doc, Table::Clients)?;
        Ok(store)
    }

    /// An unbacked store for tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            doc: Document::default(),
        }
    }

    fn persist(&self, doc: &Document, table: Table) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = serde_json::to_string_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        let write = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
        write.map_err(|e| SprintError::WriteFailed {
            table: table.as_str().to_string(),
            detail: e.to_string(),
        })
    }

    fn assign_id(doc: &mut Document) -> String {
        doc.next_id += 1;
        format!("rec{:06x}", doc.next_id)
    }
}

/// Merge a field update into a record. `Null` values clear the field, the
/// same way a hosted store clears a field written as null.
fn merge_fields(target: &mut FieldMap, updates: FieldMap) {
    for (name, value) in updates {
        if value == Value::Null {
            target.remove(&name);
        } else {
            target.insert(name, value);
        }
    }
}

impl RecordStore for LocalStore {
    fn list_records(&self, table: Table) -> Result<Vec<Record>> {
        Ok(self.doc.table(table).clone())
    }

    fn create_records(&mut self, table: Table, fields: Vec<FieldMap>) -> Result<Vec<Record>> {
        let mut doc = self.doc.clone();
        let mut created = Vec::with_capacity(fields.len());
        for field_map in fields {
            let record = Record {
                id: Self::assign_id(&mut doc),
                fields: field_map,
            };
            doc.table_mut(table).push(record.clone());
            created.push(record);
        }
        self.persist(&doc, table)?;
        self.doc = doc;
        debug!(table = %table, count = created.len(), "Created records");
        Ok(created)
    }

    fn update_records(&mut self, table: Table, updates: Vec<RecordUpdate>) -> Result<Vec<Record>> {
        let mut doc = self.doc.clone();
        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            let records = doc.table_mut(table);
            let Some(record) = records.iter_mut().find(|r| r.id == update.id) else {
                return Err(SprintError::WriteFailed {
                    table: table.as_str().to_string(),
                    detail: format!("no record with id '{}'", update.id),
                });
            };
            merge_fields(&mut record.fields, update.fields);
            updated.push(record.clone());
        }
        self.persist(&doc, table)?;
        self.doc = doc;
        debug!(table = %table, count = updated.len(), "Updated records");
        Ok(updated)
    }

    fn delete_record(&mut self, table: Table, id: &str) -> Result<bool> {
        let mut doc = self.doc.clone();
        let records = doc.table_mut(table);
        let before = records.len();
        records.retain(|r| r.id != id);
        let existed = records.len() < before;
        if existed {
            self.persist(&doc, table)?;
            self.doc = doc;
        }
        Ok(existed)
    }
}
