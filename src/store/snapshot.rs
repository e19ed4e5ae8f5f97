//! Whole-store backup snapshots.
//!
//! `sd export` dumps all four tables into one JSON document and `sd import`
//! restores one, replacing whatever the store holds. Snapshots move through
//! the `RecordStore` interface only, so backup and restore work identically
//! against the local file and the hosted backend.
//!
//! Record ids are store-assigned, so an import cannot keep the ids the
//! snapshot carries. Tables are restored parents-first and every cross-table
//! reference ("Client", "Job", "Template") is rewritten through an
//! old-id-to-new-id map as the children land.

use crate::error::{Result, SprintError};
use crate::store::{FieldMap, Record, RecordStore, Table, fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Snapshot document version this build reads and writes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// One full-store backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub clients: Vec<Record>,
    #[serde(default)]
    pub tasks: Vec<Record>,
    #[serde(default)]
    pub jobs: Vec<Record>,
    #[serde(default)]
    pub job_templates: Vec<Record>,
}

/// Per-table record counts for a finished import.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ImportSummary {
    pub clients: usize,
    pub tasks: usize,
    pub jobs: usize,
    pub job_templates: usize,
}

/// Read every table into a snapshot document.
///
/// # Errors
///
/// Returns `StoreUnavailable` if any table cannot be read.
pub fn export_snapshot(store: &dyn RecordStore) -> Result<Snapshot> {
    Ok(Snapshot {
        version: SNAPSHOT_VERSION,
        exported_at: Utc::now(),
        clients: store.list_records(Table::Clients)?,
        tasks: store.list_records(Table::Tasks)?,
        jobs: store.list_records(Table::Jobs)?,
        job_templates: store.list_records(Table::JobTemplates)?,
    })
}

/// Replace the store's contents with the snapshot's.
///
/// Existing records are deleted children-first, then the snapshot is
/// recreated parents-first with references remapped to the new ids.
///
/// # Errors
///
/// `Validation` for an unsupported snapshot version, `FieldContract` for a
/// reference the snapshot does not resolve, `WriteFailed` if a store write
/// does not land mid-restore.
pub fn import_snapshot(store: &mut dyn RecordStore, snapshot: &Snapshot) -> Result<ImportSummary> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SprintError::validation(
            "version",
            format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            ),
        ));
    }

    for table in [Table::Tasks, Table::Jobs, Table::JobTemplates, Table::Clients] {
        for record in store.list_records(table)? {
            store.delete_record(table, &record.id)?;
        }
    }

    let mut ids: HashMap<String, String> = HashMap::new();
    let summary = ImportSummary {
        clients: restore_table(store, Table::Clients, &snapshot.clients, &[], &mut ids)?,
        job_templates: restore_table(
            store,
            Table::JobTemplates,
            &snapshot.job_templates,
            &[],
            &mut ids,
        )?,
        jobs: restore_table(
            store,
            Table::Jobs,
            &snapshot.jobs,
            &[fields::JOB_CLIENT, fields::JOB_TEMPLATE],
            &mut ids,
        )?,
        tasks: restore_table(
            store,
            Table::Tasks,
            &snapshot.tasks,
            &[fields::TASK_CLIENT, fields::TASK_JOB],
            &mut ids,
        )?,
    };

    info!(
        clients = summary.clients,
        tasks = summary.tasks,
        jobs = summary.jobs,
        templates = summary.job_templates,
        "Imported snapshot"
    );
    Ok(summary)
}

/// Recreate one table's records in snapshot order, recording the id each
/// one came back with.
fn restore_table(
    store: &mut dyn RecordStore,
    table: Table,
    records: &[Record],
    ref_fields: &[&str],
    ids: &mut HashMap<String, String>,
) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    let batch: Vec<FieldMap> = records
        .iter()
        .map(|record| remap_refs(table, record.fields.clone(), ref_fields, ids))
        .collect::<Result<_>>()?;
    let created = store.create_records(table, batch)?;
    for (old, new) in records.iter().zip(&created) {
        ids.insert(old.id.clone(), new.id.clone());
    }
    Ok(created.len())
}

/// Rewrite reference-list fields through the id map. A reference to a
/// record the snapshot does not contain is a broken backup, not something
/// to import silently.
fn remap_refs(
    table: Table,
    mut fields: FieldMap,
    ref_fields: &[&str],
    ids: &HashMap<String, String>,
) -> Result<FieldMap> {
    for name in ref_fields {
        if let Some(Value::Array(items)) = fields.get_mut(*name) {
            for item in items.iter_mut() {
                if let Value::String(id) = item {
                    match ids.get(id.as_str()) {
                        Some(new_id) => *id = new_id.clone(),
                        None => {
                            return Err(SprintError::field_contract(
                                table.as_str(),
                                *name,
                                format!("snapshot reference '{id}' does not resolve"),
                            ));
                        }
                    }
                }
            }
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LocalStore;
    use serde_json::json;

    fn seeded_store() -> LocalStore {
        let mut store = LocalStore::in_memory();
        let clients = store
            .create_records(
                Table::Clients,
                vec![FieldMap::from_iter([
                    ("Name".to_string(), json!("Acme")),
                    ("Start Date".to_string(), json!("2024-06-01")),
                    ("Has Sprint".to_string(), json!(true)),
                ])],
            )
            .unwrap();
        let jobs = store
            .create_records(
                Table::Jobs,
                vec![FieldMap::from_iter([
                    ("Name".to_string(), json!("June invoices")),
                    ("Client".to_string(), json!([clients[0].id])),
                    ("Created".to_string(), json!("2024-06-01T10:00:00Z")),
                ])],
            )
            .unwrap();
        store
            .create_records(
                Table::Tasks,
                vec![
                    FieldMap::from_iter([
                        ("Task ID".to_string(), json!("gbp")),
                        ("Client".to_string(), json!([clients[0].id])),
                        ("Completed".to_string(), json!(true)),
                    ]),
                    FieldMap::from_iter([
                        ("Task ID".to_string(), json!("jt-abc12345")),
                        ("Client".to_string(), json!([clients[0].id])),
                        ("Job".to_string(), json!([jobs[0].id])),
                    ]),
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn export_captures_all_tables() {
        let store = seeded_store();
        let snapshot = export_snapshot(&store).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.clients.len(), 1);
        assert_eq!(snapshot.jobs.len(), 1);
        assert_eq!(snapshot.tasks.len(), 2);
        assert!(snapshot.job_templates.is_empty());
    }

    #[test]
    fn import_remaps_references_to_new_ids() {
        let snapshot = export_snapshot(&seeded_store()).unwrap();

        let mut target = LocalStore::in_memory();
        let summary = import_snapshot(&mut target, &snapshot).unwrap();
        assert_eq!(summary.clients, 1);
        assert_eq!(summary.tasks, 2);

        let client_id = target.list_records(Table::Clients).unwrap()[0].id.clone();
        let job_id = target.list_records(Table::Jobs).unwrap()[0].id.clone();
        for task in target.list_records(Table::Tasks).unwrap() {
            assert_eq!(task.fields.get("Client"), Some(&json!([client_id])));
        }
        let job = &target.list_records(Table::Jobs).unwrap()[0];
        assert_eq!(job.fields.get("Client"), Some(&json!([client_id])));
        let job_task = target
            .list_records(Table::Tasks)
            .unwrap()
            .into_iter()
            .find(|t| t.fields.contains_key("Job"))
            .unwrap();
        assert_eq!(job_task.fields.get("Job"), Some(&json!([job_id])));
    }

    #[test]
    fn import_replaces_existing_contents() {
        let snapshot = export_snapshot(&seeded_store()).unwrap();

        let mut target = LocalStore::in_memory();
        target
            .create_records(
                Table::Clients,
                vec![FieldMap::from_iter([(
                    "Name".to_string(),
                    json!("Globex"),
                )])],
            )
            .unwrap();

        import_snapshot(&mut target, &snapshot).unwrap();
        let clients = target.list_records(Table::Clients).unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].fields.get("Name"), Some(&json!("Acme")));
    }

    #[test]
    fn import_rejects_unsupported_version() {
        let mut snapshot = export_snapshot(&seeded_store()).unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;

        let mut target = LocalStore::in_memory();
        assert!(matches!(
            import_snapshot(&mut target, &snapshot),
            Err(SprintError::Validation { .. })
        ));
    }

    #[test]
    fn import_rejects_dangling_reference() {
        let mut snapshot = export_snapshot(&seeded_store()).unwrap();
        snapshot.clients.clear();

        let mut target = LocalStore::in_memory();
        assert!(matches!(
            import_snapshot(&mut target, &snapshot),
            Err(SprintError::FieldContract { .. })
        ));
    }
}
