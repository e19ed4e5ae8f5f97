//! The task reconciliation engine.
//!
//! The engine owns the record store, the injected catalogue, and an
//! in-memory projection of all four tables loaded once at startup. Every
//! mutation performs exactly one logical store write and applies the
//! store's canonical result to the projection only after the write is
//! confirmed, so a failed write leaves the projection at the last
//! confirmed store state.
//!
//! Sprint completion state is reconciled lazily: a catalogue item with no
//! task record is incomplete, and the record is created on the first
//! toggle. Job tasks are the opposite: materialized up front when a job is
//! instantiated from a template.

use crate::catalogue::Catalogue;
use crate::error::{Result, SprintError};
use crate::model::{
    Client, ClientStatus, FailureMode, Job, JobStatus, JobTemplate, JobType, TaskRecord,
    normalize_client_name,
};
use crate::store::{FieldMap, RecordStore, RecordUpdate, Table, fields};
use crate::util::{TokenGenerator, time};
use chrono::Utc;
use tracing::{debug, info};

/// The reconciliation engine and its in-memory projection.
pub struct Engine {
    store: Box<dyn RecordStore>,
    catalogue: &'static Catalogue,
    tokens: TokenGenerator,
    clients: Vec<Client>,
    tasks: Vec<TaskRecord>,
    jobs: Vec<Job>,
    templates: Vec<JobTemplate>,
}

impl Engine {
    /// Load the full projection from the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if any table cannot be read, or a
    /// `FieldContract` error if a record violates the field contract.
    /// Either way the load is fatal; there is no partial projection.
    pub fn load(store: Box<dyn RecordStore>, catalogue: &'static Catalogue) -> Result<Self> {
        let clients = store
            .list_records(Table::Clients)?
            .iter()
            .map(fields::client_from_record)
            .collect::<Result<Vec<_>>>()?;
        let tasks = store
            .list_records(Table::Tasks)?
            .iter()
            .map(fields::task_from_record)
            .collect::<Result<Vec<_>>>()?;
        let jobs = store
            .list_records(Table::Jobs)?
            .iter()
            .map(fields::job_from_record)
            .collect::<Result<Vec<_>>>()?;
        let templates = store
            .list_records(Table::JobTemplates)?
            .iter()
            .map(fields::template_from_record)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            clients = clients.len(),
            tasks = tasks.len(),
            jobs = jobs.len(),
            templates = templates.len(),
            "Loaded projection"
        );

        Ok(Self {
            store,
            catalogue,
            tokens: TokenGenerator::default(),
            clients,
            tasks,
            jobs,
            templates,
        })
    }

    // ========================================================================
    // Projection accessors
    // ========================================================================

    #[must_use]
    pub fn catalogue(&self) -> &'static Catalogue {
        self.catalogue
    }

    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    #[must_use]
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    #[must_use]
    pub fn templates(&self) -> &[JobTemplate] {
        &self.templates
    }

    /// Resolve a client by display name (case-insensitive, trimmed).
    ///
    /// # Errors
    ///
    /// Returns `ClientNotFound` if no client matches.
    pub fn resolve_client(&self, name: &str) -> Result<&Client> {
        let normalized = normalize_client_name(name);
        self.clients
            .iter()
            .find(|c| c.normalized_name() == normalized)
            .ok_or_else(|| SprintError::ClientNotFound {
                name: name.trim().to_string(),
            })
    }

    /// Look up a job by id.
    ///
    /// # Errors
    ///
    /// Returns `JobNotFound` if the id is unknown.
    pub fn resolve_job(&self, id: &str) -> Result<&Job> {
        self.jobs
            .iter()
            .find(|j| j.id == id)
            .ok_or_else(|| SprintError::JobNotFound { id: id.to_string() })
    }

    /// Resolve a template by id or (case-insensitive) name.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` if nothing matches.
    pub fn resolve_template(&self, id_or_name: &str) -> Result<&JobTemplate> {
        let lowered = id_or_name.trim().to_lowercase();
        self.templates
            .iter()
            .find(|t| t.id == id_or_name || t.name.to_lowercase() == lowered)
            .ok_or_else(|| SprintError::TemplateNotFound {
                id: id_or_name.to_string(),
            })
    }

    /// Find the task record for `(client_id, task_id, job_id)`.
    ///
    /// At most one record matches; the key is the reconciliation identity.
    #[must_use]
    pub fn find_record(
        &self,
        client_id: &str,
        task_id: &str,
        job_id: Option<&str>,
    ) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| {
            t.client_id == client_id && t.task_id == task_id && t.job_id.as_deref() == job_id
        })
    }

    /// A job's task records in creation order.
    #[must_use]
    pub fn job_tasks(&self, job_id: &str) -> Vec<&TaskRecord> {
        self.tasks
            .iter()
            .filter(|t| t.job_id.as_deref() == Some(job_id))
            .collect()
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Flip the completion state of one task for one client.
    ///
    /// Sprint tasks are created lazily: the first toggle of a catalogue
    /// item creates the record already completed. Job tasks must already
    /// exist (they are materialized with their job). Completion metadata is
    /// stamped on the way up and cleared on the way down.
    ///
    /// # Errors
    ///
    /// `MissingActor` if `actor` is blank; `ClientRecordNotFound`,
    /// `ItemNotFound` or `TaskNotFound` on bad identity; `WriteFailed` if
    /// the store write does not land (projection unchanged).
    pub fn toggle_completion(
        &mut self,
        client_id: &str,
        task_id: &str,
        job_id: Option<&str>,
        actor: &str,
    ) -> Result<TaskRecord> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(SprintError::MissingActor);
        }
        if !self.clients.iter().any(|c| c.id == client_id) {
            return Err(SprintError::ClientRecordNotFound {
                id: client_id.to_string(),
            });
        }

        if let Some(existing) = self.find_record(client_id, task_id, job_id) {
            let now_completed = !existing.completed;
            let update = if now_completed {
                fields::task_completion_update(true, Some(time::today()), Some(actor))
            } else {
                fields::task_completion_update(false, None, None)
            };
            let updated = self.store.update_records(
                Table::Tasks,
                vec![RecordUpdate {
                    id: existing.id.clone(),
                    fields: update,
                }],
            )?;
            let task = fields::task_from_record(&updated[0])?;
            info!(task_id, client_id, completed = now_completed, "Toggled task");
            self.commit_task(task.clone());
            return Ok(task);
        }

        match job_id {
            // Job tasks are materialized with their job; an unknown token
            // is an identity error, not a lazy-create trigger.
            Some(_) => Err(SprintError::TaskNotFound {
                id: task_id.to_string(),
            }),
            None => {
                if !self.catalogue.contains_item(task_id) {
                    return Err(SprintError::ItemNotFound {
                        id: task_id.to_string(),
                    });
                }
                let task = TaskRecord {
                    id: String::new(),
                    client_id: client_id.to_string(),
                    job_id: None,
                    task_id: task_id.to_string(),
                    completed: true,
                    completed_at: Some(time::today()),
                    completed_by: Some(actor.to_string()),
                    notes: String::new(),
                    assigned_to: None,
                    due_date: None,
                };
                let created = self
                    .store
                    .create_records(Table::Tasks, vec![fields::task_fields(&task)])?;
                let task = fields::task_from_record(&created[0])?;
                info!(task_id, client_id, "Created completion record");
                self.commit_task(task.clone());
                Ok(task)
            }
        }
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Create a client with an active sprint, or with `merge` re-enable the
    /// sprint on an existing client of the same name.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `DuplicateClient` if the name is
    /// taken and `merge` is off.
    pub fn create_client(
        &mut self,
        name: &str,
        start_date: chrono::NaiveDate,
        merge: bool,
    ) -> Result<Client> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SprintError::validation("name", "cannot be empty"));
        }

        let normalized = normalize_client_name(name);
        if let Some(existing) = self
            .clients
            .iter()
            .find(|c| c.normalized_name() == normalized)
        {
            if !merge {
                return Err(SprintError::DuplicateClient {
                    name: existing.name.clone(),
                });
            }
            let updated = self.store.update_records(
                Table::Clients,
                vec![RecordUpdate {
                    id: existing.id.clone(),
                    fields: fields::client_sprint_update(true),
                }],
            )?;
            let client = fields::client_from_record(&updated[0])?;
            info!(name = %client.name, "Merged sprint onto existing client");
            self.commit_client(client.clone());
            return Ok(client);
        }

        let client = Client {
            id: String::new(),
            name: name.to_string(),
            start_date,
            status: ClientStatus::Active,
            has_sprint: true,
            failure_mode: None,
        };
        let created = self
            .store
            .create_records(Table::Clients, vec![fields::client_fields(&client)])?;
        let client = fields::client_from_record(&created[0])?;
        info!(name = %client.name, id = %client.id, "Created client");
        self.clients.push(client.clone());
        Ok(client)
    }

    /// Soft-delete the sprint: clear `has_sprint` and remove the client's
    /// sprint task records. Jobs and job tasks are untouched.
    ///
    /// # Errors
    ///
    /// `WriteFailed` if a store write does not land; already-deleted task
    /// records do not abort the pass.
    pub fn remove_sprint(&mut self, client_id: &str) -> Result<Client> {
        let updated = self.store.update_records(
            Table::Clients,
            vec![RecordUpdate {
                id: client_id.to_string(),
                fields: fields::client_sprint_update(false),
            }],
        )?;
        let client = fields::client_from_record(&updated[0])?;
        self.commit_client(client.clone());

        let sprint_task_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.client_id == client_id && t.is_sprint_task())
            .map(|t| t.id.clone())
            .collect();
        self.delete_tasks(&sprint_task_ids)?;
        info!(client = %client.name, removed = sprint_task_ids.len(), "Removed sprint");
        Ok(client)
    }

    /// Hard-delete a client: cascade over task records, jobs, then the
    /// client itself. Records already gone are skipped, so an interrupted
    /// cascade can simply be re-run.
    ///
    /// # Errors
    ///
    /// `WriteFailed` on a transport/storage failure mid-cascade; the
    /// projection reflects exactly the deletes that landed.
    pub fn delete_client(&mut self, client_id: &str) -> Result<()> {
        let task_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.client_id == client_id)
            .map(|t| t.id.clone())
            .collect();
        self.delete_tasks(&task_ids)?;

        let job_ids: Vec<String> = self
            .jobs
            .iter()
            .filter(|j| j.client_id == client_id)
            .map(|j| j.id.clone())
            .collect();
        for job_id in &job_ids {
            self.store.delete_record(Table::Jobs, job_id)?;
            self.jobs.retain(|j| &j.id != job_id);
        }

        self.store.delete_record(Table::Clients, client_id)?;
        self.clients.retain(|c| c.id != client_id);
        info!(client_id, tasks = task_ids.len(), jobs = job_ids.len(), "Deleted client");
        Ok(())
    }

    /// Declare (or with `None` clear) a client's diagnosed failure mode.
    ///
    /// # Errors
    ///
    /// `WriteFailed` if the store write does not land.
    pub fn set_failure_mode(
        &mut self,
        client_id: &str,
        mode: Option<FailureMode>,
    ) -> Result<Client> {
        let updated = self.store.update_records(
            Table::Clients,
            vec![RecordUpdate {
                id: client_id.to_string(),
                fields: fields::client_failure_mode_update(mode),
            }],
        )?;
        let client = fields::client_from_record(&updated[0])?;
        self.commit_client(client.clone());
        Ok(client)
    }

    // ========================================================================
    // Jobs and templates
    // ========================================================================

    /// Create a job and, when built from a template, materialize its task
    /// records in one batch write: either every sub-task lands or none do.
    ///
    /// # Errors
    ///
    /// `ClientRecordNotFound` / `TemplateNotFound` on bad identity,
    /// `WriteFailed` if either write does not land.
    pub fn materialize_job(
        &mut self,
        client_id: &str,
        name: &str,
        job_type: JobType,
        template_id: Option<&str>,
    ) -> Result<(Job, Vec<TaskRecord>)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SprintError::validation("name", "cannot be empty"));
        }
        if !self.clients.iter().any(|c| c.id == client_id) {
            return Err(SprintError::ClientRecordNotFound {
                id: client_id.to_string(),
            });
        }
        let template = template_id
            .map(|id| self.resolve_template(id).cloned())
            .transpose()?;

        let job = Job {
            id: String::new(),
            name: name.to_string(),
            client_id: client_id.to_string(),
            template_id: template.as_ref().map(|t| t.id.clone()),
            job_type,
            status: JobStatus::Active,
            created: Utc::now(),
        };
        let created = self
            .store
            .create_records(Table::Jobs, vec![fields::job_fields(&job)])?;
        let job = fields::job_from_record(&created[0])?;
        self.jobs.push(job.clone());

        let mut tasks = Vec::new();
        if let Some(template) = &template {
            let mut minted: Vec<String> = Vec::new();
            let batch: Vec<FieldMap> = template
                .sub_task_lines()
                .iter()
                .enumerate()
                .map(|(index, line)| {
                    let token = self.tokens.generate(
                        &format!("{}|{line}|{index}", job.id),
                        |candidate| {
                            minted.iter().any(|t| t == candidate)
                                || self.tasks.iter().any(|t| t.task_id == candidate)
                        },
                    );
                    minted.push(token.clone());
                    let task = TaskRecord {
                        id: String::new(),
                        client_id: client_id.to_string(),
                        job_id: Some(job.id.clone()),
                        task_id: token,
                        completed: false,
                        completed_at: None,
                        completed_by: None,
                        notes: (*line).to_string(),
                        assigned_to: None,
                        due_date: None,
                    };
                    fields::task_fields(&task)
                })
                .collect();

            if !batch.is_empty() {
                let created = self.store.create_records(Table::Tasks, batch)?;
                for record in &created {
                    let task = fields::task_from_record(record)?;
                    self.tasks.push(task.clone());
                    tasks.push(task);
                }
            }
        }

        info!(job = %job.name, id = %job.id, tasks = tasks.len(), "Materialized job");
        Ok((job, tasks))
    }

    /// Cascade-delete a job and its task records. Idempotent like client
    /// deletion.
    ///
    /// # Errors
    ///
    /// `WriteFailed` on a transport/storage failure mid-cascade.
    pub fn delete_job(&mut self, job_id: &str) -> Result<()> {
        let task_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| t.job_id.as_deref() == Some(job_id))
            .map(|t| t.id.clone())
            .collect();
        self.delete_tasks(&task_ids)?;

        self.store.delete_record(Table::Jobs, job_id)?;
        self.jobs.retain(|j| j.id != job_id);
        info!(job_id, tasks = task_ids.len(), "Deleted job");
        Ok(())
    }

    /// Mark a job complete. Its task records keep their individual states.
    ///
    /// # Errors
    ///
    /// `JobNotFound` on bad identity, `WriteFailed` if the write fails.
    pub fn complete_job(&mut self, job_id: &str) -> Result<Job> {
        self.resolve_job(job_id)?;
        let updated = self.store.update_records(
            Table::Jobs,
            vec![RecordUpdate {
                id: job_id.to_string(),
                fields: fields::job_status_update(JobStatus::Complete),
            }],
        )?;
        let job = fields::job_from_record(&updated[0])?;
        if let Some(slot) = self.jobs.iter_mut().find(|j| j.id == job.id) {
            *slot = job.clone();
        }
        Ok(job)
    }

    /// Create a reusable job template.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `WriteFailed` if the write fails.
    pub fn create_template(
        &mut self,
        name: &str,
        category: &str,
        sub_tasks: &str,
    ) -> Result<JobTemplate> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SprintError::validation("name", "cannot be empty"));
        }
        let template = JobTemplate {
            id: String::new(),
            name: name.to_string(),
            category: category.trim().to_string(),
            sub_tasks: sub_tasks.to_string(),
        };
        let created = self
            .store
            .create_records(Table::JobTemplates, vec![fields::template_fields(&template)])?;
        let template = fields::template_from_record(&created[0])?;
        self.templates.push(template.clone());
        Ok(template)
    }

    // ========================================================================
    // Custom tasks, assignment, due dates
    // ========================================================================

    /// Add a legacy custom sprint task. It carries a generated `custom-`
    /// token and the label as its notes, and counts toward overall sprint
    /// progress.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank label, `WriteFailed` if the write fails.
    pub fn add_custom_task(&mut self, client_id: &str, label: &str) -> Result<TaskRecord> {
        let label = label.trim();
        if label.is_empty() {
            return Err(SprintError::validation("label", "cannot be empty"));
        }
        if !self.clients.iter().any(|c| c.id == client_id) {
            return Err(SprintError::ClientRecordNotFound {
                id: client_id.to_string(),
            });
        }
        let token = self
            .tokens
            .generate_with_prefix("custom", &format!("{client_id}|{label}"), |candidate| {
                self.tasks
                    .iter()
                    .any(|t| t.client_id == client_id && t.task_id == candidate)
            });
        let task = TaskRecord {
            id: String::new(),
            client_id: client_id.to_string(),
            job_id: None,
            task_id: token,
            completed: false,
            completed_at: None,
            completed_by: None,
            notes: label.to_string(),
            assigned_to: None,
            due_date: None,
        };
        let created = self
            .store
            .create_records(Table::Tasks, vec![fields::task_fields(&task)])?;
        let task = fields::task_from_record(&created[0])?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Assign (or with `None` unassign) a task. Missing sprint records are
    /// materialized incomplete first.
    ///
    /// # Errors
    ///
    /// Identity errors as in `toggle_completion`; `WriteFailed` if the
    /// write does not land.
    pub fn assign_task(
        &mut self,
        client_id: &str,
        task_id: &str,
        job_id: Option<&str>,
        assignee: Option<&str>,
    ) -> Result<TaskRecord> {
        self.update_or_materialize(
            client_id,
            task_id,
            job_id,
            fields::task_assignment_update(assignee),
        )
    }

    /// Set (or with `None` clear) a task's due date. Missing sprint records
    /// are materialized incomplete first.
    ///
    /// # Errors
    ///
    /// Identity errors as in `toggle_completion`; `WriteFailed` if the
    /// write does not land.
    pub fn set_due_date(
        &mut self,
        client_id: &str,
        task_id: &str,
        job_id: Option<&str>,
        due_date: Option<chrono::NaiveDate>,
    ) -> Result<TaskRecord> {
        self.update_or_materialize(
            client_id,
            task_id,
            job_id,
            fields::task_due_date_update(due_date),
        )
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Apply a field update to the task identified by the reconciliation
    /// key, creating an incomplete sprint record first when none exists.
    fn update_or_materialize(
        &mut self,
        client_id: &str,
        task_id: &str,
        job_id: Option<&str>,
        update: FieldMap,
    ) -> Result<TaskRecord> {
        if !self.clients.iter().any(|c| c.id == client_id) {
            return Err(SprintError::ClientRecordNotFound {
                id: client_id.to_string(),
            });
        }

        let record_id = match self.find_record(client_id, task_id, job_id) {
            Some(existing) => existing.id.clone(),
            None => match job_id {
                Some(_) => {
                    return Err(SprintError::TaskNotFound {
                        id: task_id.to_string(),
                    });
                }
                None => {
                    if !self.catalogue.contains_item(task_id) {
                        return Err(SprintError::ItemNotFound {
                            id: task_id.to_string(),
                        });
                    }
                    let task = TaskRecord {
                        id: String::new(),
                        client_id: client_id.to_string(),
                        job_id: None,
                        task_id: task_id.to_string(),
                        completed: false,
                        completed_at: None,
                        completed_by: None,
                        notes: String::new(),
                        assigned_to: None,
                        due_date: None,
                    };
                    let created = self
                        .store
                        .create_records(Table::Tasks, vec![fields::task_fields(&task)])?;
                    let task = fields::task_from_record(&created[0])?;
                    let id = task.id.clone();
                    self.tasks.push(task);
                    id
                }
            },
        };

        let updated = self.store.update_records(
            Table::Tasks,
            vec![RecordUpdate {
                id: record_id,
                fields: update,
            }],
        )?;
        let task = fields::task_from_record(&updated[0])?;
        self.commit_task(task.clone());
        Ok(task)
    }

    /// Delete task records one by one, committing each confirmed delete.
    /// An id the store no longer knows is skipped, not an error.
    fn delete_tasks(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.store.delete_record(Table::Tasks, id)?;
            self.tasks.retain(|t| &t.id != id);
        }
        Ok(())
    }

    fn commit_task(&mut self, task: TaskRecord) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        } else {
            self.tasks.push(task);
        }
    }

    fn commit_client(&mut self, client: Client) {
        if let Some(slot) = self.clients.iter_mut().find(|c| c.id == client.id) {
            *slot = client;
        } else {
            self.clients.push(client);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::thirty_day_sprint;
    use crate::store::LocalStore;
    use chrono::NaiveDate;

    fn engine() -> Engine {
        Engine::load(Box::new(LocalStore::in_memory()), thirty_day_sprint()).unwrap()
    }

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn first_toggle_creates_completed_record() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();

        let task = engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();
        assert!(task.completed);
        assert_eq!(task.completed_by.as_deref(), Some("Jordan"));
        assert!(task.completed_at.is_some());
        assert_eq!(engine.tasks().len(), 1);
    }

    #[test]
    fn double_toggle_leaves_one_incomplete_record() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();

        engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();
        let task = engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();

        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert!(task.completed_by.is_none());
        assert_eq!(engine.tasks().len(), 1);
    }

    #[test]
    fn toggle_requires_actor() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let result = engine.toggle_completion(&client.id, "gbp", None, "  ");
        assert!(matches!(result, Err(SprintError::MissingActor)));
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn toggle_rejects_stale_client_id() {
        let mut engine = engine();
        match engine.toggle_completion("rec000099", "gbp", None, "Jordan") {
            Err(SprintError::ClientRecordNotFound { id }) => assert_eq!(id, "rec000099"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn toggle_rejects_unknown_item() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let result = engine.toggle_completion(&client.id, "not-an-item", None, "Jordan");
        assert!(matches!(result, Err(SprintError::ItemNotFound { .. })));
    }

    #[test]
    fn duplicate_client_needs_merge() {
        let mut engine = engine();
        engine.create_client("Acme", start_date(), false).unwrap();

        let result = engine.create_client("  acme ", start_date(), false);
        assert!(matches!(result, Err(SprintError::DuplicateClient { .. })));

        let merged = engine.create_client("ACME", start_date(), true).unwrap();
        assert!(merged.has_sprint);
        assert_eq!(engine.clients().len(), 1);
    }

    #[test]
    fn remove_sprint_keeps_jobs() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();
        let template = engine
            .create_template("Invoice run", "Billing", "Call client\nSend invoice")
            .unwrap();
        engine
            .materialize_job(&client.id, "June invoices", JobType::Job, Some(&template.id))
            .unwrap();

        let client = engine.remove_sprint(&client.id).unwrap();
        assert!(!client.has_sprint);
        assert!(engine.tasks().iter().all(|t| !t.is_sprint_task()));
        assert_eq!(engine.jobs().len(), 1);
        assert_eq!(engine.tasks().len(), 2);
    }

    #[test]
    fn delete_client_cascades() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();
        engine
            .materialize_job(&client.id, "One-off", JobType::Job, None)
            .unwrap();

        engine.delete_client(&client.id).unwrap();
        assert!(engine.clients().is_empty());
        assert!(engine.tasks().is_empty());
        assert!(engine.jobs().is_empty());

        // Re-running the cascade over gone records is a no-op, not an error.
        engine.delete_client(&client.id).unwrap();
    }

    #[test]
    fn template_lines_materialize_in_order() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let template = engine
            .create_template(
                "Invoice run",
                "Billing",
                "Call client\nSend invoice\n\nConfirm receipt",
            )
            .unwrap();

        let (job, tasks) = engine
            .materialize_job(&client.id, "June invoices", JobType::Recurring, Some(&template.id))
            .unwrap();

        assert_eq!(tasks.len(), 3);
        let notes: Vec<&str> = tasks.iter().map(|t| t.notes.as_str()).collect();
        assert_eq!(notes, vec!["Call client", "Send invoice", "Confirm receipt"]);
        assert!(tasks.iter().all(|t| !t.completed));
        assert!(tasks.iter().all(|t| t.task_id.starts_with("jt-")));
        assert!(tasks.iter().all(|t| t.job_id.as_deref() == Some(job.id.as_str())));
        assert_eq!(job.template_id.as_deref(), Some(template.id.as_str()));
    }

    #[test]
    fn job_task_toggle_does_not_lazily_create() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let (job, _) = engine
            .materialize_job(&client.id, "One-off", JobType::Job, None)
            .unwrap();

        let result = engine.toggle_completion(&client.id, "jt-unknown", Some(&job.id), "Jordan");
        assert!(matches!(result, Err(SprintError::TaskNotFound { .. })));
    }

    #[test]
    fn delete_job_keeps_sprint_tasks() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        engine
            .toggle_completion(&client.id, "gbp", None, "Jordan")
            .unwrap();
        let template = engine
            .create_template("Invoice run", "", "Call client\nSend invoice")
            .unwrap();
        let (job, _) = engine
            .materialize_job(&client.id, "June invoices", JobType::Job, Some(&template.id))
            .unwrap();

        engine.delete_job(&job.id).unwrap();
        assert_eq!(engine.tasks().len(), 1);
        assert!(engine.tasks()[0].is_sprint_task());
        assert!(engine.jobs().is_empty());
    }

    #[test]
    fn complete_job_updates_status_only() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let template = engine
            .create_template("Invoice run", "", "Call client")
            .unwrap();
        let (job, tasks) = engine
            .materialize_job(&client.id, "June invoices", JobType::Job, Some(&template.id))
            .unwrap();

        let job = engine.complete_job(&job.id).unwrap();
        assert_eq!(job.status, JobStatus::Complete);
        assert!(!engine.find_record(&client.id, &tasks[0].task_id, Some(&job.id)).unwrap().completed);
    }

    #[test]
    fn custom_task_counts_as_sprint_scope() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let task = engine.add_custom_task(&client.id, "Fix the sign").unwrap();
        assert!(task.is_custom());
        assert_eq!(task.notes, "Fix the sign");
        assert!(!task.completed);

        // Custom tasks toggle like any other sprint record.
        let toggled = engine
            .toggle_completion(&client.id, &task.task_id, None, "Jordan")
            .unwrap();
        assert!(toggled.completed);
    }

    #[test]
    fn assignment_lazily_materializes_incomplete() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();

        let task = engine
            .assign_task(&client.id, "ga4", None, Some("Casey"))
            .unwrap();
        assert_eq!(task.assigned_to.as_deref(), Some("Casey"));
        assert!(!task.completed);
        assert_eq!(engine.tasks().len(), 1);

        let cleared = engine.assign_task(&client.id, "ga4", None, None).unwrap();
        assert!(cleared.assigned_to.is_none());
        assert_eq!(engine.tasks().len(), 1);
    }

    #[test]
    fn due_date_set_and_clear() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let (job, tasks) = {
            let template = engine
                .create_template("Invoice run", "", "Call client")
                .unwrap();
            engine
                .materialize_job(&client.id, "June invoices", JobType::Job, Some(&template.id))
                .unwrap()
        };

        let due = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let task = engine
            .set_due_date(&client.id, &tasks[0].task_id, Some(&job.id), Some(due))
            .unwrap();
        assert_eq!(task.due_date, Some(due));

        let task = engine
            .set_due_date(&client.id, &tasks[0].task_id, Some(&job.id), None)
            .unwrap();
        assert!(task.due_date.is_none());
    }

    #[test]
    fn failure_mode_roundtrip() {
        let mut engine = engine();
        let client = engine.create_client("Acme", start_date(), false).unwrap();
        let client = engine
            .set_failure_mode(&client.id, Some(FailureMode::NotTrusted))
            .unwrap();
        assert_eq!(client.failure_mode, Some(FailureMode::NotTrusted));

        let client = engine.set_failure_mode(&client.id, None).unwrap();
        assert!(client.failure_mode.is_none());
    }

    #[test]
    fn resolve_client_is_case_insensitive() {
        let mut engine = engine();
        engine.create_client("Austin Drilling", start_date(), false).unwrap();
        assert!(engine.resolve_client(" austin drilling ").is_ok());
        assert!(matches!(
            engine.resolve_client("globex"),
            Err(SprintError::ClientNotFound { .. })
        ));
    }
}
