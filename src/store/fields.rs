//! The per-table field contract.
//!
//! Field names here are a bit-exact contract with the backing store
//! ("Completed Date", "Client" as a single-element reference list, and so
//! on). Every conversion between raw records and typed entities lives in
//! this module so the rest of the crate never touches untyped field maps.

use crate::error::{Result, SprintError};
use crate::model::{Client, Job, JobTemplate, TaskRecord};
use crate::store::{FieldMap, Record, Table};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Value, json};

const DATE_FORMAT: &str = "%Y-%m-%d";

// Clients table
pub const CLIENT_NAME: &str = "Name";
pub const CLIENT_START_DATE: &str = "Start Date";
pub const CLIENT_STATUS: &str = "Status";
pub const CLIENT_HAS_SPRINT: &str = "Has Sprint";
pub const CLIENT_FAILURE_MODE: &str = "Failure Mode";

// Tasks table
pub const TASK_TASK_ID: &str = "Task ID";
pub const TASK_CLIENT: &str = "Client";
pub const TASK_JOB: &str = "Job";
pub const TASK_COMPLETED: &str = "Completed";
pub const TASK_COMPLETED_DATE: &str = "Completed Date";
pub const TASK_COMPLETED_BY: &str = "Completed By";
pub const TASK_NOTES: &str = "Notes";
pub const TASK_ASSIGNED_TO: &str = "Assigned To";
pub const TASK_DUE_DATE: &str = "Due Date";

// Jobs table
pub const JOB_NAME: &str = "Name";
pub const JOB_CLIENT: &str = "Client";
pub const JOB_TEMPLATE: &str = "Template";
pub const JOB_TYPE: &str = "Type";
pub const JOB_STATUS: &str = "Status";
pub const JOB_CREATED: &str = "Created";

// Job Templates table
pub const TEMPLATE_NAME: &str = "Name";
pub const TEMPLATE_CATEGORY: &str = "Category";
pub const TEMPLATE_SUB_TASKS: &str = "SubTasks";

// ============================================================================
// Field extraction helpers
// ============================================================================

fn get_str(table: Table, fields: &FieldMap, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SprintError::field_contract(
            table.as_str(),
            name,
            "expected a string",
        )),
        None => Err(SprintError::field_contract(
            table.as_str(),
            name,
            "missing required field",
        )),
    }
}

fn get_opt_str(table: Table, fields: &FieldMap, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SprintError::field_contract(
            table.as_str(),
            name,
            "expected a string",
        )),
    }
}

fn get_bool(table: Table, fields: &FieldMap, name: &str) -> Result<bool> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SprintError::field_contract(
            table.as_str(),
            name,
            "expected a checkbox",
        )),
    }
}

fn get_date(table: Table, fields: &FieldMap, name: &str) -> Result<Option<NaiveDate>> {
    match get_opt_str(table, fields, name)? {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                SprintError::field_contract(table.as_str(), name, format!("bad date '{s}'"))
            }),
    }
}

fn get_timestamp(table: Table, fields: &FieldMap, name: &str) -> Result<DateTime<Utc>> {
    let s = get_str(table, fields, name)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| SprintError::field_contract(table.as_str(), name, format!("bad timestamp '{s}'")))
}

/// Extract a single-element reference list ("Client": \["recXYZ"\]).
fn get_ref(table: Table, fields: &FieldMap, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => Ok(None),
            [Value::String(id)] => Ok(Some(id.clone())),
            _ => Err(SprintError::field_contract(
                table.as_str(),
                name,
                "expected a single-element reference list",
            )),
        },
        Some(_) => Err(SprintError::field_contract(
            table.as_str(),
            name,
            "expected a reference list",
        )),
    }
}

fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

// ============================================================================
// Clients
// ============================================================================

/// Serialize a client's fields (id excluded; the store assigns it).
#[must_use]
pub fn client_fields(client: &Client) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(CLIENT_NAME.to_string(), json!(client.name));
    fields.insert(CLIENT_START_DATE.to_string(), date_value(client.start_date));
    fields.insert(CLIENT_STATUS.to_string(), json!(client.status.as_str()));
    fields.insert(CLIENT_HAS_SPRINT.to_string(), json!(client.has_sprint));
    if let Some(mode) = client.failure_mode {
        fields.insert(CLIENT_FAILURE_MODE.to_string(), json!(mode.as_str()));
    }
    fields
}

/// Parse a raw Clients record into a typed `Client`.
///
/// # Errors
///
/// Returns a `FieldContract` error naming the offending field.
pub fn client_from_record(record: &Record) -> Result<Client> {
    let table = Table::Clients;
    let fields = &record.fields;

    let failure_mode = get_opt_str(table, fields, CLIENT_FAILURE_MODE)?
        .map(|s| s.parse())
        .transpose()?;

    Ok(Client {
        id: record.id.clone(),
        name: get_str(table, fields, CLIENT_NAME)?,
        start_date: get_date(table, fields, CLIENT_START_DATE)?.ok_or_else(|| {
            SprintError::field_contract(table.as_str(), CLIENT_START_DATE, "missing required field")
        })?,
        status: match get_opt_str(table, fields, CLIENT_STATUS)? {
            Some(s) => s.parse()?,
            None => Default::default(),
        },
        has_sprint: get_bool(table, fields, CLIENT_HAS_SPRINT)?,
        failure_mode,
    })
}

/// Build the partial update that flips a client's sprint flag.
#[must_use]
pub fn client_sprint_update(has_sprint: bool) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(CLIENT_HAS_SPRINT.to_string(), json!(has_sprint));
    fields
}

/// Build the partial update for a failure-mode declaration. `None` clears
/// the diagnosis.
#[must_use]
pub fn client_failure_mode_update(mode: Option<crate::model::FailureMode>) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(
        CLIENT_FAILURE_MODE.to_string(),
        mode.map_or(Value::Null, |m| json!(m.as_str())),
    );
    fields
}

// ============================================================================
// Tasks
// ============================================================================

/// Serialize a task record's fields (id excluded).
#[must_use]
pub fn task_fields(task: &TaskRecord) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(TASK_TASK_ID.to_string(), json!(task.task_id));
    fields.insert(TASK_CLIENT.to_string(), json!([task.client_id]));
    if let Some(job_id) = &task.job_id {
        fields.insert(TASK_JOB.to_string(), json!([job_id]));
    }
    fields.insert(TASK_COMPLETED.to_string(), json!(task.completed));
    if let Some(date) = task.completed_at {
        fields.insert(TASK_COMPLETED_DATE.to_string(), date_value(date));
    }
    if let Some(by) = &task.completed_by {
        fields.insert(TASK_COMPLETED_BY.to_string(), json!(by));
    }
    if !task.notes.is_empty() {
        fields.insert(TASK_NOTES.to_string(), json!(task.notes));
    }
    if let Some(assignee) = &task.assigned_to {
        fields.insert(TASK_ASSIGNED_TO.to_string(), json!(assignee));
    }
    if let Some(due) = task.due_date {
        fields.insert(TASK_DUE_DATE.to_string(), date_value(due));
    }
    fields
}

/// Parse a raw Tasks record into a typed `TaskRecord`.
///
/// # Errors
///
/// Returns a `FieldContract` error naming the offending field.
pub fn task_from_record(record: &Record) -> Result<TaskRecord> {
    let table = Table::Tasks;
    let fields = &record.fields;

    Ok(TaskRecord {
        id: record.id.clone(),
        client_id: get_ref(table, fields, TASK_CLIENT)?.ok_or_else(|| {
            SprintError::field_contract(table.as_str(), TASK_CLIENT, "missing client reference")
        })?,
        job_id: get_ref(table, fields, TASK_JOB)?,
        task_id: get_str(table, fields, TASK_TASK_ID)?,
        completed: get_bool(table, fields, TASK_COMPLETED)?,
        completed_at: get_date(table, fields, TASK_COMPLETED_DATE)?,
        completed_by: get_opt_str(table, fields, TASK_COMPLETED_BY)?,
        notes: get_opt_str(table, fields, TASK_NOTES)?.unwrap_or_default(),
        assigned_to: get_opt_str(table, fields, TASK_ASSIGNED_TO)?,
        due_date: get_date(table, fields, TASK_DUE_DATE)?,
    })
}

/// Build the partial update that records a completion state change.
///
/// Completion metadata is written on the way up and cleared (nulled) on the
/// way down, keeping both toggle directions symmetric.
#[must_use]
pub fn task_completion_update(
    completed: bool,
    completed_at: Option<NaiveDate>,
    completed_by: Option<&str>,
) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(TASK_COMPLETED.to_string(), json!(completed));
    fields.insert(
        TASK_COMPLETED_DATE.to_string(),
        completed_at.map_or(Value::Null, date_value),
    );
    fields.insert(
        TASK_COMPLETED_BY.to_string(),
        completed_by.map_or(Value::Null, |by| json!(by)),
    );
    fields
}

/// Build the partial update for an assignment change.
#[must_use]
pub fn task_assignment_update(assigned_to: Option<&str>) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(
        TASK_ASSIGNED_TO.to_string(),
        assigned_to.map_or(Value::Null, |a| json!(a)),
    );
    fields
}

/// Build the partial update for a due-date change.
#[must_use]
pub fn task_due_date_update(due_date: Option<NaiveDate>) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(
        TASK_DUE_DATE.to_string(),
        due_date.map_or(Value::Null, date_value),
    );
    fields
}

// ============================================================================
// Jobs
// ============================================================================

/// Serialize a job's fields (id excluded).
#[must_use]
pub fn job_fields(job: &Job) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(JOB_NAME.to_string(), json!(job.name));
    fields.insert(JOB_CLIENT.to_string(), json!([job.client_id]));
    if let Some(template_id) = &job.template_id {
        fields.insert(JOB_TEMPLATE.to_string(), json!([template_id]));
    }
    fields.insert(JOB_TYPE.to_string(), json!(job.job_type.as_str()));
    fields.insert(JOB_STATUS.to_string(), json!(job.status.as_str()));
    fields.insert(JOB_CREATED.to_string(), json!(job.created.to_rfc3339()));
    fields
}

/// Parse a raw Jobs record into a typed `Job`.
///
/// # Errors
///
/// Returns a `FieldContract` error naming the offending field.
pub fn job_from_record(record: &Record) -> Result<Job> {
    let table = Table::Jobs;
    let fields = &record.fields;

    Ok(Job {
        id: record.id.clone(),
        name: get_str(table, fields, JOB_NAME)?,
        client_id: get_ref(table, fields, JOB_CLIENT)?.ok_or_else(|| {
            SprintError::field_contract(table.as_str(), JOB_CLIENT, "missing client reference")
        })?,
        template_id: get_ref(table, fields, JOB_TEMPLATE)?,
        job_type: match get_opt_str(table, fields, JOB_TYPE)? {
            Some(s) => s.parse()?,
            None => Default::default(),
        },
        status: match get_opt_str(table, fields, JOB_STATUS)? {
            Some(s) => s.parse()?,
            None => Default::default(),
        },
        created: get_timestamp(table, fields, JOB_CREATED)?,
    })
}

/// Build the partial update for a job status change.
#[must_use]
pub fn job_status_update(status: crate::model::JobStatus) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(JOB_STATUS.to_string(), json!(status.as_str()));
    fields
}

// ============================================================================
// Job Templates
// ============================================================================

/// Serialize a template's fields (id excluded).
#[must_use]
pub fn template_fields(template: &JobTemplate) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(TEMPLATE_NAME.to_string(), json!(template.name));
    if !template.category.is_empty() {
        fields.insert(TEMPLATE_CATEGORY.to_string(), json!(template.category));
    }
    fields.insert(TEMPLATE_SUB_TASKS.to_string(), json!(template.sub_tasks));
    fields
}

/// Parse a raw Job Templates record into a typed `JobTemplate`.
///
/// # Errors
///
/// Returns a `FieldContract` error naming the offending field.
pub fn template_from_record(record: &Record) -> Result<JobTemplate> {
    let table = Table::JobTemplates;
    let fields = &record.fields;

    Ok(JobTemplate {
        id: record.id.clone(),
        name: get_str(table, fields, TEMPLATE_NAME)?,
        category: get_opt_str(table, fields, TEMPLATE_CATEGORY)?.unwrap_or_default(),
        sub_tasks: get_opt_str(table, fields, TEMPLATE_SUB_TASKS)?.unwrap_or_default(),
    })
}
