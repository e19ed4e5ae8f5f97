//! Template expansion scenarios.

mod common;

use common::{date, test_engine};
use sprintdeck::SprintError;
use sprintdeck::model::{JobStatus, JobType};

/// A 3-line template with an interior blank line materializes exactly
/// three task records, in template order, all incomplete.
#[test]
fn blank_lines_are_skipped_and_order_kept() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    let template = engine
        .create_template(
            "Invoice run",
            "Billing",
            "Call client\nSend invoice\n\nConfirm receipt",
        )
        .unwrap();

    let (job, tasks) = engine
        .materialize_job(&acme.id, "June invoices", JobType::Recurring, Some(&template.id))
        .unwrap();

    assert_eq!(tasks.len(), 3);
    let notes: Vec<&str> = tasks.iter().map(|t| t.notes.as_str()).collect();
    assert_eq!(notes, vec!["Call client", "Send invoice", "Confirm receipt"]);
    assert!(tasks.iter().all(|t| !t.completed));
    assert_eq!(engine.job_tasks(&job.id).len(), 3);

    // Tokens are unique within the job.
    let mut ids: Vec<&str> = tasks.iter().map(|t| t.task_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn template_resolves_by_name_case_insensitively() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    engine
        .create_template("Invoice Run", "Billing", "Call client")
        .unwrap();

    let (job, tasks) = engine
        .materialize_job(&acme.id, "July invoices", JobType::Job, Some("invoice run"))
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(job.status, JobStatus::Active);

    assert!(matches!(
        engine.materialize_job(&acme.id, "Nope", JobType::Job, Some("missing")),
        Err(SprintError::TemplateNotFound { .. })
    ));
}

#[test]
fn job_without_template_has_no_tasks() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    let (job, tasks) = engine
        .materialize_job(&acme.id, "Ad-hoc", JobType::Job, None)
        .unwrap();
    assert!(tasks.is_empty());
    assert!(job.template_id.is_none());
}

#[test]
fn job_delete_cascades_over_its_tasks() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    let template = engine
        .create_template("Invoice run", "", "Call client\nSend invoice")
        .unwrap();
    let (job, _) = engine
        .materialize_job(&acme.id, "June invoices", JobType::Job, Some(&template.id))
        .unwrap();

    engine.delete_job(&job.id).unwrap();
    assert!(engine.tasks().is_empty());
    assert!(engine.jobs().is_empty());
    // Templates survive job deletion.
    assert_eq!(engine.templates().len(), 1);
}
