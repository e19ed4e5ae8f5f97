//! Aggregation scenarios: progress sums, critical path, matrix ordering,
//! due-soon windows, and per-person workload.

mod common;

use common::{date, test_engine};
use sprintdeck::model::JobType;
use sprintdeck::report;

#[test]
fn empty_denominator_reads_zero_percent() {
    let progress = report::Progress::default();
    assert_eq!(progress.percent(), 0);
}

#[test]
fn overall_equals_section_sum_plus_custom() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();

    for item in ["gbp", "ga4", "pixel-install", "diag-declare", "hero-draft"] {
        engine
            .toggle_completion(&acme.id, item, None, "Jordan")
            .unwrap();
    }
    engine.add_custom_task(&acme.id, "Fix the sign").unwrap();
    let custom = engine
        .tasks()
        .iter()
        .find(|t| t.is_custom())
        .unwrap()
        .task_id
        .clone();
    engine
        .toggle_completion(&acme.id, &custom, None, "Jordan")
        .unwrap();

    let catalogue = engine.catalogue();
    let overall = report::overall_progress(catalogue, engine.tasks(), &acme.id);

    let mut sum_completed = 0;
    let mut sum_total = 0;
    for (_, section) in catalogue.traverse() {
        let p = report::section_progress(section, engine.tasks(), &acme.id);
        sum_completed += p.completed;
        sum_total += p.total;
    }
    let custom_p = report::custom_progress(engine.tasks(), &acme.id);

    assert_eq!(overall.completed, sum_completed + custom_p.completed);
    assert_eq!(overall.total, sum_total + custom_p.total);
    assert_eq!(overall.completed, 6);
}

#[test]
fn phase_sum_matches_overall_minus_custom() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    engine
        .toggle_completion(&acme.id, "launch-tracking", None, "Jordan")
        .unwrap();
    engine.add_custom_task(&acme.id, "Extra").unwrap();

    let catalogue = engine.catalogue();
    let mut phase_total = 0;
    for phase in catalogue.phases() {
        phase_total +=
            report::phase_progress(catalogue, phase, engine.tasks(), &acme.id).total;
    }
    let overall = report::overall_progress(catalogue, engine.tasks(), &acme.id);
    assert_eq!(phase_total, catalogue.item_count());
    assert_eq!(overall.total, phase_total + 1);
}

#[test]
fn critical_items_drop_off_as_completed() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();

    let before = report::critical_incomplete(engine.catalogue(), engine.tasks(), &acme.id);
    assert_eq!(before[0].item.id, "gbp");

    engine
        .toggle_completion(&acme.id, "gbp", None, "Jordan")
        .unwrap();
    let after = report::critical_incomplete(engine.catalogue(), engine.tasks(), &acme.id);
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|c| c.item.id != "gbp"));
}

#[test]
fn matrix_orders_incomplete_then_name() {
    let mut engine = test_engine();
    let zenith = engine
        .create_client("Zenith Roofing", date("2024-06-01"), false)
        .unwrap();
    engine
        .create_client("borealis hvac", date("2024-06-01"), false)
        .unwrap();
    engine
        .create_client("Acme Plumbing", date("2024-06-01"), false)
        .unwrap();

    engine
        .toggle_completion(&zenith.id, "gbp", None, "Jordan")
        .unwrap();

    let matrix = report::client_matrix(engine.catalogue(), engine.clients(), engine.tasks());
    let gbp = &matrix[0].items[0];
    let names: Vec<&str> = gbp.cells.iter().map(|c| c.client_name.as_str()).collect();
    assert_eq!(names, vec!["Acme Plumbing", "borealis hvac", "Zenith Roofing"]);
    assert!(!gbp.cells[0].completed);
    assert!(gbp.cells[2].completed);
    assert_eq!(gbp.cells[2].completed_by.as_deref(), Some("Jordan"));
}

#[test]
fn due_soon_window_with_overdue_first() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    let template = engine
        .create_template("Chase", "", "Overdue call\nThis week\nNext month")
        .unwrap();
    let (job, tasks) = engine
        .materialize_job(&acme.id, "Chasing", JobType::Job, Some(&template.id))
        .unwrap();

    engine
        .set_due_date(&acme.id, &tasks[0].task_id, Some(&job.id), Some(date("2024-05-20")))
        .unwrap();
    engine
        .set_due_date(&acme.id, &tasks[1].task_id, Some(&job.id), Some(date("2024-06-03")))
        .unwrap();
    engine
        .set_due_date(&acme.id, &tasks[2].task_id, Some(&job.id), Some(date("2024-06-10")))
        .unwrap();

    let due = report::due_soon(engine.tasks(), date("2024-06-01"), 7);
    let notes: Vec<&str> = due.iter().map(|t| t.notes.as_str()).collect();
    assert_eq!(notes, vec!["Overdue call", "This week"]);
}

#[test]
fn assigned_to_ignores_completed_and_matches_loosely() {
    let mut engine = test_engine();
    let acme = engine
        .create_client("Acme", date("2024-06-01"), false)
        .unwrap();
    let template = engine
        .create_template("Chase", "", "First\nSecond")
        .unwrap();
    let (job, tasks) = engine
        .materialize_job(&acme.id, "Chasing", JobType::Job, Some(&template.id))
        .unwrap();

    engine
        .assign_task(&acme.id, &tasks[0].task_id, Some(&job.id), Some("Jordan"))
        .unwrap();
    engine
        .assign_task(&acme.id, &tasks[1].task_id, Some(&job.id), Some("JORDAN"))
        .unwrap();
    engine
        .toggle_completion(&acme.id, &tasks[1].task_id, Some(&job.id), "Jordan")
        .unwrap();

    let mine = report::assigned_to(engine.tasks(), "jordan");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].notes, "First");
}
