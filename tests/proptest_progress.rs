//! Property tests for progress aggregation.

mod common;

use proptest::prelude::*;
use sprintdeck::catalogue::thirty_day_sprint;
use sprintdeck::model::TaskRecord;
use sprintdeck::report;

fn record(client_id: &str, task_id: &str, completed: bool) -> TaskRecord {
    TaskRecord {
        id: format!("rec-{task_id}"),
        client_id: client_id.to_string(),
        job_id: None,
        task_id: task_id.to_string(),
        completed,
        completed_at: None,
        completed_by: None,
        notes: String::new(),
        assigned_to: None,
        due_date: None,
    }
}

proptest! {
    /// Overall counts always equal the per-section sums plus custom tasks,
    /// whatever mix of completed, incomplete, and custom records exists.
    #[test]
    fn overall_is_sum_of_parts(
        mask in proptest::collection::vec(any::<bool>(), 0..60),
        custom_done in 0usize..4,
        custom_open in 0usize..4,
    ) {
        common::init_test_logging();
        let cat = thirty_day_sprint();
        let item_ids: Vec<&str> = cat
            .traverse()
            .flat_map(|(_, s)| s.items.iter().map(|i| i.id))
            .collect();

        let mut tasks = Vec::new();
        for (i, completed) in mask.iter().enumerate() {
            tasks.push(record("cli1", item_ids[i % item_ids.len()], *completed));
        }
        // Duplicate item ids in the mask collapse to "any completed" wins,
        // so dedupe the generated records by task id first.
        tasks.sort_by(|a, b| a.task_id.cmp(&b.task_id).then(b.completed.cmp(&a.completed)));
        tasks.dedup_by(|a, b| a.task_id == b.task_id);

        for i in 0..custom_done {
            tasks.push(record("cli1", &format!("custom-d{i}"), true));
        }
        for i in 0..custom_open {
            tasks.push(record("cli1", &format!("custom-o{i}"), false));
        }

        let overall = report::overall_progress(cat, &tasks, "cli1");

        let mut sum_completed = 0;
        let mut sum_total = 0;
        for (_, section) in cat.traverse() {
            let p = report::section_progress(section, &tasks, "cli1");
            sum_completed += p.completed;
            sum_total += p.total;
        }
        let custom = report::custom_progress(&tasks, "cli1");

        prop_assert_eq!(overall.completed, sum_completed + custom.completed);
        prop_assert_eq!(overall.total, sum_total + custom.total);
        prop_assert_eq!(overall.total, cat.item_count() + custom_done + custom_open);
        prop_assert_eq!(custom.completed, custom_done);
    }

    /// Percent stays in 0..=100 and is 0 exactly when nothing is counted.
    #[test]
    fn percent_is_bounded(completed in 0usize..500, extra in 0usize..500) {
        let progress = report::Progress { completed, total: completed + extra };
        let percent = progress.percent();
        prop_assert!(percent <= 100);
        if progress.total == 0 {
            prop_assert_eq!(percent, 0);
        }
        if completed == progress.total && progress.total > 0 {
            prop_assert_eq!(percent, 100);
        }
    }
}
