//! Progress aggregation and reporting views.
//!
//! Everything in this module is a pure function over the catalogue and a
//! slice of the projection. Completion is derived, never stored: a catalogue
//! item counts as complete for a client exactly when a task record with that
//! `(client_id, task_id)` pair and no job reference exists and is marked
//! completed. No record means incomplete.
//!
//! Legacy custom sprint tasks are counted in a per-client "Custom Tasks"
//! pseudo-section that contributes to overall progress but to no phase.

use crate::catalogue::{Catalogue, ChecklistItem, Phase, Section};
use crate::model::{Client, TaskRecord};
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Title of the pseudo-section holding legacy custom sprint tasks.
pub const CUSTOM_SECTION_TITLE: &str = "Custom Tasks";

/// A completed/total pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage complete, rounded to the nearest whole number.
    /// An empty denominator reads as 0, not a division error.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        {
            (self.completed as f64 * 100.0 / self.total as f64).round() as u32
        }
    }

    fn add(&mut self, other: Self) {
        self.completed += other.completed;
        self.total += other.total;
    }
}

/// Is the given catalogue item completed for this client?
fn item_completed(tasks: &[TaskRecord], client_id: &str, task_id: &str) -> bool {
    tasks.iter().any(|t| {
        t.client_id == client_id && t.task_id == task_id && t.is_sprint_task() && t.completed
    })
}

/// The record backing a catalogue item for a client, if one exists.
fn item_record<'a>(
    tasks: &'a [TaskRecord],
    client_id: &str,
    task_id: &str,
) -> Option<&'a TaskRecord> {
    tasks
        .iter()
        .find(|t| t.client_id == client_id && t.task_id == task_id && t.is_sprint_task())
}

/// Progress of one catalogue section for a client.
#[must_use]
pub fn section_progress(section: &Section, tasks: &[TaskRecord], client_id: &str) -> Progress {
    let completed = section
        .items
        .iter()
        .filter(|item| item_completed(tasks, client_id, item.id))
        .count();
    Progress {
        completed,
        total: section.items.len(),
    }
}

/// Progress of a client's legacy custom sprint tasks.
#[must_use]
pub fn custom_progress(tasks: &[TaskRecord], client_id: &str) -> Progress {
    let mut progress = Progress::default();
    for task in tasks
        .iter()
        .filter(|t| t.client_id == client_id && t.is_custom())
    {
        progress.total += 1;
        if task.completed {
            progress.completed += 1;
        }
    }
    progress
}

/// Progress of one phase: the sum over its catalogue sections.
#[must_use]
pub fn phase_progress(
    catalogue: &Catalogue,
    phase: &Phase,
    tasks: &[TaskRecord],
    client_id: &str,
) -> Progress {
    let mut progress = Progress::default();
    for section_id in &phase.sections {
        if let Some(section) = catalogue.section(section_id) {
            progress.add(section_progress(section, tasks, client_id));
        }
    }
    progress
}

/// Whole-sprint progress: every catalogue section plus custom tasks.
///
/// Holds the invariant that the overall counts equal the sum of the
/// per-section counts plus the custom pseudo-section.
#[must_use]
pub fn overall_progress(catalogue: &Catalogue, tasks: &[TaskRecord], client_id: &str) -> Progress {
    let mut progress = Progress::default();
    for (_, section) in catalogue.traverse() {
        progress.add(section_progress(section, tasks, client_id));
    }
    progress.add(custom_progress(tasks, client_id));
    progress
}

/// A critical catalogue item still open for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalItem<'a> {
    pub section_title: &'static str,
    pub item: &'a ChecklistItem,
}

/// Critical items not yet completed, in catalogue order.
#[must_use]
pub fn critical_incomplete<'a>(
    catalogue: &'a Catalogue,
    tasks: &[TaskRecord],
    client_id: &str,
) -> Vec<CriticalItem<'a>> {
    let mut open = Vec::new();
    for (_, section) in catalogue.traverse() {
        for item in &section.items {
            if item.critical && !item_completed(tasks, client_id, item.id) {
                open.push(CriticalItem {
                    section_title: section.title,
                    item,
                });
            }
        }
    }
    open
}

/// One client's state for one matrix item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    pub client_name: String,
    pub completed: bool,
    pub completed_by: Option<String>,
}

/// One catalogue item with a cell per active-scope client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixItem<'a> {
    pub item: &'a ChecklistItem,
    pub cells: Vec<MatrixCell>,
}

/// A (phase, section) group of matrix items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixGroup<'a> {
    pub phase: &'a Phase,
    pub section: &'a Section,
    pub items: Vec<MatrixItem<'a>>,
}

/// The all-clients matrix: every catalogue item crossed with every client in
/// active sprint scope, grouped under (phase, section) headers in catalogue
/// order. Within an item, incomplete cells sort before complete ones; ties
/// break by client name ascending, case-insensitively.
#[must_use]
pub fn client_matrix<'a>(
    catalogue: &'a Catalogue,
    clients: &[Client],
    tasks: &[TaskRecord],
) -> Vec<MatrixGroup<'a>> {
    let mut scope: Vec<&Client> = clients.iter().filter(|c| c.in_sprint_scope()).collect();
    scope.sort_by_key(|c| c.normalized_name());

    catalogue
        .traverse()
        .map(|(phase, section)| {
            let items = section
                .items
                .iter()
                .map(|item| {
                    let mut cells: Vec<MatrixCell> = scope
                        .iter()
                        .map(|client| {
                            let record = item_record(tasks, &client.id, item.id);
                            MatrixCell {
                                client_name: client.name.clone(),
                                completed: record.is_some_and(|r| r.completed),
                                completed_by: record.and_then(|r| r.completed_by.clone()),
                            }
                        })
                        .collect();
                    cells.sort_by(|a, b| {
                        a.completed
                            .cmp(&b.completed)
                            .then_with(|| a.client_name.to_lowercase().cmp(&b.client_name.to_lowercase()))
                    });
                    MatrixItem { item, cells }
                })
                .collect();
            MatrixGroup {
                phase,
                section,
                items,
            }
        })
        .collect()
}

/// Incomplete job tasks due within the window, ascending by due date so
/// overdue work surfaces first. The window defaults to 7 days at the CLI.
#[must_use]
pub fn due_soon<'a>(
    tasks: &'a [TaskRecord],
    today: NaiveDate,
    window_days: u64,
) -> Vec<&'a TaskRecord> {
    let horizon = today
        .checked_add_days(Days::new(window_days))
        .unwrap_or(NaiveDate::MAX);
    let mut due: Vec<&TaskRecord> = tasks
        .iter()
        .filter(|t| !t.completed && !t.is_sprint_task())
        .filter(|t| t.due_date.is_some_and(|d| d <= horizon))
        .collect();
    due.sort_by_key(|t| t.due_date);
    due
}

/// Incomplete job tasks assigned to the given person, matched
/// case-insensitively.
#[must_use]
pub fn assigned_to<'a>(tasks: &'a [TaskRecord], actor: &str) -> Vec<&'a TaskRecord> {
    let actor = actor.trim().to_lowercase();
    tasks
        .iter()
        .filter(|t| !t.completed && !t.is_sprint_task())
        .filter(|t| {
            t.assigned_to
                .as_deref()
                .is_some_and(|a| a.trim().to_lowercase() == actor)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::thirty_day_sprint;
    use crate::model::ClientStatus;

    fn sprint_task(client_id: &str, task_id: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            id: format!("rec-{client_id}-{task_id}"),
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

    fn job_task(id: &str, due: Option<&str>, assigned: Option<&str>) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            client_id: "cli1".to_string(),
            job_id: Some("job1".to_string()),
            task_id: format!("jt-{id}"),
            completed: false,
            completed_at: None,
            completed_by: None,
            notes: String::new(),
            assigned_to: assigned.map(String::from),
            due_date: due.map(|d| d.parse().unwrap()),
        }
    }

    fn client(id: &str, name: &str, has_sprint: bool) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: ClientStatus::Active,
            has_sprint,
            failure_mode: None,
        }
    }

    #[test]
    fn percent_of_empty_is_zero() {
        assert_eq!(Progress::default().percent(), 0);
        assert_eq!(
            Progress {
                completed: 1,
                total: 3
            }
            .percent(),
            33
        );
        assert_eq!(
            Progress {
                completed: 2,
                total: 3
            }
            .percent(),
            67
        );
    }

    #[test]
    fn missing_record_reads_as_incomplete() {
        let cat = thirty_day_sprint();
        let section = cat.section("preSprintAccess").unwrap();
        let tasks = vec![sprint_task("cli1", "gbp", true)];
        let progress = section_progress(section, &tasks, "cli1");
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, section.items.len());
        // A different client shares no completion state.
        assert_eq!(section_progress(section, &tasks, "cli2").completed, 0);
    }

    #[test]
    fn uncompleted_record_does_not_count() {
        let cat = thirty_day_sprint();
        let section = cat.section("preSprintAccess").unwrap();
        let tasks = vec![sprint_task("cli1", "gbp", false)];
        assert_eq!(section_progress(section, &tasks, "cli1").completed, 0);
    }

    #[test]
    fn overall_is_sum_of_sections_plus_custom() {
        let cat = thirty_day_sprint();
        let mut tasks = vec![
            sprint_task("cli1", "gbp", true),
            sprint_task("cli1", "pixel-install", true),
            sprint_task("cli1", "diag-declare", false),
        ];
        let mut custom = sprint_task("cli1", "custom-a1b2c3", true);
        custom.notes = "Fix the sign".to_string();
        tasks.push(custom);

        let overall = overall_progress(cat, &tasks, "cli1");
        let mut summed = Progress::default();
        for (_, section) in cat.traverse() {
            let p = section_progress(section, &tasks, "cli1");
            summed.completed += p.completed;
            summed.total += p.total;
        }
        let custom = custom_progress(&tasks, "cli1");
        summed.completed += custom.completed;
        summed.total += custom.total;

        assert_eq!(overall, summed);
        assert_eq!(overall.completed, 3);
        assert_eq!(overall.total, cat.item_count() + 1);
    }

    #[test]
    fn phase_progress_excludes_custom_tasks() {
        let cat = thirty_day_sprint();
        let phase = cat.phase("preSprint").unwrap();
        let tasks = vec![
            sprint_task("cli1", "gbp", true),
            sprint_task("cli1", "custom-a1b2c3", true),
        ];
        let progress = phase_progress(cat, phase, &tasks, "cli1");
        assert_eq!(progress.completed, 1);
    }

    #[test]
    fn critical_list_follows_catalogue_order() {
        let cat = thirty_day_sprint();
        let tasks = vec![sprint_task("cli1", "gbp", true)];
        let open = critical_incomplete(cat, &tasks, "cli1");

        assert!(open.iter().all(|c| c.item.critical));
        assert!(!open.iter().any(|c| c.item.id == "gbp"));
        // ga4 is the first critical item left open.
        assert_eq!(open[0].item.id, "ga4");
        assert_eq!(open[0].section_title, "Access & Credentials");
        let last = open.last().unwrap();
        assert_eq!(last.item.id, "handoff-call");
    }

    #[test]
    fn matrix_sorts_incomplete_before_complete() {
        let cat = thirty_day_sprint();
        let clients = vec![
            client("cli1", "Zenith Roofing", true),
            client("cli2", "acme plumbing", true),
            client("cli3", "Borealis HVAC", true),
            client("cli4", "No Sprint Co", false),
        ];
        let mut done = sprint_task("cli2", "gbp", true);
        done.completed_by = Some("Jordan".to_string());
        let tasks = vec![done];

        let matrix = client_matrix(cat, &clients, &tasks);
        assert_eq!(matrix[0].section.id, "preSprintAccess");

        let gbp = &matrix[0].items[0];
        assert_eq!(gbp.item.id, "gbp");
        let names: Vec<&str> = gbp.cells.iter().map(|c| c.client_name.as_str()).collect();
        // Incomplete first (name order, case-insensitive), completed last.
        assert_eq!(names, vec!["Borealis HVAC", "Zenith Roofing", "acme plumbing"]);
        assert!(gbp.cells[2].completed);
        assert_eq!(gbp.cells[2].completed_by.as_deref(), Some("Jordan"));
    }

    #[test]
    fn matrix_skips_clients_outside_sprint_scope() {
        let cat = thirty_day_sprint();
        let mut archived = client("cli1", "Old Client", true);
        archived.status = ClientStatus::Archived;
        let clients = vec![archived, client("cli2", "Live Client", true)];

        let matrix = client_matrix(cat, &clients, &[]);
        assert_eq!(matrix[0].items[0].cells.len(), 1);
        assert_eq!(matrix[0].items[0].cells[0].client_name, "Live Client");
    }

    #[test]
    fn due_soon_window_and_order() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tasks = vec![
            job_task("a", Some("2024-06-10"), None),
            job_task("b", Some("2024-05-20"), None),
            job_task("c", Some("2024-06-03"), None),
            job_task("d", None, None),
        ];
        let due = due_soon(&tasks, today, 7);
        let ids: Vec<&str> = due.iter().map(|t| t.id.as_str()).collect();
        // Overdue first, then within the window; 2024-06-10 is outside.
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn due_soon_ignores_completed_and_sprint_tasks() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut done = job_task("a", Some("2024-05-20"), None);
        done.completed = true;
        let mut sprint = sprint_task("cli1", "gbp", false);
        sprint.due_date = Some(today);
        let tasks = vec![done, sprint];
        assert!(due_soon(&tasks, today, 7).is_empty());
    }

    #[test]
    fn assigned_to_matches_case_insensitively() {
        let tasks = vec![
            job_task("a", None, Some("Jordan")),
            job_task("b", None, Some("casey")),
            job_task("c", None, None),
        ];
        let mine = assigned_to(&tasks, "jordan");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
    }
}
