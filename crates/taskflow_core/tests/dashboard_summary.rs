use taskflow_core::dashboard::{ActivityKind, StatCaption};
use taskflow_core::{
    AppStore, DashboardSummary, EntityId, Locale, Project, ProjectStatus, StatKind, Task,
    TaskStatus,
};

const NOW: i64 = 1_700_000_000_000;
const HOUR: i64 = 3_600_000;

fn task(id: &str, status: TaskStatus, project: Option<&str>, assignee: Option<&str>) -> Task {
    let mut task = Task::with_id(id, format!("task {id}"));
    task.status = status;
    task.project_id = project.map(EntityId::from);
    task.assignee_id = assignee.map(EntityId::from);
    task.created_at_ms = NOW - 10 * HOUR;
    task.updated_at_ms = NOW - 10 * HOUR;
    task
}

fn populated_store() -> AppStore {
    let mut overdue = task("t1", TaskStatus::InProgress, Some("p1"), Some("u1"));
    overdue.due_at_ms = Some(NOW - HOUR);
    let mut due_soon = task("t2", TaskStatus::Todo, Some("p1"), Some("u2"));
    due_soon.due_at_ms = Some(NOW + 2 * HOUR);
    due_soon.updated_at_ms = NOW - 5 * 60_000;
    let mut done_late = task("t3", TaskStatus::Done, Some("p1"), Some("u3"));
    done_late.due_at_ms = Some(NOW - 48 * HOUR);
    done_late.updated_at_ms = NOW - 2 * HOUR;
    let cancelled = task("t4", TaskStatus::Cancelled, Some("p1"), None);
    let mut fresh = task("t5", TaskStatus::Todo, None, None);
    fresh.created_at_ms = NOW - 30_000;
    fresh.updated_at_ms = NOW - 30_000;

    let mut archived = Project::with_id("p3", "Ancien");
    archived.status = ProjectStatus::Archived;

    let mut store = AppStore::new();
    store
        .set_tasks(vec![overdue, due_soon, done_late, cancelled, fresh])
        .expect("tasks should be accepted");
    store
        .set_projects(vec![
            Project::with_id("p1", "Refonte UI"),
            Project::with_id("p2", "API REST"),
            archived,
        ])
        .expect("projects should be accepted");
    store
}

#[test]
fn live_stats_follow_task_statuses() {
    let store = populated_store();
    let summary = DashboardSummary::from_snapshot(&store.snapshot(), NOW);

    let card = |kind| summary.stat(kind).copied().expect("card present");
    assert_eq!(card(StatKind::TotalTasks).value, 5);
    assert_eq!(card(StatKind::TotalTasks).caption, StatCaption::Completed(1));
    assert_eq!(card(StatKind::InProgress).value, 1);
    assert_eq!(card(StatKind::InProgress).caption, StatCaption::ToDo(2));
    assert_eq!(card(StatKind::Overdue).value, 1);
    assert_eq!(card(StatKind::Overdue).caption, StatCaption::DueWithinDay(1));
    assert_eq!(card(StatKind::ActiveMembers).value, 2);
    assert_eq!(
        card(StatKind::ActiveMembers).caption.text(Locale::Fr),
        "Sur 3 membres"
    );
}

#[test]
fn progress_covers_active_projects_and_skips_cancelled_tasks() {
    let store = populated_store();
    let summary = DashboardSummary::from_snapshot(&store.snapshot(), NOW);

    let progress: Vec<(&str, u8)> = summary
        .projects
        .iter()
        .map(|p| (p.name.as_str(), p.percent))
        .collect();
    assert_eq!(progress, vec![("Refonte UI", 33), ("API REST", 0)]);
}

#[test]
fn activity_lists_three_most_recent_updates() {
    let store = populated_store();
    let summary = DashboardSummary::from_snapshot(&store.snapshot(), NOW);

    let titles: Vec<&str> = summary
        .activity
        .iter()
        .map(|item| item.description.as_str())
        .collect();
    assert_eq!(titles, vec!["task t5", "task t2", "task t3"]);
    assert_eq!(summary.activity[0].kind, ActivityKind::TaskCreated);
    assert_eq!(summary.activity[0].time_label(Locale::Fr), "À l'instant");
    assert_eq!(summary.activity[1].kind, ActivityKind::TaskUpdated);
    assert_eq!(summary.activity[1].time_label(Locale::En), "5 minutes ago");
}

#[test]
fn empty_store_yields_zeroed_summary() {
    let summary = DashboardSummary::from_snapshot(&AppStore::new().snapshot(), NOW);

    assert!(summary.stats.iter().all(|card| card.value == 0));
    assert!(summary.projects.is_empty());
    assert!(summary.activity.is_empty());
}

#[test]
fn placeholder_renders_reference_captions() {
    let summary = DashboardSummary::placeholder();
    let captions: Vec<String> = summary
        .stats
        .iter()
        .map(|card| card.caption.text(Locale::Fr))
        .collect();
    assert_eq!(
        captions,
        vec![
            "+2 depuis hier",
            "3 bientôt terminées",
            "-1 depuis hier",
            "Sur 15 membres"
        ]
    );
    assert!(summary.stat(StatKind::Overdue).expect("overdue card").kind.is_alert());
    assert_eq!(summary.activity.len(), 3);
}

#[test]
fn extreme_timestamps_saturate_instead_of_overflowing() {
    let mut ancient = task("t1", TaskStatus::Todo, None, Some("u1"));
    ancient.created_at_ms = i64::MIN;
    ancient.updated_at_ms = i64::MIN;
    ancient.due_at_ms = Some(i64::MAX);
    let mut store = AppStore::new();
    store.set_tasks(vec![ancient]).expect("task should be accepted");

    let summary = DashboardSummary::from_snapshot(&store.snapshot(), NOW);
    assert_eq!(summary.activity[0].elapsed_ms, i64::MAX);
    assert!(summary.activity[0].time_label(Locale::En).ends_with("days ago"));

    let early = DashboardSummary::from_snapshot(&store.snapshot(), i64::MIN);
    assert_eq!(early.activity[0].elapsed_ms, 0);
    assert_eq!(
        early.stat(StatKind::Overdue).map(|card| card.caption),
        Some(StatCaption::DueWithinDay(0))
    );
}
