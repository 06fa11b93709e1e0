//! Dashboard summary figures.
//!
//! # Responsibility
//! - Provide the placeholder figures of the landing dashboard.
//! - Derive the same card layout from a live store snapshot.
//!
//! # Invariants
//! - Stat cards are always ordered: total, in progress, overdue, members.
//! - Project progress percentages are within `0..=100`.
//! - Live activity lists at most `MAX_ACTIVITY_ITEMS` entries, newest first.

use crate::i18n::{Locale, Message};
use crate::model::entity::EntityId;
use crate::model::project::ProjectStatus;
use crate::model::task::{Task, TaskStatus};
use crate::store::AppSnapshot;
use std::collections::BTreeSet;

const MAX_ACTIVITY_ITEMS: usize = 3;
const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    TotalTasks,
    InProgress,
    Overdue,
    ActiveMembers,
}

impl StatKind {
    pub fn title(self) -> Message {
        match self {
            Self::TotalTasks => Message::StatTotalTasks,
            Self::InProgress => Message::StatInProgress,
            Self::Overdue => Message::StatOverdue,
            Self::ActiveMembers => Message::StatActiveMembers,
        }
    }

    /// Overdue is the only card rendered with the destructive accent.
    pub fn is_alert(self) -> bool {
        matches!(self, Self::Overdue)
    }
}

/// Secondary line under a stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCaption {
    SinceYesterday(i64),
    SoonDone(u32),
    Completed(u32),
    ToDo(u32),
    DueWithinDay(u32),
    OfMembers(u32),
}

impl StatCaption {
    pub fn text(self, locale: Locale) -> String {
        match (self, locale) {
            (Self::SinceYesterday(delta), Locale::Fr) => format!("{delta:+} depuis hier"),
            (Self::SinceYesterday(delta), Locale::En) => format!("{delta:+} since yesterday"),
            (Self::SoonDone(n), Locale::Fr) => format!("{n} bientôt terminées"),
            (Self::SoonDone(n), Locale::En) => format!("{n} almost done"),
            (Self::Completed(n), Locale::Fr) => format!("{n} terminées"),
            (Self::Completed(n), Locale::En) => format!("{n} completed"),
            (Self::ToDo(n), Locale::Fr) => format!("{n} à faire"),
            (Self::ToDo(n), Locale::En) => format!("{n} to do"),
            (Self::DueWithinDay(n), Locale::Fr) => format!("{n} à rendre sous 24 h"),
            (Self::DueWithinDay(n), Locale::En) => format!("{n} due within 24 h"),
            (Self::OfMembers(n), Locale::Fr) => format!("Sur {n} membres"),
            (Self::OfMembers(n), Locale::En) => format!("Out of {n} members"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub kind: StatKind,
    pub value: u32,
    pub caption: StatCaption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    pub name: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    TaskCreated,
    TaskAssigned,
    TaskUpdated,
    ProjectUpdated,
    CommentAdded,
}

impl ActivityKind {
    pub fn title(self) -> Message {
        match self {
            Self::TaskCreated => Message::ActivityTaskCreated,
            Self::TaskAssigned => Message::ActivityTaskAssigned,
            Self::TaskUpdated => Message::ActivityTaskUpdated,
            Self::ProjectUpdated => Message::ActivityProjectUpdated,
            Self::CommentAdded => Message::ActivityCommentAdded,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub description: String,
    /// Age of the event in milliseconds, never negative.
    pub elapsed_ms: i64,
}

impl ActivityItem {
    pub fn time_label(&self, locale: Locale) -> String {
        relative_time_label(self.elapsed_ms, locale)
    }
}

/// Everything the dashboard page renders below its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub stats: [StatCard; 4],
    pub projects: Vec<ProjectProgress>,
    pub activity: Vec<ActivityItem>,
}

impl DashboardSummary {
    /// Static figures shown before live data is wired in.
    pub fn placeholder() -> Self {
        Self {
            stats: [
                StatCard {
                    kind: StatKind::TotalTasks,
                    value: 24,
                    caption: StatCaption::SinceYesterday(2),
                },
                StatCard {
                    kind: StatKind::InProgress,
                    value: 8,
                    caption: StatCaption::SoonDone(3),
                },
                StatCard {
                    kind: StatKind::Overdue,
                    value: 2,
                    caption: StatCaption::SinceYesterday(-1),
                },
                StatCard {
                    kind: StatKind::ActiveMembers,
                    value: 12,
                    caption: StatCaption::OfMembers(15),
                },
            ],
            projects: vec![
                progress("Refonte UI", 75),
                progress("API REST", 45),
                progress("Tests unitaires", 30),
            ],
            activity: vec![
                ActivityItem {
                    kind: ActivityKind::TaskAssigned,
                    description: "Integration des tests E2E".to_string(),
                    elapsed_ms: 5 * MINUTE_MS,
                },
                ActivityItem {
                    kind: ActivityKind::ProjectUpdated,
                    description: "Refonte UI - Sprint 2 terminé".to_string(),
                    elapsed_ms: 2 * HOUR_MS,
                },
                ActivityItem {
                    kind: ActivityKind::CommentAdded,
                    description: "Sur la tâche #123".to_string(),
                    elapsed_ms: 4 * HOUR_MS,
                },
            ],
        }
    }

    /// Derives live figures from `snapshot` as of `now_ms`.
    ///
    /// # Rules
    /// - Overdue: open task with `due_at_ms < now_ms`.
    /// - Active members: distinct assignees of open tasks, out of distinct
    ///   assignees of all tasks.
    /// - Progress: done / non-cancelled tasks of each active project; a
    ///   project without such tasks is at 0%.
    /// - Activity: most recently updated tasks first.
    pub fn from_snapshot(snapshot: &AppSnapshot, now_ms: i64) -> Self {
        let tasks = snapshot.tasks.as_slice();
        let count = |predicate: &dyn Fn(&Task) -> bool| -> u32 {
            saturating_u32(tasks.iter().filter(|task| predicate(task)).count())
        };

        let all_members: BTreeSet<&EntityId> = tasks
            .iter()
            .filter_map(|task| task.assignee_id.as_ref())
            .collect();
        let active_members: BTreeSet<&EntityId> = tasks
            .iter()
            .filter(|task| task.status.is_open())
            .filter_map(|task| task.assignee_id.as_ref())
            .collect();

        let due_within_day = |task: &Task| {
            task.status.is_open()
                && task
                    .due_at_ms
                    .is_some_and(|due| due >= now_ms && due.saturating_sub(now_ms) < DAY_MS)
        };

        let stats = [
            StatCard {
                kind: StatKind::TotalTasks,
                value: saturating_u32(tasks.len()),
                caption: StatCaption::Completed(count(&|t: &Task| t.status == TaskStatus::Done)),
            },
            StatCard {
                kind: StatKind::InProgress,
                value: count(&|t: &Task| t.status == TaskStatus::InProgress),
                caption: StatCaption::ToDo(count(&|t: &Task| t.status == TaskStatus::Todo)),
            },
            StatCard {
                kind: StatKind::Overdue,
                value: count(&|t: &Task| t.is_overdue(now_ms)),
                caption: StatCaption::DueWithinDay(count(&due_within_day)),
            },
            StatCard {
                kind: StatKind::ActiveMembers,
                value: saturating_u32(active_members.len()),
                caption: StatCaption::OfMembers(saturating_u32(all_members.len())),
            },
        ];

        let projects = snapshot
            .projects
            .iter()
            .filter(|project| project.status == ProjectStatus::Active)
            .map(|project| {
                let (done, total) = snapshot
                    .tasks_for_project(&project.id)
                    .filter(|task| task.status != TaskStatus::Cancelled)
                    .fold((0usize, 0usize), |(done, total), task| {
                        (done + usize::from(task.status == TaskStatus::Done), total + 1)
                    });
                let percent = if total == 0 { 0 } else { done * 100 / total };
                ProjectProgress {
                    name: project.name.clone(),
                    percent: u8::try_from(percent).unwrap_or(100),
                }
            })
            .collect();

        let mut recent: Vec<&Task> = tasks.iter().collect();
        recent.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        let activity = recent
            .into_iter()
            .take(MAX_ACTIVITY_ITEMS)
            .map(|task| ActivityItem {
                kind: if task.updated_at_ms > task.created_at_ms {
                    ActivityKind::TaskUpdated
                } else if task.assignee_id.is_some() {
                    ActivityKind::TaskAssigned
                } else {
                    ActivityKind::TaskCreated
                },
                description: task.title.clone(),
                elapsed_ms: now_ms.saturating_sub(task.updated_at_ms).max(0),
            })
            .collect();

        Self {
            stats,
            projects,
            activity,
        }
    }

    pub fn stat(&self, kind: StatKind) -> Option<&StatCard> {
        self.stats.iter().find(|card| card.kind == kind)
    }
}

/// Human label for an event age, e.g. "Il y a 5 minutes" / "2 hours ago".
pub fn relative_time_label(elapsed_ms: i64, locale: Locale) -> String {
    let elapsed_ms = elapsed_ms.max(0);
    let (value, unit) = if elapsed_ms < MINUTE_MS {
        return match locale {
            Locale::Fr => "À l'instant".to_string(),
            Locale::En => "just now".to_string(),
        };
    } else if elapsed_ms < HOUR_MS {
        (elapsed_ms / MINUTE_MS, TimeUnit::Minute)
    } else if elapsed_ms < DAY_MS {
        (elapsed_ms / HOUR_MS, TimeUnit::Hour)
    } else {
        (elapsed_ms / DAY_MS, TimeUnit::Day)
    };
    let plural = value > 1;

    match locale {
        Locale::Fr => {
            let word = match (unit, plural) {
                (TimeUnit::Minute, false) => "minute",
                (TimeUnit::Minute, true) => "minutes",
                (TimeUnit::Hour, false) => "heure",
                (TimeUnit::Hour, true) => "heures",
                (TimeUnit::Day, false) => "jour",
                (TimeUnit::Day, true) => "jours",
            };
            format!("Il y a {value} {word}")
        }
        Locale::En => {
            let word = match (unit, plural) {
                (TimeUnit::Minute, false) => "minute",
                (TimeUnit::Minute, true) => "minutes",
                (TimeUnit::Hour, false) => "hour",
                (TimeUnit::Hour, true) => "hours",
                (TimeUnit::Day, false) => "day",
                (TimeUnit::Day, true) => "days",
            };
            format!("{value} {word} ago")
        }
    }
}

#[derive(Clone, Copy)]
enum TimeUnit {
    Minute,
    Hour,
    Day,
}

fn progress(name: &str, percent: u8) -> ProjectProgress {
    ProjectProgress {
        name: name.to_string(),
        percent,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{relative_time_label, DashboardSummary, StatCaption, StatKind};
    use crate::i18n::Locale;

    #[test]
    fn placeholder_matches_landing_figures() {
        let summary = DashboardSummary::placeholder();
        let values: Vec<u32> = summary.stats.iter().map(|card| card.value).collect();
        assert_eq!(values, vec![24, 8, 2, 12]);
        assert_eq!(
            summary.stat(StatKind::ActiveMembers).map(|c| c.caption.text(Locale::Fr)),
            Some("Sur 15 membres".to_string())
        );
        assert_eq!(summary.projects[0].percent, 75);
        assert_eq!(summary.activity[0].time_label(Locale::Fr), "Il y a 5 minutes");
        assert_eq!(summary.activity[1].time_label(Locale::Fr), "Il y a 2 heures");
    }

    #[test]
    fn since_yesterday_caption_shows_sign() {
        assert_eq!(
            StatCaption::SinceYesterday(2).text(Locale::Fr),
            "+2 depuis hier"
        );
        assert_eq!(
            StatCaption::SinceYesterday(-1).text(Locale::En),
            "-1 since yesterday"
        );
    }

    #[test]
    fn relative_labels_pick_unit_and_plural() {
        assert_eq!(relative_time_label(-5, Locale::En), "just now");
        assert_eq!(relative_time_label(60_000, Locale::En), "1 minute ago");
        assert_eq!(relative_time_label(3 * 86_400_000, Locale::Fr), "Il y a 3 jours");
    }
}
