//! Client state store for tasks, projects and the current user.
//!
//! # Responsibility
//! - Hold the single in-memory source of truth shared by all views.
//! - Apply replace/insert/update/delete transitions synchronously.
//! - Publish every accepted mutation to subscribers.
//!
//! # Invariants
//! - Each accepted mutation produces exactly one new snapshot with
//!   `revision + 1` and exactly one notification.
//! - Update/delete on an unknown id is accepted as a no-op (still published).
//! - Inserting a known or blank id is rejected; rejected calls change
//!   nothing and publish nothing.
//! - No referential integrity between tasks and projects is enforced.

pub mod snapshot;
pub mod subscription;

use crate::model::entity::{EntityId, EntityList, InvalidIdError};
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::{Task, TaskPatch};
use crate::model::user::User;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

pub use snapshot::{AppSnapshot, StoreChange, StoreNotification};
pub use subscription::{Listener, SubscriptionId};

use subscription::Subscribers;

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateTaskId(EntityId),
    DuplicateProjectId(EntityId),
    InvalidId(InvalidIdError),
}

impl StoreError {
    /// Stable code used in rejection logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateTaskId(_) | Self::DuplicateProjectId(_) => "duplicate_id",
            Self::InvalidId(_) => "invalid_id",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTaskId(id) => write!(f, "task id already exists: {id}"),
            Self::DuplicateProjectId(id) => write!(f, "project id already exists: {id}"),
            Self::InvalidId(err) => write!(f, "invalid id: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidId(err) => Some(err),
            Self::DuplicateTaskId(_) | Self::DuplicateProjectId(_) => None,
        }
    }
}

impl From<InvalidIdError> for StoreError {
    fn from(value: InvalidIdError) -> Self {
        Self::InvalidId(value)
    }
}

/// Explicit state container with a mutation API and subscriptions.
///
/// Mutations take `&mut self`; an embedding that shares the store across
/// threads wraps it in a lock.
#[derive(Default)]
pub struct AppStore {
    snapshot: Arc<AppSnapshot>,
    subscribers: Subscribers,
}

impl Debug for AppStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("revision", &self.snapshot.revision)
            .field("tasks", &self.snapshot.tasks.len())
            .field("projects", &self.snapshot.projects.len())
            .field("signed_in", &self.snapshot.is_signed_in())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot; later mutations do not affect it.
    pub fn snapshot(&self) -> Arc<AppSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    pub fn tasks(&self) -> &[Task] {
        self.snapshot.tasks.as_slice()
    }

    pub fn projects(&self) -> &[Project] {
        self.snapshot.projects.as_slice()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.snapshot.current_user.as_ref()
    }

    /// Replaces the task collection with `tasks`, keeping their order.
    ///
    /// # Errors
    /// - `StoreError::InvalidId` when any task has a blank id.
    /// - `StoreError::DuplicateTaskId` when `tasks` repeats an id.
    ///
    /// The collection is left unchanged on error.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) -> StoreResult<()> {
        if tasks.iter().any(|task| task.id.is_blank()) {
            return Err(self.reject("set_tasks", InvalidIdError::Blank.into()));
        }
        let list = EntityList::from_items(tasks)
            .map_err(|err| self.reject("set_tasks", StoreError::DuplicateTaskId(err.id)))?;
        let count = list.len();
        Arc::make_mut(&mut self.snapshot).tasks = list;
        self.publish(StoreChange::TasksReplaced { count });
        Ok(())
    }

    /// Replaces the project collection with `projects`, keeping their order.
    ///
    /// # Errors
    /// - `StoreError::InvalidId` when any project has a blank id.
    /// - `StoreError::DuplicateProjectId` when `projects` repeats an id.
    pub fn set_projects(&mut self, projects: Vec<Project>) -> StoreResult<()> {
        if projects.iter().any(|project| project.id.is_blank()) {
            return Err(self.reject("set_projects", InvalidIdError::Blank.into()));
        }
        let list = EntityList::from_items(projects).map_err(|err| {
            self.reject("set_projects", StoreError::DuplicateProjectId(err.id))
        })?;
        let count = list.len();
        Arc::make_mut(&mut self.snapshot).projects = list;
        self.publish(StoreChange::ProjectsReplaced { count });
        Ok(())
    }

    /// Replaces the current user; `None` signs out. Collections are untouched.
    pub fn set_current_user(&mut self, user: Option<User>) {
        let signed_in = user.is_some();
        Arc::make_mut(&mut self.snapshot).current_user = user;
        self.publish(StoreChange::CurrentUserSet { signed_in });
    }

    /// Appends `task` to the end of the collection.
    ///
    /// # Errors
    /// - `StoreError::InvalidId` when the id is blank.
    /// - `StoreError::DuplicateTaskId` when a task with the same id exists.
    pub fn add_task(&mut self, task: Task) -> StoreResult<()> {
        if task.id.is_blank() {
            return Err(self.reject("add_task", InvalidIdError::Blank.into()));
        }
        if self.snapshot.tasks.contains(&task.id) {
            return Err(self.reject("add_task", StoreError::DuplicateTaskId(task.id)));
        }
        let id = task.id.clone();
        Arc::make_mut(&mut self.snapshot)
            .tasks
            .insert(task)
            .map_err(|err| StoreError::DuplicateTaskId(err.id))?;
        self.publish(StoreChange::TaskAdded { id });
        Ok(())
    }

    /// Shallow-merges `patch` into the task with `id`.
    ///
    /// Returns whether a task matched.
    pub fn update_task(&mut self, id: &EntityId, patch: &TaskPatch) -> bool {
        let matched = Arc::make_mut(&mut self.snapshot).tasks.merge(id, patch);
        self.publish(StoreChange::TaskUpdated {
            id: id.clone(),
            matched,
        });
        matched
    }

    /// Removes the task with `id`, returning it when it existed.
    pub fn delete_task(&mut self, id: &EntityId) -> Option<Task> {
        let removed = Arc::make_mut(&mut self.snapshot).tasks.remove(id);
        self.publish(StoreChange::TaskDeleted {
            id: id.clone(),
            removed: removed.is_some(),
        });
        removed
    }

    /// Appends `project` to the end of the collection.
    ///
    /// # Errors
    /// - `StoreError::InvalidId` when the id is blank.
    /// - `StoreError::DuplicateProjectId` when a project with the same id
    ///   exists.
    pub fn add_project(&mut self, project: Project) -> StoreResult<()> {
        if project.id.is_blank() {
            return Err(self.reject("add_project", InvalidIdError::Blank.into()));
        }
        if self.snapshot.projects.contains(&project.id) {
            return Err(self.reject("add_project", StoreError::DuplicateProjectId(project.id)));
        }
        let id = project.id.clone();
        Arc::make_mut(&mut self.snapshot)
            .projects
            .insert(project)
            .map_err(|err| StoreError::DuplicateProjectId(err.id))?;
        self.publish(StoreChange::ProjectAdded { id });
        Ok(())
    }

    /// Shallow-merges `patch` into the project with `id`.
    pub fn update_project(&mut self, id: &EntityId, patch: &ProjectPatch) -> bool {
        let matched = Arc::make_mut(&mut self.snapshot).projects.merge(id, patch);
        self.publish(StoreChange::ProjectUpdated {
            id: id.clone(),
            matched,
        });
        matched
    }

    /// Removes the project with `id`. Tasks referencing it are kept.
    pub fn delete_project(&mut self, id: &EntityId) -> Option<Project> {
        let removed = Arc::make_mut(&mut self.snapshot).projects.remove(id);
        self.publish(StoreChange::ProjectDeleted {
            id: id.clone(),
            removed: removed.is_some(),
        });
        removed
    }

    /// Registers a callback run after every accepted mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreNotification) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribers.add_callback(Box::new(listener))
    }

    /// Registers a channel subscriber; dropping the receiver unsubscribes.
    ///
    /// The channel is unbounded. Every queued notification holds its
    /// snapshot, so a receiver that is kept but never drained retains one
    /// snapshot per mutation and makes the next mutation copy the state
    /// instead of updating it in place. Drain with `try_iter` or drop the
    /// receiver.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<StoreNotification>) {
        self.subscribers.add_channel()
    }

    /// Returns `false` when `id` was not (or no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, change: StoreChange) {
        let state = Arc::make_mut(&mut self.snapshot);
        state.revision += 1;
        debug!(
            "event=store_mutation module=store op={} status=ok effective={} revision={} subscribers={}",
            change.op_name(),
            change.is_effective(),
            state.revision,
            self.subscribers.len()
        );
        let notification = StoreNotification {
            snapshot: Arc::clone(&self.snapshot),
            change,
        };
        self.subscribers.publish(&notification);
    }

    fn reject(&self, op: &str, err: StoreError) -> StoreError {
        warn!(
            "event=store_mutation module=store op={} status=rejected revision={} error_code={}",
            op,
            self.snapshot.revision,
            err.code()
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::{AppStore, StoreChange};
    use crate::model::entity::EntityId;
    use crate::model::task::{Task, TaskPatch};
    use std::sync::{Arc, Mutex};

    #[test]
    fn old_snapshot_is_unaffected_by_later_mutations() {
        let mut store = AppStore::new();
        store.add_task(Task::with_id("t1", "A")).expect("add t1");
        let before = store.snapshot();

        store.update_task(&EntityId::from("t1"), &TaskPatch::title("A2"));

        assert_eq!(before.tasks.as_slice()[0].title, "A");
        assert_eq!(store.tasks()[0].title, "A2");
        assert_eq!(store.revision(), before.revision + 1);
    }

    #[test]
    fn callback_sees_snapshot_of_its_own_mutation() {
        let mut store = AppStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |notification| {
            sink.lock()
                .expect("listener lock")
                .push((notification.snapshot.revision, notification.change.clone()));
        });

        store.add_task(Task::with_id("t1", "A")).expect("add t1");
        store.delete_task(&EntityId::from("missing"));

        let seen = seen.lock().expect("seen lock");
        assert_eq!(
            *seen,
            vec![
                (
                    1,
                    StoreChange::TaskAdded {
                        id: EntityId::from("t1")
                    }
                ),
                (
                    2,
                    StoreChange::TaskDeleted {
                        id: EntityId::from("missing"),
                        removed: false
                    }
                ),
            ]
        );
    }

    #[test]
    fn dropped_channel_receiver_is_pruned() {
        let mut store = AppStore::new();
        let (_, rx) = store.subscribe_channel();
        assert_eq!(store.subscriber_count(), 1);
        drop(rx);

        store.set_current_user(None);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn draining_channel_releases_queued_snapshots() {
        let mut store = AppStore::new();
        let (_, rx) = store.subscribe_channel();
        for n in 0..3 {
            store
                .add_task(Task::with_id(format!("t{n}"), "A"))
                .expect("add task");
        }

        let latest = store.snapshot();
        assert!(Arc::strong_count(&latest) > 2);

        assert_eq!(rx.try_iter().count(), 3);
        assert_eq!(Arc::strong_count(&latest), 2);
    }

    #[test]
    fn debug_output_reports_counts_only() {
        let mut store = AppStore::new();
        store.add_task(Task::with_id("t1", "secret title")).expect("add t1");
        let rendered = format!("{store:?}");
        assert!(rendered.contains("tasks: 1"));
        assert!(!rendered.contains("secret title"));
    }
}
