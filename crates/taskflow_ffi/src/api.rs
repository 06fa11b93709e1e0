//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the process-wide client store, dashboard figures and the auth
//!   flow to Dart via FRB.
//! - Translate core types into flat, string-friendly DTOs.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every failure is reported in a response envelope (`ok`, `message`).
//! - All calls share one `AppStore` per process.

use log::warn;
use std::sync::{Mutex, MutexGuard, OnceLock};
use taskflow_core::auth::{submit_label, SubmitOutcome};
use taskflow_core::dashboard::{ActivityItem, StatCard};
use taskflow_core::model::now_epoch_ms;
use taskflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    validate_form, AppConfig, AppStore, AuthForm, AuthMode, DashboardShell, DashboardSummary,
    EntityId, HttpIdentityProvider, Locale, LoginController, Message, Notice, NoticeLog,
    Project, ProjectPatch, Route, Router, Task, TaskPatch, User,
};

static STORE: OnceLock<Mutex<AppStore>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; other combinations fail.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task as seen by Dart. Enum fields use their snake_case wire names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `todo|in_progress|done|cancelled`.
    pub status: String,
    /// `low|medium|high|urgent`.
    pub priority: String,
    pub project_id: Option<String>,
    pub assignee_id: Option<String>,
    pub due_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Project as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// `active|on_hold|completed|archived`.
    pub status: String,
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserItem {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Generic action response envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected entity id, when the operation targets one.
    pub id: Option<String>,
    /// Store revision after the call.
    pub revision: u64,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, id: Option<String>, revision: u64) -> Self {
        Self {
            ok: true,
            id,
            revision,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, revision: u64) -> Self {
        Self {
            ok: false,
            id: None,
            revision,
            message: message.into(),
        }
    }
}

/// Replaces all tasks with the JSON array `tasks_json`.
///
/// # FFI contract
/// - Rejects malformed JSON and repeated ids; the store is left unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn store_set_tasks(tasks_json: String) -> StoreActionResponse {
    with_store("store_set_tasks", |store| {
        let tasks: Vec<Task> = serde_json::from_str(&tasks_json)
            .map_err(|err| format!("invalid tasks JSON: {err}"))?;
        let count = tasks.len();
        store.set_tasks(tasks).map_err(|err| err.to_string())?;
        Ok((format!("{count} task(s) loaded."), None))
    })
}

/// Creates a task with a generated id and appends it.
#[flutter_rust_bridge::frb(sync)]
pub fn store_add_task(title: String, project_id: Option<String>) -> StoreActionResponse {
    with_store("store_add_task", |store| {
        let mut task = Task::new(title.trim());
        task.project_id = non_blank(project_id).map(EntityId::from);
        let id = task.id.to_string();
        store.add_task(task).map_err(|err| err.to_string())?;
        Ok(("Task created.".to_string(), Some(id)))
    })
}

/// Shallow-merges the JSON object `patch_json` into task `id`.
///
/// Absent fields are left unchanged; `null` clears nullable fields. An
/// unknown id succeeds as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn store_update_task(id: String, patch_json: String) -> StoreActionResponse {
    with_store("store_update_task", |store| {
        let mut patch: TaskPatch = serde_json::from_str(&patch_json)
            .map_err(|err| format!("invalid task patch JSON: {err}"))?;
        patch.updated_at_ms.get_or_insert_with(now_epoch_ms);
        let id = parse_id(&id)?;
        let message = if store.update_task(&id, &patch) {
            "Task updated."
        } else {
            "No task matched."
        };
        Ok((message.to_string(), Some(id.to_string())))
    })
}

/// Removes task `id`; an unknown id succeeds as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn store_delete_task(id: String) -> StoreActionResponse {
    with_store("store_delete_task", |store| {
        let id = parse_id(&id)?;
        let message = match store.delete_task(&id) {
            Some(_) => "Task deleted.",
            None => "No task matched.",
        };
        Ok((message.to_string(), Some(id.to_string())))
    })
}

/// Returns all tasks in collection order.
#[flutter_rust_bridge::frb(sync)]
pub fn store_list_tasks() -> Vec<TaskItem> {
    read_store(|store| store.tasks().iter().map(to_task_item).collect())
}

/// Replaces all projects with the JSON array `projects_json`.
#[flutter_rust_bridge::frb(sync)]
pub fn store_set_projects(projects_json: String) -> StoreActionResponse {
    with_store("store_set_projects", |store| {
        let projects: Vec<Project> = serde_json::from_str(&projects_json)
            .map_err(|err| format!("invalid projects JSON: {err}"))?;
        let count = projects.len();
        store.set_projects(projects).map_err(|err| err.to_string())?;
        Ok((format!("{count} project(s) loaded."), None))
    })
}

/// Creates an active project with a generated id and appends it.
#[flutter_rust_bridge::frb(sync)]
pub fn store_add_project(name: String) -> StoreActionResponse {
    with_store("store_add_project", |store| {
        let project = Project::new(name.trim());
        let id = project.id.to_string();
        store.add_project(project).map_err(|err| err.to_string())?;
        Ok(("Project created.".to_string(), Some(id)))
    })
}

/// Shallow-merges the JSON object `patch_json` into project `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn store_update_project(id: String, patch_json: String) -> StoreActionResponse {
    with_store("store_update_project", |store| {
        let mut patch: ProjectPatch = serde_json::from_str(&patch_json)
            .map_err(|err| format!("invalid project patch JSON: {err}"))?;
        patch.updated_at_ms.get_or_insert_with(now_epoch_ms);
        let id = parse_id(&id)?;
        let message = if store.update_project(&id, &patch) {
            "Project updated."
        } else {
            "No project matched."
        };
        Ok((message.to_string(), Some(id.to_string())))
    })
}

/// Removes project `id`; its tasks are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn store_delete_project(id: String) -> StoreActionResponse {
    with_store("store_delete_project", |store| {
        let id = parse_id(&id)?;
        let message = match store.delete_project(&id) {
            Some(_) => "Project deleted.",
            None => "No project matched.",
        };
        Ok((message.to_string(), Some(id.to_string())))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn store_list_projects() -> Vec<ProjectItem> {
    read_store(|store| store.projects().iter().map(to_project_item).collect())
}

/// Replaces the current user; `None` signs out.
#[flutter_rust_bridge::frb(sync)]
pub fn store_set_current_user(user: Option<UserItem>) -> StoreActionResponse {
    with_store("store_set_current_user", |store| {
        let user = user.map(from_user_item).transpose()?;
        let id = user.as_ref().map(|u| u.id.to_string());
        let message = if user.is_some() {
            "Signed in."
        } else {
            "Signed out."
        };
        store.set_current_user(user);
        Ok((message.to_string(), id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn store_current_user() -> Option<UserItem> {
    read_store(|store| store.current_user().map(to_user_item))
}

#[flutter_rust_bridge::frb(sync)]
pub fn store_revision() -> u64 {
    read_store(AppStore::revision)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub title: String,
    pub value: u32,
    pub caption: String,
    /// Rendered with the destructive accent.
    pub alert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgressEntry {
    pub name: String,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub title: String,
    pub description: String,
    pub time_label: String,
}

/// Dashboard figures, already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub title: String,
    pub stats: Vec<StatEntry>,
    pub projects: Vec<ProjectProgressEntry>,
    pub activity: Vec<ActivityEntry>,
}

/// Returns dashboard figures.
///
/// Input semantics:
/// - `locale`: `fr|en` tag; unknown or missing values use the default.
/// - `live`: compute from the store instead of the placeholder figures.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_summary(locale: Option<String>, live: bool) -> DashboardResponse {
    let locale = parse_locale(locale);
    let summary = if live {
        // Computed outside the store lock.
        let snapshot = read_store(AppStore::snapshot);
        DashboardSummary::from_snapshot(&snapshot, now_epoch_ms())
    } else {
        DashboardSummary::placeholder()
    };

    DashboardResponse {
        title: Message::DashboardTitle.text(locale).to_string(),
        stats: summary
            .stats
            .iter()
            .map(|card| to_stat_entry(card, locale))
            .collect(),
        projects: summary
            .projects
            .into_iter()
            .map(|p| ProjectProgressEntry {
                name: p.name,
                percent: p.percent,
            })
            .collect(),
        activity: summary
            .activity
            .iter()
            .map(|item| to_activity_entry(item, locale))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Sidebar entries with the one matching `current_path` marked active.
#[flutter_rust_bridge::frb(sync)]
pub fn shell_nav_items(current_path: String, locale: Option<String>) -> Vec<NavEntry> {
    let locale = parse_locale(locale);
    let shell = DashboardShell::new();
    shell
        .nav_items()
        .iter()
        .map(|item| NavEntry {
            label: item.label_text(locale).to_string(),
            href: item.href().to_string(),
            active: shell.is_active(item, current_path.trim()),
        })
        .collect()
}

/// Result of one auth form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub ok: bool,
    /// Notice text to show (success or error).
    pub message: String,
    /// Route path to open next, set on sign-in success only.
    pub navigate_to: Option<String>,
    /// Set when a sign-up still needs email confirmation.
    pub confirmation_required: bool,
}

impl AuthResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            navigate_to: None,
            confirmation_required: false,
        }
    }
}

/// Submits the login or registration form against the configured provider.
///
/// Input semantics:
/// - `mode`: `login|register`.
/// - `confirm_password`: only read in `register` mode.
///
/// # FFI contract
/// - Async from Dart: FRB runs the blocking provider call on a worker thread
///   and returns a `Future`.
/// - Form validation (including password mismatch) runs before any network
///   access and before provider configuration is required.
/// - On sign-in success the user becomes the store's current user.
pub fn auth_submit(
    mode: String,
    email: String,
    password: String,
    confirm_password: Option<String>,
) -> AuthResponse {
    let mode = match mode.trim() {
        "login" => AuthMode::Login,
        "register" => AuthMode::Register,
        other => return AuthResponse::failure(format!("unsupported auth mode `{other}`")),
    };
    let form = AuthForm {
        email,
        password,
        confirm_password,
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => return AuthResponse::failure(format!("auth_submit failed: {err}")),
    };
    if let Err(err) = validate_form(mode, &form) {
        return AuthResponse::failure(err.user_message(config.locale));
    }
    let provider = match config
        .require_auth()
        .map_err(|err| err.to_string())
        .and_then(|auth| HttpIdentityProvider::new(auth).map_err(|err| err.to_string()))
    {
        Ok(provider) => provider,
        Err(err) => return AuthResponse::failure(format!("auth_submit failed: {err}")),
    };

    let mut controller =
        LoginController::new(provider, Router::default(), NoticeLog::new(), config.locale);
    controller.set_mode(mode);
    let outcome = controller.submit(&form);
    let message = controller
        .notifier_mut()
        .drain()
        .pop()
        .map(|notice: Notice| notice.message)
        .unwrap_or_default();
    let route = controller.navigator().current();

    match outcome {
        SubmitOutcome::SignedIn(user) => {
            let stored = with_store("auth_submit", |store| {
                store.set_current_user(Some(user));
                Ok((String::new(), None))
            });
            if !stored.ok {
                return AuthResponse::failure(stored.message);
            }
            AuthResponse {
                ok: true,
                message,
                navigate_to: (route != Route::Login).then(|| route.path().to_string()),
                confirmation_required: false,
            }
        }
        SubmitOutcome::SignedUp(signed_up) => AuthResponse {
            ok: true,
            message,
            navigate_to: None,
            confirmation_required: signed_up.confirmation_required,
        },
        SubmitOutcome::Failed(_) => AuthResponse::failure(message),
    }
}

/// Static texts of the auth screen, already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScreenTexts {
    pub title: String,
    pub tagline: String,
    pub login_tab: String,
    pub register_tab: String,
    pub email_label: String,
    pub email_placeholder: String,
    pub password_label: String,
    pub confirm_password_label: String,
    pub or_continue_with: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_screen_texts(locale: Option<String>) -> AuthScreenTexts {
    let locale = parse_locale(locale);
    let text = |message: Message| message.text(locale).to_string();
    AuthScreenTexts {
        title: text(Message::AppTitle),
        tagline: text(Message::AppTagline),
        login_tab: text(AuthMode::Login.tab_label()),
        register_tab: text(AuthMode::Register.tab_label()),
        email_label: text(Message::EmailLabel),
        email_placeholder: text(Message::EmailPlaceholder),
        password_label: text(Message::PasswordLabel),
        confirm_password_label: text(Message::ConfirmPasswordLabel),
        or_continue_with: text(Message::OrContinueWith),
    }
}

/// Returns the path to open instead of `path`, or `None` to proceed.
///
/// Shell routes redirect to the login route while no user is signed in.
/// Unknown paths are left to the embedding.
#[flutter_rust_bridge::frb(sync)]
pub fn route_guard(path: String) -> Option<String> {
    let route = Route::from_path(&path)?;
    let signed_in = read_store(|store| store.current_user().is_some());
    route
        .redirect_for(signed_in)
        .map(|target| target.path().to_string())
}

/// Submit button caption for `mode` (`login|register`) and `loading`.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_submit_label(mode: String, loading: bool, locale: Option<String>) -> String {
    let mode = if mode.trim() == "register" {
        AuthMode::Register
    } else {
        AuthMode::Login
    };
    submit_label(mode, loading)
        .text(parse_locale(locale))
        .to_string()
}

/// Clears the current user. Task and project collections are kept.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_out() -> StoreActionResponse {
    store_set_current_user(None)
}

/// Locks the shared store, recovering it after a panic in another call.
///
/// Every mutation swaps in a complete snapshot, so a poisoned store still
/// holds a consistent value.
fn lock_store() -> MutexGuard<'static, AppStore> {
    let store = STORE.get_or_init(|| Mutex::new(AppStore::new()));
    store.lock().unwrap_or_else(|poisoned| {
        warn!("event=ffi_call module=ffi op=lock_store status=recovered");
        store.clear_poison();
        poisoned.into_inner()
    })
}

fn with_store(
    op: &'static str,
    f: impl FnOnce(&mut AppStore) -> Result<(String, Option<String>), String>,
) -> StoreActionResponse {
    let mut store = lock_store();
    match f(&mut store) {
        Ok((message, id)) => StoreActionResponse::success(message, id, store.revision()),
        Err(err) => {
            warn!("event=ffi_call module=ffi op={op} status=error");
            StoreActionResponse::failure(format!("{op} failed: {err}"), store.revision())
        }
    }
}

fn read_store<R>(f: impl FnOnce(&AppStore) -> R) -> R {
    f(&lock_store())
}

fn parse_id(raw: &str) -> Result<EntityId, String> {
    EntityId::parse(raw).map_err(|err| err.to_string())
}

fn parse_locale(locale: Option<String>) -> Locale {
    locale
        .and_then(|raw| raw.parse::<Locale>().ok())
        .unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn wire_name<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: wire_name(&task.status),
        priority: wire_name(&task.priority),
        project_id: task.project_id.as_ref().map(ToString::to_string),
        assignee_id: task.assignee_id.as_ref().map(ToString::to_string),
        due_at_ms: task.due_at_ms,
        created_at_ms: task.created_at_ms,
        updated_at_ms: task.updated_at_ms,
    }
}

fn to_project_item(project: &Project) -> ProjectItem {
    ProjectItem {
        id: project.id.to_string(),
        name: project.name.clone(),
        description: project.description.clone(),
        status: wire_name(&project.status),
        owner_id: project.owner_id.as_ref().map(ToString::to_string),
    }
}

fn to_user_item(user: &User) -> UserItem {
    UserItem {
        id: user.id.to_string(),
        email: user.email.clone(),
        display_name: user.display_name.clone(),
        avatar_url: user.avatar_url.clone(),
    }
}

fn from_user_item(item: UserItem) -> Result<User, String> {
    Ok(User {
        id: parse_id(&item.id)?,
        email: item.email,
        display_name: item.display_name,
        avatar_url: item.avatar_url,
    })
}

fn to_stat_entry(card: &StatCard, locale: Locale) -> StatEntry {
    StatEntry {
        title: card.kind.title().text(locale).to_string(),
        value: card.value,
        caption: card.caption.text(locale),
        alert: card.kind.is_alert(),
    }
}

fn to_activity_entry(item: &ActivityItem, locale: Locale) -> ActivityEntry {
    ActivityEntry {
        title: item.kind.title().text(locale).to_string(),
        description: item.description.clone(),
        time_label: item.time_label(locale),
    }
}
