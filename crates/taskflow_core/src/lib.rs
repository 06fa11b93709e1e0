//! Core client logic for TaskFlow.
//! Owns the shared task/project/user state, authentication flow, routes and
//! dashboard figures; UI layers only render what this crate decides.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod notice;
pub mod store;

pub use auth::{
    validate_form, AuthError, AuthForm, AuthMode, AuthResult, Credentials, HttpIdentityProvider,
    IdentityProvider, InMemoryIdentityProvider, LoginController, SignUpOutcome, SubmitOutcome,
};
pub use config::{AppConfig, AuthConfig, ConfigError};
pub use dashboard::{DashboardSummary, StatKind};
pub use i18n::{Locale, Message};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{EntityId, EntityList, InvalidIdError};
pub use model::project::{Project, ProjectPatch, ProjectStatus};
pub use model::task::{Task, TaskPatch, TaskPriority, TaskStatus};
pub use model::user::User;
pub use navigation::{DashboardShell, Navigator, Route, Router};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use store::{AppSnapshot, AppStore, StoreChange, StoreError, StoreNotification, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
