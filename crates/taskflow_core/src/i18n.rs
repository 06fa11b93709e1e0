//! Localized user-facing strings.
//!
//! # Responsibility
//! - Map stable message keys to French and English text.
//! - Parse locale tags from configuration.
//!
//! # Invariants
//! - Every `Message` has text in every `Locale`.
//! - French is the default locale.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleParseError(pub String);

impl Display for LocaleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported locale `{}`; expected fr|en", self.0)
    }
}

impl Error for LocaleParseError {}

impl FromStr for Locale {
    type Err = LocaleParseError;

    /// Accepts `fr`, `en` and region-tagged forms such as `fr-FR` or `en_US`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let language = normalized
            .split(['-', '_'])
            .next()
            .unwrap_or_default();
        match language {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            _ => Err(LocaleParseError(value.trim().to_string())),
        }
    }
}

/// Stable key for every user-visible string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    AppTitle,
    AppTagline,
    LoginTab,
    RegisterTab,
    EmailLabel,
    EmailPlaceholder,
    PasswordLabel,
    ConfirmPasswordLabel,
    LoginSubmit,
    LoginSubmitting,
    RegisterSubmit,
    RegisterSubmitting,
    OrContinueWith,
    LoginSucceeded,
    RegisterSucceeded,
    PasswordMismatch,
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    GenericError,
    NavDashboard,
    NavTasks,
    NavProjects,
    NavReports,
    NavSettings,
    DashboardTitle,
    StatTotalTasks,
    StatInProgress,
    StatOverdue,
    StatActiveMembers,
    ProjectsInProgress,
    RecentActivity,
    ActivityTaskCreated,
    ActivityTaskAssigned,
    ActivityTaskUpdated,
    ActivityProjectUpdated,
    ActivityCommentAdded,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::Fr => self.fr(),
            Locale::En => self.en(),
        }
    }

    fn fr(self) -> &'static str {
        match self {
            Self::AppTitle => "TaskFlow Pro",
            Self::AppTagline => "Gérez vos projets et tâches efficacement",
            Self::LoginTab => "Connexion",
            Self::RegisterTab => "Inscription",
            Self::EmailLabel => "Email",
            Self::EmailPlaceholder => "exemple@email.com",
            Self::PasswordLabel => "Mot de passe",
            Self::ConfirmPasswordLabel => "Confirmer le mot de passe",
            Self::LoginSubmit => "Se connecter",
            Self::LoginSubmitting => "Connexion en cours...",
            Self::RegisterSubmit => "S'inscrire",
            Self::RegisterSubmitting => "Inscription en cours...",
            Self::OrContinueWith => "Ou continuez avec",
            Self::LoginSucceeded => "Connexion réussie",
            Self::RegisterSucceeded => "Inscription réussie. Vérifiez votre email pour confirmer.",
            Self::PasswordMismatch => "Les mots de passe ne correspondent pas",
            Self::EmailRequired => "L'email est requis",
            Self::EmailInvalid => "L'email n'est pas valide",
            Self::PasswordRequired => "Le mot de passe est requis",
            Self::GenericError => "Une erreur est survenue",
            Self::NavDashboard => "Tableau de bord",
            Self::NavTasks => "Tâches",
            Self::NavProjects => "Projets",
            Self::NavReports => "Rapports IA",
            Self::NavSettings => "Paramètres",
            Self::DashboardTitle => "Tableau de bord",
            Self::StatTotalTasks => "Tâches totales",
            Self::StatInProgress => "En cours",
            Self::StatOverdue => "En retard",
            Self::StatActiveMembers => "Membres actifs",
            Self::ProjectsInProgress => "Projets en cours",
            Self::RecentActivity => "Activité récente",
            Self::ActivityTaskCreated => "Nouvelle tâche créée",
            Self::ActivityTaskAssigned => "Nouvelle tâche assignée",
            Self::ActivityTaskUpdated => "Tâche mise à jour",
            Self::ActivityProjectUpdated => "Projet mis à jour",
            Self::ActivityCommentAdded => "Commentaire ajouté",
        }
    }

    fn en(self) -> &'static str {
        match self {
            Self::AppTitle => "TaskFlow Pro",
            Self::AppTagline => "Manage your projects and tasks efficiently",
            Self::LoginTab => "Sign in",
            Self::RegisterTab => "Sign up",
            Self::EmailLabel => "Email",
            Self::EmailPlaceholder => "example@email.com",
            Self::PasswordLabel => "Password",
            Self::ConfirmPasswordLabel => "Confirm password",
            Self::LoginSubmit => "Sign in",
            Self::LoginSubmitting => "Signing in...",
            Self::RegisterSubmit => "Sign up",
            Self::RegisterSubmitting => "Signing up...",
            Self::OrContinueWith => "Or continue with",
            Self::LoginSucceeded => "Signed in successfully",
            Self::RegisterSucceeded => "Signed up. Check your email to confirm.",
            Self::PasswordMismatch => "passwords do not match",
            Self::EmailRequired => "email is required",
            Self::EmailInvalid => "email is not valid",
            Self::PasswordRequired => "password is required",
            Self::GenericError => "An error occurred",
            Self::NavDashboard => "Dashboard",
            Self::NavTasks => "Tasks",
            Self::NavProjects => "Projects",
            Self::NavReports => "AI reports",
            Self::NavSettings => "Settings",
            Self::DashboardTitle => "Dashboard",
            Self::StatTotalTasks => "Total tasks",
            Self::StatInProgress => "In progress",
            Self::StatOverdue => "Overdue",
            Self::StatActiveMembers => "Active members",
            Self::ProjectsInProgress => "Projects in progress",
            Self::RecentActivity => "Recent activity",
            Self::ActivityTaskCreated => "New task created",
            Self::ActivityTaskAssigned => "New task assigned",
            Self::ActivityTaskUpdated => "Task updated",
            Self::ActivityProjectUpdated => "Project updated",
            Self::ActivityCommentAdded => "Comment added",
        }
    }
}
