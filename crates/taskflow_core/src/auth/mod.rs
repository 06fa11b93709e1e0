//! Authentication boundary and login/registration flow.
//!
//! # Responsibility
//! - Validate login/registration input before any provider call.
//! - Abstract the hosted identity provider behind `IdentityProvider`.
//! - Drive the form submission flow (`LoginController`).
//!
//! # Invariants
//! - Validation failures never reach the provider.
//! - Credentials are never logged or shown by `Debug`.
//! - The auth flow never mutates the client store.

pub mod controller;
pub mod http;
pub mod memory;

use crate::i18n::{Locale, Message};
use crate::model::user::User;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub use controller::{submit_label, LoginController, SubmitOutcome};
pub use http::HttpIdentityProvider;
pub use memory::InMemoryIdentityProvider;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub type AuthResult<T> = Result<T, AuthError>;

/// Login form tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    pub fn tab_label(self) -> Message {
        match self {
            Self::Login => Message::LoginTab,
            Self::Register => Message::RegisterTab,
        }
    }
}

/// Validated email/password pair sent to the provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw form input as typed by the user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    /// Only read in `AuthMode::Register`.
    pub confirm_password: Option<String>,
}

impl AuthForm {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    pub fn register(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: Some(confirm_password.into()),
        }
    }
}

impl Debug for AuthForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("email_len", &self.email.len())
            .field("has_confirm_password", &self.confirm_password.is_some())
            .finish()
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: User,
    /// `true` when the provider sent a confirmation email instead of
    /// activating the account immediately.
    pub confirmation_required: bool,
}

/// Hosted identity provider boundary.
pub trait IdentityProvider {
    /// Verifies credentials and returns the signed-in user.
    fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<User>;

    /// Registers a new account.
    fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome>;
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for &P {
    fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<User> {
        (**self).sign_in_with_password(credentials)
    }

    fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        (**self).sign_up(credentials)
    }
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for Box<P> {
    fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<User> {
        (**self).sign_in_with_password(credentials)
    }

    fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        (**self).sign_up(credentials)
    }
}

/// Authentication failure, from local validation or from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    /// Registration confirmation differs from the password.
    PasswordMismatch,
    /// Provider rejected the request (bad credentials, existing account...).
    Provider {
        code: Option<String>,
        message: String,
    },
    /// Provider could not be reached or answered with an unreadable body.
    Transport(String),
}

impl AuthError {
    pub fn provider(code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Provider {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Returns whether the failure was raised before contacting the provider.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmailRequired | Self::EmailInvalid | Self::PasswordRequired | Self::PasswordMismatch
        )
    }

    /// Stable code used in log events; never contains user input.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailRequired => "email_required",
            Self::EmailInvalid => "email_invalid",
            Self::PasswordRequired => "password_required",
            Self::PasswordMismatch => "password_mismatch",
            Self::Provider { .. } => "provider_rejected",
            Self::Transport(_) => "transport_failed",
        }
    }

    /// Text shown to the user in an error notice.
    ///
    /// Validation failures are localized; provider messages pass through, and
    /// an empty message falls back to the generic error text.
    pub fn user_message(&self, locale: Locale) -> String {
        let text = match self {
            Self::EmailRequired => Message::EmailRequired.text(locale),
            Self::EmailInvalid => Message::EmailInvalid.text(locale),
            Self::PasswordRequired => Message::PasswordRequired.text(locale),
            Self::PasswordMismatch => Message::PasswordMismatch.text(locale),
            Self::Provider { message, .. } | Self::Transport(message) => message.trim(),
        };
        if text.is_empty() {
            Message::GenericError.text(locale).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailRequired => write!(f, "email is required"),
            Self::EmailInvalid => write!(f, "email is not valid"),
            Self::PasswordRequired => write!(f, "password is required"),
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::Provider {
                code: Some(code),
                message,
            } => write!(f, "identity provider rejected request ({code}): {message}"),
            Self::Provider { code: None, message } => {
                write!(f, "identity provider rejected request: {message}")
            }
            Self::Transport(message) => write!(f, "identity provider unreachable: {message}"),
        }
    }
}

impl Error for AuthError {}

/// Validates form input for `mode` and returns provider credentials.
///
/// # Contract
/// - Email is trimmed; password is taken verbatim.
/// - `Register` requires the confirmation to equal the password.
/// - Runs entirely locally; no provider is involved.
pub fn validate_form(mode: AuthMode, form: &AuthForm) -> AuthResult<Credentials> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(AuthError::EmailRequired);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AuthError::EmailInvalid);
    }
    if form.password.is_empty() {
        return Err(AuthError::PasswordRequired);
    }
    if mode == AuthMode::Register
        && form.confirm_password.as_deref() != Some(form.password.as_str())
    {
        return Err(AuthError::PasswordMismatch);
    }

    Ok(Credentials {
        email: email.to_string(),
        password: form.password.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::{validate_form, AuthError, AuthForm, AuthMode, Credentials};
    use crate::i18n::Locale;

    #[test]
    fn login_trims_email_and_keeps_password() {
        let credentials = validate_form(AuthMode::Login, &AuthForm::login("  a@b.io ", " pw "))
            .expect("valid login form");
        assert_eq!(credentials.email, "a@b.io");
        assert_eq!(credentials.password, " pw ");
    }

    #[test]
    fn rejects_missing_or_malformed_fields() {
        assert_eq!(
            validate_form(AuthMode::Login, &AuthForm::login("   ", "pw")),
            Err(AuthError::EmailRequired)
        );
        assert_eq!(
            validate_form(AuthMode::Login, &AuthForm::login("not-an-email", "pw")),
            Err(AuthError::EmailInvalid)
        );
        assert_eq!(
            validate_form(AuthMode::Login, &AuthForm::login("a@b.io", "")),
            Err(AuthError::PasswordRequired)
        );
    }

    #[test]
    fn register_requires_matching_confirmation() {
        let mismatch = AuthForm::register("a@b.io", "secret1", "secret2");
        assert_eq!(
            validate_form(AuthMode::Register, &mismatch),
            Err(AuthError::PasswordMismatch)
        );

        let missing = AuthForm::login("a@b.io", "secret1");
        assert_eq!(
            validate_form(AuthMode::Register, &missing),
            Err(AuthError::PasswordMismatch)
        );

        // Login ignores the confirmation field entirely.
        assert!(validate_form(AuthMode::Login, &mismatch).is_ok());
    }

    #[test]
    fn user_message_localizes_validation_and_falls_back_for_empty_provider_text() {
        assert_eq!(
            AuthError::PasswordMismatch.user_message(Locale::En),
            "passwords do not match"
        );
        assert_eq!(
            AuthError::provider(None, "  ").user_message(Locale::Fr),
            "Une erreur est survenue"
        );
        assert_eq!(
            AuthError::provider(Some("invalid_credentials"), "Invalid login credentials")
                .user_message(Locale::Fr),
            "Invalid login credentials"
        );
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let credentials = Credentials {
            email: "a@b.io".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("a@b.io"));
        assert!(!rendered.contains("hunter2"));

        let form = AuthForm::login("a@b.io", "hunter2");
        assert!(!format!("{form:?}").contains("hunter2"));
    }
}
