//! Login/registration form controller.
//!
//! # Responsibility
//! - Hold the active tab and the loading flag of the auth screen.
//! - Run one submission: validate, call the provider, post a notice, and
//!   navigate on sign-in success.
//!
//! # Invariants
//! - `is_loading()` is `false` whenever `submit` returns, on every path.
//! - Validation failures (including password mismatch) never call the
//!   provider.
//! - Registration success does not navigate.

use crate::auth::{validate_form, AuthError, AuthForm, AuthMode, IdentityProvider, SignUpOutcome};
use crate::i18n::{Locale, Message};
use crate::model::user::User;
use crate::navigation::{Navigator, Route};
use crate::notice::{Notice, Notifier};
use log::{info, warn};

/// Result of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    SignedIn(User),
    SignedUp(SignUpOutcome),
    Failed(AuthError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Controller behind the authentication screen.
pub struct LoginController<P, N, T> {
    provider: P,
    navigator: N,
    notifier: T,
    locale: Locale,
    mode: AuthMode,
    loading: bool,
}

impl<P, N, T> LoginController<P, N, T>
where
    P: IdentityProvider,
    N: Navigator,
    T: Notifier,
{
    pub fn new(provider: P, navigator: N, notifier: T, locale: Locale) -> Self {
        Self {
            provider,
            navigator,
            notifier,
            locale,
            mode: AuthMode::default(),
            loading: false,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Switches the active tab.
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Caption of the submit button for the current tab and loading state.
    pub fn submit_label(&self) -> &'static str {
        submit_label(self.mode, self.loading).text(self.locale)
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn notifier(&self) -> &T {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut T {
        &mut self.notifier
    }

    /// Submits `form` under the active tab.
    ///
    /// # Contract
    /// - Login success: success notice, then navigation to the dashboard.
    /// - Register success: success notice asking to confirm the email.
    /// - Any failure: one error notice with the failure message.
    /// - Loading is cleared before returning in every case.
    pub fn submit(&mut self, form: &AuthForm) -> SubmitOutcome {
        let mode = self.mode;
        self.loading = true;
        info!(
            "event=auth_submit module=auth mode={} status=start",
            mode.as_str()
        );

        let outcome = match mode {
            AuthMode::Login => self.sign_in(form),
            AuthMode::Register => self.sign_up(form),
        };

        if let SubmitOutcome::Failed(err) = &outcome {
            warn!(
                "event=auth_submit module=auth mode={} status=error error_code={}",
                mode.as_str(),
                err.code()
            );
            self.notifier
                .notify(Notice::error(err.user_message(self.locale)));
        } else {
            info!(
                "event=auth_submit module=auth mode={} status=ok",
                mode.as_str()
            );
        }

        self.loading = false;
        outcome
    }

    fn sign_in(&mut self, form: &AuthForm) -> SubmitOutcome {
        let result = validate_form(AuthMode::Login, form)
            .and_then(|credentials| self.provider.sign_in_with_password(&credentials));
        match result {
            Ok(user) => {
                self.notifier
                    .notify(Notice::success(Message::LoginSucceeded.text(self.locale)));
                self.navigator.navigate(Route::Dashboard);
                SubmitOutcome::SignedIn(user)
            }
            Err(err) => SubmitOutcome::Failed(err),
        }
    }

    fn sign_up(&mut self, form: &AuthForm) -> SubmitOutcome {
        let result = validate_form(AuthMode::Register, form)
            .and_then(|credentials| self.provider.sign_up(&credentials));
        match result {
            Ok(outcome) => {
                self.notifier
                    .notify(Notice::success(Message::RegisterSucceeded.text(self.locale)));
                SubmitOutcome::SignedUp(outcome)
            }
            Err(err) => SubmitOutcome::Failed(err),
        }
    }
}

/// Submit button caption key for `mode` and `loading`.
pub fn submit_label(mode: AuthMode, loading: bool) -> Message {
    match (mode, loading) {
        (AuthMode::Login, false) => Message::LoginSubmit,
        (AuthMode::Login, true) => Message::LoginSubmitting,
        (AuthMode::Register, false) => Message::RegisterSubmit,
        (AuthMode::Register, true) => Message::RegisterSubmitting,
    }
}
