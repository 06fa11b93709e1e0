//! In-process identity provider for tests and offline development.
//!
//! Mirrors the hosted provider's observable behavior: unknown or wrong
//! credentials fail with the same message, duplicate sign-ups are rejected,
//! and accounts may require email confirmation before sign-in.

use crate::auth::{AuthError, AuthResult, Credentials, IdentityProvider, SignUpOutcome};
use crate::model::entity::EntityId;
use crate::model::user::User;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const MIN_PASSWORD_CHARS: usize = 6;

struct Account {
    user: User,
    password: String,
    confirmed: bool,
}

/// Identity provider backed by an in-memory account table.
pub struct InMemoryIdentityProvider {
    accounts: Mutex<BTreeMap<String, Account>>,
    require_confirmation: bool,
    calls: AtomicUsize,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    /// Creates a provider whose sign-ups are active immediately.
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(BTreeMap::new()),
            require_confirmation: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a provider whose sign-ups wait for `confirm_email`.
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::new()
        }
    }

    /// Seeds one confirmed account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        let key = account_key(email);
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(
                key.clone(),
                Account {
                    user: User::new(EntityId::generate(), key),
                    password: password.to_string(),
                    confirmed: true,
                },
            );
        }
        self
    }

    /// Marks an account as confirmed. Returns `false` for unknown emails.
    pub fn confirm_email(&self, email: &str) -> bool {
        let Ok(mut accounts) = self.accounts.lock() else {
            return false;
        };
        match accounts.get_mut(&account_key(email)) {
            Some(account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Number of sign-in/sign-up requests received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock_accounts(
        &self,
    ) -> AuthResult<std::sync::MutexGuard<'_, BTreeMap<String, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Transport("account table poisoned".to_string()))
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.lock_accounts()?;
        let account = accounts
            .get(&account_key(&credentials.email))
            .filter(|account| account.password == credentials.password)
            .ok_or_else(|| {
                AuthError::provider(Some("invalid_credentials"), "Invalid login credentials")
            })?;
        if !account.confirmed {
            return Err(AuthError::provider(
                Some("email_not_confirmed"),
                "Email not confirmed",
            ));
        }
        Ok(account.user.clone())
    }

    fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if credentials.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::provider(
                Some("weak_password"),
                format!("Password should be at least {MIN_PASSWORD_CHARS} characters."),
            ));
        }

        let key = account_key(&credentials.email);
        let mut accounts = self.lock_accounts()?;
        if accounts.contains_key(&key) {
            return Err(AuthError::provider(
                Some("user_already_exists"),
                "User already registered",
            ));
        }

        let user = User::new(EntityId::generate(), key.clone());
        accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: credentials.password.clone(),
                confirmed: !self.require_confirmation,
            },
        );
        Ok(SignUpOutcome {
            user,
            confirmation_required: self.require_confirmation,
        })
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
