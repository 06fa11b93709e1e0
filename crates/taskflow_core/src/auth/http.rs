//! Hosted identity provider adapter (GoTrue-compatible password auth).
//!
//! # Responsibility
//! - Send sign-in/sign-up requests to the hosted auth REST endpoints.
//! - Map success bodies to `User` and error bodies to `AuthError`.
//!
//! # Invariants
//! - Request bodies and tokens are never logged.
//! - Session tokens are not retained; the core performs no session handling.

use crate::auth::{AuthError, AuthResult, Credentials, IdentityProvider, SignUpOutcome};
use crate::config::AuthConfig;
use crate::model::entity::EntityId;
use crate::model::user::User;
use log::{info, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const TOKEN_PATH: &str = "/auth/v1/token?grant_type=password";
const SIGNUP_PATH: &str = "/auth/v1/signup";

#[derive(Serialize)]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: WireUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct WireUserMetadata {
    full_name: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    user: WireUser,
}

/// Sign-up answers with a session when the account is active immediately,
/// and with the bare user when email confirmation is pending.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireSignUp {
    Session { access_token: String, user: WireUser },
    User(WireUser),
}

#[derive(Debug, Default, Deserialize)]
struct WireError {
    error_code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

/// Blocking HTTP identity provider.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl HttpIdentityProvider {
    /// Builds a provider with the configured endpoint, key and timeout.
    ///
    /// # Errors
    /// - `AuthError::Transport` when the HTTP client cannot be constructed.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn post(&self, op: &'static str, path: &str, credentials: &Credentials) -> AuthResult<String> {
        let started_at = Instant::now();
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("apikey", self.anon_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.anon_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&PasswordRequest {
                email: credentials.email.as_str(),
                password: credentials.password.as_str(),
            })
            .send()
            .map_err(|err| {
                warn!(
                    "event=auth_request module=auth op={} status=error duration_ms={} error_code=transport_failed",
                    op,
                    started_at.elapsed().as_millis()
                );
                AuthError::Transport(err.without_url().to_string())
            })?;

        let status = response.status().as_u16();
        let body = read_body(response)?;
        info!(
            "event=auth_request module=auth op={} status={} http_status={} duration_ms={}",
            op,
            if (200..300).contains(&status) { "ok" } else { "error" },
            status,
            started_at.elapsed().as_millis()
        );
        if !(200..300).contains(&status) {
            return Err(parse_error_body(status, &body));
        }
        Ok(body)
    }
}

impl IdentityProvider for HttpIdentityProvider {
    fn sign_in_with_password(&self, credentials: &Credentials) -> AuthResult<User> {
        let body = self.post("sign_in", TOKEN_PATH, credentials)?;
        parse_sign_in_body(&body, &credentials.email)
    }

    fn sign_up(&self, credentials: &Credentials) -> AuthResult<SignUpOutcome> {
        let body = self.post("sign_up", SIGNUP_PATH, credentials)?;
        parse_sign_up_body(&body, &credentials.email)
    }
}

fn read_body(response: Response) -> AuthResult<String> {
    response
        .text()
        .map_err(|err| AuthError::Transport(err.without_url().to_string()))
}

fn parse_sign_in_body(body: &str, fallback_email: &str) -> AuthResult<User> {
    let session: WireSession = serde_json::from_str(body)
        .map_err(|err| AuthError::Transport(format!("invalid sign-in response: {err}")))?;
    Ok(to_user(session.user, fallback_email))
}

fn parse_sign_up_body(body: &str, fallback_email: &str) -> AuthResult<SignUpOutcome> {
    let answer: WireSignUp = serde_json::from_str(body)
        .map_err(|err| AuthError::Transport(format!("invalid sign-up response: {err}")))?;
    Ok(match answer {
        WireSignUp::Session { access_token, user } => SignUpOutcome {
            user: to_user(user, fallback_email),
            confirmation_required: access_token.is_empty(),
        },
        WireSignUp::User(user) => SignUpOutcome {
            user: to_user(user, fallback_email),
            confirmation_required: true,
        },
    })
}

/// Maps a non-success response body to `AuthError::Provider`.
///
/// Message precedence: `error_description`, `msg`, `message`, `error`;
/// unreadable bodies keep the HTTP status as the only detail.
fn parse_error_body(status: u16, body: &str) -> AuthError {
    let wire = serde_json::from_str::<WireError>(body).unwrap_or_default();
    let message = [
        wire.error_description,
        wire.msg,
        wire.message,
        wire.error.clone(),
    ]
    .into_iter()
    .flatten()
    .map(|value| value.trim().to_string())
    .find(|value| !value.is_empty())
    .unwrap_or_else(|| format!("request failed with status {status}"));
    let code = wire.error_code.or(wire.error);
    AuthError::Provider { code, message }
}

fn to_user(wire: WireUser, fallback_email: &str) -> User {
    let display_name = wire.user_metadata.full_name.or(wire.user_metadata.name);
    User {
        id: EntityId::new(wire.id),
        email: wire.email.unwrap_or_else(|| fallback_email.to_string()),
        display_name,
        avatar_url: wire.user_metadata.avatar_url,
    }
}
