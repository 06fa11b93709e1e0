//! Environment-driven client configuration.
//!
//! # Responsibility
//! - Read identity provider, locale and logging settings from the process
//!   environment (or any key lookup, for tests).
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - Missing provider settings are not an error until a provider is built.

use crate::i18n::{Locale, LocaleParseError};
use crate::logging::default_log_level;
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_AUTH_URL: &str = "TASKFLOW_AUTH_URL";
pub const ENV_AUTH_ANON_KEY: &str = "TASKFLOW_AUTH_ANON_KEY";
pub const ENV_AUTH_TIMEOUT_SECS: &str = "TASKFLOW_AUTH_TIMEOUT_SECS";
pub const ENV_LOCALE: &str = "TASKFLOW_LOCALE";
pub const ENV_LOG_LEVEL: &str = "TASKFLOW_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKFLOW_LOG_DIR";

const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting required by the requested component is unset.
    Missing(&'static str),
    InvalidNumber { key: &'static str, value: String },
    InvalidUrl { key: &'static str, value: String },
    InvalidLocale(LocaleParseError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required setting `{key}`"),
            Self::InvalidNumber { key, value } => {
                write!(f, "setting `{key}` must be a positive integer, got `{value}`")
            }
            Self::InvalidUrl { key, value } => {
                write!(f, "setting `{key}` must be an http(s) URL, got `{value}`")
            }
            Self::InvalidLocale(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLocale(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LocaleParseError> for ConfigError {
    fn from(value: LocaleParseError) -> Self {
        Self::InvalidLocale(value)
    }
}

/// Settings for the hosted identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Project base URL without trailing slash, e.g. `https://x.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` when provider settings are absent (offline mode).
    pub auth: Option<AuthConfig>,
    pub locale: Locale,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns a raw value by key.
    ///
    /// # Errors
    /// - Only one of URL/key set, malformed URL, timeout or locale.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let auth = match (read(ENV_AUTH_URL), read(ENV_AUTH_ANON_KEY)) {
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(ENV_AUTH_ANON_KEY)),
            (None, Some(_)) => return Err(ConfigError::Missing(ENV_AUTH_URL)),
            (Some(url), Some(anon_key)) => {
                let timeout_secs = match read(ENV_AUTH_TIMEOUT_SECS) {
                    Some(raw) => parse_positive(ENV_AUTH_TIMEOUT_SECS, &raw)?,
                    None => DEFAULT_AUTH_TIMEOUT_SECS,
                };
                Some(AuthConfig {
                    url: normalize_url(ENV_AUTH_URL, &url)?,
                    anon_key,
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
        };

        let locale = match read(ENV_LOCALE) {
            Some(raw) => raw.parse::<Locale>()?,
            None => Locale::default(),
        };

        Ok(Self {
            auth,
            locale,
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Returns provider settings or the first missing key.
    pub fn require_auth(&self) -> Result<&AuthConfig, ConfigError> {
        self.auth.as_ref().ok_or(ConfigError::Missing(ENV_AUTH_URL))
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        }),
    }
}

/// Accepts an absolute http(s) URL with a host; trailing slashes are dropped.
fn normalize_url(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key,
        value: raw.to_string(),
    };
    let trimmed = raw.trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    let http = matches!(parsed.scheme(), "http" | "https");
    if !http || parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_AUTH_ANON_KEY, ENV_AUTH_URL};
    use crate::i18n::Locale;
    use std::collections::HashMap;
    use std::time::Duration;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_offline_defaults() {
        let config = load(&[]).expect("defaults should load");
        assert!(config.auth.is_none());
        assert_eq!(config.locale, Locale::Fr);
        assert!(config.log_dir.is_none());
        assert!(matches!(
            config.require_auth(),
            Err(ConfigError::Missing(ENV_AUTH_URL))
        ));
    }

    #[test]
    fn reads_full_auth_settings_and_strips_trailing_slash() {
        let config = load(&[
            ("TASKFLOW_AUTH_URL", "https://demo.supabase.co/"),
            ("TASKFLOW_AUTH_ANON_KEY", "anon"),
            ("TASKFLOW_AUTH_TIMEOUT_SECS", "5"),
            ("TASKFLOW_LOCALE", "en-GB"),
            ("TASKFLOW_LOG_LEVEL", "warn"),
        ])
        .expect("config should load");
        let auth = config.require_auth().expect("auth configured");
        assert_eq!(auth.url, "https://demo.supabase.co");
        assert_eq!(auth.timeout, Duration::from_secs(5));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.log_level, "warn");
        assert!(!format!("{auth:?}").contains("anon\""));
    }

    #[test]
    fn half_configured_provider_is_rejected() {
        assert_eq!(
            load(&[("TASKFLOW_AUTH_URL", "https://demo.supabase.co")]),
            Err(ConfigError::Missing(ENV_AUTH_ANON_KEY))
        );
        assert_eq!(
            load(&[("TASKFLOW_AUTH_ANON_KEY", "anon"), ("TASKFLOW_AUTH_URL", "  ")]),
            Err(ConfigError::Missing(ENV_AUTH_URL))
        );
    }

    #[test]
    fn rejects_bad_url_timeout_and_locale() {
        let bad_url = load(&[
            ("TASKFLOW_AUTH_URL", "demo.supabase.co"),
            ("TASKFLOW_AUTH_ANON_KEY", "anon"),
        ]);
        assert!(matches!(bad_url, Err(ConfigError::InvalidUrl { .. })));

        let bad_timeout = load(&[
            ("TASKFLOW_AUTH_URL", "https://demo.supabase.co"),
            ("TASKFLOW_AUTH_ANON_KEY", "anon"),
            ("TASKFLOW_AUTH_TIMEOUT_SECS", "0"),
        ]);
        assert!(matches!(bad_timeout, Err(ConfigError::InvalidNumber { .. })));

        let bad_locale = load(&[("TASKFLOW_LOCALE", "de")]);
        assert!(matches!(bad_locale, Err(ConfigError::InvalidLocale(_))));
    }

    #[test]
    fn rejects_malformed_hosts_and_other_schemes() {
        for raw in ["https://a b", "https://", "ftp://demo.supabase.co", "mailto:me@x.io"] {
            let result = load(&[("TASKFLOW_AUTH_URL", raw), ("TASKFLOW_AUTH_ANON_KEY", "anon")]);
            assert!(
                matches!(result, Err(ConfigError::InvalidUrl { .. })),
                "{raw} should be rejected"
            );
        }

        let local = load(&[
            ("TASKFLOW_AUTH_URL", "http://127.0.0.1:54321//"),
            ("TASKFLOW_AUTH_ANON_KEY", "anon"),
        ])
        .expect("local url should be accepted");
        assert_eq!(
            local.auth.expect("auth configured").url,
            "http://127.0.0.1:54321"
        );
    }
}
