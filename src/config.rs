//! Run configuration read from the process environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `SCRATCH_USERNAME`, `SCRATCH_PASSWORD` | Both set selects automated mode |
//! | `TARGET_USER`, then `SCRATCH_TARGET` | Profile to visit (default: yourself) |
//! | `COMMENT_CONTENT` | Comment to post; empty skips the step |
//! | `SCRATCH_REQUEST_TIMEOUT_SECS` | Per-request timeout, default 30 |
//! | `SCRATCH_SITE_URL`, `SCRATCH_API_URL` | Origin overrides |

use crate::scratch::endpoints::{ScratchEndpoints, DEFAULT_API_URL, DEFAULT_SITE_URL};
use crate::scratch::pipeline::AutomationPlan;
use crate::scratch::session::Credentials;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },
    #[error("SCRATCH_REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Environment keys as the `config` crate presents them (lowercased).
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawEnv {
    scratch_username: Option<String>,
    scratch_password: Option<String>,
    target_user: Option<String>,
    scratch_target: Option<String>,
    comment_content: Option<String>,
    scratch_request_timeout_secs: Option<u64>,
    scratch_site_url: Option<String>,
    scratch_api_url: Option<String>,
}

/// Whether the run can log in on its own.
#[derive(Debug, Clone)]
pub enum Mode {
    Automated(Credentials),
    /// No credentials configured. Prompting is not supported.
    Interactive,
}

#[derive(Debug, Clone)]
pub struct AutomationConfig {
    pub mode: Mode,
    pub target: Option<String>,
    pub comment: Option<String>,
    pub request_timeout: Duration,
    pub endpoints: ScratchEndpoints,
}

impl AutomationConfig {
    /// Load `.env` (if any), then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env(::config::Environment::default())
    }

    /// Read from an explicit environment source.
    pub fn from_env(env: ::config::Environment) -> Result<Self, ConfigError> {
        let raw: RawEnv = ::config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnv) -> Result<Self, ConfigError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let mode = match (non_empty(raw.scratch_username), non_empty(raw.scratch_password)) {
            (Some(username), Some(password)) => Mode::Automated(Credentials::new(username, password)),
            _ => Mode::Interactive,
        };

        let timeout_secs = raw
            .scratch_request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let site = non_empty(raw.scratch_site_url).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let api = non_empty(raw.scratch_api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let endpoints = ScratchEndpoints::new(
            url::Url::parse(&site).map_err(|source| ConfigError::InvalidUrl {
                var: "SCRATCH_SITE_URL",
                source,
            })?,
            url::Url::parse(&api).map_err(|source| ConfigError::InvalidUrl {
                var: "SCRATCH_API_URL",
                source,
            })?,
        );

        Ok(Self {
            mode,
            target: non_empty(raw.target_user).or_else(|| non_empty(raw.scratch_target)),
            comment: non_empty(raw.comment_content),
            request_timeout: Duration::from_secs(timeout_secs),
            endpoints,
        })
    }

    /// `None` in interactive mode.
    pub fn plan(&self) -> Option<AutomationPlan> {
        match &self.mode {
            Mode::Automated(credentials) => Some(AutomationPlan {
                credentials: credentials.clone(),
                target: self.target.clone(),
                comment: self.comment.clone(),
            }),
            Mode::Interactive => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ::config::Environment {
        let map: ::config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ::config::Environment::default().source(Some(map))
    }

    #[test]
    fn test_automated_mode() {
        let cfg = AutomationConfig::from_env(env(&[
            ("SCRATCH_USERNAME", "alice"),
            ("SCRATCH_PASSWORD", "pw"),
            ("COMMENT_CONTENT", "hi!"),
        ]))
        .unwrap();

        let plan = cfg.plan().unwrap();
        assert_eq!(plan.credentials.username(), "alice");
        assert_eq!(plan.credentials.password(), "pw");
        assert_eq!(plan.target, None);
        assert_eq!(plan.comment.as_deref(), Some("hi!"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        assert_eq!(cfg.endpoints, ScratchEndpoints::default());
    }

    #[test]
    fn test_missing_password_is_interactive() {
        let cfg = AutomationConfig::from_env(env(&[("SCRATCH_USERNAME", "alice")])).unwrap();
        assert!(matches!(cfg.mode, Mode::Interactive));
        assert!(cfg.plan().is_none());
    }

    #[test]
    fn test_target_precedence() {
        let cfg = AutomationConfig::from_env(env(&[
            ("TARGET_USER", "bob"),
            ("SCRATCH_TARGET", "carol"),
        ]))
        .unwrap();
        assert_eq!(cfg.target.as_deref(), Some("bob"));

        let cfg = AutomationConfig::from_env(env(&[("SCRATCH_TARGET", "carol")])).unwrap();
        assert_eq!(cfg.target.as_deref(), Some("carol"));
    }

    #[test]
    fn test_empty_comment_is_absent() {
        let cfg = AutomationConfig::from_env(env(&[("COMMENT_CONTENT", "")])).unwrap();
        assert_eq!(cfg.comment, None);
    }

    #[test]
    fn test_timeout_and_origins() {
        let cfg = AutomationConfig::from_env(env(&[
            ("SCRATCH_REQUEST_TIMEOUT_SECS", "5"),
            ("SCRATCH_SITE_URL", "http://127.0.0.1:9000/"),
            ("SCRATCH_API_URL", "http://127.0.0.1:9001/"),
        ]))
        .unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.endpoints.site_domain(), "127.0.0.1");
    }

    #[test]
    fn test_invalid_values() {
        let err = AutomationConfig::from_env(env(&[("SCRATCH_REQUEST_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));

        let err = AutomationConfig::from_env(env(&[("SCRATCH_SITE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: "SCRATCH_SITE_URL",
                ..
            }
        ));
    }
}
