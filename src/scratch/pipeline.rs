//! The linear automation run: login, profile lookup, optional comment.

use crate::scratch::auth::login;
use crate::scratch::comment::post_comment;
use crate::scratch::endpoints::ScratchEndpoints;
use crate::scratch::profile::fetch_profile;
use crate::scratch::session::{Credentials, Session};
use crate::socket::tls::TlsConfig;
use std::time::Duration;

/// What one run should do.
#[derive(Debug, Clone)]
pub struct AutomationPlan {
    pub credentials: Credentials,
    /// Profile to look up and comment on; `None` means the logged-in user.
    pub target: Option<String>,
    /// Empty or `None` skips the comment step.
    pub comment: Option<String>,
}

/// Result of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success,
    LoginFailed,
    /// Logged and otherwise ignored; the run continues.
    ProfileFetchFailed,
    /// Logged and otherwise ignored.
    CommentFailed,
}

impl PipelineOutcome {
    /// Only a failed login is a failed process.
    pub fn exit_code(self) -> u8 {
        match self {
            PipelineOutcome::LoginFailed => 1,
            PipelineOutcome::Success
            | PipelineOutcome::ProfileFetchFailed
            | PipelineOutcome::CommentFailed => 0,
        }
    }
}

/// Runs [`AutomationPlan`]s, each on a fresh [`Session`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    endpoints: ScratchEndpoints,
    request_timeout: Duration,
    tls_config: TlsConfig,
}

impl Pipeline {
    pub fn new(endpoints: ScratchEndpoints, request_timeout: Duration) -> Self {
        Self {
            endpoints,
            request_timeout,
            tls_config: TlsConfig::default(),
        }
    }

    pub fn with_tls_config(mut self, tls_config: TlsConfig) -> Self {
        self.tls_config = tls_config;
        self
    }

    /// Execute every step in order, awaiting each request before the next.
    ///
    /// A login failure short-circuits: no profile lookup, no comment. After
    /// login every failure is logged and the run still finishes. When both
    /// later steps fail, the comment failure is reported.
    pub async fn run(&self, plan: &AutomationPlan) -> PipelineOutcome {
        let mut session = Session::with_tls_config(
            self.endpoints.clone(),
            self.request_timeout,
            self.tls_config.clone(),
        );

        let identity = match login(&mut session, &plan.credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!(error = %e, "login failed, exiting");
                return PipelineOutcome::LoginFailed;
            }
        };
        tracing::info!(username = %identity.username, "login successful");

        let target = plan.target.as_deref().unwrap_or(&identity.username);
        tracing::info!(user = %target, "target user");

        let mut outcome = PipelineOutcome::Success;
        if let Err(e) = fetch_profile(&session, target).await {
            tracing::error!("{e}");
            outcome = PipelineOutcome::ProfileFetchFailed;
        }

        match plan.comment.as_deref().filter(|c| !c.is_empty()) {
            Some(content) => {
                tracing::info!(user = %target, "posting comment");
                match post_comment(&session, target, content).await {
                    Ok(()) => tracing::info!(user = %target, "comment posted successfully"),
                    Err(e) => {
                        tracing::error!("{e}");
                        if let Some(hint) = e.hint() {
                            tracing::warn!("{hint}");
                        }
                        outcome = PipelineOutcome::CommentFailed;
                    }
                }
            }
            None => tracing::info!("no comment content provided, skipping comment"),
        }

        tracing::info!("automation finished");
        outcome
    }
}
