use crate::base::neterror::NetError;
use http::StatusCode;
use thiserror::Error;

/// Failures of the automation steps.
///
/// Only [`ScratchError::CsrfMissing`] and [`ScratchError::LoginRejected`]
/// come out of login; the pipeline treats the other two as non-fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScratchError {
    #[error("CSRF token cookie `{cookie}` missing for {domain}")]
    CsrfMissing {
        domain: String,
        cookie: &'static str,
    },
    #[error("login rejected: {0}")]
    LoginRejected(LoginRejection),
    /// Collapses "no such user" and "could not ask"; `cause` is diagnostic only.
    #[error("failed to get profile info for {username} ({cause})")]
    ProfileNotFound {
        username: String,
        cause: ProfileLookupFailure,
    },
    #[error("failed to post comment: {0}")]
    CommentFailed(CommentFailure),
}

impl ScratchError {
    /// Extra operator guidance printed after the diagnostic line.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ScratchError::CommentFailed(CommentFailure::Forbidden) => {
                Some("403 Forbidden: check login or email verification")
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginRejection {
    #[error("{0}")]
    Transport(NetError),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("unexpected login response shape")]
    MalformedResponse,
    /// The service answered but issued no token; carries its message if any.
    #[error("{}", .0.as_deref().unwrap_or("no token in login response"))]
    NoToken(Option<String>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileLookupFailure {
    #[error("{0}")]
    Transport(NetError),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("malformed profile payload")]
    Malformed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommentFailure {
    #[error("403 Forbidden")]
    Forbidden,
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("{0}")]
    Transport(NetError),
    #[error("no CSRF token for {0}")]
    CsrfMissing(String),
}
