//! Two-phase login: prime the CSRF cookie, then POST the credentials.

use crate::scratch::csrf::extract_csrf_token;
use crate::scratch::endpoints::CSRF_HEADER;
use crate::scratch::error::{LoginRejection, ScratchError};
use crate::scratch::session::{AuthenticatedIdentity, Credentials, Session};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    use_messages: bool,
}

/// One element of the login endpoint's response array.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginPayload {
    username: Option<String>,
    id: Option<u64>,
    token: Option<String>,
    msg: Option<String>,
}

/// Decoded login answer. The service reports bad credentials in-band with
/// HTTP 200, so this is decided once from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResponse {
    Authenticated(AuthenticatedIdentity),
    Rejected { reason: Option<String> },
}

impl LoginResponse {
    /// Only the first element of the array is inspected.
    pub fn decode(body: &[u8]) -> Result<Self, LoginRejection> {
        let payloads: Vec<LoginPayload> =
            serde_json::from_slice(body).map_err(|_| LoginRejection::MalformedResponse)?;
        let first = payloads
            .into_iter()
            .next()
            .ok_or(LoginRejection::MalformedResponse)?;

        match first.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                let (Some(username), Some(id)) = (first.username, first.id) else {
                    return Err(LoginRejection::MalformedResponse);
                };
                Ok(LoginResponse::Authenticated(AuthenticatedIdentity {
                    username,
                    id,
                    token,
                }))
            }
            None => Ok(LoginResponse::Rejected {
                reason: first.msg.filter(|m| !m.is_empty()),
            }),
        }
    }
}

/// Log in and record the identity on the session.
///
/// Any earlier identity is cleared first, so on every failure path the
/// session ends up unauthenticated. Nothing is retried.
pub async fn login(
    session: &mut Session,
    credentials: &Credentials,
) -> Result<AuthenticatedIdentity, ScratchError> {
    session.clear_identity();
    let endpoints = session.endpoints().clone();

    tracing::info!("fetching CSRF token");
    // The body is irrelevant; the transport stores the CSRF cookie.
    let primed = session
        .client()
        .get(endpoints.csrf_token())
        .send()
        .await
        .map_err(|e| ScratchError::LoginRejected(LoginRejection::Transport(e)))?;
    if !primed.status().is_success() {
        return Err(ScratchError::LoginRejected(LoginRejection::Status(
            primed.status(),
        )));
    }

    let csrf = extract_csrf_token(session, endpoints.site_domain())?;
    tracing::info!(username = credentials.username(), "logging in");

    let resp = session
        .client()
        .post(endpoints.login())
        .header(CSRF_HEADER, csrf.as_str())
        .json(&LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
            use_messages: true,
        })
        .send()
        .await
        .map_err(|e| ScratchError::LoginRejected(LoginRejection::Transport(e)))?;
    if !resp.status().is_success() {
        return Err(ScratchError::LoginRejected(LoginRejection::Status(
            resp.status(),
        )));
    }

    match LoginResponse::decode(resp.bytes()).map_err(ScratchError::LoginRejected)? {
        LoginResponse::Authenticated(identity) => {
            tracing::debug!(username = %identity.username, id = identity.id, "login accepted");
            session.set_identity(identity.clone());
            Ok(identity)
        }
        LoginResponse::Rejected { reason } => {
            Err(ScratchError::LoginRejected(LoginRejection::NoToken(reason)))
        }
    }
}
