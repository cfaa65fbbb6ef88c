use crate::scratch::error::{ProfileLookupFailure, ScratchError};
use crate::scratch::session::{Session, TargetProfile};

/// GET the public profile of `username`.
///
/// Every failure collapses to [`ScratchError::ProfileNotFound`]; the
/// `cause` field only feeds diagnostics. The session is not modified.
pub async fn fetch_profile(session: &Session, username: &str) -> Result<TargetProfile, ScratchError> {
    let not_found = |cause| ScratchError::ProfileNotFound {
        username: username.to_string(),
        cause,
    };

    let resp = session
        .client()
        .get(session.endpoints().user_profile(username))
        .send()
        .await
        .map_err(|e| not_found(ProfileLookupFailure::Transport(e)))?;
    if !resp.status().is_success() {
        return Err(not_found(ProfileLookupFailure::Status(resp.status())));
    }

    let raw: serde_json::Value = resp
        .json()
        .map_err(|_| not_found(ProfileLookupFailure::Malformed))?;
    if !raw.is_object() {
        return Err(not_found(ProfileLookupFailure::Malformed));
    }

    let profile = TargetProfile {
        username: username.to_string(),
        raw,
    };
    tracing::info!(
        username,
        id = ?profile.id(),
        joined = profile.joined().unwrap_or("unknown"),
        country = profile.country().unwrap_or("unknown"),
        "fetched profile"
    );
    Ok(profile)
}
