use crate::scratch::csrf::extract_csrf_token;
use crate::scratch::endpoints::CSRF_HEADER;
use crate::scratch::error::{CommentFailure, ScratchError};
use crate::scratch::session::Session;
use http::header::REFERER;
use http::StatusCode;
use serde::Serialize;

/// Top-level comment; both ids stay empty.
#[derive(Serialize)]
struct NewComment<'a> {
    content: &'a str,
    parent_id: &'a str,
    commentee_id: &'a str,
}

/// Post `content` as a top-level comment on `target`'s profile.
///
/// Does not check that the session is logged in; the server rejects
/// anonymous posts with 403. The CSRF token is read from the jar again
/// since it may have rotated after login.
pub async fn post_comment(session: &Session, target: &str, content: &str) -> Result<(), ScratchError> {
    let endpoints = session.endpoints();
    let csrf = extract_csrf_token(session, endpoints.site_domain()).map_err(|_| {
        ScratchError::CommentFailed(CommentFailure::CsrfMissing(
            endpoints.site_domain().to_string(),
        ))
    })?;

    let resp = session
        .client()
        .post(endpoints.add_comment(target))
        .header(CSRF_HEADER, csrf.as_str())
        .header(REFERER, endpoints.user_page(target).as_str())
        .json(&NewComment {
            content,
            parent_id: "",
            commentee_id: "",
        })
        .send()
        .await
        .map_err(|e| ScratchError::CommentFailed(CommentFailure::Transport(e)))?;

    match resp.status() {
        StatusCode::OK | StatusCode::CREATED => Ok(()),
        StatusCode::FORBIDDEN => Err(ScratchError::CommentFailed(CommentFailure::Forbidden)),
        status => Err(ScratchError::CommentFailed(CommentFailure::Status(status))),
    }
}
