use crate::scratch::endpoints::CSRF_COOKIE_NAME;
use crate::scratch::error::ScratchError;
use crate::scratch::session::Session;

/// Read the CSRF token the site stored in the jar for `domain`.
///
/// A missing (or empty) cookie means the priming request never ran or the
/// server withheld the cookie.
pub fn extract_csrf_token(session: &Session, domain: &str) -> Result<String, ScratchError> {
    session
        .get_cookie(domain, CSRF_COOKIE_NAME)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ScratchError::CsrfMissing {
            domain: domain.to_string(),
            cookie: CSRF_COOKIE_NAME,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scratch::endpoints::ScratchEndpoints;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(ScratchEndpoints::default(), Duration::from_secs(5))
    }

    #[test]
    fn test_missing_cookie() {
        let s = session();
        let err = extract_csrf_token(&s, "scratch.mit.edu").unwrap_err();
        assert_eq!(
            err,
            ScratchError::CsrfMissing {
                domain: "scratch.mit.edu".into(),
                cookie: CSRF_COOKIE_NAME,
            }
        );
    }

    #[test]
    fn test_cookie_for_other_domain_is_missing() {
        let s = session();
        s.set_cookies("example.com", [(CSRF_COOKIE_NAME, "tok")]);
        assert!(extract_csrf_token(&s, "scratch.mit.edu").is_err());
    }

    #[test]
    fn test_empty_cookie_is_missing() {
        let s = session();
        s.set_cookies("scratch.mit.edu", [(CSRF_COOKIE_NAME, "")]);
        assert!(matches!(
            extract_csrf_token(&s, "scratch.mit.edu"),
            Err(ScratchError::CsrfMissing { .. })
        ));
    }

    #[test]
    fn test_present_cookie() {
        let s = session();
        s.set_cookies("scratch.mit.edu", [(CSRF_COOKIE_NAME, "tok123")]);
        assert_eq!(extract_csrf_token(&s, "scratch.mit.edu").unwrap(), "tok123");
    }
}
