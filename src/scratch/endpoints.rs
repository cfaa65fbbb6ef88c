//! Fixed request contract of the Scratch web service.

use url::Url;

/// Cookie the site sets on `/csrf_token/` and expects echoed back.
pub const CSRF_COOKIE_NAME: &str = "scratchcsrftoken";

/// Header carrying the echoed CSRF token.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Identifying user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_SITE_URL: &str = "https://scratch.mit.edu/";
pub const DEFAULT_API_URL: &str = "https://api.scratch.mit.edu/";

/// Site and API origins plus the paths hanging off them.
///
/// Both origins are swappable so the whole pipeline can run against a local
/// server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchEndpoints {
    site: Url,
    api: Url,
}

impl Default for ScratchEndpoints {
    fn default() -> Self {
        Self::parse(DEFAULT_SITE_URL, DEFAULT_API_URL)
            .unwrap_or_else(|_| unreachable!("default origins are valid URLs"))
    }
}

impl ScratchEndpoints {
    pub fn new(site: Url, api: Url) -> Self {
        Self { site, api }
    }

    pub fn parse(site: &str, api: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(site)?, Url::parse(api)?))
    }

    /// Host the session cookies (and the CSRF token) are scoped to.
    pub fn site_domain(&self) -> &str {
        self.site.host_str().unwrap_or_default()
    }

    /// `{site}/`, the default `Referer`.
    pub fn site_root(&self) -> Url {
        Self::with_segments(&self.site, &[], true)
    }

    /// Token-priming endpoint; only its `Set-Cookie` matters.
    pub fn csrf_token(&self) -> Url {
        Self::with_segments(&self.site, &["csrf_token"], true)
    }

    pub fn login(&self) -> Url {
        Self::with_segments(&self.site, &["accounts", "login"], true)
    }

    /// Public profile JSON on the API origin.
    pub fn user_profile(&self, username: &str) -> Url {
        Self::with_segments(&self.api, &["users", username], false)
    }

    /// Profile page on the site origin, used as the comment `Referer`.
    pub fn user_page(&self, username: &str) -> Url {
        Self::with_segments(&self.site, &["users", username], true)
    }

    pub fn add_comment(&self, username: &str) -> Url {
        Self::with_segments(
            &self.site,
            &["site-api", "comments", "user", username, "add"],
            true,
        )
    }

    /// Append percent-encoded path segments to `base`.
    fn with_segments(base: &Url, segments: &[&str], trailing_slash: bool) -> Url {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        url
    }
}
