use crate::base::neterror::NetError;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::Url;

/// A single stored cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

impl From<cookie::SameSite> for SameSite {
    fn from(value: cookie::SameSite) -> Self {
        match value {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::NoRestriction,
        }
    }
}

impl CanonicalCookie {
    /// A host-only session cookie with path `/`.
    pub fn session(name: impl Into<String>, value: impl Into<String>, domain: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.trim_start_matches('.').to_lowercase(),
            path: "/".to_string(),
            creation_time: OffsetDateTime::now_utc(),
            expiration_time: None,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Unspecified,
        }
    }

    /// Build a cookie from a `Set-Cookie` line received for `url`.
    ///
    /// Mirrors `CanonicalCookie::Create`: an explicit `Domain` must cover the
    /// request host and must not be a public suffix, and `__Secure-`/`__Host-`
    /// prefixes are enforced.
    pub fn from_set_cookie(url: &Url, line: &str) -> Result<Self, NetError> {
        let parsed = cookie::Cookie::parse(line).map_err(|_| NetError::CookieMalformed)?;
        let host = url.host_str().ok_or(NetError::InvalidUrl)?.to_lowercase();

        let (domain, host_only) = match parsed.domain() {
            Some(d) => {
                let d = d.trim_start_matches('.').to_lowercase();
                if !crate::cookies::psl::is_valid_cookie_domain(&d, &host) {
                    return Err(NetError::CookiePublicSuffix);
                }
                (d, false)
            }
            None => (host, true),
        };

        // Max-Age wins over Expires (RFC 6265 5.3 step 3).
        let now = OffsetDateTime::now_utc();
        let expiration_time = match parsed.max_age() {
            // Huge values saturate instead of overflowing the date range.
            Some(max_age) => Some(
                now.checked_add(max_age)
                    .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc()),
            ),
            None => parsed.expires().and_then(|e| e.datetime()),
        };

        let cookie = Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain,
            path: parsed
                .path()
                .filter(|p| p.starts_with('/'))
                .unwrap_or("/")
                .to_string(),
            creation_time: now,
            expiration_time,
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site: parsed.same_site().map_or(SameSite::Unspecified, SameSite::from),
        };

        cookie.validate_prefix(url.scheme() == "https")?;
        Ok(cookie)
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time.is_some_and(|expiry| expiry <= current_time)
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), NetError> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(NetError::CookieInvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(NetError::CookieInvalidPrefix);
        }

        Ok(())
    }
}
