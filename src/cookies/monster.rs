use crate::base::neterror::NetError;
use crate::cookies::canonicalcookie::CanonicalCookie;
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per domain (Chromium default).
const MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Maximum total cookies. Chromium uses 3300; a session against a single
/// service never gets close.
const MAX_COOKIES_TOTAL: usize = 3000;

/// In-memory cookie jar keyed by cookie domain.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// Cloning is cheap and yields a handle to the same jar, which is how the
/// transport and the session share it.
#[derive(Clone, Default)]
pub struct CookieMonster {
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();

        // Remove existing if name/path match
        entry.retain(|c| c.name != cookie.name || c.path != cookie.path);

        // An already-expired cookie is a deletion.
        if cookie.is_expired(OffsetDateTime::now_utc()) {
            return;
        }

        // Enforce per-domain limit with LRU eviction
        while entry.len() >= MAX_COOKIES_PER_DOMAIN {
            match entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            {
                Some(oldest_idx) => {
                    entry.remove(oldest_idx);
                }
                None => break,
            }
        }

        entry.push(cookie);
        drop(entry); // Release lock before checking global count

        self.enforce_global_limit();
    }

    /// Evict the oldest cookies across all domains until under the global limit.
    fn enforce_global_limit(&self) {
        while self.total_cookie_count() > MAX_COOKIES_TOTAL {
            let mut oldest: Option<(String, usize, OffsetDateTime)> = None;

            for entry in self.store.iter() {
                for (idx, cookie) in entry.value().iter().enumerate() {
                    let older = oldest
                        .as_ref()
                        .map_or(true, |(_, _, t)| cookie.creation_time < *t);
                    if older {
                        oldest = Some((entry.key().clone(), idx, cookie.creation_time));
                    }
                }
            }

            let Some((domain, idx, _)) = oldest else {
                break;
            };
            if let Some(mut entry) = self.store.get_mut(&domain) {
                if idx < entry.len() {
                    entry.remove(idx);
                }
            }
        }
    }

    /// Store plain key/value pairs as host-only session cookies for `domain`.
    pub fn set_cookies<K, V>(&self, domain: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in pairs {
            self.set_canonical_cookie(CanonicalCookie::session(name, value, domain));
        }
    }

    /// Look up a single cookie value by name for `domain`, ignoring path.
    ///
    /// Domain cookies set on a parent domain match as well. When several
    /// paths carry the same name, the most specific (longest) path wins.
    pub fn get_cookie(&self, domain: &str, name: &str) -> Option<String> {
        let host = domain.trim_start_matches('.').to_lowercase();
        let now = OffsetDateTime::now_utc();

        Self::get_matching_domains(&host)
            .into_iter()
            .filter_map(|d| self.store.get(&d))
            .flat_map(|entry| entry.value().clone())
            .filter(|c| c.name == name)
            .filter(|c| Self::domain_matches(&c.domain, &host, c.host_only))
            .filter(|c| !c.is_expired(now))
            .max_by_key(|c| c.path.len())
            .map(|c| c.value)
    }

    /// Get cookies matching the URL with proper domain suffix matching.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let mut result = Vec::new();
        let host = url.host_str().unwrap_or("").to_lowercase();
        let now = OffsetDateTime::now_utc();

        for domain in Self::get_matching_domains(&host) {
            if let Some(entry) = self.store.get(&domain) {
                for cookie in entry.iter() {
                    if !Self::domain_matches(&cookie.domain, &host, cookie.host_only) {
                        continue;
                    }
                    if !Self::path_matches(&cookie.path, url.path()) {
                        continue;
                    }
                    if cookie.secure && url.scheme() != "https" {
                        continue;
                    }
                    if cookie.is_expired(now) {
                        continue;
                    }
                    result.push(cookie.clone());
                }
            }
        }

        // Sort by path length (longest first) then creation time
        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// `Cookie` request header value for `url`, if any cookie applies.
    pub fn cookie_header_for_url(&self, url: &Url) -> Option<String> {
        let cookies = self.get_cookies_for_url(url);
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Check if cookie domain matches request host.
    /// Implements RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        let cookie_domain = cookie_domain.trim_start_matches('.');
        if request_host.eq_ignore_ascii_case(cookie_domain) {
            return true;
        }

        request_host.len() > cookie_domain.len()
            && request_host[request_host.len() - cookie_domain.len()..]
                .eq_ignore_ascii_case(cookie_domain)
            && request_host.as_bytes()[request_host.len() - cookie_domain.len() - 1] == b'.'
    }

    /// Check if request path matches cookie path.
    /// Implements RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }

        if let Some(rest) = request_path.strip_prefix(cookie_path) {
            return cookie_path.ends_with('/') || rest.starts_with('/');
        }

        false
    }

    /// The host itself and all its parent domains, most specific first.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let mut domains = vec![host.to_string()];

        // "foo.bar.example.com" also checks "bar.example.com" and "example.com"
        let parts: Vec<&str> = host.split('.').collect();
        for i in 1..parts.len().saturating_sub(1) {
            domains.push(parts[i..].join("."));
        }

        domains
    }

    /// Parse a `Set-Cookie` line received from `url` and store it.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> Result<(), NetError> {
        let cookie = CanonicalCookie::from_set_cookie(url, cookie_line)?;
        self.set_canonical_cookie(cookie);
        Ok(())
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Clear all cookies.
    pub fn clear(&self) {
        self.store.clear();
    }
}
