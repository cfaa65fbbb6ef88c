//! Public Suffix List checks for the `Domain` cookie attribute.
//!
//! A server may only widen a cookie to a parent domain it actually belongs
//! to, and never to a public suffix such as `com` or `github.io`.

use psl::{List, Psl};
use std::net::IpAddr;

/// True if `domain` is itself a public suffix (e.g. "com", "co.uk").
pub fn is_public_suffix(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    List.suffix(domain.as_bytes())
        .is_some_and(|suffix| suffix.as_bytes() == domain.as_bytes())
}

/// Check if a cookie `Domain` attribute is acceptable for a response from
/// `url_host`.
///
/// IP-literal hosts only accept a `Domain` equal to the host itself.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.').to_lowercase();
    let url_host = url_host.to_lowercase();

    if url_host.parse::<IpAddr>().is_ok() {
        return cookie_domain == url_host;
    }

    if is_public_suffix(&cookie_domain) {
        return false;
    }

    url_host == cookie_domain || url_host.ends_with(&format!(".{cookie_domain}"))
}
