//! Per-run session state: the cookie jar and the identity captured at login.

use crate::client::Client;
use crate::cookies::monster::CookieMonster;
use crate::scratch::endpoints::{ScratchEndpoints, USER_AGENT};
use crate::socket::tls::TlsConfig;
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Who the session is logged in as.
///
/// Created once by a successful login and never modified afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub id: u64,
    /// Opaque token authorizing writes.
    pub token: String,
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("username", &self.username)
            .field("id", &self.id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Login credentials. The password is wiped from memory on drop and never
/// shows up in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fetched public profile. Not cached and not merged into the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetProfile {
    pub username: String,
    pub raw: serde_json::Value,
}

impl TargetProfile {
    pub fn id(&self) -> Option<u64> {
        self.raw.get("id").and_then(serde_json::Value::as_u64)
    }

    pub fn joined(&self) -> Option<&str> {
        self.raw.pointer("/history/joined").and_then(serde_json::Value::as_str)
    }

    pub fn country(&self) -> Option<&str> {
        self.raw.pointer("/profile/country").and_then(serde_json::Value::as_str)
    }
}

/// Everything one automation run knows about the service.
///
/// The jar is written by the transport on every response; the identity is
/// written only by [`login`](crate::scratch::auth::login).
pub struct Session {
    client: Client,
    endpoints: ScratchEndpoints,
    identity: Option<AuthenticatedIdentity>,
}

impl Session {
    /// Fresh session with an empty jar and the service's default headers.
    pub fn new(endpoints: ScratchEndpoints, timeout: Duration) -> Self {
        Self::with_tls_config(endpoints, timeout, TlsConfig::default())
    }

    pub fn with_tls_config(
        endpoints: ScratchEndpoints,
        timeout: Duration,
        tls_config: TlsConfig,
    ) -> Self {
        let client = Client::builder()
            .cookie_store(CookieMonster::new())
            .tls_config(tls_config)
            .default_header("user-agent", USER_AGENT)
            .default_header("x-requested-with", "XMLHttpRequest")
            .default_header("referer", endpoints.site_root().as_str())
            .timeout(timeout)
            .build();
        Self {
            client,
            endpoints,
            identity: None,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn endpoints(&self) -> &ScratchEndpoints {
        &self.endpoints
    }

    pub fn cookies(&self) -> &CookieMonster {
        self.client.cookie_store()
    }

    /// Store plain cookies for `domain`; no validation is applied.
    pub fn set_cookies<K, V>(&self, domain: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.cookies().set_cookies(domain, pairs);
    }

    pub fn get_cookie(&self, domain: &str, key: &str) -> Option<String> {
        self.cookies().get_cookie(domain, key)
    }

    pub(crate) fn set_identity(&mut self, identity: AuthenticatedIdentity) {
        self.identity = Some(identity);
    }

    pub(crate) fn clear_identity(&mut self) {
        self.identity = None;
    }

    /// `None` until a login in this session succeeded.
    pub fn identity(&self) -> Option<&AuthenticatedIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
