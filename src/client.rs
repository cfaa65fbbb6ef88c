//! HTTP Client with builder pattern.
//!
//! Provides a small, ergonomic API over the connection stack. Every client
//! owns a handle to a [`CookieMonster`]: cookies set by responses are stored
//! there and replayed on later requests to matching hosts.
//!
//! # Example
//!
//! ```rust,ignore
//! use scratchnet::client::Client;
//!
//! let client = Client::builder()
//!     .default_header("User-Agent", "scratchnet")
//!     .timeout(std::time::Duration::from_secs(10))
//!     .build();
//!
//! let resp = client.get("https://api.scratch.mit.edu/users/griffpatch")
//!     .send()
//!     .await?;
//! ```

use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::http::requestbody::RequestBody;
use crate::http::response::HttpResponse;
use crate::http::streamfactory::HttpStreamFactory;
use crate::http::transaction::HttpNetworkTransaction;
use crate::socket::tls::TlsConfig;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use http::Method;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Chromium default.
const DEFAULT_REDIRECT_LIMIT: u8 = 20;

/// HTTP Client for making requests.
///
/// Use [`Client::builder()`] to configure and create a client. Clones share
/// the cookie jar.
#[derive(Clone)]
pub struct Client {
    factory: Arc<HttpStreamFactory>,
    cookie_store: CookieMonster,
    default_headers: Arc<HeaderMap>,
    timeout: Option<Duration>,
    redirect_limit: u8,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The jar this client reads and writes.
    pub fn cookie_store(&self) -> &CookieMonster {
        &self.cookie_store
    }

    /// Start building a GET request.
    pub fn get<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start building a POST request.
    pub fn post<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start building a request with custom method.
    pub fn request<U: AsRef<str>>(&self, method: Method, url: U) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            method,
            url: url.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            error: None,
        }
    }
}

/// Builder for creating a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    cookie_store: Option<CookieMonster>,
    tls_config: Option<TlsConfig>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
    redirect_limit: Option<u8>,
}

impl ClientBuilder {
    /// Share an existing cookie jar.
    pub fn cookie_store(mut self, store: CookieMonster) -> Self {
        self.cookie_store = Some(store);
        self
    }

    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Header sent on every request unless the request sets it itself.
    /// Invalid names or values are ignored.
    pub fn default_header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(k), Ok(v)) = (HeaderName::try_from(key), HeaderValue::try_from(value)) {
            self.default_headers.insert(k, v);
        }
        self
    }

    /// Bound each request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn redirect_limit(mut self, limit: u8) -> Self {
        self.redirect_limit = Some(limit);
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        Client {
            factory: Arc::new(HttpStreamFactory::new(self.tls_config.unwrap_or_default())),
            cookie_store: self.cookie_store.unwrap_or_default(),
            default_headers: Arc::new(self.default_headers),
            timeout: self.timeout,
            redirect_limit: self.redirect_limit.unwrap_or(DEFAULT_REDIRECT_LIMIT),
        }
    }
}

/// Builder for a single request.
pub struct RequestBuilder {
    client: Client,
    method: Method,
    url: String,
    headers: HeaderMap,
    body: RequestBody,
    error: Option<NetError>,
}

impl RequestBuilder {
    /// Add a header, overriding any client default of the same name.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: http::header::IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        if let Ok(val) = value.try_into() {
            self.headers.insert(key, val);
        }
        self
    }

    /// Set request body.
    pub fn body<B: Into<RequestBody>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body and `Content-Type: application/json`.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, json: &T) -> Self {
        match RequestBody::json(json) {
            Ok(body) => {
                self.body = body;
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Err(_) => self.error = Some(NetError::JsonParseError),
        }
        self
    }

    /// Send the request and read the response body.
    pub async fn send(self) -> Result<HttpResponse, NetError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let url = Url::parse(&self.url).map_err(|_| NetError::InvalidUrl)?;

        match self.client.timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute(url))
                .await
                .map_err(|_| NetError::ConnectionTimedOut)?,
            None => self.execute(url).await,
        }
    }

    async fn execute(self, mut url: Url) -> Result<HttpResponse, NetError> {
        let client = &self.client;
        let mut headers = (*client.default_headers).clone();
        for (key, value) in self.headers.iter() {
            headers.insert(key.clone(), value.clone());
        }

        let follow_redirects = matches!(self.method, Method::GET | Method::HEAD);
        let mut redirects_left = client.redirect_limit;

        loop {
            let mut transaction = HttpNetworkTransaction::new(
                &client.factory,
                &client.cookie_store,
                self.method.clone(),
                url.clone(),
            );
            transaction.set_headers(headers.clone());
            transaction.set_body(self.body.clone());
            transaction.start().await?;

            let next = transaction
                .get_response()
                .filter(|resp| follow_redirects && resp.status().is_redirection())
                .and_then(|resp| resp.headers().get(LOCATION))
                .and_then(|loc| loc.to_str().ok())
                .and_then(|loc| url.join(loc).ok());

            match next {
                Some(new_url) => {
                    if redirects_left == 0 {
                        return Err(NetError::TooManyRedirects);
                    }
                    redirects_left -= 1;
                    tracing::debug!(from = %url, to = %new_url, "following redirect");
                    url = new_url;
                }
                None => {
                    let resp = transaction.take_response().ok_or(NetError::EmptyResponse)?;
                    return HttpResponse::read(url, resp).await;
                }
            }
        }
    }
}
