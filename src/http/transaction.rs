use crate::base::neterror::NetError;
use crate::cookies::monster::CookieMonster;
use crate::http::requestbody::RequestBody;
use crate::http::streamfactory::{HttpStream, HttpStreamFactory};
use http::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, COOKIE, HOST, SET_COOKIE};
use http::{Method, Request, Response, Version};
use http_body_util::Full;
use hyper::body::Incoming;
use url::Url;

/// Internal state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    CreateStream,
    SendRequest,
    ReadHeaders,
    Done,
}

/// One request/response exchange on a fresh connection.
///
/// The jar is consulted for the `Cookie` header before sending and receives
/// every `Set-Cookie` of the response, so callers never touch cookies
/// directly.
pub struct HttpNetworkTransaction<'a> {
    factory: &'a HttpStreamFactory,
    cookie_store: &'a CookieMonster,
    url: Url,
    method: Method,
    request_headers: HeaderMap,
    body: RequestBody,
    state: State,
    stream: Option<HttpStream>,
    response: Option<Response<Incoming>>,
}

impl<'a> HttpNetworkTransaction<'a> {
    pub fn new(
        factory: &'a HttpStreamFactory,
        cookie_store: &'a CookieMonster,
        method: Method,
        url: Url,
    ) -> Self {
        Self {
            factory,
            cookie_store,
            url,
            method,
            request_headers: HeaderMap::new(),
            body: RequestBody::Empty,
            state: State::Idle,
            stream: None,
            response: None,
        }
    }

    pub fn set_headers(&mut self, headers: HeaderMap) {
        self.request_headers = headers;
    }

    pub fn set_body(&mut self, body: RequestBody) {
        self.body = body;
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Run the transaction until response headers are available.
    pub async fn start(&mut self) -> Result<(), NetError> {
        self.state = State::CreateStream;
        self.do_loop().await
    }

    async fn do_loop(&mut self) -> Result<(), NetError> {
        loop {
            match self.state {
                State::Idle | State::Done => return Ok(()),
                State::CreateStream => {
                    self.stream = Some(self.factory.create_stream(&self.url).await?);
                    self.state = State::SendRequest;
                }
                State::SendRequest => {
                    let req = self.build_request()?;
                    let stream = self.stream.as_mut().ok_or(NetError::ConnectionClosed)?;
                    tracing::debug!(method = %self.method, url = %self.url, "sending request");
                    let resp = stream.send_request(req).await?;
                    self.save_cookies(resp.headers());
                    self.response = Some(resp);
                    self.state = State::ReadHeaders;
                }
                State::ReadHeaders => {
                    self.state = State::Done;
                }
            }
        }
    }

    fn build_request(&mut self) -> Result<Request<Full<bytes::Bytes>>, NetError> {
        let host = self.url.host_str().ok_or(NetError::InvalidUrl)?;
        let host = match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let mut headers = self.request_headers.clone();
        headers.insert(
            HOST,
            HeaderValue::from_str(&host).map_err(|_| NetError::InvalidUrl)?,
        );

        // Cookie header: Query the cookie store
        if let Some(cookie_value) = self.cookie_store.cookie_header_for_url(&self.url) {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&cookie_value).map_err(|_| NetError::InvalidUrl)?,
            );
        }

        let body = self.body.clone().into_bytes();
        if !body.is_empty() || self.method == Method::POST {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        // Origin-form request target; HTTP/1.1 servers expect path + query.
        let target = match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        };

        let mut req = Request::builder()
            .method(self.method.clone())
            .uri(target)
            .version(Version::HTTP_11)
            .body(Full::new(body))
            .map_err(|_| NetError::InvalidUrl)?;
        *req.headers_mut() = headers;
        Ok(req)
    }

    fn save_cookies(&self, headers: &HeaderMap) {
        for val in headers.get_all(SET_COOKIE) {
            let Ok(line) = val.to_str() else {
                continue;
            };
            if let Err(e) = self.cookie_store.parse_and_save_cookie(&self.url, line) {
                tracing::debug!(url = %self.url, error = %e, "rejected Set-Cookie");
            }
        }
    }

    pub fn get_response(&self) -> Option<&Response<Incoming>> {
        self.response.as_ref()
    }

    /// Take ownership of the response.
    /// Can only be called once - subsequent calls return None.
    pub fn take_response(&mut self) -> Option<Response<Incoming>> {
        self.response.take()
    }
}
