//! HTTP Response with a fully buffered body.

use crate::base::neterror::NetError;
use crate::http::responsebody::{decode_json, decode_text, ResponseBody};
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};
use hyper::body::Incoming;
use url::Url;

/// The user-facing response type.
///
/// Responses from the services this crate talks to are small JSON or HTML
/// documents, so the body is read completely before the response is handed
/// out and the whole exchange falls under one timeout.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: Url,
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Read a hyper response to completion.
    pub async fn read(url: Url, resp: http::Response<Incoming>) -> Result<Self, NetError> {
        let (parts, body) = resp.into_parts();
        let body = ResponseBody::new(body).bytes().await?;
        Ok(Self {
            url,
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> Result<String, NetError> {
        decode_text(&self.body)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        decode_json(&self.body)
    }
}
