//! Response body reading.
//! Mirrors Chromium's HttpStream::ReadResponseBody.

use crate::base::neterror::NetError;
use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;

/// Response body wrapper.
pub struct ResponseBody {
    inner: Incoming,
}

impl ResponseBody {
    pub fn new(inner: Incoming) -> Self {
        Self { inner }
    }

    /// Read entire body as bytes.
    pub async fn bytes(self) -> Result<Bytes, NetError> {
        let collected = self
            .inner
            .collect()
            .await
            .map_err(|_| NetError::HttpBodyError)?;
        Ok(collected.to_bytes())
    }
}

/// Decode a UTF-8 body.
pub fn decode_text(bytes: &[u8]) -> Result<String, NetError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| NetError::InvalidUtf8)
}

/// Decode a JSON body into `T`.
pub fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, NetError> {
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::debug!(error = %e, "response body is not the expected JSON");
        NetError::JsonParseError
    })
}
