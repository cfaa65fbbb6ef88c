//! Request body for POST operations.

use bytes::Bytes;

/// Request body for HTTP methods that send data.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body (GET, HEAD).
    #[default]
    Empty,
    /// Body with raw bytes.
    Bytes(Bytes),
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Bytes(Bytes::from(s))
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(v))
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        RequestBody::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl RequestBody {
    /// Serialize `value` as a JSON body.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(RequestBody::from)
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the length of the body in bytes.
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Bytes(b) => b.len(),
        }
    }

    pub fn into_bytes(self) -> Bytes {
        match self {
            RequestBody::Empty => Bytes::new(),
            RequestBody::Bytes(b) => b,
        }
    }
}
