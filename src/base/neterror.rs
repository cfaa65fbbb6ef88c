use thiserror::Error;

/// Transport-level failures, numbered after Chromium's `net_error_list.h`.
///
/// Codes below -10000 are scratchnet-specific and do not exist upstream.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Invalid HTTP response")]
    InvalidHttpResponse,

    // Cookie Errors
    #[error("Cookie prefix validation failed")]
    CookieInvalidPrefix,
    #[error("Cookie domain is a public suffix")]
    CookiePublicSuffix,

    // scratchnet-specific
    #[error("Failed to read response body")]
    HttpBodyError,
    #[error("Response body is not valid UTF-8")]
    InvalidUtf8,
    #[error("Response body is not valid JSON")]
    JsonParseError,
    #[error("Malformed Set-Cookie line")]
    CookieMalformed,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,
            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
            NetError::TooManyRedirects => -310,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::InvalidHttpResponse => -363,
            NetError::CookieInvalidPrefix => -903,
            NetError::CookiePublicSuffix => -904,
            NetError::HttpBodyError => -10001,
            NetError::InvalidUtf8 => -10002,
            NetError::JsonParseError => -10003,
            NetError::CookieMalformed => -10004,
            NetError::Unknown(code) => *code,
        }
    }

    /// True for failures that happened before any response was received.
    pub fn is_connection_error(&self) -> bool {
        (-199..=-100).contains(&self.as_i32())
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,
            -300 => NetError::InvalidUrl,
            -302 => NetError::UnknownUrlScheme,
            -310 => NetError::TooManyRedirects,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -363 => NetError::InvalidHttpResponse,
            -903 => NetError::CookieInvalidPrefix,
            -904 => NetError::CookiePublicSuffix,
            -10001 => NetError::HttpBodyError,
            -10002 => NetError::InvalidUtf8,
            -10003 => NetError::JsonParseError,
            -10004 => NetError::CookieMalformed,
            _ => NetError::Unknown(code),
        }
    }
}

impl From<std::io::Error> for NetError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            ErrorKind::ConnectionReset => NetError::ConnectionReset,
            ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe => NetError::ConnectionClosed,
            _ => NetError::ConnectionFailed,
        }
    }
}
