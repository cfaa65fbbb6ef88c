//! HTTP/1.1 request plumbing mirroring Chromium's `net/http/`.

pub mod requestbody;
pub mod response;
pub mod responsebody;
pub mod streamfactory;
pub mod transaction;

// Re-exports for convenience
pub use requestbody::RequestBody;
pub use response::HttpResponse;
pub use responsebody::ResponseBody;
