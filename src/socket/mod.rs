//! Socket handling mirroring Chromium's `net/socket/`:
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`client`]: Plain and TLS stream wrapper
//! - [`tls`]: TLS configuration with BoringSSL
//!
//! Every request opens a fresh connection.

pub mod client;
pub mod connectjob;
pub mod tls;
