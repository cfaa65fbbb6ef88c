//! # scratchnet
//!
//! Session automation for the Scratch website over a small Chromium-style
//! HTTP/1.1 stack.
//!
//! A run primes a CSRF cookie, logs in, looks up a profile and optionally
//! posts a comment on it. Every step is awaited before the next one starts,
//! and all cookies live in an in-memory jar that dies with the session.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scratchnet::scratch::{AutomationPlan, Credentials, Pipeline, ScratchEndpoints};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = Pipeline::new(ScratchEndpoints::default(), Duration::from_secs(30));
//!     let outcome = pipeline
//!         .run(&AutomationPlan {
//!             credentials: Credentials::new("alice", "password"),
//!             target: Some("griffpatch".into()),
//!             comment: Some("Nice game!".into()),
//!         })
//!         .await;
//!     std::process::exit(outcome.exit_code().into());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Network error codes
//! - [`client`] - Request builder API with default headers and timeouts
//! - [`config`] - Environment-driven run configuration
//! - [`cookies`] - Cookie parsing and the in-memory jar
//! - [`http`] - HTTP/1.1 transactions and body handling
//! - [`scratch`] - Login, profile lookup, commenting and the run pipeline
//! - [`socket`] - TCP and BoringSSL connection setup
//!
//! ## Security
//!
//! - `Domain` cookie attributes are checked against the Public Suffix List
//! - `__Secure-` and `__Host-` cookie prefixes are enforced
//! - Passwords are zeroized on drop and redacted from `Debug` output

pub mod base;
pub mod client;
pub mod config;
pub mod cookies;
pub mod http;
pub mod scratch;
pub mod socket;
