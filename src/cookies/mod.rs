//! Cookie storage.
//!
//! | Chromium (C++) | scratchnet (Rust) | Responsibility |
//! |----------------|-------------------|----------------|
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | Cookie jar with LRU eviction |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonicalcookie::CanonicalCookie) | Single cookie representation |
//! | `registry_controlled_domains` | [`psl`] | Public suffix checks |
//!
//! The jar lives only in memory for the lifetime of the process.

pub mod canonicalcookie;
pub mod monster;
pub mod psl;
