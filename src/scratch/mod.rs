//! Scratch session automation.
//!
//! | Module | Role |
//! |--------|------|
//! | [`endpoints`] | Origins, paths and fixed header values |
//! | [`session`] | Cookie jar plus the logged-in identity |
//! | [`csrf`] | Reads the CSRF cookie back out of the jar |
//! | [`auth`] | Token priming and credential POST |
//! | [`profile`] | Public profile lookup |
//! | [`comment`] | Profile comment posting |
//! | [`pipeline`] | Ordered run of the above and its exit code |

pub mod auth;
pub mod comment;
pub mod csrf;
pub mod endpoints;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod session;

pub use auth::{login, LoginResponse};
pub use comment::post_comment;
pub use csrf::extract_csrf_token;
pub use endpoints::ScratchEndpoints;
pub use error::{CommentFailure, LoginRejection, ProfileLookupFailure, ScratchError};
pub use pipeline::{AutomationPlan, Pipeline, PipelineOutcome};
pub use profile::fetch_profile;
pub use session::{AuthenticatedIdentity, Credentials, Session, TargetProfile};
