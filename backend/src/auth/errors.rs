//! Custom error types specific to session workflow failures.
//!
//! `InvalidRequest`, `NotFound` and `InvalidSession` are caller mistakes and
//! all surface as 400 responses. Store failures are kept apart so they can be
//! reported as server errors.

use adapters::StoreError;
use thiserror::Error;

pub const MISSING_SESSION_HEADER: &str = "Session header is missing";
pub const MISSING_REWRITE_URL_HEADER: &str = "X-Rewrite-URL header is missing";
pub const MISSING_ACCOUNT: &str = "exactly one account should be linked";
pub const MISSING_GROUP: &str = "exactly one group should be linked";
pub const ACCOUNT_NOT_FOUND: &str = "account not found.";
pub const GROUP_NOT_FOUND: &str = "group not found";
pub const ROLES_NOT_FOUND: &str = "roles not found";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Invalid session")]
    InvalidSession,

    #[error("identity store failure: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// True for failures caused by the request rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SessionError::Store(_))
    }
}
