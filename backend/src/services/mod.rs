//! Module for business logic that is not part of the session workflow.
//!
//! The session workflow itself lives in `auth::service`.

pub mod account_listing;
