//! Custom error types specific to the `adapters` crate.
//!
//! Every identity store implementation reports failures through [`StoreError`].
//! Errors are never swallowed here; callers decide how a store failure maps
//! onto their own responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sparql endpoint unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sparql endpoint answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot decode sparql results: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("result row has no binding for ?{0}")]
    MissingBinding(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
