//! Defines the HTTP routes for the account listing.

use axum::{routing::get, Router};

use super::handlers::list_accounts;
use crate::api::AppState;

pub fn account_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/", get(list_accounts))
}
