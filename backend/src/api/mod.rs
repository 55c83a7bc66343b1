//! Central module for assembling the application's HTTP API.
//!
//! Builds the shared state and the router: session routes from `auth`, the
//! account listing from `api::account`, and a liveness banner at `/`.

pub mod account;

use adapters::IdentityStoreRef;
use axum::{routing::get, Router};

use crate::auth::{session_router, SessionService};
use crate::middleware::{json_api_content_type, trace_layer};
use account::routes::account_router;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub store: IdentityStoreRef,
}

impl AppState {
    pub fn new(store: IdentityStoreRef) -> Self {
        Self {
            sessions: SessionService::new(store.clone()),
            store,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let resources = Router::new()
        .merge(session_router())
        .merge(account_router())
        .layer(json_api_content_type());

    Router::new()
        .route("/", get(root_handler))
        .merge(resources)
        .layer(trace_layer())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Login service is running"
}
