//! Defines the HTTP routes for session management.
//!
//! Paths are registered with and without a trailing slash, since clients and
//! the proxy in front of the service use both forms.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{create_session, current_session, delete_current_session};
use crate::api::AppState;

pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/", post(create_session))
        .route(
            "/sessions/current",
            get(current_session).delete(delete_current_session),
        )
        .route(
            "/sessions/current/",
            get(current_session).delete(delete_current_session),
        )
}
