//! Handler functions for the account listing API.
//!
//! Rows come straight from the identity store; `services::account_listing`
//! shapes them into the JSON:API document.

use axum::extract::State;
use axum::http::header::HOST;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use crate::api::AppState;
use crate::errors::AppError;
use crate::services::account_listing::accounts_document;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// `GET /accounts/`
pub async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_accounts().await?;
    debug!(count = rows.len(), "listing accounts");
    Ok(Json(accounts_document(&base_url(&headers), &rows)))
}

/// Scheme and host the client used to reach us; empty when unknown.
fn base_url(headers: &HeaderMap) -> String {
    let Some(host) = headers.get(HOST).and_then(|v| v.to_str().ok()) else {
        return String::new();
    };
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    format!("{}://{}", scheme, host)
}
