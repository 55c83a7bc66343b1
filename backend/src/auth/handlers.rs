//! Handler functions for the session endpoints.
//!
//! These functions check the identity headers and the JSON:API envelope, hand
//! linked ids to `auth::service`, and shape the result into a JSON:API document.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::errors::{SessionError, MISSING_REWRITE_URL_HEADER, MISSING_SESSION_HEADER};
use super::middleware::{clear_allowed_groups, validate_json_api_content_type, SessionHeaders};
use super::models::{CreateSession, CreateSessionDocument, SessionDocument, SESSIONS_TYPE};
use crate::api::AppState;
use crate::errors::AppError;

/// Sessions base used for `links.self` when the proxy sent no rewrite URL.
const DEFAULT_SESSIONS_BASE: &str = "/sessions";

/// `POST /sessions/`: log an account in.
pub async fn create_session(
    State(state): State<AppState>,
    identity: SessionHeaders,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    validate_json_api_content_type(&headers)?;
    if identity.session_id.is_none() {
        return Err(SessionError::InvalidRequest(MISSING_SESSION_HEADER).into());
    }
    if identity.rewrite_url.is_none() {
        return Err(SessionError::InvalidRequest(MISSING_REWRITE_URL_HEADER).into());
    }

    let document: CreateSessionDocument = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON:API document: {}", e)))?;
    let data = document.data.unwrap_or_default();

    let kind = data.kind.as_deref().unwrap_or_default();
    if kind != SESSIONS_TYPE {
        return Err(AppError::IncorrectType {
            expected: SESSIONS_TYPE,
            actual: kind.to_string(),
        });
    }
    if data.id.as_ref().map_or(false, |id| !id.is_null()) {
        return Err(AppError::BadRequest("Id paramater is not allowed".to_string()));
    }

    let session = state
        .sessions
        .create_session(CreateSession {
            token: identity.session_id.as_deref(),
            rewrite_url: identity.rewrite_url.as_deref(),
            account_id: data.account_id(),
            group_id: data.group_id(),
        })
        .await?;

    let base = identity.rewrite_url.as_deref().unwrap_or(DEFAULT_SESSIONS_BASE);
    Ok((
        StatusCode::CREATED,
        clear_allowed_groups(),
        Json(SessionDocument::new(base, session)),
    ))
}

/// `GET /sessions/current`
pub async fn current_session(
    State(state): State<AppState>,
    identity: SessionHeaders,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .sessions
        .current_session(identity.session_id.as_deref())
        .await?;

    let base = identity.rewrite_url.as_deref().unwrap_or(DEFAULT_SESSIONS_BASE);
    Ok(Json(SessionDocument::new(base, session)))
}

/// `DELETE /sessions/current`: log out.
pub async fn delete_current_session(
    State(state): State<AppState>,
    identity: SessionHeaders,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .delete_current_session(identity.session_id.as_deref())
        .await?;

    Ok((StatusCode::NO_CONTENT, clear_allowed_groups()))
}
