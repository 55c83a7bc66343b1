//! Request header handling for the session endpoints.
//!
//! Identity arrives in headers set by the reverse proxy in front of the
//! service: `MU-SESSION-ID` carries the session token and `X-Rewrite-URL` the
//! externally visible URL of the request. Responses that change who is logged
//! in tell the authorization layer to drop its cached group decisions.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::errors::AppError;

pub const SESSION_ID_HEADER: &str = "mu-session-id";
pub const REWRITE_URL_HEADER: &str = "x-rewrite-url";
pub const ALLOWED_GROUPS_HEADER: &str = "mu-auth-allowed-groups";
pub const CLEAR_ALLOWED_GROUPS: &str = "CLEAR";
pub const JSON_API: &str = "application/vnd.api+json";

/// Proxy-supplied identity headers. Absent or non-UTF-8 values are `None`.
#[derive(Debug, Clone, Default)]
pub struct SessionHeaders {
    pub session_id: Option<String>,
    pub rewrite_url: Option<String>,
}

impl SessionHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            session_id: header_str(headers, SESSION_ID_HEADER),
            rewrite_url: header_str(headers, REWRITE_URL_HEADER),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Rejects request bodies that are not declared as JSON:API.
pub fn validate_json_api_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if content_type.starts_with(JSON_API) {
        Ok(())
    } else {
        Err(AppError::UnsupportedContentType(content_type.to_string()))
    }
}

/// Response header telling the authorization cache to forget this session.
pub fn clear_allowed_groups() -> [(&'static str, &'static str); 1] {
    [(ALLOWED_GROUPS_HEADER, CLEAR_ALLOWED_GROUPS)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_and_trims_identity_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("MU-SESSION-ID", HeaderValue::from_static(" http://mu.semte.ch/sessions/abc123 "));
        headers.insert("X-Rewrite-URL", HeaderValue::from_static("/sessions/"));

        let parsed = SessionHeaders::from_headers(&headers);

        assert_eq!(parsed.session_id.as_deref(), Some("http://mu.semte.ch/sessions/abc123"));
        assert_eq!(parsed.rewrite_url.as_deref(), Some("/sessions/"));
    }

    #[test]
    fn blank_headers_count_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static(""));
        assert!(SessionHeaders::from_headers(&headers).session_id.is_none());
    }

    #[test]
    fn content_type_must_be_json_api() {
        let mut headers = HeaderMap::new();
        assert!(validate_json_api_content_type(&headers).is_err());

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let err = validate_json_api_content_type(&headers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Content-Type must be application/vnd.api+json instead of application/json."
        );

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/vnd.api+json; charset=utf-8"));
        assert!(validate_json_api_content_type(&headers).is_ok());
    }
}
