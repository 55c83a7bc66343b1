//! General-purpose middleware for the API.
//!
//! Request tracing for every route, and the JSON:API media type stamped on
//! every response of the resource routes.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::JSON_API;

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

pub fn json_api_content_type() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(CONTENT_TYPE, HeaderValue::from_static(JSON_API))
}
