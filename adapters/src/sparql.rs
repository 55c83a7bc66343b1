//! Minimal SPARQL 1.1 protocol client.
//!
//! Queries and updates are POSTed form-encoded to a single endpoint and SELECT
//! results are decoded from `application/sparql-results+json`. The client can
//! be built with sudo access, which adds the `mu-auth-sudo` header to every
//! request so the authorization layer in front of the store lets the query
//! through unscoped.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, trace};
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::errors::{StoreError, StoreResult};
use crate::vocab::XSD;

pub const SUDO_HEADER: &str = "mu-auth-sudo";
pub const RESULTS_JSON: &str = "application/sparql-results+json";

#[derive(Debug, Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    sudo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Term {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// One solution of a SELECT query: variable name to bound term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Binding(HashMap<String, Term>);

impl Binding {
    pub fn get(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|term| term.value.as_str())
    }

    pub fn require(&self, var: &str) -> StoreResult<String> {
        self.get(var)
            .map(str::to_string)
            .ok_or_else(|| StoreError::MissingBinding(var.to_string()))
    }

    pub fn optional(&self, var: &str) -> Option<String> {
        self.get(var).map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct ResultsDocument {
    results: Results,
}

#[derive(Debug, Deserialize)]
struct Results {
    bindings: Vec<Binding>,
}

impl SparqlClient {
    pub fn new(endpoint: impl Into<String>, sudo: bool) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            sudo,
        }
    }

    /// Runs a SELECT query and returns its solutions in order.
    pub async fn select(&self, query: &str) -> StoreResult<Vec<Binding>> {
        let body = self.post(query).await?;
        let bindings = parse_results(&body)?;
        debug!("sparql select returned {} rows", bindings.len());
        Ok(bindings)
    }

    /// Runs an update request. The response body is ignored.
    pub async fn update(&self, query: &str) -> StoreResult<()> {
        self.post(query).await.map(|_| ())
    }

    async fn post(&self, query: &str) -> StoreResult<String> {
        trace!("sparql request to {}:\n{}", self.endpoint, query);

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, RESULTS_JSON)
            .form(&[("query", query)]);
        if self.sudo {
            request = request.header(SUDO_HEADER, "true");
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

pub fn parse_results(body: &str) -> StoreResult<Vec<Binding>> {
    let document: ResultsDocument = serde_json::from_str(body)?;
    Ok(document.results.bindings)
}

/// Escapes a value as a SPARQL string literal, quotes included.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Writes a value as an IRI reference, angle brackets included.
///
/// Characters not allowed inside `<...>` are percent-encoded.
pub fn escape_uri(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('<');
    for c in value.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\u{0}'..='\u{20}' => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    let _ = write!(out, "%{:02X}", byte);
                }
            }
            other => out.push(other),
        }
    }
    out.push('>');
    out
}

pub fn escape_datetime(value: &DateTime<Utc>) -> String {
    format!(
        "\"{}\"^^<{}dateTime>",
        value.to_rfc3339_opts(SecondsFormat::Millis, true),
        XSD
    )
}
