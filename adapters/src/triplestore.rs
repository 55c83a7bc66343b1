//! SPARQL-backed implementation of the `IdentityStore` trait.
//!
//! This file wires the query builders in [`crate::queries`] to a
//! [`SparqlClient`] and maps result bindings onto the row types in
//! [`crate::models`].

use async_trait::async_trait;
use chrono::Utc;
use log::info;

use crate::errors::StoreResult;
use crate::models::{AccountListingRow, AccountRow, GroupRow, NewSession, RoleRow, SessionRow};
use crate::queries;
use crate::sparql::{Binding, SparqlClient};
use crate::IdentityStore;

#[derive(Debug, Clone)]
pub struct SparqlIdentityStore {
    client: SparqlClient,
    group_type: String,
}

impl SparqlIdentityStore {
    pub fn new(client: SparqlClient, group_type: impl Into<String>) -> Self {
        Self {
            client,
            group_type: group_type.into(),
        }
    }
}

fn account_from(row: &Binding) -> StoreResult<AccountRow> {
    Ok(AccountRow {
        uri: row.require("uri")?,
    })
}

fn group_from(row: &Binding) -> StoreResult<GroupRow> {
    Ok(GroupRow {
        uri: row.require("group")?,
        name: row.optional("name"),
    })
}

fn role_from(row: &Binding) -> StoreResult<RoleRow> {
    Ok(RoleRow {
        role: row.require("role")?,
    })
}

fn session_from(row: &Binding) -> StoreResult<SessionRow> {
    Ok(SessionRow {
        session_uuid: row.require("session_uuid")?,
        account: row.require("account")?,
        account_uuid: row.require("account_uuid")?,
        group: row.require("group")?,
        group_uuid: row.require("group_uuid")?,
        roles: row.optional("roles").unwrap_or_default(),
    })
}

fn listing_from(row: &Binding) -> StoreResult<AccountListingRow> {
    Ok(AccountListingRow {
        account_uuid: row.require("account_uuid")?,
        account_provider: row.optional("account_provider"),
        user_uuid: row.require("user_uuid")?,
        user_first_name: row.optional("user_firstname"),
        user_family_name: row.optional("user_familyname"),
        group_uuid: row.require("group_uuid")?,
        group_name: row.optional("group_name"),
    })
}

#[async_trait]
impl IdentityStore for SparqlIdentityStore {
    async fn find_account(&self, account_id: &str) -> StoreResult<Vec<AccountRow>> {
        let rows = self.client.select(&queries::select_account(account_id)).await?;
        rows.iter().map(account_from).collect()
    }

    async fn find_group(&self, group_id: &str) -> StoreResult<Vec<GroupRow>> {
        let rows = self
            .client
            .select(&queries::select_group(group_id, &self.group_type))
            .await?;
        rows.iter().map(group_from).collect()
    }

    async fn find_roles(&self, account_id: &str) -> StoreResult<Vec<RoleRow>> {
        let rows = self.client.select(&queries::select_roles(account_id)).await?;
        rows.iter().map(role_from).collect()
    }

    async fn find_account_by_session_token(&self, token: &str) -> StoreResult<Vec<SessionRow>> {
        let rows = self
            .client
            .select(&queries::select_account_by_session(token, &self.group_type))
            .await?;
        rows.iter().map(session_from).collect()
    }

    async fn remove_sessions_for_token(&self, token: &str) -> StoreResult<()> {
        self.client.update(&queries::remove_old_sessions(token)).await
    }

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()> {
        self.client
            .update(&queries::insert_new_session(session, &Utc::now()))
            .await
    }

    async fn delete_session(&self, account_uri: &str) -> StoreResult<()> {
        self.client
            .update(&queries::delete_current_session(account_uri))
            .await
    }

    async fn replace_session(&self, session: &NewSession) -> StoreResult<()> {
        self.client
            .update(&queries::replace_session(session, &Utc::now()))
            .await?;
        info!(
            "session {} stored for account {} in group {}",
            session.session_id, session.account_uri, session.group_id
        );
        Ok(())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountListingRow>> {
        let rows = self
            .client
            .select(&queries::select_accounts(&self.group_type))
            .await?;
        rows.iter().map(listing_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::vocab::DEFAULT_GROUP_TYPE;
    use axum::extract::{Form, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use std::collections::HashMap;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Captured {
        sudo: bool,
        accept: Option<String>,
        query: String,
    }

    struct FakeEndpoint {
        status: StatusCode,
        body: String,
        seen: Mutex<Vec<Captured>>,
    }

    async fn answer(
        State(fake): State<Arc<FakeEndpoint>>,
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, String) {
        fake.seen.lock().unwrap().push(Captured {
            sudo: headers.get("mu-auth-sudo").is_some(),
            accept: headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            query: form.get("query").cloned().unwrap_or_default(),
        });
        (fake.status, fake.body.clone())
    }

    /// Serves canned SPARQL responses on an ephemeral port.
    fn spawn_endpoint(status: StatusCode, body: &str) -> (String, Arc<FakeEndpoint>) {
        let fake = Arc::new(FakeEndpoint {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/sparql", post(answer))
            .with_state(fake.clone());

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);

        (format!("http://{}/sparql", addr), fake)
    }

    fn store(endpoint: String, sudo: bool) -> SparqlIdentityStore {
        SparqlIdentityStore::new(SparqlClient::new(endpoint, sudo), DEFAULT_GROUP_TYPE)
    }

    #[tokio::test]
    async fn find_account_maps_uri_bindings() {
        let (endpoint, fake) = spawn_endpoint(
            StatusCode::OK,
            r#"{"head":{"vars":["uri"]},"results":{"bindings":[
                {"uri":{"type":"uri","value":"http://data.example/accounts/1"}}]}}"#,
        );

        let rows = store(endpoint, true).find_account("acc-1").await.unwrap();

        assert_eq!(rows, vec![AccountRow { uri: "http://data.example/accounts/1".into() }]);
        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].sudo);
        assert_eq!(seen[0].accept.as_deref(), Some("application/sparql-results+json"));
        assert!(seen[0].query.contains("mu:uuid \"acc-1\""));
    }

    #[tokio::test]
    async fn sudo_header_is_omitted_without_the_flag() {
        let (endpoint, fake) = spawn_endpoint(
            StatusCode::OK,
            r#"{"head":{"vars":["role"]},"results":{"bindings":[]}}"#,
        );

        let rows = store(endpoint, false).find_roles("acc-1").await.unwrap();

        assert!(rows.is_empty());
        assert!(!fake.seen.lock().unwrap()[0].sudo);
    }

    #[tokio::test]
    async fn configured_group_type_scopes_group_lookups() {
        let (endpoint, fake) = spawn_endpoint(
            StatusCode::OK,
            r#"{"head":{"vars":["group","name"]},"results":{"bindings":[]}}"#,
        );
        let store = SparqlIdentityStore::new(
            SparqlClient::new(endpoint, true),
            "http://example.org/Team",
        );

        store.find_group("grp-1").await.unwrap();

        let seen = fake.seen.lock().unwrap();
        assert!(seen[0].query.contains("?group a <http://example.org/Team>"));
    }

    #[tokio::test]
    async fn session_lookup_keeps_aggregated_roles() {
        let (endpoint, _fake) = spawn_endpoint(
            StatusCode::OK,
            r#"{"head":{"vars":[]},"results":{"bindings":[{
                "session_uuid":{"type":"literal","value":"s-1"},
                "account":{"type":"uri","value":"http://data.example/accounts/1"},
                "account_uuid":{"type":"literal","value":"acc-1"},
                "group":{"type":"uri","value":"http://data.example/groups/1"},
                "group_uuid":{"type":"literal","value":"grp-1"},
                "roles":{"type":"literal","value":"admin,user"}}]}}"#,
        );

        let rows = store(endpoint, true)
            .find_account_by_session_token("http://mu.semte.ch/sessions/abc123")
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].session_uuid, "s-1");
        assert_eq!(rows[0].role_list(), vec!["admin", "user"]);
    }

    #[tokio::test]
    async fn replace_session_is_one_update_request() {
        let (endpoint, fake) = spawn_endpoint(StatusCode::OK, "");
        let session = NewSession {
            account_uri: "http://data.example/accounts/1".into(),
            token: "http://mu.semte.ch/sessions/abc123".into(),
            session_id: "s-2".into(),
            group_uri: "http://data.example/groups/1".into(),
            group_id: "grp-1".into(),
            roles: vec!["admin".into()],
        };

        store(endpoint, true).replace_session(&session).await.unwrap();

        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].query.contains("DELETE WHERE"));
        assert!(seen[0].query.contains("INSERT DATA"));
    }

    #[tokio::test]
    async fn error_status_propagates_with_body() {
        let (endpoint, _fake) = spawn_endpoint(StatusCode::BAD_REQUEST, "syntax error");

        let err = store(endpoint, true).find_group("grp-1").await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Status { status: 400, ref body } if body == "syntax error"
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = store(format!("http://{}/sparql", addr), true)
            .remove_sessions_for_token("http://mu.semte.ch/sessions/abc123")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Http(_)));
    }
}
