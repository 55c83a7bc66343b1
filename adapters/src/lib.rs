//! Core `adapters` crate for identity store access.
//!
//! This crate defines the [`IdentityStore`] trait, which outlines the lookups
//! and writes the login service performs against its triple store, and
//! provides the concrete implementations: [`SparqlIdentityStore`] for a real
//! SPARQL endpoint and [`InMemoryIdentityStore`] for tests and local runs.

pub mod errors;
pub mod memory;
pub mod models;
pub mod queries;
pub mod sparql;
pub mod triplestore;
pub mod vocab;

use std::sync::Arc;

use async_trait::async_trait;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryIdentityStore;
pub use models::{AccountListingRow, AccountRow, GroupRow, NewSession, RoleRow, SessionRow};
pub use sparql::SparqlClient;
pub use triplestore::SparqlIdentityStore;

/// Lookups and writes against the identity store.
///
/// Every method is a single store round trip. Lookups are exact-match by
/// identifier and return all matching rows, possibly none.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_account(&self, account_id: &str) -> StoreResult<Vec<AccountRow>>;

    async fn find_group(&self, group_id: &str) -> StoreResult<Vec<GroupRow>>;

    async fn find_roles(&self, account_id: &str) -> StoreResult<Vec<RoleRow>>;

    async fn find_account_by_session_token(&self, token: &str) -> StoreResult<Vec<SessionRow>>;

    /// Deletes every session recorded under `token`. A no-op when there is none.
    async fn remove_sessions_for_token(&self, token: &str) -> StoreResult<()>;

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()>;

    async fn delete_session(&self, account_uri: &str) -> StoreResult<()>;

    /// Supersedes whatever is stored under `session.token` with `session`.
    ///
    /// Implementations that can submit both steps at once should override this.
    async fn replace_session(&self, session: &NewSession) -> StoreResult<()> {
        self.remove_sessions_for_token(&session.token).await?;
        self.insert_session(session).await
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountListingRow>>;
}

pub type IdentityStoreRef = Arc<dyn IdentityStore>;
