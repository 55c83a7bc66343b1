//! In-memory implementation of the `IdentityStore` trait.
//!
//! Accounts, groups and users are seeded up front; sessions are written by the
//! same operations the SPARQL store supports. Lookups follow the joins the
//! SPARQL queries make, so a session whose account or group disappeared is not
//! returned.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use log::debug;

use crate::errors::{StoreError, StoreResult};
use crate::models::{AccountListingRow, AccountRow, GroupRow, NewSession, RoleRow, SessionRow};
use crate::IdentityStore;

#[derive(Debug, Clone)]
struct StoredAccount {
    uri: String,
    provider: Option<String>,
    roles: Vec<String>,
}

#[derive(Debug, Clone)]
struct StoredGroup {
    uri: String,
    name: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    first_name: Option<String>,
    family_name: Option<String>,
    account_id: String,
    group_id: String,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<String, StoredAccount>,
    groups: HashMap<String, StoredGroup>,
    users: Vec<StoredUser>,
    sessions: Vec<NewSession>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryIdentityStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire write lock: {}", e)))
    }

    pub fn add_account(&self, account_id: &str, uri: &str, provider: Option<&str>, roles: &[&str]) -> StoreResult<()> {
        self.write()?.accounts.insert(
            account_id.to_string(),
            StoredAccount {
                uri: uri.to_string(),
                provider: provider.map(str::to_string),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
        Ok(())
    }

    pub fn add_group(&self, group_id: &str, uri: &str, name: Option<&str>) -> StoreResult<()> {
        self.write()?.groups.insert(
            group_id.to_string(),
            StoredGroup {
                uri: uri.to_string(),
                name: name.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Links a user to one of its accounts and the group it belongs to.
    pub fn add_user(
        &self,
        user_id: &str,
        first_name: Option<&str>,
        family_name: Option<&str>,
        account_id: &str,
        group_id: &str,
    ) -> StoreResult<()> {
        self.write()?.users.push(StoredUser {
            id: user_id.to_string(),
            first_name: first_name.map(str::to_string),
            family_name: family_name.map(str::to_string),
            account_id: account_id.to_string(),
            group_id: group_id.to_string(),
        });
        Ok(())
    }

    /// Number of session records currently stored under `token`.
    pub fn session_count(&self, token: &str) -> StoreResult<usize> {
        Ok(self.read()?.sessions.iter().filter(|s| s.token == token).count())
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_account(&self, account_id: &str) -> StoreResult<Vec<AccountRow>> {
        Ok(self
            .read()?
            .accounts
            .get(account_id)
            .map(|account| AccountRow { uri: account.uri.clone() })
            .into_iter()
            .collect())
    }

    async fn find_group(&self, group_id: &str) -> StoreResult<Vec<GroupRow>> {
        Ok(self
            .read()?
            .groups
            .get(group_id)
            .map(|group| GroupRow {
                uri: group.uri.clone(),
                name: group.name.clone(),
            })
            .into_iter()
            .collect())
    }

    async fn find_roles(&self, account_id: &str) -> StoreResult<Vec<RoleRow>> {
        Ok(self
            .read()?
            .accounts
            .get(account_id)
            .map(|account| account.roles.clone())
            .unwrap_or_default()
            .into_iter()
            .map(|role| RoleRow { role })
            .collect())
    }

    async fn find_account_by_session_token(&self, token: &str) -> StoreResult<Vec<SessionRow>> {
        let tables = self.read()?;
        let rows = tables
            .sessions
            .iter()
            .filter(|session| session.token == token && !session.roles.is_empty())
            .filter_map(|session| {
                let (account_uuid, _) = tables
                    .accounts
                    .iter()
                    .find(|(_, account)| account.uri == session.account_uri)?;
                let (group_uuid, _) = tables
                    .groups
                    .iter()
                    .find(|(_, group)| group.uri == session.group_uri)?;
                Some(SessionRow {
                    session_uuid: session.session_id.clone(),
                    account: session.account_uri.clone(),
                    account_uuid: account_uuid.clone(),
                    group: session.group_uri.clone(),
                    group_uuid: group_uuid.clone(),
                    roles: session.roles.join(","),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn remove_sessions_for_token(&self, token: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        let before = tables.sessions.len();
        tables.sessions.retain(|session| session.token != token);
        debug!("removed {} sessions for {}", before - tables.sessions.len(), token);
        Ok(())
    }

    async fn insert_session(&self, session: &NewSession) -> StoreResult<()> {
        self.write()?.sessions.push(session.clone());
        Ok(())
    }

    async fn delete_session(&self, account_uri: &str) -> StoreResult<()> {
        self.write()?
            .sessions
            .retain(|session| session.account_uri != account_uri);
        Ok(())
    }

    async fn replace_session(&self, session: &NewSession) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.sessions.retain(|existing| existing.token != session.token);
        tables.sessions.push(session.clone());
        debug!("session {} stored under {}", session.session_id, session.token);
        Ok(())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<AccountListingRow>> {
        let tables = self.read()?;
        let rows = tables
            .users
            .iter()
            .filter_map(|user| {
                let account = tables.accounts.get(&user.account_id)?;
                let group = tables.groups.get(&user.group_id)?;
                Some(AccountListingRow {
                    account_uuid: user.account_id.clone(),
                    account_provider: account.provider.clone(),
                    user_uuid: user.id.clone(),
                    user_first_name: user.first_name.clone(),
                    user_family_name: user.family_name.clone(),
                    group_uuid: user.group_id.clone(),
                    group_name: group.name.clone(),
                })
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "http://mu.semte.ch/sessions/abc123";

    fn seeded() -> InMemoryIdentityStore {
        let store = InMemoryIdentityStore::new();
        store
            .add_account("acc-1", "http://data.example/accounts/1", Some("https://github.com/lblod/mock-login-service"), &["admin", "user"])
            .unwrap();
        store
            .add_group("grp-1", "http://data.example/groups/1", Some("Gent"))
            .unwrap();
        store
            .add_user("usr-1", Some("Jane"), Some("Doe"), "acc-1", "grp-1")
            .unwrap();
        store
    }

    fn session(id: &str) -> NewSession {
        NewSession {
            account_uri: "http://data.example/accounts/1".into(),
            token: TOKEN.into(),
            session_id: id.into(),
            group_uri: "http://data.example/groups/1".into(),
            group_id: "grp-1".into(),
            roles: vec!["admin".into(), "user".into()],
        }
    }

    #[tokio::test]
    async fn lookups_are_exact_match() {
        let store = seeded();
        assert_eq!(store.find_account("acc-1").await.unwrap().len(), 1);
        assert!(store.find_account("acc").await.unwrap().is_empty());
        assert_eq!(store.find_group("grp-1").await.unwrap()[0].name.as_deref(), Some("Gent"));
        assert_eq!(store.find_roles("acc-1").await.unwrap().len(), 2);
        assert!(store.find_roles("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_keeps_a_single_session_per_token() {
        let store = seeded();
        store.insert_session(&session("s-1")).await.unwrap();
        store.insert_session(&session("s-2")).await.unwrap();
        assert_eq!(store.session_count(TOKEN).unwrap(), 2);

        store.replace_session(&session("s-3")).await.unwrap();

        assert_eq!(store.session_count(TOKEN).unwrap(), 1);
        let rows = store.find_account_by_session_token(TOKEN).await.unwrap();
        assert_eq!(rows[0].session_uuid, "s-3");
        assert_eq!(rows[0].account_uuid, "acc-1");
        assert_eq!(rows[0].roles, "admin,user");
    }

    #[tokio::test]
    async fn removing_absent_sessions_is_a_no_op() {
        let store = seeded();
        store.remove_sessions_for_token(TOKEN).await.unwrap();
        assert_eq!(store.session_count(TOKEN).unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_by_account_clears_the_session() {
        let store = seeded();
        store.replace_session(&session("s-1")).await.unwrap();

        store.delete_session("http://data.example/accounts/1").await.unwrap();

        assert!(store.find_account_by_session_token(TOKEN).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_joins_users_accounts_and_groups() {
        let store = seeded();
        store.add_user("usr-2", None, None, "acc-missing", "grp-1").unwrap();

        let rows = store.list_accounts().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_uuid, "usr-1");
        assert_eq!(rows[0].group_name.as_deref(), Some("Gent"));
    }
}
