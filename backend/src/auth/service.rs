//! Core business logic for the session workflow.
//!
//! `SessionService` turns a session token plus account and group ids into a
//! stored session, resolves the session behind a token, and removes it again.
//! Each step is one identity store round trip; any store failure aborts the
//! operation.

use adapters::{IdentityStoreRef, NewSession};
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::*;
use super::models::{CreateSession, CurrentSession};

#[derive(Clone)]
pub struct SessionService {
    store: IdentityStoreRef,
}

impl SessionService {
    pub fn new(store: IdentityStoreRef) -> Self {
        Self { store }
    }

    /// Logs an account in under `request.token` for the given group.
    ///
    /// Any session already stored under the token is superseded.
    pub async fn create_session(&self, request: CreateSession<'_>) -> Result<CurrentSession, SessionError> {
        let token = request
            .token
            .ok_or(SessionError::InvalidRequest(MISSING_SESSION_HEADER))?;
        request
            .rewrite_url
            .ok_or(SessionError::InvalidRequest(MISSING_REWRITE_URL_HEADER))?;
        let account_id = request
            .account_id
            .ok_or(SessionError::InvalidRequest(MISSING_ACCOUNT))?;
        let group_id = request
            .group_id
            .ok_or(SessionError::InvalidRequest(MISSING_GROUP))?;

        let account = self
            .store
            .find_account(account_id)
            .await?
            .into_iter()
            .next()
            .ok_or(SessionError::NotFound(ACCOUNT_NOT_FOUND))?;

        let group = self
            .store
            .find_group(group_id)
            .await?
            .into_iter()
            .next()
            .ok_or(SessionError::NotFound(GROUP_NOT_FOUND))?;

        let roles: Vec<String> = self
            .store
            .find_roles(account_id)
            .await?
            .into_iter()
            .map(|row| row.role)
            .collect();
        if roles.is_empty() {
            return Err(SessionError::NotFound(ROLES_NOT_FOUND));
        }

        let session = NewSession {
            account_uri: account.uri,
            token: token.to_string(),
            session_id: Uuid::new_v4().to_string(),
            group_uri: group.uri,
            group_id: group_id.to_string(),
            roles,
        };
        self.store.replace_session(&session).await?;

        info!(
            session_id = %session.session_id,
            account_id,
            group_id,
            "session created"
        );

        Ok(CurrentSession {
            session_id: session.session_id,
            roles: session.roles,
            account_id: account_id.to_string(),
            group_id: session.group_id,
        })
    }

    pub async fn current_session(&self, token: Option<&str>) -> Result<CurrentSession, SessionError> {
        let token = token.ok_or(SessionError::InvalidRequest(MISSING_SESSION_HEADER))?;

        let row = self
            .store
            .find_account_by_session_token(token)
            .await?
            .into_iter()
            .next()
            .ok_or(SessionError::InvalidSession)?;

        Ok(CurrentSession {
            roles: row.role_list(),
            session_id: row.session_uuid,
            account_id: row.account_uuid,
            group_id: row.group_uuid,
        })
    }

    pub async fn delete_current_session(&self, token: Option<&str>) -> Result<(), SessionError> {
        let token = token.ok_or(SessionError::InvalidRequest(MISSING_SESSION_HEADER))?;

        let row = self
            .store
            .find_account_by_session_token(token)
            .await?
            .into_iter()
            .next()
            .ok_or(SessionError::InvalidSession)?;

        self.store.delete_session(&row.account).await?;
        debug!(account = %row.account, "session deleted");
        Ok(())
    }
}
