//! Row types returned by identity store lookups.
//!
//! These are the store-side shapes of accounts, groups, roles and sessions.
//! They carry URIs as well as ids; the HTTP layer only ever exposes the ids.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRow {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRow {
    pub uri: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRow {
    pub role: String,
}

/// An active session as resolved from its token.
///
/// `roles` is the comma-delimited aggregate produced by the store; use
/// [`SessionRow::role_list`] to split it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRow {
    pub session_uuid: String,
    pub account: String,
    pub account_uuid: String,
    pub group: String,
    pub group_uuid: String,
    pub roles: String,
}

impl SessionRow {
    pub fn role_list(&self) -> Vec<String> {
        self.roles
            .split(',')
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Everything needed to write one session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub account_uri: String,
    pub token: String,
    pub session_id: String,
    pub group_uri: String,
    pub group_id: String,
    pub roles: Vec<String>,
}

/// One denormalized account/user/group row for the accounts listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountListingRow {
    pub account_uuid: String,
    pub account_provider: Option<String>,
    pub user_uuid: String,
    pub user_first_name: Option<String>,
    pub user_family_name: Option<String>,
    pub group_uuid: String,
    pub group_name: Option<String>,
}
