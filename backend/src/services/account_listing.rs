//! Denormalizes account listing rows into a JSON:API collection document.
//!
//! Each store row joins one account with its user and the user's group. The
//! document lists the accounts as primary data and includes every distinct
//! group and user once, groups first.

use std::collections::HashSet;

use adapters::AccountListingRow;
use serde_json::{json, Value};

pub fn accounts_document(base_url: &str, rows: &[AccountListingRow]) -> Value {
    let base = base_url.trim_end_matches('/');

    let mut seen_groups = HashSet::new();
    let groups: Vec<Value> = rows
        .iter()
        .filter(|row| seen_groups.insert(row.group_uuid.as_str()))
        .map(|row| {
            json!({
                "type": "groups",
                "id": row.group_uuid,
                "attributes": { "name": row.group_name },
                "relationships": {}
            })
        })
        .collect();

    let mut seen_users = HashSet::new();
    let users: Vec<Value> = rows
        .iter()
        .filter(|row| seen_users.insert(row.user_uuid.as_str()))
        .map(|row| {
            let mut group_ids: Vec<&str> = Vec::new();
            for other in rows.iter().filter(|other| other.user_uuid == row.user_uuid) {
                if !group_ids.contains(&other.group_uuid.as_str()) {
                    group_ids.push(&other.group_uuid);
                }
            }
            let user_groups: Vec<Value> = group_ids
                .iter()
                .map(|id| json!({ "type": "groups", "id": id }))
                .collect();

            json!({
                "type": "users",
                "id": row.user_uuid,
                "attributes": {
                    "first-name": row.user_first_name,
                    "family-name": row.user_family_name
                },
                "relationships": {
                    "accounts": {
                        "links": { "related": format!("{}/users/{}/accounts", base, row.user_uuid) }
                    },
                    "groups": {
                        "links": { "related": format!("{}/users/{}/groups", base, row.user_uuid) },
                        "data": user_groups
                    }
                }
            })
        })
        .collect();

    let mut seen_accounts = HashSet::new();
    let data: Vec<Value> = rows
        .iter()
        .filter(|row| seen_accounts.insert(row.account_uuid.as_str()))
        .map(|row| {
            json!({
                "type": "accounts",
                "id": row.account_uuid,
                "attributes": { "provider": row.account_provider },
                "relationships": {
                    "user": {
                        "links": { "related": format!("{}/accounts/{}/user", base, row.account_uuid) },
                        "data": { "type": "users", "id": row.user_uuid }
                    }
                }
            })
        })
        .collect();

    let included: Vec<Value> = groups.into_iter().chain(users).collect();

    json!({
        "links": { "self": format!("{}/accounts", base) },
        "data": data,
        "included": included
    })
}
