//! Data structures for session requests and JSON:API documents.
//!
//! Every member of the request types is optional. A missing field is reported
//! with the workflow's own message, not as a deserialization error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SESSIONS_TYPE: &str = "sessions";
pub const ACCOUNTS_TYPE: &str = "accounts";
pub const GROUPS_TYPE: &str = "groups";

/// Body of `POST /sessions/`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionDocument {
    #[serde(default)]
    pub data: Option<SessionResourceInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionResourceInput {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub relationships: Option<SessionRelationshipsInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionRelationshipsInput {
    #[serde(default)]
    pub account: Option<RelationshipInput>,
    #[serde(default)]
    pub group: Option<RelationshipInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelationshipInput {
    #[serde(default)]
    pub data: Option<ResourceIdentifierInput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceIdentifierInput {
    #[serde(default)]
    pub id: Option<Value>,
}

impl SessionResourceInput {
    pub fn account_id(&self) -> Option<&str> {
        related_id(self.relationships.as_ref()?.account.as_ref())
    }

    pub fn group_id(&self) -> Option<&str> {
        related_id(self.relationships.as_ref()?.group.as_ref())
    }
}

/// Linked ids must be non-empty strings; anything else counts as absent.
fn related_id(relationship: Option<&RelationshipInput>) -> Option<&str> {
    relationship?
        .data
        .as_ref()?
        .id
        .as_ref()?
        .as_str()
        .filter(|id| !id.is_empty())
}

/// Inputs to the create workflow, straight from headers and body.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateSession<'a> {
    pub token: Option<&'a str>,
    pub rewrite_url: Option<&'a str>,
    pub account_id: Option<&'a str>,
    pub group_id: Option<&'a str>,
}

/// A resolved session as handed back by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentSession {
    pub session_id: String,
    pub roles: Vec<String>,
    pub account_id: String,
    pub group_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionDocument {
    pub links: SelfLink,
    pub data: SessionResource,
    pub relationships: SessionRelationships,
}

#[derive(Debug, Serialize)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_link: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResource {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub attributes: SessionAttributes,
}

#[derive(Debug, Serialize)]
pub struct SessionAttributes {
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionRelationships {
    pub account: Relationship,
    pub group: Relationship,
}

#[derive(Debug, Serialize)]
pub struct Relationship {
    pub links: RelatedLink,
    pub data: ResourceIdentifier,
}

#[derive(Debug, Serialize)]
pub struct RelatedLink {
    pub related: String,
}

#[derive(Debug, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
}

impl Relationship {
    fn to(kind: &'static str, id: &str) -> Self {
        Self {
            links: RelatedLink {
                related: format!("/{}/{}", kind, id),
            },
            data: ResourceIdentifier {
                kind,
                id: id.to_string(),
            },
        }
    }
}

impl SessionDocument {
    /// `base` is the externally visible sessions URL (the rewrite URL).
    pub fn new(base: &str, session: CurrentSession) -> Self {
        Self {
            links: SelfLink {
                self_link: format!("{}/current", base.trim_end_matches('/')),
            },
            relationships: SessionRelationships {
                account: Relationship::to(ACCOUNTS_TYPE, &session.account_id),
                group: Relationship::to(GROUPS_TYPE, &session.group_id),
            },
            data: SessionResource {
                kind: SESSIONS_TYPE,
                id: session.session_id,
                attributes: SessionAttributes {
                    roles: session.roles,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn linked_ids_are_read_from_relationships() {
        let doc: CreateSessionDocument = serde_json::from_value(json!({
            "data": {
                "type": "sessions",
                "relationships": {
                    "account": { "data": { "type": "accounts", "id": "acc-1" } },
                    "group": { "data": { "type": "groups", "id": "grp-1" } }
                }
            }
        }))
        .unwrap();

        let data = doc.data.unwrap();
        assert_eq!(data.kind.as_deref(), Some("sessions"));
        assert_eq!(data.account_id(), Some("acc-1"));
        assert_eq!(data.group_id(), Some("grp-1"));
    }

    #[test]
    fn non_string_or_empty_ids_are_treated_as_missing() {
        let doc: CreateSessionDocument = serde_json::from_value(json!({
            "data": {
                "type": "sessions",
                "relationships": {
                    "account": { "data": { "id": 42 } },
                    "group": { "data": { "id": "" } }
                }
            }
        }))
        .unwrap();

        let data = doc.data.unwrap();
        assert_eq!(data.account_id(), None);
        assert_eq!(data.group_id(), None);
    }

    #[test]
    fn session_document_shape() {
        let document = SessionDocument::new(
            "https://app.example/sessions/",
            CurrentSession {
                session_id: "s-1".into(),
                roles: vec!["admin".into(), "user".into()],
                account_id: "acc-1".into(),
                group_id: "grp-1".into(),
            },
        );

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "links": { "self": "https://app.example/sessions/current" },
                "data": { "type": "sessions", "id": "s-1", "attributes": { "roles": ["admin", "user"] } },
                "relationships": {
                    "account": { "links": { "related": "/accounts/acc-1" }, "data": { "type": "accounts", "id": "acc-1" } },
                    "group": { "links": { "related": "/groups/grp-1" }, "data": { "type": "groups", "id": "grp-1" } }
                }
            })
        );
    }
}
