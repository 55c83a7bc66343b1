//! SPARQL text for every identity store operation.
//!
//! Builders are pure: they take already-known identifiers, escape them and
//! return the query string. Nothing here talks to the network.

use chrono::{DateTime, Utc};

use crate::models::NewSession;
use crate::sparql::{escape_datetime, escape_string, escape_uri};
use crate::vocab::{prefixes, PUBLIC_GRAPH, SESSIONS_GRAPH};

pub fn select_account(account_id: &str) -> String {
    format!(
        "{prefixes}SELECT ?uri WHERE {{
  GRAPH ?g {{
    ?uri a foaf:OnlineAccount ;
         mu:uuid {id} .
  }}
}}",
        prefixes = prefixes(),
        id = escape_string(account_id),
    )
}

pub fn select_group(group_id: &str, group_type: &str) -> String {
    format!(
        "{prefixes}SELECT ?group ?name WHERE {{
  GRAPH {graph} {{
    ?group a {group_type} ;
           mu:uuid {id} .
    OPTIONAL {{ ?group skos:prefLabel ?name . }}
  }}
}}",
        prefixes = prefixes(),
        graph = escape_uri(PUBLIC_GRAPH),
        group_type = escape_uri(group_type),
        id = escape_string(group_id),
    )
}

pub fn select_roles(account_id: &str) -> String {
    format!(
        "{prefixes}SELECT DISTINCT ?role WHERE {{
  GRAPH ?g {{
    ?account a foaf:OnlineAccount ;
             mu:uuid {id} ;
             ext:sessionRole ?role .
  }}
}}",
        prefixes = prefixes(),
        id = escape_string(account_id),
    )
}

pub fn select_account_by_session(token: &str, group_type: &str) -> String {
    format!(
        "{prefixes}SELECT ?session_uuid ?account ?account_uuid ?group ?group_uuid (GROUP_CONCAT(?role; SEPARATOR = ',') AS ?roles) WHERE {{
  GRAPH {sessions} {{
    {session} mu:uuid ?session_uuid ;
              session:account ?account ;
              ext:sessionGroup ?group ;
              ext:sessionRole ?role .
  }}
  GRAPH ?g {{
    ?account a foaf:OnlineAccount ;
             mu:uuid ?account_uuid .
  }}
  GRAPH ?h {{
    ?group a {group_type} ;
           mu:uuid ?group_uuid .
  }}
}}
GROUP BY ?session_uuid ?account ?account_uuid ?group ?group_uuid",
        prefixes = prefixes(),
        sessions = escape_uri(SESSIONS_GRAPH),
        session = escape_uri(token),
        group_type = escape_uri(group_type),
    )
}

/// Body of the delete shared by [`remove_old_sessions`] and [`replace_session`].
fn delete_sessions_for_token(token: &str) -> String {
    format!(
        "DELETE WHERE {{
  GRAPH {sessions} {{
    {session} ?p ?o .
  }}
}}",
        sessions = escape_uri(SESSIONS_GRAPH),
        session = escape_uri(token),
    )
}

fn insert_session_data(session: &NewSession, now: &DateTime<Utc>) -> String {
    let roles: String = session
        .roles
        .iter()
        .map(|role| format!("\n              ext:sessionRole {} ;", escape_string(role)))
        .collect();

    format!(
        "INSERT DATA {{
  GRAPH {sessions} {{
    {session} session:account {account} ;
              mu:uuid {id} ;
              ext:sessionGroup {group} ;{roles}
              dct:modified {now} .
  }}
}}",
        sessions = escape_uri(SESSIONS_GRAPH),
        session = escape_uri(&session.token),
        account = escape_uri(&session.account_uri),
        id = escape_string(&session.session_id),
        group = escape_uri(&session.group_uri),
        roles = roles,
        now = escape_datetime(now),
    )
}

pub fn remove_old_sessions(token: &str) -> String {
    format!("{}{}", prefixes(), delete_sessions_for_token(token))
}

pub fn insert_new_session(session: &NewSession, now: &DateTime<Utc>) -> String {
    format!("{}{}", prefixes(), insert_session_data(session, now))
}

/// Remove-then-insert for one token, as a single update request.
pub fn replace_session(session: &NewSession, now: &DateTime<Utc>) -> String {
    format!(
        "{};\n{}",
        remove_old_sessions(&session.token),
        insert_session_data(session, now)
    )
}

pub fn delete_current_session(account_uri: &str) -> String {
    format!(
        "{prefixes}DELETE {{
  GRAPH {sessions} {{
    ?session ?p ?o .
  }}
}}
WHERE {{
  GRAPH {sessions} {{
    ?session session:account {account} ;
             ?p ?o .
  }}
}}",
        prefixes = prefixes(),
        sessions = escape_uri(SESSIONS_GRAPH),
        account = escape_uri(account_uri),
    )
}

pub fn select_accounts(group_type: &str) -> String {
    format!(
        "{prefixes}SELECT DISTINCT ?account_uuid ?account_provider ?user_uuid ?user_firstname ?user_familyname ?group_uuid ?group_name WHERE {{
  GRAPH ?g {{
    ?user a foaf:Person ;
          mu:uuid ?user_uuid ;
          foaf:account ?account ;
          foaf:member ?group .
    ?account a foaf:OnlineAccount ;
             mu:uuid ?account_uuid .
    OPTIONAL {{ ?account foaf:accountServiceHomepage ?account_provider . }}
    OPTIONAL {{ ?user foaf:firstName ?user_firstname . }}
    OPTIONAL {{ ?user foaf:familyName ?user_familyname . }}
  }}
  GRAPH ?h {{
    ?group a {group_type} ;
           mu:uuid ?group_uuid .
    OPTIONAL {{ ?group skos:prefLabel ?group_name . }}
  }}
}}
ORDER BY ?group_name ?user_familyname ?user_firstname",
        prefixes = prefixes(),
        group_type = escape_uri(group_type),
    )
}
