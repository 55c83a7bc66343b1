//! Module for identity store setup.
//!
//! Builds the one store handle the service shares across requests. Sudo access
//! is decided here from configuration and handed to the client constructor.

use std::sync::Arc;

use adapters::{IdentityStoreRef, SparqlClient, SparqlIdentityStore};
use tracing::info;

use crate::config::Config;

pub fn connect(config: &Config) -> IdentityStoreRef {
    info!(
        endpoint = %config.sparql_endpoint,
        sudo = config.sudo,
        group_type = %config.group_type,
        "using sparql identity store"
    );
    let client = SparqlClient::new(config.sparql_endpoint.as_str(), config.sudo);
    Arc::new(SparqlIdentityStore::new(client, config.group_type.as_str()))
}
