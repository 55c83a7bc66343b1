//! Module for the account listing API.
//!
//! A read-only view over accounts with their users and groups, used by the
//! login screen to offer accounts to pick from. Nothing here mutates state.

pub mod handlers;
pub mod routes;
