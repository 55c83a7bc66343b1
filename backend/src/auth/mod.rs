//! Session module: login, logout and current-session lookup.
//!
//! This module provides the public interface for the session lifecycle: the
//! workflow in `service`, its errors, the JSON:API models, the header handling
//! shared by the endpoints, and the handlers and routes that expose them.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::JSON_API;
pub use routes::session_router;
pub use service::SessionService;
