//! HTTP API for the browser front end.
//!
//! Routes are nested under `/api/` behind a rate limiter and an access
//! log. `api_router()` returns a `Router` that can be mounted on any axum
//! server; `server::start_api_server` runs it.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ApiSession};
pub use types::ApiContext;
