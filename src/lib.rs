//! Client for OData version 4.0 services: a thin HTTP transport with the
//! service's error envelope mapped to typed errors, plus retry and auth
//! plumbing. Response bodies are surfaced as raw `serde_json::Value`s.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod connection;
pub mod errors;
pub mod retry;

pub use auth::Auth;
pub use config::ClientConfig;
pub use connection::ODataConnection;
pub use errors::{Error, Result, ServerError};
pub use retry::RetryPolicy;
