//! Persona chat API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! chat turn orchestrator) so integration tests and the binary entrypoint
//! can both reach them.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request_host;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
