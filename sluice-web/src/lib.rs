//! Sluice Web - JSON API Server
//!
//! Thin HTTP gateway surface over the resolver and the stream relay.
//! Provides RESTful endpoints for frontend applications and external clients.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, build_router, run_server};
