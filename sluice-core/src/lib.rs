//! Sluice Core - URL resolution and media stream relay
//!
//! This crate provides the building blocks for the Sluice gateway:
//! upstream metadata resolution, the byte-stream relay, centralized
//! configuration, and the gateway error taxonomy.

pub mod config;
pub mod error;
pub mod relay;
pub mod resolve;

// Re-export main types for convenient access
pub use config::SluiceConfig;
pub use error::GatewayError;
pub use relay::{MediaStream, StreamRelay, attachment_filename};
pub use resolve::{MediaResolver, ResolvedMedia};

pub type Result<T> = std::result::Result<T, GatewayError>;
