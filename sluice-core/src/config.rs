//! Centralized configuration for Sluice.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Default listening port when neither a flag nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8000;

/// Central configuration for all Sluice components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct SluiceConfig {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
}

/// Upstream metadata API and media host configuration.
///
/// Controls outbound HTTP timeouts and identification for both the
/// metadata resolution call and the media stream relay.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Metadata resolution endpoint
    pub api_base: String,
    /// Timeout for the metadata resolution request
    pub resolve_timeout: Duration,
    /// Connect timeout for opening a media stream
    pub stream_timeout: Duration,
    /// User agent for outbound HTTP requests
    pub user_agent: &'static str,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.tikwm.com/api/".to_string(),
            resolve_timeout: Duration::from_secs(20),
            stream_timeout: Duration::from_secs(30),
            user_agent: "sluice/0.1.0",
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Resolves the listening port: explicit value, then `PORT`, then 8000.
    pub fn resolve_port(explicit: Option<u16>) -> u16 {
        let env_port = std::env::var("PORT").ok().and_then(|v| v.parse().ok());
        pick_port(explicit, env_port)
    }
}

fn pick_port(explicit: Option<u16>, env_port: Option<u16>) -> u16 {
    explicit.or(env_port).unwrap_or(DEFAULT_PORT)
}
