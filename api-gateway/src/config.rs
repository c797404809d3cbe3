//! Application configuration

use std::env;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API port, used when no listening address is given on the command line
    pub port: u16,
    /// Debug logging (`DEBUG=1`)
    pub debug: bool,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            debug: env::var("DEBUG").map(|v| v == "1").unwrap_or(false),
        }
    }

    /// Loopback listening address for the configured port
    pub fn default_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
