//! Gate API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Two separate secrets are deliberate: the auth secret is
//! shared with the identity provider, the ticket secret never leaves
//! this service.

use serde::{Deserialize, Serialize};
use std::env;

/// Gate API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Secret verifying bearer tokens minted by the identity provider
    pub auth_secret: String,

    /// Secret signing ticket redemption tokens
    pub ticket_secret: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./boxoffice.db".to_string()),

            auth_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "boxoffice-dev-auth-secret-change-in-production".to_string()
            }),

            ticket_secret: env::var("TICKET_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "boxoffice-dev-ticket-secret-change-in-production".to_string()
            }),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Scoped to variables this test doesn't set; fine for a unit check
        let config = ApiConfig::load().unwrap();
        assert!(config.http_port > 0);
        assert!(!config.auth_secret.is_empty());
        assert!(!config.ticket_secret.is_empty());
        assert_ne!(config.auth_secret, config.ticket_secret);
    }
}
