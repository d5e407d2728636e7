//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Mail transport settings
//! are owned by the email crate.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

/// Collection whose document creations trigger a verification email
pub const DEFAULT_INVITATIONS_COLLECTION: &str = "pending_invitations";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collection path watched by the trigger
    pub invitations_collection: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let invitations_collection = env::var("INVITATIONS_COLLECTION")
            .unwrap_or_else(|_| DEFAULT_INVITATIONS_COLLECTION.to_string());
        let invitations_collection = invitations_collection.trim_matches('/').to_string();
        if invitations_collection.is_empty() {
            return Err(Error::Configuration(
                "INVITATIONS_COLLECTION must not be empty".to_string(),
            ));
        }

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Configuration(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => 3000,
        };

        Ok(Self {
            invitations_collection,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "invite_mailer=info".to_string()),
            port,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            invitations_collection: DEFAULT_INVITATIONS_COLLECTION.to_string(),
            rust_log: "invite_mailer=info".to_string(),
            port: 3000,
        }
    }
}
