//! Service configuration loaded from the environment

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::oauth::GithubOAuthConfig;

/// Where movie records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Where login sessions live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Redis,
    Memory,
}

/// Configuration for the API service
///
/// # Environment Variables
/// - `HOST`: bind address (default: "0.0.0.0")
/// - `PORT`: listening port (default: 3000)
/// - `STORE_BACKEND`: `postgres` or `memory` (default: postgres)
/// - `SESSION_BACKEND`: `redis` or `memory` (default: redis)
/// - `SESSION_TTL_SECONDS`: session lifetime (default: 86400)
/// - `AUTH_ENABLED`: gate write routes behind GitHub login (default: true)
/// - `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`: OAuth app credentials
/// - `GITHUB_CALLBACK_URL`: OAuth redirect URI
/// - `API_DOCS_PATH`: OpenAPI YAML file replacing the bundled one
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub session_backend: SessionBackend,
    pub session_ttl_seconds: u64,
    pub auth_enabled: bool,
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
    pub github_callback_url: String,
    pub api_docs_path: Option<String>,
}

impl ServiceConfig {
    /// Create a new ServiceConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("store_backend", "postgres")?
            .set_default("session_backend", "redis")?
            .set_default("session_ttl_seconds", 86400)?
            .set_default("auth_enabled", true)?
            .set_default(
                "github_callback_url",
                "http://localhost:3000/auth/github/callback",
            )?
            .add_source(Environment::default())
            .build()
            .context("Failed to read service configuration")?;

        config
            .try_deserialize()
            .context("Invalid service configuration")
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// GitHub OAuth settings, `None` when authentication is disabled
    pub fn github_oauth(&self) -> Result<Option<GithubOAuthConfig>> {
        if !self.auth_enabled {
            return Ok(None);
        }

        let client_id = self
            .github_client_id
            .clone()
            .filter(|id| !id.is_empty())
            .context("GITHUB_CLIENT_ID must be set when AUTH_ENABLED is true")?;
        let client_secret = self
            .github_client_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .context("GITHUB_CLIENT_SECRET must be set when AUTH_ENABLED is true")?;

        Ok(Some(GithubOAuthConfig::new(
            client_id,
            client_secret,
            self.github_callback_url.clone(),
        )))
    }
}
