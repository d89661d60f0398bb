//! Login session management on top of the shared cache

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::cache::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "movies.sid";

/// How long an authorization request may stay pending, in seconds
pub const PENDING_LOGIN_TTL_SECONDS: u64 = 600;

/// Authenticated session created by a completed GitHub login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// GitHub profile, stored as returned by the provider
    pub profile: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Session manager for handling login sessions in the cache
#[derive(Clone)]
pub struct SessionManager {
    cache: Arc<dyn Cache>,
    ttl_seconds: u64,
}

fn session_key(id: &str) -> String {
    format!("session:{}", id)
}

fn pending_login_key(state: &str) -> String {
    format!("oauth_state:{}", state)
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(cache: Arc<dyn Cache>, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }

    /// Create a new session holding a provider profile
    pub async fn create_session(&self, profile: serde_json::Value) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().simple().to_string(),
            profile,
            created_at: Utc::now(),
        };
        info!("Creating session: {}", session.id);

        let payload = serde_json::to_string(&session).context("Failed to encode session")?;
        self.cache
            .set(&session_key(&session.id), &payload, Some(self.ttl_seconds))
            .await?;

        Ok(session)
    }

    /// Get a session by id
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>> {
        let Some(payload) = self.cache.get(&session_key(id)).await? else {
            return Ok(None);
        };

        let session = serde_json::from_str(&payload).context("Failed to decode session")?;
        Ok(Some(session))
    }

    /// Delete a session
    pub async fn delete_session(&self, id: &str) -> Result<()> {
        info!("Deleting session: {}", id);
        self.cache.delete(&session_key(id)).await
    }

    /// Remember the PKCE verifier of an authorization request until its callback
    pub async fn store_pending_login(&self, state: &str, pkce_verifier: &str) -> Result<()> {
        self.cache
            .set(
                &pending_login_key(state),
                pkce_verifier,
                Some(PENDING_LOGIN_TTL_SECONDS),
            )
            .await
    }

    /// Consume the pending login for a state value; a state can be used once
    pub async fn take_pending_login(&self, state: &str) -> Result<Option<String>> {
        self.cache.take(&pending_login_key(state)).await
    }
}
