//! Application state shared across handlers

use anyhow::Result;
use common::{
    cache::{Cache, MemoryCache, RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use serde_json::Value;
use std::{path::Path, sync::Arc};
use tracing::{info, warn};

use crate::{
    config::{ServiceConfig, SessionBackend, StoreBackend},
    docs,
    oauth::GithubOAuth,
    repositories::{InMemoryMovieStore, MovieRepository, MovieStore},
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieStore>,
    pub sessions: SessionManager,
    /// GitHub login; when absent, write routes are not gated
    pub oauth: Option<GithubOAuth>,
    pub api_docs: Arc<Value>,
}

impl AppState {
    /// Build the state from configuration, connecting to the configured backends
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let movies: Arc<dyn MovieStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let db_config = DatabaseConfig::from_env()?;
                let pool = init_pool(&db_config).await?;

                if health_check(&pool).await? {
                    info!("Database connection successful");
                } else {
                    anyhow::bail!("Failed to connect to database");
                }

                let repository = MovieRepository::new(pool);
                repository.migrate().await?;
                Arc::new(repository)
            }
            StoreBackend::Memory => {
                warn!("Using in-memory movie store; records are lost on restart");
                Arc::new(InMemoryMovieStore::new())
            }
        };

        let cache: Arc<dyn Cache> = match config.session_backend {
            SessionBackend::Redis => {
                let redis_config = RedisConfig::from_env()?;
                let redis_pool = RedisPool::new(&redis_config).await?;

                if !redis_pool.health_check().await? {
                    anyhow::bail!("Failed to connect to Redis");
                }
                Arc::new(redis_pool)
            }
            SessionBackend::Memory => Arc::new(MemoryCache::new()),
        };
        let sessions = SessionManager::new(cache, config.session_ttl_seconds);

        let oauth = match config.github_oauth()? {
            Some(oauth_config) => Some(GithubOAuth::new(oauth_config)?),
            None => {
                warn!("Authentication disabled; write routes are open");
                None
            }
        };

        let api_docs = docs::load_api_docs(config.api_docs_path.as_deref().map(Path::new))?;

        Ok(Self {
            movies,
            sessions,
            oauth,
            api_docs: Arc::new(api_docs),
        })
    }
}
