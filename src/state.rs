//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::{config::Config, policy::ReservationPolicy};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Redis connection manager
    pub redis: ConnectionManager,

    /// Application configuration
    pub config: Config,

    /// Reservation rules derived from `config` at startup
    pub policy: ReservationPolicy,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, redis: ConnectionManager, config: Config) -> Self {
        let policy = config.reservations.policy();
        Self {
            inner: Arc::new(AppStateInner {
                db,
                redis,
                config,
                policy,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the Redis connection manager
    pub fn redis(&self) -> ConnectionManager {
        self.inner.redis.clone()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Reservation rules in effect
    pub fn policy(&self) -> &ReservationPolicy {
        &self.inner.policy
    }
}
