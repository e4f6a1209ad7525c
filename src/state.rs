//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::clock::Clock;
use crate::services::live_updates::LiveEventBroadcaster;
use crate::services::storage::BlobStore;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub storage: Arc<dyn BlobStore>,
    pub live: LiveEventBroadcaster,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        storage: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            storage,
            live: LiveEventBroadcaster::new(),
            clock,
        }
    }

    /// Fecha de hoy en la zona horaria de la flota
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn departments(&self) -> &[String] {
        &self.config.departments
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(self.config.as_ref())
    }
}
