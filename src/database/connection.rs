//! Conexión a PostgreSQL
//!
//! Creación del pool y ejecución de migraciones al arrancar.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Conectar y aplicar las migraciones de `migrations/`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️  Conectando a {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error creando el pool de conexiones")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Error ejecutando migraciones")?;

        info!("✅ Base de datos lista (max {} conexiones)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Enmascarar las credenciales de la URL para los logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
