use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_manager::config::database::DatabaseConfig;
use fleet_manager::config::environment::EnvironmentConfig;
use fleet_manager::create_app;
use fleet_manager::database::DatabaseConnection;
use fleet_manager::services::auth_service::AuthService;
use fleet_manager::services::clock::SystemClock;
use fleet_manager::services::storage::LocalStorage;
use fleet_manager::state::AppState;
use fleet_manager::utils::jwt::JwtConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚒 Gestión de Flota Municipal");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️  Entorno: {} | zona horaria: {}", config.environment, config.timezone);

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_env()?;
    let db_connection = match DatabaseConnection::connect(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // Almacenamiento de archivos
    let storage = match LocalStorage::new(&config.storage_path, &config.files_base_url()).await {
        Ok(storage) => {
            info!("✅ Almacenamiento local en {}", config.storage_path);
            storage
        }
        Err(e) => {
            error!("❌ Error inicializando el almacenamiento: {}", e);
            return Err(anyhow::anyhow!("Error de almacenamiento: {}", e));
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        let auth = AuthService::new(pool.clone(), JwtConfig::from(&config));
        match auth.ensure_bootstrap_admin(admin).await {
            Ok(true) => info!("👤 Administrador inicial creado: {}", admin.email),
            Ok(false) => {}
            Err(e) => warn!("⚠️  No se pudo crear el administrador inicial: {}", e),
        }
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let clock = Arc::new(SystemClock::new(config.timezone));
    let state = AppState::new(pool, config, Arc::new(storage), clock);
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Perfil actual");
    info!("   GET/POST /api/users - Gestión de usuarios (admin)");
    info!("🏛️  Departamentos:");
    info!("   GET  /api/departments - Departamentos visibles");
    info!("   GET  /api/departments/:department/vehicles - Vehículos con estado");
    info!("   GET  /api/departments/:department/drivers - Conductores con estado");
    info!("   GET  /api/departments/:department/alerts - Alertas del departamento");
    info!("   GET  /api/departments/:department/snapshot - Instantánea");
    info!("   GET  /api/departments/:department/live - Instantáneas en vivo (SSE)");
    info!("   GET  /api/departments/:department/logs - Historial de actividad");
    info!("   GET  /api/alerts - Alertas de todos los departamentos visibles");
    info!("🚗 Vehículos:");
    info!("   POST /api/vehicles - Crear vehículo");
    info!("   GET/PUT/DELETE /api/vehicles/:id - Obtener/actualizar/eliminar");
    info!("   PUT/DELETE /api/vehicles/:id/image - Imagen del vehículo");
    info!("   GET/POST /api/vehicles/:id/maintenance - Mantenimientos");
    info!("   DELETE /api/vehicles/:id/maintenance/:record_id - Eliminar mantenimiento");
    info!("   POST /api/vehicles/:id/costs/reconcile - Recalcular costo total");
    info!("   GET/POST /api/vehicles/:id/documents - Documentos");
    info!("   DELETE /api/vehicles/:id/documents/:document_id - Eliminar documento");
    info!("🧑 Conductores:");
    info!("   POST /api/drivers - Crear conductor");
    info!("   GET/PUT/DELETE /api/drivers/:id - Obtener/actualizar/eliminar");
    info!("📊 Reportes:");
    info!("   GET  /api/reports/costs - Costos por departamento");
    info!("   GET  /api/reports/fleet.csv - Exportación CSV");
    info!("   GET  /files/*key - Archivos almacenados");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
