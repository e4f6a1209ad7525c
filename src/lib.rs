//! Backend de gestión de flota municipal
//!
//! Vehículos, conductores, mantenimientos y documentos agrupados por
//! departamento, con alertas calculadas a partir de fechas y kilometraje.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth::auth_middleware, cors::cors_layer};
use crate::routes::{
    auth_routes, department_routes, driver_routes, file_routes, health_routes, report_routes,
    user_routes, vehicle_routes,
};
use crate::state::AppState;

/// Margen para los campos del formulario multipart además del archivo
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Construir el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/users", user_routes::create_user_router())
        .nest("/api/departments", department_routes::create_department_router())
        .nest("/api/alerts", department_routes::create_alert_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", driver_routes::create_driver_router())
        .nest("/api/reports", report_routes::create_report_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let public = Router::new()
        .merge(health_routes::create_health_router())
        .nest("/api/auth", auth_routes::create_auth_router(&state))
        .nest("/files", file_routes::create_file_router());

    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config.cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}
