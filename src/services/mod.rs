//! Services module
//!
//! Este módulo contiene la lógica de negocio: clasificación de estados,
//! agregación de alertas, modelo de lectura por departamento, reportes,
//! almacenamiento de archivos, notificaciones en vivo y autenticación.

pub mod activity_logger;
pub mod alert_aggregator;
pub mod auth_service;
pub mod clock;
pub mod cost_report;
pub mod fleet_filters;
pub mod live_updates;
pub mod status_classifier;
pub mod storage;
