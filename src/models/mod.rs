//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema
//! PostgreSQL y los modelos de lectura derivados (estados, alertas, reportes).

pub mod activity_log;
pub mod alert;
pub mod document;
pub mod driver;
pub mod maintenance;
pub mod report;
pub mod status;
pub mod user;
pub mod vehicle;
