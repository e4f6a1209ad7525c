//! Repositorios
//!
//! Acceso a PostgreSQL con sqlx. Cada repositorio envuelve el pool y
//! devuelve modelos del dominio.

pub mod activity_log_repository;
pub mod document_repository;
pub mod driver_repository;
pub mod maintenance_repository;
pub mod user_repository;
pub mod vehicle_repository;
