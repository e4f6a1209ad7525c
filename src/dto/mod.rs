//! DTOs de la API
//!
//! Requests validados con `validator` y respuestas específicas de los
//! endpoints.

pub mod auth_dto;
pub mod common_dto;
pub mod department_dto;
pub mod driver_dto;
pub mod maintenance_dto;
pub mod vehicle_dto;

pub use common_dto::ApiResponse;
