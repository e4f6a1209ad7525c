pub mod auth_routes;
pub mod department_routes;
pub mod document_routes;
pub mod driver_routes;
pub mod file_routes;
pub mod health_routes;
pub mod maintenance_routes;
pub mod report_routes;
pub mod upload;
pub mod user_routes;
pub mod vehicle_routes;
