pub mod auth_controller;
pub mod department_controller;
pub mod document_controller;
pub mod driver_controller;
pub mod maintenance_controller;
pub mod report_controller;
pub mod vehicle_controller;
