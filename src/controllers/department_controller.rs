//! Modelo de lectura por departamento: listas con estados, alertas,
//! instantáneas e historial de actividad.

use crate::dto::department_dto::ActivityLogQuery;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityLog;
use crate::models::alert::Alert;
use crate::repositories::activity_log_repository::ActivityLogRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::alert_aggregator::aggregate_alerts;
use crate::services::fleet_filters::{
    driver_page, vehicle_page, DepartmentSnapshot, DriverFilters, DriverView, Page, VehicleFilters,
    VehicleView,
};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct DepartmentController {
    vehicles: VehicleRepository,
    drivers: DriverRepository,
    logs: ActivityLogRepository,
    state: AppState,
}

impl DepartmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            vehicles: VehicleRepository::new(state.pool.clone()),
            drivers: DriverRepository::new(state.pool.clone()),
            logs: ActivityLogRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub fn visible_departments(&self, user: &AuthenticatedUser) -> Vec<String> {
        user.profile().visible_departments(self.state.departments())
    }

    pub async fn vehicles(
        &self,
        user: &AuthenticatedUser,
        department: &str,
        filters: &VehicleFilters,
    ) -> AppResult<Page<VehicleView>> {
        user.ensure_department_access(department, self.state.departments())?;
        let vehicles = self.vehicles.list_by_department(department).await?;
        Ok(vehicle_page(vehicles, filters, self.state.today()))
    }

    pub async fn drivers(
        &self,
        user: &AuthenticatedUser,
        department: &str,
        filters: &DriverFilters,
    ) -> AppResult<Page<DriverView>> {
        user.ensure_department_access(department, self.state.departments())?;
        let drivers = self.drivers.list_by_department(department).await?;
        Ok(driver_page(drivers, filters, self.state.today()))
    }

    pub async fn alerts(&self, user: &AuthenticatedUser, department: &str) -> AppResult<Vec<Alert>> {
        user.ensure_department_access(department, self.state.departments())?;
        let vehicles = self.vehicles.list_by_department(department).await?;
        let drivers = self.drivers.list_by_department(department).await?;
        Ok(aggregate_alerts(&vehicles, &drivers, self.state.today()))
    }

    /// Alertas de todos los departamentos visibles
    pub async fn all_alerts(&self, user: &AuthenticatedUser) -> AppResult<Vec<Alert>> {
        let departments = self.visible_departments(user);
        if departments.is_empty() {
            return Ok(Vec::new());
        }
        let vehicles = self.vehicles.list_by_departments(&departments).await?;
        let drivers = self.drivers.list_by_departments(&departments).await?;
        Ok(aggregate_alerts(&vehicles, &drivers, self.state.today()))
    }

    pub async fn snapshot(&self, user: &AuthenticatedUser, department: &str) -> AppResult<DepartmentSnapshot> {
        user.ensure_department_access(department, self.state.departments())?;
        self.load_snapshot(department).await
    }

    /// Instantánea sin comprobación de acceso; usada por el stream en vivo
    /// después de validar la suscripción.
    pub async fn load_snapshot(&self, department: &str) -> AppResult<DepartmentSnapshot> {
        let vehicles = self.vehicles.list_by_department(department).await?;
        let drivers = self.drivers.list_by_department(department).await?;
        Ok(DepartmentSnapshot::build(
            department.to_string(),
            vehicles,
            drivers,
            self.state.today(),
        ))
    }

    pub async fn activity_logs(
        &self,
        user: &AuthenticatedUser,
        department: &str,
        query: &ActivityLogQuery,
    ) -> AppResult<Vec<ActivityLog>> {
        user.ensure_department_access(department, self.state.departments())?;
        self.logs
            .list_by_department(department, query.effective_limit())
            .await
    }
}
