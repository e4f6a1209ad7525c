use crate::middleware::auth::AuthenticatedUser;
use crate::models::report::CostReport;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::cost_report::{fleet_csv, fleet_export_file_name};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Exportación lista para enviar como descarga
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ReportController {
    maintenance: MaintenanceRepository,
    vehicles: VehicleRepository,
    state: AppState,
}

impl ReportController {
    pub fn new(state: &AppState) -> Self {
        Self {
            maintenance: MaintenanceRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    /// Costos por departamento visible, calculados desde los registros
    pub async fn costs(&self, user: &AuthenticatedUser) -> AppResult<CostReport> {
        let departments = user.profile().visible_departments(self.state.departments());
        let rows = if departments.is_empty() {
            Vec::new()
        } else {
            self.maintenance.cost_by_department(&departments).await?
        };
        Ok(CostReport::new(self.state.today(), rows))
    }

    pub async fn fleet_csv(&self, user: &AuthenticatedUser) -> AppResult<CsvExport> {
        let departments = user.profile().visible_departments(self.state.departments());
        let vehicles = if departments.is_empty() {
            Vec::new()
        } else {
            self.vehicles.list_by_departments(&departments).await?
        };

        tracing::info!(vehicles = vehicles.len(), user = %user.email(), "Exportación CSV de la flota");

        Ok(CsvExport {
            file_name: fleet_export_file_name(self.state.today()),
            bytes: fleet_csv(&vehicles)?,
        })
    }
}
