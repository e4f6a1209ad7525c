use uuid::Uuid;

use crate::controllers::vehicle_controller::find_visible_vehicle;
use crate::dto::maintenance_dto::{CreateMaintenanceRequest, MaintenanceHistoryResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityAction;
use crate::models::maintenance::MaintenanceRecord;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::vehicle_repository::{CostReconciliation, VehicleRepository};
use crate::services::activity_logger::ActivityLogger;
use crate::services::live_updates::{ChangeKind, LiveEvent};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub struct MaintenanceController {
    repository: MaintenanceRepository,
    vehicles: VehicleRepository,
    logger: ActivityLogger,
    state: AppState,
}

impl MaintenanceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: MaintenanceRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            logger: ActivityLogger::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    /// Historial (fecha desc) con totales de piezas, mano de obra y general
    pub async fn list(&self, user: &AuthenticatedUser, vehicle_id: Uuid) -> AppResult<MaintenanceHistoryResponse> {
        find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        let records = self.repository.list_by_vehicle(vehicle_id).await?;
        Ok(MaintenanceHistoryResponse::new(records))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
        request: CreateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        let vehicle = find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        user.ensure_can_write()?;

        let new_record = request.into_new_record()?;
        let record = self.repository.create(vehicle_id, &new_record).await?;

        tracing::info!(
            vehicle_id = %vehicle_id,
            record_id = %record.id,
            total = %record.total(),
            "Mantenimiento registrado"
        );

        self.logger
            .record(
                user,
                ActivityAction::CreateMaintenance,
                format!(
                    "Mantenimiento en {}: {} (R$ {:.2})",
                    vehicle.license_plate,
                    record.description,
                    record.total()
                ),
                &vehicle.department,
                Some(vehicle_id),
            )
            .await;
        self.state.live.publish(LiveEvent::new(
            ChangeKind::Maintenance,
            &vehicle.department,
            vehicle_id,
        ));

        Ok(ApiResponse::success_with_message(
            record,
            "Mantenimiento registrado exitosamente",
        ))
    }

    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<ApiResponse<()>> {
        let vehicle = find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        user.ensure_can_write()?;

        let record = self
            .repository
            .delete(vehicle_id, record_id)
            .await?
            .ok_or_else(|| not_found_error("MaintenanceRecord", &record_id.to_string()))?;

        self.logger
            .record(
                user,
                ActivityAction::DeleteMaintenance,
                format!(
                    "Mantenimiento eliminado en {}: {} (R$ {:.2})",
                    vehicle.license_plate,
                    record.description,
                    record.total()
                ),
                &vehicle.department,
                Some(vehicle_id),
            )
            .await;
        self.state.live.publish(LiveEvent::new(
            ChangeKind::Maintenance,
            &vehicle.department,
            vehicle_id,
        ));

        Ok(ApiResponse::message("Mantenimiento eliminado exitosamente"))
    }

    /// Recalcula el costo total cacheado y reporta la diferencia encontrada
    pub async fn reconcile(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
    ) -> AppResult<ApiResponse<CostReconciliation>> {
        let vehicle = find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        user.ensure_can_write()?;

        let reconciliation = self
            .vehicles
            .reconcile_total_cost(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        if !reconciliation.drift.is_zero() {
            tracing::warn!(
                vehicle_id = %vehicle_id,
                drift = %reconciliation.drift,
                "Costo total cacheado desincronizado; corregido"
            );
            self.logger
                .record(
                    user,
                    ActivityAction::ReconcileCosts,
                    format!(
                        "Costo total de {} recalculado: {:.2} -> {:.2}",
                        vehicle.license_plate,
                        reconciliation.previous_total,
                        reconciliation.recomputed_total
                    ),
                    &vehicle.department,
                    Some(vehicle_id),
                )
                .await;
            self.state.live.publish(LiveEvent::new(
                ChangeKind::Vehicle,
                &vehicle.department,
                vehicle_id,
            ));
        }

        Ok(ApiResponse::success(reconciliation))
    }
}
