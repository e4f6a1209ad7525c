use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{CreateMaintenanceRequest, MaintenanceHistoryResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::maintenance::MaintenanceRecord;
use crate::repositories::vehicle_repository::CostReconciliation;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas anidadas bajo `/api/vehicles`
pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/maintenance",
            get(list_maintenance).post(create_maintenance),
        )
        .route("/:id/maintenance/:record_id", delete(delete_maintenance))
        .route("/:id/costs/reconcile", post(reconcile_costs))
}

async fn list_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaintenanceHistoryResponse>, AppError> {
    let controller = MaintenanceController::new(&state);
    let response = controller.list(&user, id).await?;
    Ok(Json(response))
}

async fn create_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(&state);
    let response = controller.create(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, record_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MaintenanceController::new(&state);
    let response = controller.delete(&user, id, record_id).await?;
    Ok(Json(response))
}

async fn reconcile_costs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CostReconciliation>>, AppError> {
    let controller = MaintenanceController::new(&state);
    let response = controller.reconcile(&user, id).await?;
    Ok(Json(response))
}
