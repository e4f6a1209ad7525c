use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Extension, Json, Router,
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{error, warn};

use crate::controllers::department_controller::DepartmentController;
use crate::dto::department_dto::{ActivityLogQuery, DepartmentListResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityLog;
use crate::models::alert::Alert;
use crate::services::fleet_filters::{
    DepartmentSnapshot, DriverFilters, DriverView, Page, VehicleFilters, VehicleView,
};
use crate::services::live_updates::Refresh;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_department_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments))
        .route("/:department/vehicles", get(list_vehicles))
        .route("/:department/drivers", get(list_drivers))
        .route("/:department/alerts", get(department_alerts))
        .route("/:department/snapshot", get(department_snapshot))
        .route("/:department/live", get(live_snapshots))
        .route("/:department/logs", get(activity_logs))
}

pub fn create_alert_router() -> Router<AppState> {
    Router::new().route("/", get(all_alerts))
}

async fn list_departments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<DepartmentListResponse> {
    let controller = DepartmentController::new(&state);
    Json(DepartmentListResponse {
        departments: controller.visible_departments(&user),
    })
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Page<VehicleView>>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.vehicles(&user, &department, &filters).await?;
    Ok(Json(response))
}

async fn list_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
    Query(filters): Query<DriverFilters>,
) -> Result<Json<Page<DriverView>>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.drivers(&user, &department, &filters).await?;
    Ok(Json(response))
}

async fn department_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.alerts(&user, &department).await?;
    Ok(Json(response))
}

async fn all_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.all_alerts(&user).await?;
    Ok(Json(response))
}

async fn department_snapshot(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
) -> Result<Json<DepartmentSnapshot>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.snapshot(&user, &department).await?;
    Ok(Json(response))
}

/// Stream SSE: una instantánea inicial y otra nueva tras cada cambio del
/// departamento. La suscripción se abre antes de leer la primera
/// instantánea para no perder cambios intermedios.
async fn live_snapshots(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    user.ensure_department_access(&department, state.departments())?;

    let refreshes = state.live.department_refreshes(department.clone());
    let initial = DepartmentController::new(&state)
        .load_snapshot(&department)
        .await?;

    let updates = refreshes.then(move |refresh| {
        let state = state.clone();
        let department = department.clone();
        async move {
            if let Refresh::Lagged(skipped) = refresh {
                warn!(department = %department, skipped, "Suscriptor en vivo atrasado, resincronizando");
            }
            match DepartmentController::new(&state).load_snapshot(&department).await {
                Ok(snapshot) => snapshot_event(&snapshot),
                Err(e) => {
                    error!(department = %department, "Error al refrescar la instantánea: {}", e);
                    Event::default().event("error").data(e.to_string())
                }
            }
        }
    });

    let events = stream::once(async move { snapshot_event(&initial) })
        .chain(updates)
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn snapshot_event(snapshot: &DepartmentSnapshot) -> Event {
    Event::default()
        .event("snapshot")
        .json_data(snapshot)
        .unwrap_or_else(|e| {
            error!("No se pudo serializar la instantánea: {}", e);
            Event::default().event("error").data("serialization error")
        })
}

async fn activity_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(department): Path<String>,
    Query(query): Query<ActivityLogQuery>,
) -> Result<Json<Vec<ActivityLog>>, AppError> {
    let controller = DepartmentController::new(&state);
    let response = controller.activity_logs(&user, &department, &query).await?;
    Ok(Json(response))
}
