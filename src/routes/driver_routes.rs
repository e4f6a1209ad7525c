use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::services::fleet_filters::DriverView;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new().route("/", post(create_driver)).route(
        "/:id",
        get(get_driver).put(update_driver).delete(delete_driver),
    )
}

async fn create_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<ApiResponse<DriverView>>, AppError> {
    let controller = DriverController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn get_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverView>, AppError> {
    let controller = DriverController::new(&state);
    let response = controller.get(&user, id).await?;
    Ok(Json(response))
}

async fn update_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<ApiResponse<DriverView>>, AppError> {
    let controller = DriverController::new(&state);
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DriverController::new(&state);
    let response = controller.delete(&user, id).await?;
    Ok(Json(response))
}
