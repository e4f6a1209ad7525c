use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::routes::{document_routes, maintenance_routes, upload::read_file_field};
use crate::services::fleet_filters::VehicleView;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route(
            "/:id",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
        .route("/:id/image", put(upload_image).delete(remove_image))
        .merge(maintenance_routes::create_maintenance_router())
        .merge(document_routes::create_document_router())
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleView>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<VehicleView>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.get(&user, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleView>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.update(&user, id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.delete(&user, id).await?;
    Ok(Json(response))
}

async fn upload_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<VehicleView>>, AppError> {
    let file = read_file_field(multipart).await?;
    let controller = VehicleController::new(&state);
    let response = controller.upload_image(&user, id, file).await?;
    Ok(Json(response))
}

async fn remove_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<VehicleView>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.remove_image(&user, id).await?;
    Ok(Json(response))
}
