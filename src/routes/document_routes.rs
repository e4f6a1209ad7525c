use axum::{
    extract::{Multipart, Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::document::VehicleDocument;
use crate::routes::upload::read_file_field;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas anidadas bajo `/api/vehicles`
pub fn create_document_router() -> Router<AppState> {
    Router::new()
        .route("/:id/documents", get(list_documents).post(upload_document))
        .route("/:id/documents/:document_id", delete(delete_document))
}

async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<VehicleDocument>>, AppError> {
    let controller = DocumentController::new(&state);
    let response = controller.list(&user, id).await?;
    Ok(Json(response))
}

async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<VehicleDocument>>, AppError> {
    let file = read_file_field(multipart).await?;
    let controller = DocumentController::new(&state);
    let response = controller.upload(&user, id, file).await?;
    Ok(Json(response))
}

async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, document_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DocumentController::new(&state);
    let response = controller.delete(&user, id, document_id).await?;
    Ok(Json(response))
}
