use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::CreateUserRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserProfile;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(create_user))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.list_users(&user).await?;
    Ok(Json(response))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.create_user(&user, request).await?;
    Ok(Json(response))
}
