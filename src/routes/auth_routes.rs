use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, MeResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `/login` es público; `/me` exige token
pub fn create_auth_router(state: &AppState) -> Router<AppState> {
    Router::new().route("/login", post(login)).route(
        "/me",
        get(me).route_layer(from_fn_with_state(state.clone(), auth_middleware)),
    )
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MeResponse>, AppError> {
    let controller = AuthController::new(&state);
    let response = controller.me(&user).await?;
    Ok(Json(response))
}
