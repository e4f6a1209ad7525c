use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use http::header;

use crate::controllers::report_controller::ReportController;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::report::CostReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/costs", get(cost_report))
        .route("/fleet.csv", get(fleet_csv))
}

async fn cost_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CostReport>, AppError> {
    let controller = ReportController::new(&state);
    let response = controller.costs(&user).await?;
    Ok(Json(response))
}

async fn fleet_csv(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, AppError> {
    let controller = ReportController::new(&state);
    let export = controller.fleet_csv(&user).await?;

    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}
