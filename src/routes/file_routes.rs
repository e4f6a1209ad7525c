use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use http::header;

use crate::services::storage::content_type_for;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Archivos públicos del almacenamiento local; la URL guardada en cada
/// documento o imagen apunta aquí.
pub fn create_file_router() -> Router<AppState> {
    Router::new().route("/*key", get(serve_file))
}

async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.storage.get(&key).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&key)),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        bytes,
    )
        .into_response())
}
