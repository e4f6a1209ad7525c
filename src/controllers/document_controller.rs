use uuid::Uuid;

use crate::controllers::vehicle_controller::{
    delete_blob_best_effort, discard_blob_unless_saved, find_visible_vehicle, UploadedFile,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityAction;
use crate::models::document::{NewVehicleDocument, VehicleDocument};
use crate::repositories::document_repository::DocumentRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::activity_logger::ActivityLogger;
use crate::services::live_updates::{ChangeKind, LiveEvent};
use crate::services::storage::document_key;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

pub struct DocumentController {
    repository: DocumentRepository,
    vehicles: VehicleRepository,
    logger: ActivityLogger,
    state: AppState,
}

impl DocumentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: DocumentRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            logger: ActivityLogger::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub async fn list(&self, user: &AuthenticatedUser, vehicle_id: Uuid) -> AppResult<Vec<VehicleDocument>> {
        find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        self.repository.list_by_vehicle(vehicle_id).await
    }

    pub async fn upload(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
        file: UploadedFile,
    ) -> AppResult<ApiResponse<VehicleDocument>> {
        let vehicle = find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        user.ensure_can_write()?;

        if file.bytes.is_empty() {
            return Err(bad_request_error("El archivo está vacío"));
        }
        let max = self.state.config.max_upload_bytes;
        if file.bytes.len() > max {
            return Err(AppError::PayloadTooLarge(format!(
                "El archivo supera el límite de {} MB",
                max / (1024 * 1024)
            )));
        }

        let key = document_key(vehicle_id, &file.file_name);
        let size_bytes = file.bytes.len() as i64;
        let url = self.state.storage.put(&key, file.bytes, &file.content_type).await?;

        let new_document = NewVehicleDocument {
            name: file.file_name,
            url,
            storage_key: key.clone(),
            content_type: file.content_type,
            size_bytes,
            uploaded_by: user.email().to_string(),
        };

        let saved = self.repository.create(vehicle_id, &new_document).await.map(Some);
        let document = discard_blob_unless_saved(self.state.storage.as_ref(), &key, saved, || {
            not_found_error("Vehicle", &vehicle_id.to_string())
        })
        .await?;

        self.logger
            .record(
                user,
                ActivityAction::UploadDocument,
                format!("Documento '{}' adjuntado a {}", document.name, vehicle.license_plate),
                &vehicle.department,
                Some(vehicle_id),
            )
            .await;
        self.state.live.publish(LiveEvent::new(
            ChangeKind::Document,
            &vehicle.department,
            vehicle_id,
        ));

        Ok(ApiResponse::success_with_message(
            document,
            "Documento subido exitosamente",
        ))
    }

    /// El blob se borra en modo best-effort; la fila se borra siempre
    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Uuid,
        document_id: Uuid,
    ) -> AppResult<ApiResponse<()>> {
        let vehicle = find_visible_vehicle(&self.vehicles, &self.state, user, vehicle_id).await?;
        user.ensure_can_write()?;

        let document = self
            .repository
            .find(vehicle_id, document_id)
            .await?
            .ok_or_else(|| not_found_error("Document", &document_id.to_string()))?;

        delete_blob_best_effort(self.state.storage.as_ref(), &document.storage_key).await;
        self.repository.delete(document.id).await?;

        self.logger
            .record(
                user,
                ActivityAction::DeleteDocument,
                format!("Documento '{}' eliminado de {}", document.name, vehicle.license_plate),
                &vehicle.department,
                Some(vehicle_id),
            )
            .await;
        self.state.live.publish(LiveEvent::new(
            ChangeKind::Document,
            &vehicle.department,
            vehicle_id,
        ));

        Ok(ApiResponse::message("Documento eliminado exitosamente"))
    }
}
