use std::sync::Arc;

use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::ActivityAction;
use crate::models::vehicle::Vehicle;
use crate::repositories::document_repository::DocumentRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::activity_logger::ActivityLogger;
use crate::services::fleet_filters::VehicleView;
use crate::services::live_updates::{ChangeKind, LiveEvent, LiveEventBroadcaster};
use crate::services::storage::{vehicle_image_key, BlobStore, StorageError};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

/// Archivo recibido por multipart
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct VehicleController {
    repository: VehicleRepository,
    documents: DocumentRepository,
    logger: ActivityLogger,
    storage: Arc<dyn BlobStore>,
    live: LiveEventBroadcaster,
    state: AppState,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: VehicleRepository::new(state.pool.clone()),
            documents: DocumentRepository::new(state.pool.clone()),
            logger: ActivityLogger::new(state.pool.clone()),
            storage: state.storage.clone(),
            live: state.live.clone(),
            state: state.clone(),
        }
    }

    /// Vehículo existente y visible para el usuario
    pub async fn find_visible(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<Vehicle> {
        find_visible_vehicle(&self.repository, &self.state, user, id).await
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleView>> {
        let draft = request.into_draft(self.state.departments())?;
        user.ensure_can_write_department(&draft.department, self.state.departments())?;

        let vehicle = self.repository.create(&draft).await?;
        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "Vehículo creado");

        self.logger
            .record(
                user,
                ActivityAction::CreateVehicle,
                format!("Vehículo {} registrado", vehicle.license_plate),
                &vehicle.department,
                Some(vehicle.id),
            )
            .await;
        self.notify(&vehicle);

        Ok(ApiResponse::success_with_message(
            VehicleView::new(vehicle, self.state.today()),
            "Vehículo creado exitosamente",
        ))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<VehicleView> {
        let vehicle = self.find_visible(user, id).await?;
        Ok(VehicleView::new(vehicle, self.state.today()))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleView>> {
        let current = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        let draft = request.apply(&current, self.state.departments())?;
        if draft.department != current.department {
            user.ensure_can_write_department(&draft.department, self.state.departments())?;
        }

        let vehicle = self
            .repository
            .update(id, &draft)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        self.logger
            .record(
                user,
                ActivityAction::UpdateVehicle,
                format!("Vehículo {} actualizado", vehicle.license_plate),
                &vehicle.department,
                Some(vehicle.id),
            )
            .await;
        if current.department != vehicle.department {
            self.notify(&current);
        }
        self.notify(&vehicle);

        Ok(ApiResponse::success_with_message(
            VehicleView::new(vehicle, self.state.today()),
            "Vehículo actualizado exitosamente",
        ))
    }

    /// Borrado en cascada: blobs de documentos, filas hijas, imagen y vehículo
    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<ApiResponse<()>> {
        let vehicle = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        for document in self.documents.list_by_vehicle(id).await? {
            delete_blob_best_effort(self.storage.as_ref(), &document.storage_key).await;
        }
        self.repository.delete_children(id).await?;

        if let Some(key) = &vehicle.image_key {
            delete_blob_best_effort(self.storage.as_ref(), key).await;
        }

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }
        tracing::info!(vehicle_id = %id, plate = %vehicle.license_plate, "Vehículo eliminado");

        self.logger
            .record(
                user,
                ActivityAction::DeleteVehicle,
                format!("Vehículo {} eliminado", vehicle.license_plate),
                &vehicle.department,
                Some(vehicle.id),
            )
            .await;
        self.notify(&vehicle);

        Ok(ApiResponse::message("Vehículo eliminado exitosamente"))
    }

    /// Reemplaza la imagen; la anterior se borra después de guardar la nueva
    pub async fn upload_image(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        file: UploadedFile,
    ) -> AppResult<ApiResponse<VehicleView>> {
        let current = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        if file.bytes.is_empty() {
            return Err(bad_request_error("El archivo está vacío"));
        }
        if !file.content_type.starts_with("image/") {
            return Err(bad_request_error("La imagen debe ser de tipo image/*"));
        }

        let key = vehicle_image_key(id, &file.file_name);
        let url = self.storage.put(&key, file.bytes, &file.content_type).await?;

        let saved = self.repository.set_image(id, Some(&url), Some(&key)).await;
        let vehicle = discard_blob_unless_saved(self.storage.as_ref(), &key, saved, || {
            not_found_error("Vehicle", &id.to_string())
        })
        .await?;

        if let Some(previous) = &current.image_key {
            delete_blob_best_effort(self.storage.as_ref(), previous).await;
        }

        self.logger
            .record(
                user,
                ActivityAction::UpdateVehicleImage,
                format!("Imagen del vehículo {} actualizada", vehicle.license_plate),
                &vehicle.department,
                Some(vehicle.id),
            )
            .await;
        self.notify(&vehicle);

        Ok(ApiResponse::success_with_message(
            VehicleView::new(vehicle, self.state.today()),
            "Imagen actualizada exitosamente",
        ))
    }

    pub async fn remove_image(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> AppResult<ApiResponse<VehicleView>> {
        let current = self.find_visible(user, id).await?;
        user.ensure_can_write()?;

        let vehicle = self
            .repository
            .set_image(id, None, None)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if let Some(previous) = &current.image_key {
            delete_blob_best_effort(self.storage.as_ref(), previous).await;
        }

        self.logger
            .record(
                user,
                ActivityAction::UpdateVehicleImage,
                format!("Imagen del vehículo {} eliminada", vehicle.license_plate),
                &vehicle.department,
                Some(vehicle.id),
            )
            .await;
        self.notify(&vehicle);

        Ok(ApiResponse::success_with_message(
            VehicleView::new(vehicle, self.state.today()),
            "Imagen eliminada exitosamente",
        ))
    }

    fn notify(&self, vehicle: &Vehicle) {
        self.live
            .publish(LiveEvent::new(ChangeKind::Vehicle, &vehicle.department, vehicle.id));
    }
}

/// Carga un vehículo y verifica que su departamento sea visible.
///
/// Un vehículo de otro departamento responde 403, no 404.
pub async fn find_visible_vehicle(
    repository: &VehicleRepository,
    state: &AppState,
    user: &AuthenticatedUser,
    id: Uuid,
) -> AppResult<Vehicle> {
    let vehicle = repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;
    user.ensure_department_access(&vehicle.department, state.departments())?;
    Ok(vehicle)
}

/// Resultado de guardar la fila que referencia un blob recién subido.
///
/// Si la fila no se guardó (error o entidad inexistente) el blob se borra.
pub async fn discard_blob_unless_saved<T>(
    storage: &dyn BlobStore,
    key: &str,
    saved: AppResult<Option<T>>,
    missing: impl FnOnce() -> AppError,
) -> AppResult<T> {
    let error = match saved {
        Ok(Some(row)) => return Ok(row),
        Ok(None) => missing(),
        Err(e) => e,
    };
    delete_blob_best_effort(storage, key).await;
    Err(error)
}

/// Borrar un blob sin hacer fallar la operación; un blob inexistente sólo avisa
pub async fn delete_blob_best_effort(storage: &dyn BlobStore, key: &str) {
    match storage.delete(key).await {
        Ok(()) => {}
        Err(StorageError::NotFound(_)) => {
            tracing::warn!(key = %key, "El archivo ya no existía en el almacenamiento");
        }
        Err(e) => {
            tracing::error!(key = %key, "No se pudo eliminar el archivo: {}", e);
        }
    }
}
