//! Modelo de VehicleDocument

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Documento adjunto a un vehículo; el contenido vive en el blob store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleDocument {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub name: String,
    pub url: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVehicleDocument {
    pub name: String,
    pub url: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_by: String,
}
