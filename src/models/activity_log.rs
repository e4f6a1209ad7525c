//! Modelo de ActivityLog
//!
//! Historial de cambios por departamento. Sólo se inserta; nunca se
//! modifica ni se elimina.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Acciones registradas en el historial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    CreateVehicle,
    UpdateVehicle,
    DeleteVehicle,
    UpdateVehicleImage,
    CreateMaintenance,
    DeleteMaintenance,
    ReconcileCosts,
    UploadDocument,
    DeleteDocument,
    CreateDriver,
    UpdateDriver,
    DeleteDriver,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::CreateVehicle => "create_vehicle",
            ActivityAction::UpdateVehicle => "update_vehicle",
            ActivityAction::DeleteVehicle => "delete_vehicle",
            ActivityAction::UpdateVehicleImage => "update_vehicle_image",
            ActivityAction::CreateMaintenance => "create_maintenance",
            ActivityAction::DeleteMaintenance => "delete_maintenance",
            ActivityAction::ReconcileCosts => "reconcile_costs",
            ActivityAction::UploadDocument => "upload_document",
            ActivityAction::DeleteDocument => "delete_document",
            ActivityAction::CreateDriver => "create_driver",
            ActivityAction::UpdateDriver => "update_driver",
            ActivityAction::DeleteDriver => "delete_driver",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    pub id: Uuid,
    pub action: String,
    pub description: String,
    pub department: String,
    pub target_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub action: ActivityAction,
    pub description: String,
    pub department: String,
    pub target_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub user_email: String,
}
