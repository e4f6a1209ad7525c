//! Modelo de Alert
//!
//! Alertas derivadas, nunca persistidas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ReviewOverdue,
    MileageOverdue,
    MileageDueSoon,
    LicenseExpired,
    LicenseExpiringSoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertEntity {
    Vehicle,
    Driver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub kind: AlertKind,
    pub entity: AlertEntity,
    pub entity_id: Uuid,
    /// Matrícula o nombre del conductor
    pub label: String,
    pub department: String,
    pub message: String,
    /// Ruta de navegación del departamento
    pub target: String,
}
