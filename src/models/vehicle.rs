//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su borrador para operaciones CRUD.
//! Mapea exactamente a la tabla `vehicles`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Situación del vehículo - mapea al ENUM vehicle_situation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_situation", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleSituation {
    Active,
    InMaintenance,
    AwaitingParts,
    Stopped,
}

impl VehicleSituation {
    /// Etiqueta legible usada en exportaciones
    pub fn label(&self) -> &'static str {
        match self {
            VehicleSituation::Active => "Activo",
            VehicleSituation::InMaintenance => "En mantenimiento",
            VehicleSituation::AwaitingParts => "Esperando piezas",
            VehicleSituation::Stopped => "Parado",
        }
    }
}

impl Default for VehicleSituation {
    fn default() -> Self {
        VehicleSituation::Active
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub model: String,
    pub department: String,
    pub situation: VehicleSituation,
    pub driver_name: Option<String>,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub route: Option<String>,
    pub current_mileage: i64,
    pub next_change_mileage: i64,
    pub last_review_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Agregado cacheado de los registros de mantenimiento
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos editables de un vehículo, ya validados y normalizados
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub license_plate: String,
    pub model: String,
    pub department: String,
    pub situation: VehicleSituation,
    pub driver_name: Option<String>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub route: Option<String>,
    pub current_mileage: i64,
    pub next_change_mileage: i64,
    pub last_review_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl VehicleDraft {
    /// Borrador con los valores actuales de un vehículo existente
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            license_plate: vehicle.license_plate.clone(),
            model: vehicle.model.clone(),
            department: vehicle.department.clone(),
            situation: vehicle.situation,
            driver_name: vehicle.driver_name.clone(),
            registration_number: vehicle.registration_number.clone(),
            chassis_number: vehicle.chassis_number.clone(),
            color: vehicle.color.clone(),
            year: vehicle.year,
            route: vehicle.route.clone(),
            current_mileage: vehicle.current_mileage,
            next_change_mileage: vehicle.next_change_mileage,
            last_review_date: vehicle.last_review_date,
            notes: vehicle.notes.clone(),
        }
    }
}
