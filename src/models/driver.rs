//! Modelo de Driver

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Conductor - mapea a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub license_category: String,
    pub license_expiration: Option<NaiveDate>,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverDraft {
    pub name: String,
    pub license_number: String,
    pub license_category: String,
    pub license_expiration: Option<NaiveDate>,
    pub department: String,
}

impl DriverDraft {
    pub fn from_driver(driver: &Driver) -> Self {
        Self {
            name: driver.name.clone(),
            license_number: driver.license_number.clone(),
            license_category: driver.license_category.clone(),
            license_expiration: driver.license_expiration,
            department: driver.department.clone(),
        }
    }
}
