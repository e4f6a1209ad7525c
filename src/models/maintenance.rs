//! Modelo de MaintenanceRecord
//!
//! Registros de mantenimiento; su ciclo de vida está acotado por el vehículo.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub parts_cost: Decimal,
    pub labor_cost: Decimal,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    /// Costo total del registro (piezas + mano de obra)
    pub fn total(&self) -> Decimal {
        self.parts_cost + self.labor_cost
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceRecord {
    pub date: NaiveDate,
    pub description: String,
    pub parts_cost: Decimal,
    pub labor_cost: Decimal,
}

/// Totales acumulados de un conjunto de registros
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTotals {
    pub parts: Decimal,
    pub labor: Decimal,
    pub total: Decimal,
}

impl MaintenanceTotals {
    pub fn from_records(records: &[MaintenanceRecord]) -> Self {
        let parts: Decimal = records.iter().map(|r| r.parts_cost).sum();
        let labor: Decimal = records.iter().map(|r| r.labor_cost).sum();
        Self {
            parts,
            labor,
            total: parts + labor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(parts: &str, labor: &str) -> MaintenanceRecord {
        MaintenanceRecord {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            description: "Troca de óleo".to_string(),
            parts_cost: Decimal::from_str(parts).unwrap(),
            labor_cost: Decimal::from_str(labor).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_from_records() {
        let records = vec![record("120.50", "80.00"), record("0", "45.25")];
        let totals = MaintenanceTotals::from_records(&records);

        assert_eq!(totals.parts, Decimal::from_str("120.50").unwrap());
        assert_eq!(totals.labor, Decimal::from_str("125.25").unwrap());
        assert_eq!(totals.total, Decimal::from_str("245.75").unwrap());
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(MaintenanceTotals::from_records(&[]), MaintenanceTotals::default());
    }
}
