use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::maintenance::{MaintenanceRecord, MaintenanceTotals, NewMaintenanceRecord};
use crate::utils::validation::{into_result, push_field_error, validate_date, validate_non_negative_amount};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[serde(default)]
    pub parts_cost: Decimal,
    #[serde(default)]
    pub labor_cost: Decimal,
}

impl CreateMaintenanceRequest {
    pub fn into_new_record(self) -> Result<NewMaintenanceRecord, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        push_field_error(&mut errors, "parts_cost", validate_non_negative_amount(&self.parts_cost));
        push_field_error(&mut errors, "labor_cost", validate_non_negative_amount(&self.labor_cost));
        let date = match validate_date(&self.date) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.add("date", e);
                None
            }
        };
        into_result(errors)?;

        let Some(date) = date else {
            return Err(ValidationErrors::new());
        };

        Ok(NewMaintenanceRecord {
            date,
            description: self.description.trim().to_string(),
            parts_cost: self.parts_cost,
            labor_cost: self.labor_cost,
        })
    }
}

/// Historial de mantenimiento de un vehículo con sus totales
#[derive(Debug, Serialize)]
pub struct MaintenanceHistoryResponse {
    pub records: Vec<MaintenanceRecord>,
    pub totals: MaintenanceTotals,
}

impl MaintenanceHistoryResponse {
    pub fn new(records: Vec<MaintenanceRecord>) -> Self {
        let totals = MaintenanceTotals::from_records(&records);
        Self { records, totals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_negative_costs_are_rejected() {
        let request = CreateMaintenanceRequest {
            date: "2024-05-02".to_string(),
            description: "Troca de pastilhas".to_string(),
            parts_cost: Decimal::from_str("-10").unwrap(),
            labor_cost: Decimal::ZERO,
        };
        let errors = request.into_new_record().unwrap_err();
        assert!(errors.field_errors().contains_key("parts_cost"));
        assert!(!errors.field_errors().contains_key("labor_cost"));
    }

    #[test]
    fn test_valid_record() {
        let request: CreateMaintenanceRequest = serde_json::from_value(serde_json::json!({
            "date": "2024-05-02",
            "description": "Alinhamento",
            "parts_cost": "150.00",
            "labor_cost": 80
        }))
        .unwrap();
        let record = request.into_new_record().unwrap();
        assert_eq!(record.parts_cost, Decimal::from_str("150.00").unwrap());
        assert_eq!(record.labor_cost, Decimal::from(80));
    }
}
