//! Modelos de reportes de costos

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fila agregada por departamento, calculada desde los registros de mantenimiento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DepartmentCost {
    pub department: String,
    pub vehicle_count: i64,
    pub total_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub generated_on: NaiveDate,
    pub departments: Vec<DepartmentCost>,
    pub vehicle_count: i64,
    pub grand_total: Decimal,
}

impl CostReport {
    pub fn new(generated_on: NaiveDate, mut departments: Vec<DepartmentCost>) -> Self {
        departments.sort_by(|a, b| a.department.cmp(&b.department));
        let vehicle_count = departments.iter().map(|d| d.vehicle_count).sum();
        let grand_total = departments.iter().map(|d| d.total_cost).sum();
        Self {
            generated_on,
            departments,
            vehicle_count,
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cost_report_totals_and_order() {
        let rows = vec![
            DepartmentCost {
                department: "SAUDE".to_string(),
                vehicle_count: 3,
                total_cost: Decimal::from_str("1500.00").unwrap(),
            },
            DepartmentCost {
                department: "OBRAS".to_string(),
                vehicle_count: 2,
                total_cost: Decimal::from_str("320.40").unwrap(),
            },
        ];
        let report = CostReport::new(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(), rows);

        assert_eq!(report.departments[0].department, "OBRAS");
        assert_eq!(report.vehicle_count, 5);
        assert_eq!(report.grand_total, Decimal::from_str("1820.40").unwrap());
    }
}
