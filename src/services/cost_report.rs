//! Reportes de costos y exportación de la flota
//!
//! La exportación tabular es CSV: matrícula, modelo, departamento,
//! situación, costo total, kilometraje actual y fecha de la última
//! revisión (`dd/mm/yyyy` o `N/D`).

use chrono::NaiveDate;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::{AppError, AppResult};

pub const FLEET_CSV_HEADERS: [&str; 7] = [
    "Matrícula",
    "Modelo",
    "Departamento",
    "Situación",
    "Costo Total",
    "KM Actual",
    "Última Revisión",
];

pub fn fleet_export_file_name(today: NaiveDate) -> String {
    format!("reporte_flota_{}.csv", today.format("%Y-%m-%d"))
}

/// Serializar los vehículos a CSV, en el orden recibido
pub fn fleet_csv(vehicles: &[Vehicle]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(FLEET_CSV_HEADERS).map_err(csv_error)?;

    for vehicle in vehicles {
        let last_review = vehicle
            .last_review_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "N/D".to_string());

        writer
            .write_record([
                vehicle.license_plate.as_str(),
                vehicle.model.as_str(),
                vehicle.department.as_str(),
                vehicle.situation.label(),
                format!("{:.2}", vehicle.total_cost).as_str(),
                vehicle.current_mileage.to_string().as_str(),
                last_review.as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Error generando CSV: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("Error generando CSV: {}", e))
}
