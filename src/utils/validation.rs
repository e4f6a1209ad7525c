//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos usadas por los DTOs.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

/// Año mínimo aceptado para un vehículo
pub const MIN_VEHICLE_YEAR: i32 = 1950;

lazy_static! {
    /// Formato antiguo (AAA9999) y Mercosur (AAA9A99)
    static ref LICENSE_PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z]{3}[0-9][0-9A-Z][0-9]{2}$").expect("license plate regex");
}

/// Normalizar matrícula: mayúsculas, sin guiones ni espacios
pub fn normalize_license_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_uppercase()
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let plate = normalize_license_plate(value);
    if !LICENSE_PLATE_REGEX.is_match(&plate) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"AAA9999 or AAA9A99".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un importe no sea negativo
pub fn validate_non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar el año de fabricación (hasta el año siguiente al actual)
pub fn validate_vehicle_year(value: i32) -> Result<(), ValidationError> {
    let max_year = chrono::Utc::now().year() + 1;
    if !(MIN_VEHICLE_YEAR..=max_year).contains(&value) {
        let mut error = ValidationError::new("year");
        error.add_param("min".into(), &MIN_VEHICLE_YEAR);
        error.add_param("max".into(), &max_year);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Acumular el error de un campo en un `ValidationErrors`
pub fn push_field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<(), ValidationError>,
) {
    if let Err(error) = result {
        errors.add(field, error);
    }
}

/// Convertir un acumulado de errores en `Result`
pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Convertir strings vacíos en `None`
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
