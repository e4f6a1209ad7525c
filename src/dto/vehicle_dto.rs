use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::vehicle::{Vehicle, VehicleDraft, VehicleSituation};
use crate::utils::validation::{
    into_result, non_empty, normalize_license_plate, push_field_error, validate_date,
    validate_license_plate, validate_vehicle_year,
};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    #[validate(length(min = 1, max = 120))]
    pub model: String,
    pub department: String,
    pub situation: Option<VehicleSituation>,
    #[validate(length(max = 120))]
    pub driver_name: Option<String>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub route: Option<String>,
    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
    #[validate(range(min = 0))]
    pub next_change_mileage: Option<i64>,
    /// `YYYY-MM-DD`
    pub last_review_date: Option<String>,
    pub notes: Option<String>,
}

impl CreateVehicleRequest {
    pub fn into_draft(self, departments: &[String]) -> Result<VehicleDraft, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        push_field_error(&mut errors, "department", validate_department(&self.department, departments));
        if let Some(year) = self.year {
            push_field_error(&mut errors, "year", validate_vehicle_year(year));
        }
        let last_review_date = match non_empty(self.last_review_date) {
            Some(value) => match validate_date(&value) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.add("last_review_date", e);
                    None
                }
            },
            None => None,
        };
        into_result(errors)?;

        Ok(VehicleDraft {
            license_plate: normalize_license_plate(&self.license_plate),
            model: self.model.trim().to_string(),
            department: self.department,
            situation: self.situation.unwrap_or_default(),
            driver_name: non_empty(self.driver_name),
            registration_number: non_empty(self.registration_number),
            chassis_number: non_empty(self.chassis_number),
            color: non_empty(self.color),
            year: self.year,
            route: non_empty(self.route),
            current_mileage: self.current_mileage.unwrap_or(0),
            next_change_mileage: self.next_change_mileage.unwrap_or(0),
            last_review_date,
            notes: non_empty(self.notes),
        })
    }
}

/// Request para actualizar un vehículo.
///
/// Los campos ausentes conservan su valor; un string vacío borra los
/// campos opcionales.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub model: Option<String>,
    pub department: Option<String>,
    pub situation: Option<VehicleSituation>,
    #[validate(length(max = 120))]
    pub driver_name: Option<String>,
    pub registration_number: Option<String>,
    pub chassis_number: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub route: Option<String>,
    #[validate(range(min = 0))]
    pub current_mileage: Option<i64>,
    #[validate(range(min = 0))]
    pub next_change_mileage: Option<i64>,
    pub last_review_date: Option<String>,
    pub notes: Option<String>,
}

impl UpdateVehicleRequest {
    pub fn apply(self, current: &Vehicle, departments: &[String]) -> Result<VehicleDraft, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let mut draft = VehicleDraft::from_vehicle(current);

        if let Some(department) = self.department {
            push_field_error(&mut errors, "department", validate_department(&department, departments));
            draft.department = department;
        }
        if let Some(year) = self.year {
            push_field_error(&mut errors, "year", validate_vehicle_year(year));
            draft.year = Some(year);
        }
        if let Some(value) = self.last_review_date {
            draft.last_review_date = match non_empty(Some(value)) {
                Some(value) => match validate_date(&value) {
                    Ok(date) => Some(date),
                    Err(e) => {
                        errors.add("last_review_date", e);
                        None
                    }
                },
                None => None,
            };
        }
        into_result(errors)?;

        if let Some(plate) = self.license_plate {
            draft.license_plate = normalize_license_plate(&plate);
        }
        if let Some(model) = self.model {
            draft.model = model.trim().to_string();
        }
        if let Some(situation) = self.situation {
            draft.situation = situation;
        }
        if let Some(mileage) = self.current_mileage {
            draft.current_mileage = mileage;
        }
        if let Some(mileage) = self.next_change_mileage {
            draft.next_change_mileage = mileage;
        }
        replace_optional(&mut draft.driver_name, self.driver_name);
        replace_optional(&mut draft.registration_number, self.registration_number);
        replace_optional(&mut draft.chassis_number, self.chassis_number);
        replace_optional(&mut draft.color, self.color);
        replace_optional(&mut draft.route, self.route);
        replace_optional(&mut draft.notes, self.notes);

        Ok(draft)
    }
}

fn replace_optional(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = non_empty(value);
    }
}

/// El departamento debe estar en la lista configurada
pub fn validate_department(department: &str, departments: &[String]) -> Result<(), ValidationError> {
    if departments.iter().any(|d| d == department) {
        Ok(())
    } else {
        let mut error = ValidationError::new("department");
        error.add_param("value".into(), &department.to_string());
        Err(error)
    }
}
