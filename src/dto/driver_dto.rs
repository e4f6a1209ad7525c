use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::dto::vehicle_dto::validate_department;
use crate::models::driver::{Driver, DriverDraft};
use crate::utils::validation::{into_result, non_empty, push_field_error, validate_date};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 30))]
    pub license_number: String,
    #[validate(length(min = 1, max = 5))]
    pub license_category: String,
    /// `YYYY-MM-DD`
    pub license_expiration: Option<String>,
    pub department: String,
}

impl CreateDriverRequest {
    pub fn into_draft(self, departments: &[String]) -> Result<DriverDraft, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        push_field_error(&mut errors, "department", validate_department(&self.department, departments));
        let license_expiration = match non_empty(self.license_expiration) {
            Some(value) => match validate_date(&value) {
                Ok(date) => Some(date),
                Err(e) => {
                    errors.add("license_expiration", e);
                    None
                }
            },
            None => None,
        };
        into_result(errors)?;

        Ok(DriverDraft {
            name: self.name.trim().to_string(),
            license_number: self.license_number.trim().to_string(),
            license_category: self.license_category.trim().to_uppercase(),
            license_expiration,
            department: self.department,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub license_number: Option<String>,
    #[validate(length(min = 1, max = 5))]
    pub license_category: Option<String>,
    /// String vacío borra la fecha
    pub license_expiration: Option<String>,
    pub department: Option<String>,
}

impl UpdateDriverRequest {
    pub fn apply(self, current: &Driver, departments: &[String]) -> Result<DriverDraft, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        let mut draft = DriverDraft::from_driver(current);

        if let Some(department) = self.department {
            push_field_error(&mut errors, "department", validate_department(&department, departments));
            draft.department = department;
        }
        if let Some(value) = self.license_expiration {
            draft.license_expiration = match non_empty(Some(value)) {
                Some(value) => match validate_date(&value) {
                    Ok(date) => Some(date),
                    Err(e) => {
                        errors.add("license_expiration", e);
                        None
                    }
                },
                None => None,
            };
        }
        into_result(errors)?;

        if let Some(name) = self.name {
            draft.name = name.trim().to_string();
        }
        if let Some(number) = self.license_number {
            draft.license_number = number.trim().to_string();
        }
        if let Some(category) = self.license_category {
            draft.license_category = category.trim().to_uppercase();
        }
        Ok(draft)
    }
}
