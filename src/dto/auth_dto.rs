use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{UserProfile, UserRole};

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserProfile,
    pub departments: Vec<String>,
}

/// Perfil actual con sus departamentos visibles
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
    pub departments: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: UserRole,
    pub department: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
}
