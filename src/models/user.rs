//! Modelo de User
//!
//! Perfiles de usuario con rol y departamentos visibles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Viewer,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Viewer => "viewer",
            UserRole::User => "user",
        }
    }

    /// Sólo admin y manager pueden modificar registros
    pub fn can_write(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub departments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Perfil sin credenciales; es lo que viaja en el JWT y en las respuestas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub departments: Vec<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Departamentos visibles, ordenados.
    ///
    /// Admin ve todos los configurados; el resto ve `departments` o, si está
    /// vacío, su departamento principal.
    pub fn visible_departments(&self, all_departments: &[String]) -> Vec<String> {
        let mut visible: Vec<String> = if self.is_admin() {
            all_departments.to_vec()
        } else if !self.departments.is_empty() {
            self.departments.clone()
        } else {
            self.department.iter().cloned().collect()
        };
        visible.sort();
        visible.dedup();
        visible
    }

    pub fn can_access(&self, department: &str, all_departments: &[String]) -> bool {
        if self.is_admin() {
            return true;
        }
        self.visible_departments(all_departments)
            .iter()
            .any(|d| d == department)
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            department: user.department,
            departments: user.departments,
        }
    }
}
