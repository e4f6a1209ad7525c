//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y las comprobaciones de permisos sobre el usuario autenticado.

use axum::{
    extract::{Query, Request, State},
    http::{header, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    models::user::UserProfile,
    state::AppState,
    utils::{
        errors::{forbidden_error, AppError},
        jwt::{extract_token_from_header, verify_token, JwtClaims},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserProfile);

impl AuthenticatedUser {
    pub fn profile(&self) -> &UserProfile {
        &self.0
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn id(&self) -> Uuid {
        self.0.id
    }

    /// 403 si el departamento no es visible para el usuario
    pub fn ensure_department_access(&self, department: &str, all: &[String]) -> Result<(), AppError> {
        if self.0.can_access(department, all) {
            Ok(())
        } else {
            Err(forbidden_error(
                "access department",
                &format!("'{}' is not visible for this user", department),
            ))
        }
    }

    /// 403 salvo para admin y manager
    pub fn ensure_can_write(&self) -> Result<(), AppError> {
        if self.0.role.can_write() {
            Ok(())
        } else {
            Err(forbidden_error(
                "modify records",
                &format!("role '{}' is read-only", self.0.role.as_str()),
            ))
        }
    }

    pub fn ensure_admin(&self) -> Result<(), AppError> {
        if self.0.is_admin() {
            Ok(())
        } else {
            Err(forbidden_error("manage users", "admin role required"))
        }
    }

    /// Escritura sobre un registro de un departamento visible
    pub fn ensure_can_write_department(&self, department: &str, all: &[String]) -> Result<(), AppError> {
        self.ensure_department_access(department, all)?;
        self.ensure_can_write()
    }
}

impl TryFrom<JwtClaims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: JwtClaims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;
        Ok(Self(UserProfile {
            id,
            email: claims.email,
            role: claims.role,
            department: claims.department,
            departments: claims.departments,
        }))
    }
}

/// Middleware de autenticación JWT.
///
/// Acepta `Authorization: Bearer <token>` y, para clientes EventSource que
/// no pueden enviar cabeceras, el parámetro `access_token`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => extract_token_from_header(value)?.to_string(),
        None => query_token(request.uri())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?,
    };

    let claims = verify_token(&token, &state.jwt_config())?;
    let user = AuthenticatedUser::try_from(claims)?;

    tracing::debug!(user = %user.email(), role = user.profile().role.as_str(), "Usuario autenticado");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Parámetro `access_token` de la query string
#[derive(Debug, Deserialize)]
struct AccessTokenQuery {
    access_token: Option<String>,
}

fn query_token(uri: &Uri) -> Option<String> {
    Query::<AccessTokenQuery>::try_from_uri(uri)
        .ok()?
        .0
        .access_token
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn user(role: UserRole, departments: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser(UserProfile {
            id: Uuid::new_v4(),
            email: "gestor@prefeitura.test".to_string(),
            role,
            department: None,
            departments: departments.iter().map(|d| d.to_string()).collect(),
        })
    }

    #[test]
    fn test_department_access() {
        let all = vec!["SAUDE".to_string(), "OBRAS".to_string()];
        let manager = user(UserRole::Manager, &["SAUDE"]);
        assert!(manager.ensure_department_access("SAUDE", &all).is_ok());
        assert!(matches!(
            manager.ensure_department_access("OBRAS", &all),
            Err(AppError::Forbidden(_))
        ));
        assert!(manager.ensure_can_write_department("SAUDE", &all).is_ok());
    }

    #[test]
    fn test_viewer_cannot_write() {
        let all = vec!["SAUDE".to_string()];
        let viewer = user(UserRole::Viewer, &["SAUDE"]);
        assert!(viewer.ensure_department_access("SAUDE", &all).is_ok());
        assert!(matches!(
            viewer.ensure_can_write_department("SAUDE", &all),
            Err(AppError::Forbidden(_))
        ));
        assert!(viewer.ensure_admin().is_err());
    }

    #[test]
    fn test_query_token() {
        let uri = |q: &str| q.parse::<Uri>().unwrap();
        assert_eq!(query_token(&uri("/live?a=1&access_token=abc%2Edef")), Some("abc.def".to_string()));
        assert_eq!(query_token(&uri("/live?access_token=a+b")), Some("a b".to_string()));
        assert_eq!(query_token(&uri("/live?access_token=")), None);
        assert_eq!(query_token(&uri("/live")), None);
    }
}
