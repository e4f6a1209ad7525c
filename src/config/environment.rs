//! Configuración de variables de entorno
//!
//! Este módulo carga la configuración del servicio desde el entorno
//! (`.env` vía dotenvy en `main`). Todo tiene valor por defecto salvo
//! `DATABASE_URL`, y `JWT_SECRET` en producción.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;

/// Departamentos municipales por defecto
pub const DEFAULT_DEPARTMENTS: [&str; 9] = [
    "SEMED",
    "SAUDE",
    "A. SOCIAL",
    "OBRAS",
    "GCM",
    "HGDO",
    "SEMASU",
    "PMM",
    "CONSELHO TUTELAR",
];

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-me";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub storage_path: String,
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub departments: Vec<String>,
    pub timezone: Tz,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credenciales del primer administrador, creado si no hay usuarios
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            jwt_expiration: 86_400,
            cors_origins: Vec::new(),
            storage_path: "./storage".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
            timezone: chrono_tz::America::Sao_Paulo,
            bootstrap_admin: None,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => {
                return Err(anyhow!("JWT_SECRET must be set in production"));
            }
            _ => defaults.jwt_secret,
        };

        let timezone = match env::var("FLEET_TIMEZONE") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow!("FLEET_TIMEZONE '{}' is not a valid IANA zone: {}", name, e))?,
            Err(_) => defaults.timezone,
        };

        let departments = env::var("FLEET_DEPARTMENTS")
            .map(|value| split_list(&value))
            .ok()
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.departments);

        let bootstrap_admin = match (
            env::var("BOOTSTRAP_ADMIN_EMAIL"),
            env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    email: email.trim().to_lowercase(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            environment,
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|value| split_list(&value))
                .unwrap_or_default(),
            storage_path: env::var("STORAGE_PATH").unwrap_or(defaults.storage_path),
            public_base_url: env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            departments,
            timezone,
            bootstrap_admin,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base pública de los archivos servidos en `/files`
    pub fn files_base_url(&self) -> String {
        format!("{}/files", self.public_base_url.trim_end_matches('/'))
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert_eq!(config.departments.len(), 9);
        assert!(config.departments.contains(&"A. SOCIAL".to_string()));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.files_base_url(), "http://localhost:3000/files");
    }

    #[test]
    fn test_split_list_skips_blanks() {
        assert_eq!(split_list(" SEMED, ,OBRAS ,"), vec!["SEMED", "OBRAS"]);
    }
}
