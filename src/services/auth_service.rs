//! Servicio de autenticación
//!
//! Credenciales locales (bcrypt) y emisión de JWT. También crea el
//! administrador inicial cuando la tabla de usuarios está vacía.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::environment::BootstrapAdmin;
use crate::models::user::{User, UserProfile, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Verificar credenciales y emitir un token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, UserProfile)> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(email = %email, "Intento de login con contraseña incorrecta");
            return Err(invalid_credentials());
        }

        let profile = UserProfile::from(user);
        let token = generate_token(&profile, &self.jwt)?;
        info!(email = %profile.email, role = profile.role.as_str(), "Login exitoso");
        Ok((token, profile))
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
        department: Option<&str>,
        departments: &[String],
    ) -> AppResult<User> {
        let password_hash = hash_password(password)?;
        self.users
            .create(&normalize_email(email), &password_hash, role, department, departments)
            .await
    }

    pub async fn find_profile(&self, id: uuid::Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.users.find_by_id(id).await?.map(UserProfile::from))
    }

    pub async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        Ok(self.users.list().await?.into_iter().map(UserProfile::from).collect())
    }

    /// Crear el administrador inicial si no existe ningún usuario
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> AppResult<bool> {
        if self.users.count().await? > 0 {
            return Ok(false);
        }
        self.create_user(&admin.email, &admin.password, UserRole::Admin, None, &[])
            .await?;
        info!("👤 Administrador inicial creado: {}", admin.email);
        Ok(true)
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    verify(password, password_hash).map_err(|e| AppError::Hash(e.to_string()))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Credenciales inválidas".to_string())
}
