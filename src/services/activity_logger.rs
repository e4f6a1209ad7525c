//! Registro de actividad
//!
//! Cada mutación deja una entrada en el historial del departamento. Un
//! fallo al registrar se informa por tracing y nunca hace fallar la
//! operación que lo originó.

use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::activity_log::{ActivityAction, NewActivityLog};
use crate::repositories::activity_log_repository::ActivityLogRepository;

pub struct ActivityLogger {
    repository: ActivityLogRepository,
}

impl ActivityLogger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ActivityLogRepository::new(pool),
        }
    }

    pub async fn record(
        &self,
        user: &AuthenticatedUser,
        action: ActivityAction,
        description: impl Into<String>,
        department: &str,
        target_id: Option<Uuid>,
    ) {
        let entry = NewActivityLog {
            action,
            description: description.into(),
            department: department.to_string(),
            target_id,
            user_id: Some(user.id()),
            user_email: user.email().to_string(),
        };

        if let Err(e) = self.repository.insert(&entry).await {
            tracing::warn!(
                action = action.as_str(),
                department = %department,
                "No se pudo registrar la actividad: {}",
                e
            );
        }
    }
}
