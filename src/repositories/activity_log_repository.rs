use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity_log::{ActivityLog, NewActivityLog};
use crate::utils::errors::AppResult;

/// Historial append-only: no hay update ni delete
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &NewActivityLog) -> AppResult<ActivityLog> {
        let log = sqlx::query_as::<_, ActivityLog>(
            r#"
            INSERT INTO activity_logs (id, action, description, department, target_id, user_id, user_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.action.as_str())
        .bind(&entry.description)
        .bind(&entry.department)
        .bind(entry.target_id)
        .bind(entry.user_id)
        .bind(&entry.user_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    pub async fn list_by_department(&self, department: &str, limit: i64) -> AppResult<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT * FROM activity_logs
            WHERE department = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(department)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
