use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::{Driver, DriverDraft};
use crate::utils::errors::AppResult;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &DriverDraft) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, name, license_number, license_category, license_expiration, department)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.license_number)
        .bind(&draft.license_category)
        .bind(draft.license_expiration)
        .bind(&draft.department)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn list_by_department(&self, department: &str) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE department = $1 ORDER BY name",
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn list_by_departments(&self, departments: &[String]) -> AppResult<Vec<Driver>> {
        let drivers = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE department = ANY($1) ORDER BY department, name",
        )
        .bind(departments)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    pub async fn update(&self, id: Uuid, draft: &DriverDraft) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET
                name = $2, license_number = $3, license_category = $4,
                license_expiration = $5, department = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.license_number)
        .bind(&draft.license_category)
        .bind(draft.license_expiration)
        .bind(&draft.department)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
