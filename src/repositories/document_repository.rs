use sqlx::PgPool;
use uuid::Uuid;

use crate::models::document::{NewVehicleDocument, VehicleDocument};
use crate::utils::errors::AppResult;

pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<VehicleDocument>> {
        let documents = sqlx::query_as::<_, VehicleDocument>(
            "SELECT * FROM vehicle_documents WHERE vehicle_id = $1 ORDER BY created_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    pub async fn find(&self, vehicle_id: Uuid, document_id: Uuid) -> AppResult<Option<VehicleDocument>> {
        let document = sqlx::query_as::<_, VehicleDocument>(
            "SELECT * FROM vehicle_documents WHERE id = $1 AND vehicle_id = $2",
        )
        .bind(document_id)
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    pub async fn create(&self, vehicle_id: Uuid, document: &NewVehicleDocument) -> AppResult<VehicleDocument> {
        let created = sqlx::query_as::<_, VehicleDocument>(
            r#"
            INSERT INTO vehicle_documents (id, vehicle_id, name, url, storage_key, content_type, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(&document.name)
        .bind(&document.url)
        .bind(&document.storage_key)
        .bind(&document.content_type)
        .bind(document.size_bytes)
        .bind(&document.uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn delete(&self, document_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicle_documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
