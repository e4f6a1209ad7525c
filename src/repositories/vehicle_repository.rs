use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleDraft};
use crate::utils::errors::{conflict_error, is_unique_violation, AppError, AppResult};

/// Resultado de recalcular el costo total cacheado
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CostReconciliation {
    pub vehicle_id: Uuid,
    pub previous_total: Decimal,
    pub recomputed_total: Decimal,
    pub drift: Decimal,
}

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &VehicleDraft) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, license_plate, model, department, situation, driver_name,
                registration_number, chassis_number, color, year, route,
                current_mileage, next_change_mileage, last_review_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.license_plate)
        .bind(&draft.model)
        .bind(&draft.department)
        .bind(draft.situation)
        .bind(&draft.driver_name)
        .bind(&draft.registration_number)
        .bind(&draft.chassis_number)
        .bind(&draft.color)
        .bind(draft.year)
        .bind(&draft.route)
        .bind(draft.current_mileage)
        .bind(draft.next_change_mileage)
        .bind(draft.last_review_date)
        .bind(&draft.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| plate_conflict(e, &draft.license_plate))?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_by_department(&self, department: &str) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE department = $1 ORDER BY license_plate",
        )
        .bind(department)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn list_by_departments(&self, departments: &[String]) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE department = ANY($1) ORDER BY department, license_plate",
        )
        .bind(departments)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, id: Uuid, draft: &VehicleDraft) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                license_plate = $2, model = $3, department = $4, situation = $5,
                driver_name = $6, registration_number = $7, chassis_number = $8,
                color = $9, year = $10, route = $11, current_mileage = $12,
                next_change_mileage = $13, last_review_date = $14, notes = $15,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.license_plate)
        .bind(&draft.model)
        .bind(&draft.department)
        .bind(draft.situation)
        .bind(&draft.driver_name)
        .bind(&draft.registration_number)
        .bind(&draft.chassis_number)
        .bind(&draft.color)
        .bind(draft.year)
        .bind(&draft.route)
        .bind(draft.current_mileage)
        .bind(draft.next_change_mileage)
        .bind(draft.last_review_date)
        .bind(&draft.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| plate_conflict(e, &draft.license_plate))?;

        Ok(vehicle)
    }

    pub async fn set_image(
        &self,
        id: Uuid,
        image_url: Option<&str>,
        image_key: Option<&str>,
    ) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET image_url = $2, image_key = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(image_url)
        .bind(image_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Borra documentos y registros de mantenimiento del vehículo en una
    /// sola transacción y deja el costo cacheado en cero.
    pub async fn delete_children(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM vehicle_documents WHERE vehicle_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM maintenance_records WHERE vehicle_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE vehicles SET total_cost = 0, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Recalcula `total_cost` desde los registros de mantenimiento
    pub async fn reconcile_total_cost(&self, id: Uuid) -> AppResult<Option<CostReconciliation>> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<Decimal> =
            sqlx::query_scalar("SELECT total_cost FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(previous_total) = previous else {
            return Ok(None);
        };

        let recomputed_total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(parts_cost + labor_cost), 0) FROM maintenance_records WHERE vehicle_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET total_cost = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(recomputed_total)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(CostReconciliation {
            vehicle_id: id,
            previous_total,
            recomputed_total,
            drift: previous_total - recomputed_total,
        }))
    }
}

fn plate_conflict(error: sqlx::Error, plate: &str) -> AppError {
    if is_unique_violation(&error) {
        conflict_error("Vehicle", "license_plate", plate)
    } else {
        AppError::Database(error)
    }
}
