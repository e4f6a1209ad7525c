use sqlx::PgPool;
use uuid::Uuid;

use crate::models::maintenance::{MaintenanceRecord, NewMaintenanceRecord};
use crate::models::report::DepartmentCost;
use crate::models::vehicle::VehicleSituation;
use crate::utils::errors::AppResult;

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE vehicle_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Inserta el registro, suma su costo al vehículo y lo pasa a
    /// `in_maintenance`, todo en la misma transacción.
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        record: &NewMaintenanceRecord,
    ) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (id, vehicle_id, date, description, parts_cost, labor_cost)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_id)
        .bind(record.date)
        .bind(&record.description)
        .bind(record.parts_cost)
        .bind(record.labor_cost)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE vehicles
            SET total_cost = total_cost + $2, situation = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(vehicle_id)
        .bind(created.total())
        .bind(VehicleSituation::InMaintenance)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Elimina el registro y descuenta su costo; `None` si no pertenece al vehículo
    pub async fn delete(
        &self,
        vehicle_id: Uuid,
        record_id: Uuid,
    ) -> AppResult<Option<MaintenanceRecord>> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, MaintenanceRecord>(
            "DELETE FROM maintenance_records WHERE id = $1 AND vehicle_id = $2 RETURNING *",
        )
        .bind(record_id)
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(record) = &deleted {
            sqlx::query(
                "UPDATE vehicles SET total_cost = total_cost - $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(vehicle_id)
            .bind(record.total())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    /// Costos por departamento calculados desde los registros
    pub async fn cost_by_department(&self, departments: &[String]) -> AppResult<Vec<DepartmentCost>> {
        let rows = sqlx::query_as::<_, DepartmentCost>(
            r#"
            SELECT v.department,
                   COUNT(DISTINCT v.id) AS vehicle_count,
                   COALESCE(SUM(m.parts_cost + m.labor_cost), 0) AS total_cost
            FROM vehicles v
            LEFT JOIN maintenance_records m ON m.vehicle_id = v.id
            WHERE v.department = ANY($1)
            GROUP BY v.department
            ORDER BY v.department
            "#,
        )
        .bind(departments)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
