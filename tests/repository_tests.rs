//! Pruebas contra PostgreSQL: costos acumulados, conciliación y borrado en
//! cascada. Requieren `DATABASE_URL`; cada prueba recibe su propia base.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tempfile::TempDir;
use uuid::Uuid;

use fleet_manager::config::environment::EnvironmentConfig;
use fleet_manager::controllers::document_controller::DocumentController;
use fleet_manager::controllers::vehicle_controller::{UploadedFile, VehicleController};
use fleet_manager::middleware::auth::AuthenticatedUser;
use fleet_manager::models::maintenance::NewMaintenanceRecord;
use fleet_manager::models::user::{UserProfile, UserRole};
use fleet_manager::models::vehicle::{VehicleDraft, VehicleSituation};
use fleet_manager::repositories::document_repository::DocumentRepository;
use fleet_manager::repositories::maintenance_repository::MaintenanceRepository;
use fleet_manager::repositories::vehicle_repository::VehicleRepository;
use fleet_manager::services::clock::FixedClock;
use fleet_manager::services::storage::{BlobStore, LocalStorage, StorageError};
use fleet_manager::state::AppState;
use fleet_manager::utils::errors::AppError;

fn draft(plate: &str) -> VehicleDraft {
    VehicleDraft {
        license_plate: plate.to_string(),
        model: "Fiat Strada".to_string(),
        department: "SAUDE".to_string(),
        situation: VehicleSituation::Active,
        driver_name: None,
        registration_number: None,
        chassis_number: None,
        color: None,
        year: Some(2020),
        route: None,
        current_mileage: 10_000,
        next_change_mileage: 15_000,
        last_review_date: None,
        notes: None,
    }
}

fn record(parts_cents: i64, labor_cents: i64) -> NewMaintenanceRecord {
    NewMaintenanceRecord {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        description: "Troca de óleo".to_string(),
        parts_cost: Decimal::new(parts_cents, 2),
        labor_cost: Decimal::new(labor_cents, 2),
    }
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser(UserProfile {
        id: Uuid::new_v4(),
        email: "admin@frota.test".to_string(),
        role: UserRole::Admin,
        department: None,
        departments: Vec::new(),
    })
}

fn image(name: &str) -> UploadedFile {
    UploadedFile {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

async fn app_state(pool: PgPool, files: &TempDir) -> (AppState, LocalStorage) {
    let config = EnvironmentConfig::default();
    let storage = LocalStorage::new(files.path(), config.files_base_url())
        .await
        .unwrap();
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()));
    let state = AppState::new(pool, config, Arc::new(storage.clone()), clock);
    (state, storage)
}

async fn count(pool: &PgPool, table: &str, vehicle_id: Uuid) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE vehicle_id = $1", table))
        .bind(vehicle_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_total_cost_follows_record_deletion(pool: PgPool) {
    let vehicles = VehicleRepository::new(pool.clone());
    let maintenance = MaintenanceRepository::new(pool.clone());

    let vehicle = vehicles.create(&draft("ABC1D23")).await.unwrap();
    let first = maintenance.create(vehicle.id, &record(10_000, 5_035)).await.unwrap();
    maintenance.create(vehicle.id, &record(1_005, 0)).await.unwrap();

    let stored = vehicles.find_by_id(vehicle.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cost, Decimal::new(16_040, 2));
    assert_eq!(stored.situation, VehicleSituation::InMaintenance);

    let removed = maintenance.delete(vehicle.id, first.id).await.unwrap();
    assert_eq!(removed.map(|r| r.id), Some(first.id));

    let stored = vehicles.find_by_id(vehicle.id).await.unwrap().unwrap();
    let remaining: Decimal = maintenance
        .list_by_vehicle(vehicle.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.total())
        .sum();
    assert_eq!(stored.total_cost, Decimal::new(1_005, 2));
    assert_eq!(stored.total_cost, remaining);
    // Borrar un registro no devuelve el vehículo a activo
    assert_eq!(stored.situation, VehicleSituation::InMaintenance);

    let reconciliation = vehicles.reconcile_total_cost(vehicle.id).await.unwrap().unwrap();
    assert_eq!(reconciliation.drift, Decimal::ZERO);
    assert_eq!(reconciliation.recomputed_total, Decimal::new(1_005, 2));

    let costs = maintenance
        .cost_by_department(&["SAUDE".to_string()])
        .await
        .unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].department, "SAUDE");
    assert_eq!(costs[0].vehicle_count, 1);
    assert_eq!(costs[0].total_cost, Decimal::new(1_005, 2));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_record_of_other_vehicle_is_not_deleted(pool: PgPool) {
    let vehicles = VehicleRepository::new(pool.clone());
    let maintenance = MaintenanceRepository::new(pool.clone());

    let owner = vehicles.create(&draft("ABC1D23")).await.unwrap();
    let other = vehicles.create(&draft("XYZ9K87")).await.unwrap();
    let kept = maintenance.create(owner.id, &record(2_000, 1_000)).await.unwrap();

    assert!(maintenance.delete(other.id, kept.id).await.unwrap().is_none());

    let stored = vehicles.find_by_id(owner.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cost, Decimal::new(3_000, 2));
    assert_eq!(count(&pool, "maintenance_records", owner.id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reconcile_repairs_drift(pool: PgPool) {
    let vehicles = VehicleRepository::new(pool.clone());
    let maintenance = MaintenanceRepository::new(pool.clone());

    let vehicle = vehicles.create(&draft("ABC1D23")).await.unwrap();
    maintenance.create(vehicle.id, &record(4_000, 1_000)).await.unwrap();

    sqlx::query("UPDATE vehicles SET total_cost = 75 WHERE id = $1")
        .bind(vehicle.id)
        .execute(&pool)
        .await
        .unwrap();

    let reconciliation = vehicles.reconcile_total_cost(vehicle.id).await.unwrap().unwrap();
    assert_eq!(reconciliation.previous_total, Decimal::from(75));
    assert_eq!(reconciliation.recomputed_total, Decimal::from(50));
    assert_eq!(reconciliation.drift, Decimal::from(25));

    let stored = vehicles.find_by_id(vehicle.id).await.unwrap().unwrap();
    assert_eq!(stored.total_cost, Decimal::from(50));

    assert!(vehicles.reconcile_total_cost(Uuid::new_v4()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_plate_is_conflict(pool: PgPool) {
    let vehicles = VehicleRepository::new(pool);

    vehicles.create(&draft("ABC1D23")).await.unwrap();
    let result = vehicles.create(&draft("ABC1D23")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_vehicle_cascades_rows_and_blobs(pool: PgPool) {
    let files = TempDir::new().unwrap();
    let (state, storage) = app_state(pool.clone(), &files).await;
    let user = admin();

    let vehicle = VehicleRepository::new(pool.clone())
        .create(&draft("ABC1D23"))
        .await
        .unwrap();
    MaintenanceRepository::new(pool.clone())
        .create(vehicle.id, &record(10_000, 0))
        .await
        .unwrap();

    let document = DocumentController::new(&state)
        .upload(
            &user,
            vehicle.id,
            UploadedFile {
                file_name: "crlv.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF-1.4".to_vec(),
            },
        )
        .await
        .unwrap()
        .data
        .unwrap();

    let controller = VehicleController::new(&state);
    let with_image = controller
        .upload_image(&user, vehicle.id, image("frente.png"))
        .await
        .unwrap()
        .data
        .unwrap();
    let image_key = with_image.vehicle.image_key.clone().unwrap();

    assert!(storage.get(&document.storage_key).await.is_ok());
    assert!(storage.get(&image_key).await.is_ok());

    controller.delete(&user, vehicle.id).await.unwrap();

    let repository = VehicleRepository::new(pool.clone());
    assert!(repository.find_by_id(vehicle.id).await.unwrap().is_none());
    assert_eq!(count(&pool, "maintenance_records", vehicle.id).await, 0);
    assert!(DocumentRepository::new(pool.clone())
        .list_by_vehicle(vehicle.id)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        storage.get(&document.storage_key).await,
        Err(StorageError::NotFound(_))
    ));
    assert!(matches!(storage.get(&image_key).await, Err(StorageError::NotFound(_))));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replacing_image_removes_previous_blob(pool: PgPool) {
    let files = TempDir::new().unwrap();
    let (state, storage) = app_state(pool.clone(), &files).await;
    let user = admin();

    let vehicle = VehicleRepository::new(pool)
        .create(&draft("ABC1D23"))
        .await
        .unwrap();
    let controller = VehicleController::new(&state);

    let first = controller
        .upload_image(&user, vehicle.id, image("frente.png"))
        .await
        .unwrap()
        .data
        .unwrap();
    let second = controller
        .upload_image(&user, vehicle.id, image("lateral.png"))
        .await
        .unwrap()
        .data
        .unwrap();

    let old_key = first.vehicle.image_key.unwrap();
    let new_key = second.vehicle.image_key.unwrap();
    assert_ne!(old_key, new_key);
    assert!(matches!(storage.get(&old_key).await, Err(StorageError::NotFound(_))));
    assert!(storage.get(&new_key).await.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_image_is_rejected(pool: PgPool) {
    let files = TempDir::new().unwrap();
    let (state, _storage) = app_state(pool.clone(), &files).await;

    let vehicle = VehicleRepository::new(pool.clone())
        .create(&draft("ABC1D23"))
        .await
        .unwrap();

    let empty = UploadedFile {
        bytes: Vec::new(),
        ..image("vazia.png")
    };
    let result = VehicleController::new(&state)
        .upload_image(&admin(), vehicle.id, empty)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    let stored = VehicleRepository::new(pool).find_by_id(vehicle.id).await.unwrap().unwrap();
    assert!(stored.image_key.is_none());
}
