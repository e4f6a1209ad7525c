//! Agregador de alertas
//!
//! Recorre las instantáneas de vehículos y conductores, aplica el
//! clasificador y produce la lista de alertas operacionales. Puro y
//! re-derivable: sin deduplicación ni persistencia.

use chrono::NaiveDate;

use crate::models::alert::{Alert, AlertEntity, AlertKind};
use crate::models::driver::Driver;
use crate::models::status::Severity;
use crate::models::vehicle::Vehicle;
use crate::services::status_classifier::{
    days_until, driver_license_status, mileage_status, next_review_due, review_status,
};

/// Ruta de navegación de un departamento
pub fn department_target(department: &str) -> String {
    format!("/departamentos/{}", urlencoding::encode(department))
}

/// Alertas de un vehículo: revisión vencida y/o kilometraje (0, 1 o 2)
pub fn vehicle_alerts(vehicle: &Vehicle, today: NaiveDate) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if review_status(vehicle.last_review_date, today) == Severity::Error {
        let overdue_days = vehicle
            .last_review_date
            .and_then(next_review_due)
            .map(|due| -days_until(due, today))
            .unwrap_or_default();
        alerts.push(vehicle_alert(
            vehicle,
            Severity::Error,
            AlertKind::ReviewOverdue,
            format!("Revisión vencida hace {} días", overdue_days),
        ));
    }

    let mileage = mileage_status(vehicle.current_mileage, vehicle.next_change_mileage);
    match mileage.status {
        Severity::Error => alerts.push(vehicle_alert(
            vehicle,
            Severity::Error,
            AlertKind::MileageOverdue,
            format!("Cambio por kilometraje: {}", mileage.text),
        )),
        Severity::Warning => alerts.push(vehicle_alert(
            vehicle,
            Severity::Warning,
            AlertKind::MileageDueSoon,
            format!("Cambio por kilometraje: {}", mileage.text),
        )),
        Severity::Ok => {}
    }

    alerts
}

/// Alerta de licencia de un conductor (vencida o por vencer)
pub fn driver_alert(driver: &Driver, today: NaiveDate) -> Option<Alert> {
    let severity = driver_license_status(driver.license_expiration, today);
    let days_left = driver
        .license_expiration
        .map(|exp| days_until(exp, today))
        .unwrap_or_default();

    let (kind, message) = match severity {
        Severity::Ok => return None,
        Severity::Error => (
            AlertKind::LicenseExpired,
            format!("Licencia de conducir vencida hace {} días", -days_left),
        ),
        Severity::Warning => (
            AlertKind::LicenseExpiringSoon,
            format!("Licencia de conducir vence en {} días", days_left),
        ),
    };

    Some(Alert {
        severity,
        kind,
        entity: AlertEntity::Driver,
        entity_id: driver.id,
        label: driver.name.clone(),
        department: driver.department.clone(),
        message,
        target: department_target(&driver.department),
    })
}

/// Todas las alertas de las instantáneas, ordenadas por severidad (error
/// primero), departamento, etiqueta e id.
pub fn aggregate_alerts(vehicles: &[Vehicle], drivers: &[Driver], today: NaiveDate) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = vehicles
        .iter()
        .flat_map(|vehicle| vehicle_alerts(vehicle, today))
        .chain(drivers.iter().filter_map(|driver| driver_alert(driver, today)))
        .collect();

    alerts.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.department.cmp(&b.department))
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    alerts
}

fn vehicle_alert(vehicle: &Vehicle, severity: Severity, kind: AlertKind, message: String) -> Alert {
    Alert {
        severity,
        kind,
        entity: AlertEntity::Vehicle,
        entity_id: vehicle.id,
        label: vehicle.license_plate.clone(),
        department: vehicle.department.clone(),
        message,
        target: department_target(&vehicle.department),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::vehicle::VehicleSituation;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    pub(crate) fn vehicle(
        plate: &str,
        department: &str,
        last_review: Option<NaiveDate>,
        current: i64,
        next: i64,
    ) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            license_plate: plate.to_string(),
            model: "Fiat Strada".to_string(),
            department: department.to_string(),
            situation: VehicleSituation::Active,
            driver_name: None,
            image_url: None,
            image_key: None,
            registration_number: None,
            chassis_number: None,
            color: None,
            year: Some(2020),
            route: None,
            current_mileage: current,
            next_change_mileage: next,
            last_review_date: last_review,
            notes: None,
            total_cost: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn driver(name: &str, department: &str, expiration: Option<NaiveDate>) -> Driver {
        Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            license_number: "12345678900".to_string(),
            license_category: "B".to_string(),
            license_expiration: expiration,
            department: department.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn test_department_target_is_url_encoded() {
        assert_eq!(department_target("SAUDE"), "/departamentos/SAUDE");
        assert_eq!(department_target("A. SOCIAL"), "/departamentos/A.%20SOCIAL");
    }

    #[test]
    fn test_three_vehicles_two_drivers_scenario() {
        let today = today();
        let vehicles = vec![
            vehicle("ABC1D23", "SAUDE", NaiveDate::from_ymd_opt(2024, 1, 1), 5_000, 50_000),
            vehicle("DEF4567", "SAUDE", NaiveDate::from_ymd_opt(2024, 6, 1), 14_500, 15_000),
            vehicle("GHI8J90", "SAUDE", NaiveDate::from_ymd_opt(2024, 6, 1), 1_000, 15_000),
        ];
        let drivers = vec![
            driver("Ana", "SAUDE", Some(today - Duration::days(3))),
            driver("Bruno", "SAUDE", Some(today + Duration::days(200))),
        ];

        let alerts = aggregate_alerts(&vehicles, &drivers, today);
        assert_eq!(alerts.len(), 3);

        // errores primero, por etiqueta
        assert_eq!(alerts[0].label, "ABC1D23");
        assert_eq!(alerts[0].kind, AlertKind::ReviewOverdue);
        assert_eq!(alerts[0].severity, Severity::Error);
        assert_eq!(alerts[1].label, "Ana");
        assert_eq!(alerts[1].kind, AlertKind::LicenseExpired);
        assert_eq!(alerts[1].entity, AlertEntity::Driver);
        assert_eq!(alerts[2].label, "DEF4567");
        assert_eq!(alerts[2].severity, Severity::Warning);
        assert!(alerts[2].message.contains("500"));

        for alert in &alerts {
            assert_eq!(alert.target, "/departamentos/SAUDE");
        }
    }

    #[test]
    fn test_review_warning_does_not_emit() {
        let today = today();
        let due_soon = vehicle("ABC1D23", "OBRAS", NaiveDate::from_ymd_opt(2024, 1, 20), 0, 0);
        assert_eq!(review_status(due_soon.last_review_date, today), Severity::Warning);
        assert!(vehicle_alerts(&due_soon, today).is_empty());
    }

    #[test]
    fn test_vehicle_can_emit_two_alerts() {
        let today = today();
        let both = vehicle("ABC1D23", "OBRAS", NaiveDate::from_ymd_opt(2023, 1, 1), 20_000, 15_000);
        let alerts = vehicle_alerts(&both, today);
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.severity == Severity::Error));
    }

    #[test]
    fn test_driver_expiring_soon_is_warning() {
        let today = today();
        let soon = driver("Carla", "GCM", Some(today + Duration::days(10)));
        let alert = driver_alert(&soon, today).unwrap();
        assert_eq!(alert.severity, Severity::Warning);
        assert_eq!(alert.kind, AlertKind::LicenseExpiringSoon);
        assert!(alert.message.contains("10"));
        assert!(driver_alert(&driver("Dani", "GCM", None), today).is_none());
    }

    #[test]
    fn test_alert_order_across_departments() {
        let today = today();
        let vehicles = vec![
            vehicle("ZZZ9999", "SAUDE", None, 9_500, 10_000),
            vehicle("AAA1111", "SEMED", None, 9_500, 10_000),
            vehicle("BBB2222", "OBRAS", None, 11_000, 10_000),
            vehicle("CCC3333", "OBRAS", None, 9_500, 10_000),
        ];
        let alerts = aggregate_alerts(&vehicles, &[], today);
        let labels: Vec<&str> = alerts.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["BBB2222", "CCC3333", "ZZZ9999", "AAA1111"]);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let today = today();
        let vehicles = vec![
            vehicle("ABC1D23", "SAUDE", NaiveDate::from_ymd_opt(2023, 1, 1), 0, 100),
            vehicle("DEF4567", "PMM", None, 900, 1_000),
        ];
        let mut reversed = vehicles.clone();
        reversed.reverse();
        assert_eq!(
            aggregate_alerts(&vehicles, &[], today),
            aggregate_alerts(&reversed, &[], today)
        );
    }
}
