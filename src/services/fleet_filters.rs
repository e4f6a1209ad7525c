//! Modelo de lectura por departamento
//!
//! Vistas de vehículos y conductores enriquecidas con sus estados, más los
//! filtros de búsqueda y la paginación de las listas del departamento.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::alert::Alert;
use crate::models::driver::Driver;
use crate::models::status::{MileageStatus, Severity};
use crate::models::vehicle::{Vehicle, VehicleSituation};
use crate::services::alert_aggregator::aggregate_alerts;
use crate::services::status_classifier::{
    days_until, driver_license_status, mileage_status, next_review_due, review_status,
};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub review_status: Severity,
    pub next_review_date: Option<NaiveDate>,
    pub mileage: MileageStatus,
}

impl VehicleView {
    pub fn new(vehicle: Vehicle, today: NaiveDate) -> Self {
        let review_status = review_status(vehicle.last_review_date, today);
        let next_review_date = vehicle.last_review_date.and_then(next_review_due);
        let mileage = mileage_status(vehicle.current_mileage, vehicle.next_change_mileage);
        Self {
            vehicle,
            review_status,
            next_review_date,
            mileage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverView {
    #[serde(flatten)]
    pub driver: Driver,
    pub license_status: Severity,
    pub license_days_left: Option<i64>,
}

impl DriverView {
    pub fn new(driver: Driver, today: NaiveDate) -> Self {
        let license_status = driver_license_status(driver.license_expiration, today);
        let license_days_left = driver.license_expiration.map(|exp| days_until(exp, today));
        Self {
            driver,
            license_status,
            license_days_left,
        }
    }
}

/// Filtros de la lista de vehículos (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    /// Subcadena en matrícula o modelo, sin distinguir mayúsculas
    pub search: Option<String>,
    pub situation: Option<VehicleSituation>,
    pub review_status: Option<Severity>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl VehicleFilters {
    pub fn matches(&self, view: &VehicleView) -> bool {
        if let Some(situation) = self.situation {
            if view.vehicle.situation != situation {
                return false;
            }
        }
        if let Some(status) = self.review_status {
            if view.review_status != status {
                return false;
            }
        }
        match search_term(&self.search) {
            Some(term) => {
                view.vehicle.license_plate.to_lowercase().contains(&term)
                    || view.vehicle.model.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Filtros de la lista de conductores
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverFilters {
    pub search: Option<String>,
    pub license_status: Option<Severity>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl DriverFilters {
    pub fn matches(&self, view: &DriverView) -> bool {
        if let Some(status) = self.license_status {
            if view.license_status != status {
                return false;
            }
        }
        match search_term(&self.search) {
            Some(term) => view.driver.name.to_lowercase().contains(&term),
            None => true,
        }
    }
}

fn search_term(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Self {
        let total = items.len();
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        let items = items.into_iter().skip(offset).take(limit).collect();
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

/// Vehículos del departamento con estados, filtrados y paginados.
/// Se espera la entrada ordenada por matrícula.
pub fn vehicle_page(
    vehicles: Vec<Vehicle>,
    filters: &VehicleFilters,
    today: NaiveDate,
) -> Page<VehicleView> {
    let views: Vec<VehicleView> = vehicles
        .into_iter()
        .map(|v| VehicleView::new(v, today))
        .filter(|view| filters.matches(view))
        .collect();
    Page::from_items(views, filters.limit, filters.offset)
}

pub fn driver_page(drivers: Vec<Driver>, filters: &DriverFilters, today: NaiveDate) -> Page<DriverView> {
    let views: Vec<DriverView> = drivers
        .into_iter()
        .map(|d| DriverView::new(d, today))
        .filter(|view| filters.matches(view))
        .collect();
    Page::from_items(views, filters.limit, filters.offset)
}

/// Instantánea completa de un departamento
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentSnapshot {
    pub department: String,
    pub generated_on: NaiveDate,
    pub vehicles: Vec<VehicleView>,
    pub drivers: Vec<DriverView>,
    pub alerts: Vec<Alert>,
}

impl DepartmentSnapshot {
    pub fn build(department: String, vehicles: Vec<Vehicle>, drivers: Vec<Driver>, today: NaiveDate) -> Self {
        let alerts = aggregate_alerts(&vehicles, &drivers, today);
        Self {
            department,
            generated_on: today,
            vehicles: vehicles.into_iter().map(|v| VehicleView::new(v, today)).collect(),
            drivers: drivers.into_iter().map(|d| DriverView::new(d, today)).collect(),
            alerts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::alert_aggregator::tests::{driver, vehicle};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn fleet() -> Vec<Vehicle> {
        let mut stopped = vehicle("DEF4567", "OBRAS", None, 0, 0);
        stopped.situation = VehicleSituation::Stopped;
        stopped.model = "VW Gol".to_string();
        vec![
            vehicle("ABC1D23", "OBRAS", NaiveDate::from_ymd_opt(2024, 1, 1), 0, 0),
            stopped,
            vehicle("GHI8J90", "OBRAS", NaiveDate::from_ymd_opt(2024, 6, 1), 0, 0),
        ]
    }

    #[test]
    fn test_vehicle_search_is_case_insensitive() {
        let filters = VehicleFilters {
            search: Some("  gol ".to_string()),
            ..Default::default()
        };
        let page = vehicle_page(fleet(), &filters, today());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].vehicle.license_plate, "DEF4567");

        let by_plate = VehicleFilters {
            search: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(vehicle_page(fleet(), &by_plate, today()).total, 1);
    }

    #[test]
    fn test_vehicle_status_and_situation_filters() {
        let errors = VehicleFilters {
            review_status: Some(Severity::Error),
            ..Default::default()
        };
        let page = vehicle_page(fleet(), &errors, today());
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].vehicle.license_plate, "ABC1D23");
        assert_eq!(page.items[0].next_review_date, NaiveDate::from_ymd_opt(2024, 7, 1));

        let stopped = VehicleFilters {
            situation: Some(VehicleSituation::Stopped),
            ..Default::default()
        };
        assert_eq!(vehicle_page(fleet(), &stopped, today()).total, 1);
    }

    #[test]
    fn test_paging_keeps_total() {
        let filters = VehicleFilters {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        };
        let page = vehicle_page(fleet(), &filters, today());
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].vehicle.license_plate, "DEF4567");

        let clamped = Page::from_items(vec![1, 2, 3], Some(10_000), None);
        assert_eq!(clamped.limit, MAX_PAGE_SIZE);
        assert_eq!(Page::from_items(vec![1], Some(0), None).limit, 1);
    }

    #[test]
    fn test_driver_filters() {
        let today = today();
        let drivers = vec![
            driver("Ana Souza", "GCM", Some(today - Duration::days(1))),
            driver("Bruno Lima", "GCM", Some(today + Duration::days(90))),
        ];
        let expired = DriverFilters {
            license_status: Some(Severity::Error),
            ..Default::default()
        };
        let page = driver_page(drivers.clone(), &expired, today);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].license_days_left, Some(-1));

        let search = DriverFilters {
            search: Some("LIMA".to_string()),
            ..Default::default()
        };
        assert_eq!(driver_page(drivers, &search, today).items[0].driver.name, "Bruno Lima");
    }

    #[test]
    fn test_snapshot_contains_alerts() {
        let snapshot = DepartmentSnapshot::build("OBRAS".to_string(), fleet(), vec![], today());
        assert_eq!(snapshot.vehicles.len(), 3);
        assert_eq!(snapshot.alerts.len(), 1);
        assert_eq!(snapshot.alerts[0].target, "/departamentos/OBRAS");
    }
}
