//! Clasificador de estados operacionales
//!
//! Funciones puras que convierten fechas y kilometrajes en una severidad
//! de tres niveles. Sin I/O, sin reloj ambiental: `today` siempre llega
//! como parámetro.
//!
//! Los umbrales son política del dominio y no se configuran:
//! - revisión cada 6 meses calendario, aviso con 30 días de antelación
//! - licencia de conducir, aviso con 45 días de antelación
//! - cambio por kilometraje, aviso con 1000 km de antelación

use chrono::{Months, NaiveDate};

use crate::models::status::{MileageStatus, Severity};

pub const REVIEW_INTERVAL_MONTHS: u32 = 6;
pub const REVIEW_WARNING_DAYS: i64 = 30;
pub const LICENSE_WARNING_DAYS: i64 = 45;
pub const MILEAGE_WARNING_KM: i64 = 1000;

/// Interpretar una fecha `YYYY-MM-DD` como fecha calendario local.
///
/// Entradas vacías o mal formadas devuelven `None`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Próxima revisión: última revisión + 6 meses calendario.
///
/// Si el día no existe en el mes destino se ajusta al último día del mes
/// (31/08 + 6 meses = 28/02 o 29/02). Nunca se desborda al mes siguiente
/// (02/03 o 03/03): en esos casos la revisión vence uno a tres días antes.
pub fn next_review_due(last_review: NaiveDate) -> Option<NaiveDate> {
    last_review.checked_add_months(Months::new(REVIEW_INTERVAL_MONTHS))
}

/// Días enteros entre `today` y `target`; negativo si ya pasó.
///
/// Con `target` anclado a medianoche local coincide con
/// `ceil((target_ms - now_ms) / 86_400_000)` para cualquier instante de `today`.
pub fn days_until(target: NaiveDate, today: NaiveDate) -> i64 {
    (target - today).num_days()
}

fn classify_days_left(days_left: i64, warning_days: i64) -> Severity {
    if days_left < 0 {
        Severity::Error
    } else if days_left <= warning_days {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Estado de la revisión semestral. Sin fecha = ok.
pub fn review_status(last_review: Option<NaiveDate>, today: NaiveDate) -> Severity {
    let Some(next_due) = last_review.and_then(next_review_due) else {
        return Severity::Ok;
    };
    classify_days_left(days_until(next_due, today), REVIEW_WARNING_DAYS)
}

/// Estado de la licencia de conducir. Sin fecha = ok.
pub fn driver_license_status(expiration: Option<NaiveDate>, today: NaiveDate) -> Severity {
    let Some(expiration) = expiration else {
        return Severity::Ok;
    };
    classify_days_left(days_until(expiration, today), LICENSE_WARNING_DAYS)
}

/// Igual que [`review_status`] pero con la fecha en texto.
pub fn review_status_from_str(last_review: Option<&str>, today: NaiveDate) -> Severity {
    review_status(last_review.and_then(parse_calendar_date), today)
}

/// Igual que [`driver_license_status`] pero con la fecha en texto.
pub fn driver_license_status_from_str(expiration: Option<&str>, today: NaiveDate) -> Severity {
    driver_license_status(expiration.and_then(parse_calendar_date), today)
}

/// Estado del cambio de aceite/piezas por kilometraje.
///
/// `next <= 0` significa "sin configurar". `next < current` se tolera y
/// se reporta como exceso.
pub fn mileage_status(current: i64, next: i64) -> MileageStatus {
    if next <= 0 {
        return MileageStatus::unset();
    }

    let remaining = next - current;

    if remaining < 0 {
        MileageStatus {
            status: Severity::Error,
            remaining: Some(remaining),
            text: format!("Vencido hace {} km", remaining.abs()),
        }
    } else if remaining <= MILEAGE_WARNING_KM {
        MileageStatus {
            status: Severity::Warning,
            remaining: Some(remaining),
            text: format!("Faltan {} km", remaining),
        }
    } else {
        MileageStatus {
            status: Severity::Ok,
            remaining: Some(remaining),
            text: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_review_overdue_scenario() {
        let today = date(2024, 7, 15);
        let last = date(2024, 1, 1);

        assert_eq!(next_review_due(last), Some(date(2024, 7, 1)));
        assert_eq!(days_until(date(2024, 7, 1), today), -14);
        assert_eq!(review_status(Some(last), today), Severity::Error);
    }

    #[test]
    fn test_review_missing_date_is_ok() {
        let today = date(2024, 7, 15);
        assert_eq!(review_status(None, today), Severity::Ok);
        assert_eq!(review_status_from_str(None, today), Severity::Ok);
        assert_eq!(review_status_from_str(Some(""), today), Severity::Ok);
        assert_eq!(review_status_from_str(Some("15/01/2024"), today), Severity::Ok);
    }

    #[test]
    fn test_review_boundaries() {
        let today = date(2024, 7, 15);
        // due today -> warning
        assert_eq!(review_status(Some(date(2024, 1, 15)), today), Severity::Warning);
        // due yesterday -> error
        assert_eq!(review_status(Some(date(2024, 1, 14)), today), Severity::Error);
        // due in exactly 30 days -> warning
        assert_eq!(review_status(Some(date(2024, 2, 14)), today), Severity::Warning);
        // due in 31 days -> ok
        assert_eq!(review_status(Some(date(2024, 2, 15)), today), Severity::Ok);
    }

    #[test]
    fn test_review_status_matches_threshold_definition() {
        let today = date(2024, 7, 15);
        let mut last = date(2023, 6, 1);
        while last <= date(2024, 7, 15) {
            let due = next_review_due(last).unwrap();
            let status = review_status(Some(last), today);
            assert_eq!(status == Severity::Error, due < today, "last={last}");
            assert_eq!(
                status == Severity::Warning,
                today <= due && due <= today + Duration::days(30),
                "last={last}"
            );
            last += Duration::days(1);
        }
    }

    #[test]
    fn test_review_month_end_clamps() {
        assert_eq!(next_review_due(date(2023, 8, 31)), Some(date(2024, 2, 29)));
        assert_eq!(next_review_due(date(2024, 1, 31)), Some(date(2024, 7, 31)));
        assert_eq!(next_review_due(date(2022, 8, 31)), Some(date(2023, 2, 28)));
        assert_eq!(next_review_due(date(2022, 8, 29)), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_review_parses_date_strings() {
        let today = date(2024, 7, 15);
        assert_eq!(review_status_from_str(Some("2024-01-01"), today), Severity::Error);
        assert_eq!(review_status_from_str(Some(" 2024-07-01 "), today), Severity::Ok);
    }

    #[test]
    fn test_driver_license_boundaries() {
        let today = date(2024, 7, 15);
        assert_eq!(
            driver_license_status(Some(today + Duration::days(45)), today),
            Severity::Warning
        );
        assert_eq!(
            driver_license_status(Some(today + Duration::days(46)), today),
            Severity::Ok
        );
        assert_eq!(driver_license_status(Some(today), today), Severity::Warning);
        assert_eq!(
            driver_license_status(Some(today - Duration::days(1)), today),
            Severity::Error
        );
        assert_eq!(driver_license_status(None, today), Severity::Ok);
        assert_eq!(driver_license_status_from_str(Some("not-a-date"), today), Severity::Ok);
    }

    #[test]
    fn test_license_window_is_wider_than_review_window() {
        let today = date(2024, 7, 15);
        let in_40_days = today + Duration::days(40);
        assert_eq!(driver_license_status(Some(in_40_days), today), Severity::Warning);
        // revisión que vence en 40 días: todavía ok
        let last_review = in_40_days.checked_sub_months(Months::new(6)).unwrap();
        assert_eq!(review_status(Some(last_review), today), Severity::Ok);
    }

    #[test]
    fn test_mileage_unset() {
        assert_eq!(mileage_status(12_000, 0), MileageStatus::unset());
        assert_eq!(mileage_status(0, 0).text, "");
        assert_eq!(mileage_status(500, -10).status, Severity::Ok);
    }

    #[test]
    fn test_mileage_boundaries() {
        assert_eq!(mileage_status(9000, 10_000).status, Severity::Warning);
        assert_eq!(mileage_status(9001, 10_000).status, Severity::Warning);
        assert_eq!(mileage_status(8999, 10_000).status, Severity::Ok);
        assert_eq!(mileage_status(10_000, 10_000).status, Severity::Warning);
        assert_eq!(mileage_status(10_001, 10_000).status, Severity::Error);
    }

    #[test]
    fn test_mileage_messages() {
        let warning = mileage_status(14_500, 15_000);
        assert_eq!(warning.status, Severity::Warning);
        assert_eq!(warning.remaining, Some(500));
        assert!(warning.text.contains("500"));

        let overdue = mileage_status(15_250, 15_000);
        assert_eq!(overdue.status, Severity::Error);
        assert_eq!(overdue.remaining, Some(-250));
        assert_eq!(overdue.text, "Vencido hace 250 km");

        let ok = mileage_status(1_000, 15_000);
        assert_eq!(ok.remaining, Some(14_000));
        assert!(ok.text.is_empty());
    }
}
