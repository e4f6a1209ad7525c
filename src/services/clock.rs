//! Reloj inyectable
//!
//! Los clasificadores de estado nunca leen el reloj; reciben `today`
//! desde aquí para que las pruebas puedan fijar la fecha.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    /// Fecha calendario actual en la zona horaria de la flota
    fn today(&self) -> NaiveDate;
}

/// Reloj del sistema anclado a una zona horaria IANA
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Reloj fijo para pruebas
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }

    #[test]
    fn test_system_clock_is_close_to_utc_date() {
        let clock = SystemClock::new(chrono_tz::America::Sao_Paulo);
        let diff = (clock.today() - Utc::now().date_naive()).num_days();
        assert!(diff.abs() <= 1);
    }
}
