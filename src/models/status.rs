//! Estados operacionales derivados
//!
//! Severidad de tres niveles producida por el clasificador de estados.

use serde::{Deserialize, Serialize};

/// Severidad operacional de un vehículo o conductor.
///
/// El orden es significativo: `Ok < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Ok
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado del control de kilometraje
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageStatus {
    pub status: Severity,
    /// `None` cuando no hay próximo cambio configurado
    pub remaining: Option<i64>,
    pub text: String,
}

impl MileageStatus {
    pub fn unset() -> Self {
        Self {
            status: Severity::Ok,
            remaining: None,
            text: String::new(),
        }
    }
}
