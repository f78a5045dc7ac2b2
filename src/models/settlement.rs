//! Modelo de DriverSettlement
//!
//! Registro de liquidación por viaje producido por el resolver de nómina.
//! Es una proyección de solo lectura: se re-deriva del historial de eventos
//! en cada consulta, nunca se persiste.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unidad de liquidación por defecto
pub const SETTLEMENT_UNIT_TRIP: &str = "trip";

/// Registro de liquidación por viaje para el reporte de nómina del conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSettlement {
    pub trip_id: Uuid,
    pub trip_code: String,
    pub driver_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub amount: Decimal,
    pub unit: String,
}

/// Modo de cálculo de la ventana de nómina, configurable por empresa.
/// Ambos modos coexisten de forma intencional detrás del setting
/// `payroll_window_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayrollWindowMode {
    /// Ventana lógica resuelta (modo por defecto)
    Resolved,
    /// Modo legacy: filtra por el created_at crudo de los eventos de estado
    StatusEvent,
}

impl PayrollWindowMode {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("status_event") => PayrollWindowMode::StatusEvent,
            _ => PayrollWindowMode::Resolved,
        }
    }
}
