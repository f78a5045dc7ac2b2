//! Modelo de Vehicle
//!
//! Superficie mínima del vehículo que necesita este motor: identidad y la
//! tasa de gasto de conductor de su tipo, usada para prorratear las líneas
//! driver-cost al copiar defaults de ruta.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle - mapea a vehicles con el tipo resuelto (JOIN contra vehicle_types)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub company_id: Uuid,
    pub license_plate: String,
    pub vehicle_type: String,
    /// Porcentaje (0-100+) aplicado a las líneas driver-cost de la ruta
    pub driver_expense_rate: Decimal,
    pub created_at: DateTime<Utc>,
}
