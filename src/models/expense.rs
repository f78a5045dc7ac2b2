//! Modelo de TripDriverExpense
//!
//! Líneas de gasto adjuntas a un viaje. La suma de las líneas de categoría
//! driver-cost es el `driver_cost` del viaje cuando los gastos están
//! itemizados en lugar de un monto plano.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Línea de gasto del viaje - mapea a trip_driver_expenses
/// con el tipo de gasto ya resuelto (JOIN contra expense_types)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripDriverExpense {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub expense_type_id: Uuid,
    pub expense_type_key: String,
    pub is_driver_cost: bool,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Línea calculada lista para persistir (sin identidad todavía)
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExpenseLine {
    pub expense_type_id: Uuid,
    pub expense_type_key: String,
    pub is_driver_cost: bool,
    pub amount: Decimal,
}

/// Resultado de aplicar los defaults de ruta a un viaje: líneas prorrateadas
/// más los campos planos copiados tal cual
#[derive(Debug, Clone, PartialEq)]
pub struct ExpensePlan {
    pub lines: Vec<PlannedExpenseLine>,
    pub driver_cost: Option<Decimal>,
    pub bridge_toll: Option<Decimal>,
    pub subcontractor_cost: Option<Decimal>,
    pub other_cost: Option<Decimal>,
}
