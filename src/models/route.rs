//! Modelo de Route
//!
//! Datos de referencia de ruta, de solo lectura para este motor: costos
//! por defecto y líneas de gasto de conductor que se copian (prorrateadas)
//! sobre los viajes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Route principal - mapea a la tabla routes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub driver_cost: Option<Decimal>,
    pub bridge_toll: Option<Decimal>,
    pub subcontractor_cost: Option<Decimal>,
    pub other_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Línea de gasto por defecto de la ruta - mapea a route_driver_expenses
/// con el tipo de gasto ya resuelto (JOIN contra expense_types)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteDriverExpense {
    pub id: Uuid,
    pub route_id: Uuid,
    pub expense_type_id: Uuid,
    pub expense_type_key: String,
    /// Solo las líneas de categoría driver-cost se prorratean por vehículo
    pub is_driver_cost: bool,
    pub amount: Decimal,
}

/// Ruta con sus líneas de gasto anidadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteWithExpenses {
    pub route: Route,
    pub driver_expenses: Vec<RouteDriverExpense>,
}
