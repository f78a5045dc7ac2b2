//! Modelo de Order
//!
//! Este módulo contiene el struct Order (pedido de flete) desde la
//! perspectiva del motor de viajes. El resto del ciclo de vida del pedido
//! (captura, agrupación, facturación) vive fuera de este core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estados del pedido visibles para este motor
pub mod order_status {
    /// Pedido recibido, todavía sin viajes programados
    pub const RECEIVED: &str = "RECEIVED";
    /// Pedido con al menos un viaje programado
    pub const IN_PROGRESS: &str = "IN_PROGRESS";
}

/// Order principal - mapea a la tabla orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub company_id: Uuid,
    pub code: String,
    pub status: String,
    /// Ruta por defecto del pedido, origen de los gastos de conductor
    pub route_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
