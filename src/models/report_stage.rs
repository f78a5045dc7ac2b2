//! Modelo de DriverReport
//!
//! Catálogo de etapas de reporte del conductor, configurable por empresa.
//! El orden del pipeline lo define `display_order`; nunca se asume una
//! secuencia fija en código.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entrada del catálogo - mapea a la tabla driver_reports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverReport {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Tag de tipo, ej. WAITING_FOR_PICKUP, DELIVERED
    pub report_type: String,
    pub name: String,
    pub display_order: i32,
    pub photo_required: bool,
    pub bill_of_lading_required: bool,
    pub created_at: DateTime<Utc>,
}
