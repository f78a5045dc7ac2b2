//! Modelo de OrderTrip
//!
//! Este módulo contiene el struct OrderTrip (viaje de un vehículo/conductor
//! cumpliendo parte o todo el peso de un pedido) y su historial de estados
//! append-only. El campo `last_status_type` es una desnormalización del
//! último evento y debe actualizarse en la misma transacción que el evento.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipos de estado estructurales del motor. El pipeline intermedio es
/// configurable por empresa vía el catálogo de driver reports; estos tags
/// son los únicos que el motor referencia por nombre.
pub mod status_types {
    pub const NEW: &str = "NEW";
    pub const PENDING_CONFIRMATION: &str = "PENDING_CONFIRMATION";
    pub const CONFIRMED: &str = "CONFIRMED";
    pub const WAITING_FOR_PICKUP: &str = "WAITING_FOR_PICKUP";
    pub const DELIVERED: &str = "DELIVERED";
    pub const COMPLETED: &str = "COMPLETED";
    pub const CANCELED: &str = "CANCELED";

    /// CANCELED es terminal: rechaza cualquier transición posterior
    pub fn is_terminal(status: &str) -> bool {
        status == CANCELED
    }

    /// Tipos que el motor reconoce aunque la empresa no los tenga en su
    /// catálogo de etapas
    pub fn is_structural(status: &str) -> bool {
        [
            NEW,
            PENDING_CONFIRMATION,
            CONFIRMED,
            WAITING_FOR_PICKUP,
            DELIVERED,
            COMPLETED,
            CANCELED,
        ]
        .contains(&status)
    }
}

/// OrderTrip principal - mapea a la tabla order_trips
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderTrip {
    pub id: Uuid,
    pub company_id: Uuid,
    pub order_id: Uuid,
    /// Código legible, único dentro del pedido
    pub code: String,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub weight: Decimal,
    pub pickup_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub driver_cost: Option<Decimal>,
    pub subcontractor_cost: Option<Decimal>,
    pub bridge_toll: Option<Decimal>,
    pub other_cost: Option<Decimal>,
    pub last_status_type: String,
    pub bill_of_lading_code: Option<String>,
    pub bill_of_lading_received: bool,
    pub bill_of_lading_received_at: Option<DateTime<Utc>>,
    pub bill_of_lading_images: Vec<String>,
    /// Timestamp de notificación programada, limpiable por el operador
    pub notify_scheduled_at: Option<DateTime<Utc>>,
    /// Soft-delete: los viajes despublicados quedan fuera de reporting y dispatch
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
}

impl OrderTrip {
    /// Un viaje califica para nómina solo con carta de porte no vacía
    pub fn has_bill_of_lading_code(&self) -> bool {
        self.bill_of_lading_code
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Evento de estado append-only - mapea a la tabla order_trip_statuses.
/// Inmutable una vez escrito; varios eventos pueden compartir tipo
/// (re-confirmaciones) y la resolución debe tolerarlo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TripStatusEvent {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub status_type: String,
    pub note: Option<String>,
    pub driver_report_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Datos para insertar un viaje nuevo (unit-of-work de creación)
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub company_id: Uuid,
    pub order_id: Uuid,
    pub code: String,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub weight: Decimal,
    pub pickup_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub driver_cost: Option<Decimal>,
    pub subcontractor_cost: Option<Decimal>,
    pub bridge_toll: Option<Decimal>,
    pub other_cost: Option<Decimal>,
    pub created_by: Option<Uuid>,
}

/// Patch parcial sobre un viaje existente. Los campos `None` no se tocan;
/// `expected_updated_at` activa el chequeo optimista dentro del write.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    pub bill_of_lading_code: Option<String>,
    pub bill_of_lading_received: Option<bool>,
    pub bill_of_lading_received_at: Option<Option<DateTime<Utc>>>,
    pub bill_of_lading_images: Option<Vec<String>>,
    pub notify_scheduled_at: Option<Option<DateTime<Utc>>>,
    pub updated_by: Option<Uuid>,
}
