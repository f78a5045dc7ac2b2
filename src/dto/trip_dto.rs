use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::expense::TripDriverExpense;
use crate::models::trip::{OrderTrip, TripStatusEvent};
use crate::services::trip_service::TripDetail;

// Request para crear un viaje dentro de un pedido
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub order_id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub weight: Decimal,
    pub pickup_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub driver_cost: Option<Decimal>,
    pub subcontractor_cost: Option<Decimal>,
    pub bridge_toll: Option<Decimal>,
    pub other_cost: Option<Decimal>,
    /// Copiar los gastos por defecto de la ruta del pedido
    #[serde(default)]
    pub use_route_defaults: bool,
    pub created_by: Option<Uuid>,
}

// Request para avanzar o corregir el estado del viaje
#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceStatusRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub status_type: String,
    pub note: Option<String>,
    pub driver_report_id: Option<Uuid>,
    /// Último updated_at conocido por el operador (chequeo optimista)
    pub expected_updated_at: DateTime<Utc>,
    pub actor: Option<Uuid>,
}

// Request para cancelar un viaje
#[derive(Debug, Deserialize)]
pub struct CancelTripRequest {
    pub expected_updated_at: DateTime<Utc>,
    pub actor: Option<Uuid>,
}

// Request del sub-flujo de carta de porte
#[derive(Debug, Deserialize, Validate)]
pub struct BillOfLadingRequest {
    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub code: String,
    #[serde(default)]
    pub images_added: Vec<String>,
    #[serde(default)]
    pub images_removed: Vec<String>,
    pub received: bool,
    pub actor: Option<Uuid>,
}

// Request para re-aplicar los defaults de ruta sobre varios viajes
#[derive(Debug, Deserialize, Validate)]
pub struct ResetExpensesRequest {
    #[validate(length(min = 1, message = "Se requiere al menos un viaje"))]
    pub trip_ids: Vec<Uuid>,
}

// Response de viaje
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: Uuid,
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
    pub last_status_type: String,
    pub bill_of_lading_code: Option<String>,
    pub bill_of_lading_received: bool,
    pub bill_of_lading_received_at: Option<DateTime<Utc>>,
    pub bill_of_lading_images: Vec<String>,
    pub notify_scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderTrip> for TripResponse {
    fn from(trip: OrderTrip) -> Self {
        Self {
            id: trip.id,
            company_id: trip.company_id,
            order_id: trip.order_id,
            code: trip.code,
            vehicle_id: trip.vehicle_id,
            driver_id: trip.driver_id,
            weight: trip.weight,
            pickup_date: trip.pickup_date,
            delivery_date: trip.delivery_date,
            driver_cost: trip.driver_cost,
            subcontractor_cost: trip.subcontractor_cost,
            bridge_toll: trip.bridge_toll,
            other_cost: trip.other_cost,
            last_status_type: trip.last_status_type,
            bill_of_lading_code: trip.bill_of_lading_code,
            bill_of_lading_received: trip.bill_of_lading_received,
            bill_of_lading_received_at: trip.bill_of_lading_received_at,
            bill_of_lading_images: trip.bill_of_lading_images,
            notify_scheduled_at: trip.notify_scheduled_at,
            created_at: trip.created_at,
            updated_at: trip.updated_at,
        }
    }
}

// Response de evento de estado
#[derive(Debug, Serialize)]
pub struct StatusEventResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub status_type: String,
    pub note: Option<String>,
    pub driver_report_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl From<TripStatusEvent> for StatusEventResponse {
    fn from(event: TripStatusEvent) -> Self {
        Self {
            id: event.id,
            trip_id: event.trip_id,
            status_type: event.status_type,
            note: event.note,
            driver_report_id: event.driver_report_id,
            created_at: event.created_at,
            created_by: event.created_by,
        }
    }
}

// Response de línea de gasto
#[derive(Debug, Serialize)]
pub struct ExpenseLineResponse {
    pub id: Uuid,
    pub expense_type_key: String,
    pub is_driver_cost: bool,
    pub amount: Decimal,
}

impl From<TripDriverExpense> for ExpenseLineResponse {
    fn from(line: TripDriverExpense) -> Self {
        Self {
            id: line.id,
            expense_type_key: line.expense_type_key,
            is_driver_cost: line.is_driver_cost,
            amount: line.amount,
        }
    }
}

// Response de avance de estado: viaje actualizado + evento escrito
#[derive(Debug, Serialize)]
pub struct StatusAdvanceResponse {
    pub trip: TripResponse,
    pub event: StatusEventResponse,
}

// Response de detalle: viaje con historial y líneas de gasto
#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    pub trip: TripResponse,
    pub history: Vec<StatusEventResponse>,
    pub expenses: Vec<ExpenseLineResponse>,
}

impl From<TripDetail> for TripDetailResponse {
    fn from(detail: TripDetail) -> Self {
        Self {
            trip: detail.trip.into(),
            history: detail.history.into_iter().map(Into::into).collect(),
            expenses: detail.expenses.into_iter().map(Into::into).collect(),
        }
    }
}
