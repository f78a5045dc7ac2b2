//! Emisor de intenciones de notificación
//!
//! Este motor solo decide *que* debe dispararse una notificación y con qué
//! payload; la entrega (push/SMS/email) es de un colaborador externo detrás
//! del trait `NotificationSink`. Un fallo de emisión se loguea y nunca hace
//! fallar la transacción de negocio que lo originó.

use async_trait::async_trait;
use serde_json::json;

use crate::models::notification::{
    NotificationAudience, NotificationIntent, NotificationIntentType,
};
use crate::models::order::Order;
use crate::models::trip::OrderTrip;

/// Colaborador externo de entrega de notificaciones (fire-and-forget)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, intent: NotificationIntent) -> anyhow::Result<()>;
}

/// Sink de producción: deja la intención en el log estructurado, donde la
/// recoge el pipeline de entrega
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn emit(&self, intent: NotificationIntent) -> anyhow::Result<()> {
        tracing::info!(
            intent_type = ?intent.intent_type,
            audience = ?intent.audience,
            recipients = ?intent.recipients,
            data = %intent.data,
            "notification intent emitted"
        );
        Ok(())
    }
}

/// El pedido pasó a IN_PROGRESS al crearse su primer viaje.
/// Audiencia: gestores y contables de la empresa.
pub fn order_in_progress_intent(order: &Order, trip: &OrderTrip) -> NotificationIntent {
    NotificationIntent {
        intent_type: NotificationIntentType::OrderInProgress,
        audience: vec![
            NotificationAudience::Manager,
            NotificationAudience::Accountant,
        ],
        recipients: vec![],
        data: json!({
            "company_id": order.company_id,
            "order_id": order.id,
            "order_code": order.code,
            "trip_id": trip.id,
            "trip_code": trip.code,
        }),
    }
}

/// Un operador canceló un viaje. Además de la audiencia por rol, el
/// conductor asignado (si lo hay) recibe la alerta directamente.
pub fn trip_canceled_intent(trip: &OrderTrip) -> NotificationIntent {
    NotificationIntent {
        intent_type: NotificationIntentType::TripCanceled,
        audience: vec![
            NotificationAudience::Manager,
            NotificationAudience::Accountant,
        ],
        recipients: trip.driver_id.into_iter().collect(),
        data: json!({
            "company_id": trip.company_id,
            "order_id": trip.order_id,
            "trip_id": trip.id,
            "trip_code": trip.code,
            "driver_id": trip.driver_id,
        }),
    }
}
