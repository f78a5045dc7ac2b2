//! Modelo de NotificationIntent
//!
//! Descriptor de notificación que este core decide emitir. La entrega
//! (push/SMS/email) es responsabilidad de un colaborador externo; aquí solo
//! se decide elegibilidad y forma del payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Roles destinatarios de una notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAudience {
    Manager,
    Accountant,
}

/// Tipo de intención de notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationIntentType {
    /// Primer viaje creado: el pedido pasa a IN_PROGRESS
    OrderInProgress,
    /// Viaje cancelado por un operador
    TripCanceled,
}

/// Descriptor de notificación emitido por el motor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub intent_type: NotificationIntentType,
    pub audience: Vec<NotificationAudience>,
    /// Conductores destinatarios directos (además de la audiencia por rol)
    pub recipients: Vec<Uuid>,
    pub data: Value,
}
