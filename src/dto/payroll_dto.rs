use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::settlement::DriverSettlement;

// Query params del reporte de liquidaciones de un conductor
#[derive(Debug, Deserialize)]
pub struct SettlementQueryParams {
    pub company_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Tipos de etapa pagables separados por coma; por defecto
    /// WAITING_FOR_PICKUP,DELIVERED
    pub stages: Option<String>,
}

// Registro de liquidación por viaje
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    pub trip_id: Uuid,
    pub trip_code: String,
    pub driver_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub amount: Decimal,
    pub unit: String,
}

impl From<DriverSettlement> for SettlementResponse {
    fn from(s: DriverSettlement) -> Self {
        Self {
            trip_id: s.trip_id,
            trip_code: s.trip_code,
            driver_id: s.driver_id,
            start_date: s.start_date,
            end_date: s.end_date,
            amount: s.amount,
            unit: s.unit,
        }
    }
}
