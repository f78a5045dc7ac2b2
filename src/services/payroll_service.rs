//! Resolución de ventanas de nómina del conductor
//!
//! Proyección de solo lectura sobre el historial de eventos: para cada viaje
//! que califica se resuelve la ventana de liquidación `(inicio, fin)` y el
//! monto a atribuir. Nada se cachea ni se persiste; el mismo log de eventos
//! produce siempre el mismo resultado.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::models::settlement::{DriverSettlement, PayrollWindowMode, SETTLEMENT_UNIT_TRIP};
use crate::models::trip::{status_types, OrderTrip, TripStatusEvent};
use crate::repositories::contract::{ReferenceStore, TripStore};
use crate::services::report_stage_catalog::StageCatalog;
use crate::utils::errors::{bad_request_error, AppResult};

/// Setting de empresa que selecciona el modo de cálculo de la ventana
pub const SETTING_PAYROLL_WINDOW_MODE: &str = "payroll_window_mode";

/// Parámetros del reporte de liquidaciones de un conductor
#[derive(Debug, Clone)]
pub struct SettlementQuery {
    pub company_id: Uuid,
    pub driver_id: Uuid,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Tipos de etapa considerados pagables (gating del modo legacy)
    pub payable_types: Vec<String>,
}

/// Ventana de liquidación resuelta para un viaje
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Resuelve la ventana de un viaje a partir de su historial y del catálogo
/// de etapas de la empresa.
///
/// Inicio: la fecha planificada de recogida mientras la etapa actual ordena
/// antes de WAITING_FOR_PICKUP; desde esa etapa en adelante, el `created_at`
/// del último evento WAITING_FOR_PICKUP (con la fecha planificada como
/// fallback si el historial no lo tiene).
///
/// Fin: la fecha planificada de entrega mientras la etapa actual ordena
/// antes de DELIVERED; una vez entregado, el `created_at` del último evento
/// supera al plan.
pub fn resolve_window(
    trip: &OrderTrip,
    events: &[TripStatusEvent],
    catalog: &StageCatalog,
) -> SettlementWindow {
    // Último evento por tipo: con el historial ordenado ascendente basta
    // quedarse con el más tardío de cada filtro
    let latest_waiting_for_pickup = events
        .iter()
        .filter(|e| e.status_type == status_types::WAITING_FOR_PICKUP)
        .max_by_key(|e| e.created_at);
    let latest_event = events.iter().max_by_key(|e| e.created_at);

    let current_order = catalog.display_order(&trip.last_status_type);
    let wfp_order = catalog.display_order(status_types::WAITING_FOR_PICKUP);
    let delivered_order = catalog.display_order(status_types::DELIVERED);

    let start_date = match (current_order, wfp_order) {
        (Some(current), Some(wfp)) if current >= wfp => latest_waiting_for_pickup
            .map(|e| e.created_at)
            .unwrap_or(trip.pickup_date),
        // Etapa sin catalogar o anterior a la recogida: vale el plan
        _ => trip.pickup_date,
    };

    let end_date = match (current_order, delivered_order) {
        (Some(current), Some(delivered)) if current >= delivered => latest_event
            .map(|e| e.created_at)
            .unwrap_or(trip.delivery_date),
        _ => trip.delivery_date,
    };

    SettlementWindow {
        start_date,
        end_date,
    }
}

pub struct PayrollService {
    store: Arc<dyn TripStore>,
    reference: Arc<dyn ReferenceStore>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn TripStore>, reference: Arc<dyn ReferenceStore>) -> Self {
        Self { store, reference }
    }

    /// Una liquidación por viaje que califica, ordenadas por fecha de inicio
    /// resuelta ascendente.
    ///
    /// Califica el viaje publicado del conductor con carta de porte no vacía
    /// cuyo inicio resuelto cae en el rango pedido; en el modo legacy de la
    /// empresa, el gating es que algún evento de etapa pagable caiga en el
    /// rango.
    pub async fn driver_settlements(
        &self,
        query: SettlementQuery,
    ) -> AppResult<Vec<DriverSettlement>> {
        if query.to < query.from {
            return Err(bad_request_error(
                "El fin del rango de reporte no puede ser anterior al inicio",
            ));
        }

        let mode = PayrollWindowMode::from_setting(
            self.reference
                .get_org_setting(query.company_id, SETTING_PAYROLL_WINDOW_MODE)
                .await?
                .as_deref(),
        );

        let catalog = StageCatalog::new(
            self.reference
                .list_report_stages(query.company_id)
                .await?,
        );

        let trips = self
            .store
            .list_trips_by_driver(query.company_id, query.driver_id)
            .await?;

        let mut settlements = Vec::new();

        for trip in trips {
            if !trip.has_bill_of_lading_code() {
                continue;
            }

            let events = self.store.list_status_history(trip.id).await?;
            let window = resolve_window(&trip, &events, &catalog);

            let qualifies = match mode {
                PayrollWindowMode::Resolved => {
                    window.start_date >= query.from && window.start_date <= query.to
                }
                PayrollWindowMode::StatusEvent => events.iter().any(|e| {
                    query.payable_types.iter().any(|t| *t == e.status_type)
                        && e.created_at >= query.from
                        && e.created_at <= query.to
                }),
            };

            if !qualifies {
                continue;
            }

            let amount: Decimal = self
                .store
                .list_trip_expenses(trip.id)
                .await?
                .iter()
                .filter(|line| line.is_driver_cost)
                .map(|line| line.amount)
                .sum();

            settlements.push(DriverSettlement {
                trip_id: trip.id,
                trip_code: trip.code.clone(),
                driver_id: query.driver_id,
                start_date: window.start_date,
                end_date: window.end_date,
                amount,
                unit: SETTLEMENT_UNIT_TRIP.to_string(),
            });
        }

        settlements.sort_by_key(|s| s.start_date);

        info!(
            driver_id = %query.driver_id,
            mode = ?mode,
            settlements = settlements.len(),
            "driver settlements resolved"
        );

        Ok(settlements)
    }
}
