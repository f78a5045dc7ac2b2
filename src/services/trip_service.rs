//! Ciclo de vida del viaje
//!
//! Este servicio es el dueño de la máquina de estados del viaje: creación,
//! avance de estado, cancelación y el sub-flujo de carta de porte. Las
//! escrituras compuestas delegan en los unit-of-work del contrato de
//! persistencia; la comparación optimista de `updated_at` viaja hasta el
//! repositorio y se ejecuta dentro del propio write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::expense::{ExpensePlan, TripDriverExpense};
use crate::models::notification::NotificationIntent;
use crate::models::order::Order;
use crate::models::trip::{status_types, NewTrip, OrderTrip, TripPatch, TripStatusEvent};
use crate::repositories::contract::{ReferenceStore, TripStore};
use crate::services::expense_calculator::compute_from_route;
use crate::services::notification_service::{
    order_in_progress_intent, trip_canceled_intent, NotificationSink,
};
use crate::services::report_stage_catalog::StageCatalog;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

/// Setting de empresa: exigir vehículo y conductor al crear el viaje
pub const SETTING_ASSIGNMENT_REQUIRED: &str = "trip_assignment_required";

/// Intentos de generación de código antes de rendirse. Con la secuencia
/// basada en el conteo del pedido no debería agotarse nunca.
const MAX_CODE_ATTEMPTS: i64 = 5;

/// Datos de entrada para crear un viaje
#[derive(Debug, Clone)]
pub struct CreateTripCommand {
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
    pub use_route_defaults: bool,
    pub created_by: Option<Uuid>,
}

/// Viaje con su historial y líneas de gasto, para la vista de detalle
#[derive(Debug, Clone)]
pub struct TripDetail {
    pub trip: OrderTrip,
    pub history: Vec<TripStatusEvent>,
    pub expenses: Vec<TripDriverExpense>,
}

pub struct TripService {
    store: Arc<dyn TripStore>,
    reference: Arc<dyn ReferenceStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl TripService {
    pub fn new(
        store: Arc<dyn TripStore>,
        reference: Arc<dyn ReferenceStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            reference,
            notifier,
        }
    }

    /// Crea un viaje para el pedido: asigna el siguiente código de la
    /// secuencia, siembra los costos (de la ruta o de los overrides), escribe
    /// el evento NEW inicial y promociona el pedido a IN_PROGRESS si es su
    /// primer viaje.
    pub async fn create_trip(&self, cmd: CreateTripCommand) -> AppResult<OrderTrip> {
        if cmd.weight <= Decimal::ZERO {
            return Err(bad_request_error("El peso del viaje debe ser mayor que 0"));
        }
        if cmd.delivery_date < cmd.pickup_date {
            return Err(bad_request_error(
                "La fecha de entrega no puede ser anterior a la de recogida",
            ));
        }

        let order = self
            .store
            .get_order(cmd.order_id)
            .await?
            .ok_or_else(|| not_found_error("Order", &cmd.order_id.to_string()))?;

        let assignment_required = self
            .reference
            .get_org_setting(order.company_id, SETTING_ASSIGNMENT_REQUIRED)
            .await?
            .map(|v| v == "true")
            .unwrap_or(false);

        if assignment_required && (cmd.vehicle_id.is_none() || cmd.driver_id.is_none()) {
            return Err(bad_request_error(
                "La empresa exige vehículo y conductor asignados al crear el viaje",
            ));
        }

        let plan = if cmd.use_route_defaults {
            Some(self.expense_plan_for(&order, cmd.vehicle_id).await?)
        } else {
            None
        };

        // Los overrides del operador ganan sobre los defaults de la ruta
        let (lines, driver_cost, subcontractor_cost, bridge_toll, other_cost) = match plan {
            Some(plan) => (
                plan.lines,
                cmd.driver_cost.or(plan.driver_cost),
                cmd.subcontractor_cost.or(plan.subcontractor_cost),
                cmd.bridge_toll.or(plan.bridge_toll),
                cmd.other_cost.or(plan.other_cost),
            ),
            None => (
                vec![],
                cmd.driver_cost,
                cmd.subcontractor_cost,
                cmd.bridge_toll,
                cmd.other_cost,
            ),
        };

        let base_seq = self.store.count_trips(order.id).await? + 1;

        for attempt in 0..MAX_CODE_ATTEMPTS {
            let code = format!("{}-{:02}", order.code, base_seq + attempt);

            if self.store.trip_code_exists(order.id, &code).await? {
                continue;
            }

            let new_trip = NewTrip {
                company_id: order.company_id,
                order_id: order.id,
                code: code.clone(),
                vehicle_id: cmd.vehicle_id,
                driver_id: cmd.driver_id,
                weight: cmd.weight,
                pickup_date: cmd.pickup_date,
                delivery_date: cmd.delivery_date,
                driver_cost,
                subcontractor_cost,
                bridge_toll,
                other_cost,
                created_by: cmd.created_by,
            };

            match self.store.create_trip(new_trip, lines.clone()).await {
                Ok((trip, promoted)) => {
                    info!(trip_id = %trip.id, code = %trip.code, "trip created");
                    if promoted {
                        self.notify(order_in_progress_intent(&order, &trip)).await;
                    }
                    return Ok(trip);
                }
                // Otro operador tomó el mismo código entre el check y el
                // insert; probamos la siguiente posición de la secuencia
                Err(AppError::Conflict(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(AppError::DuplicateCode(format!(
            "No se pudo asignar un código de viaje para el pedido '{}' tras {} intentos",
            order.code, MAX_CODE_ATTEMPTS
        )))
    }

    /// Avanza (o corrige) el estado del viaje. Las transiciones entre
    /// estados no terminales son libres: el despacho real necesita saltar y
    /// revisitar etapas. CANCELED solo se alcanza vía `cancel_trip`.
    pub async fn advance_status(
        &self,
        trip_id: Uuid,
        new_stage_type: &str,
        note: Option<String>,
        driver_report_id: Option<Uuid>,
        expected_updated_at: DateTime<Utc>,
        actor: Option<Uuid>,
    ) -> AppResult<(OrderTrip, TripStatusEvent)> {
        if new_stage_type == status_types::CANCELED {
            return Err(bad_request_error(
                "Usar la operación de cancelación para cancelar un viaje",
            ));
        }

        let trip = self.published_trip(trip_id).await?;

        if status_types::is_terminal(&trip.last_status_type) {
            return Err(bad_request_error(
                "El viaje está cancelado y no admite más transiciones",
            ));
        }

        if !status_types::is_structural(new_stage_type) {
            let catalog = self.stage_catalog(trip.company_id).await?;
            if !catalog.contains(new_stage_type) {
                return Err(bad_request_error(&format!(
                    "Etapa '{}' desconocida para la empresa",
                    new_stage_type
                )));
            }
        }

        let (trip, event) = self
            .store
            .append_status(
                trip_id,
                new_stage_type,
                note,
                driver_report_id,
                actor,
                expected_updated_at,
            )
            .await?;

        info!(trip_id = %trip.id, status = %event.status_type, "trip status advanced");
        Ok((trip, event))
    }

    /// Cancela el viaje con el mismo chequeo optimista que el avance de
    /// estado y alerta a gestores, contables y al conductor asignado.
    pub async fn cancel_trip(
        &self,
        trip_id: Uuid,
        expected_updated_at: DateTime<Utc>,
        actor: Option<Uuid>,
    ) -> AppResult<OrderTrip> {
        let trip = self.published_trip(trip_id).await?;

        if status_types::is_terminal(&trip.last_status_type) {
            return Err(bad_request_error("El viaje ya está cancelado"));
        }

        let (trip, _event) = self
            .store
            .append_status(
                trip_id,
                status_types::CANCELED,
                None,
                None,
                actor,
                expected_updated_at,
            )
            .await?;

        info!(trip_id = %trip.id, code = %trip.code, "trip canceled");
        self.notify(trip_canceled_intent(&trip)).await;

        Ok(trip)
    }

    /// Sub-flujo de carta de porte, independiente del estado del viaje.
    /// Al marcar la recepción se registra el timestamp; al desmarcarla se
    /// limpia.
    pub async fn update_bill_of_lading(
        &self,
        trip_id: Uuid,
        code: String,
        images_added: Vec<String>,
        images_removed: Vec<String>,
        received: bool,
        actor: Option<Uuid>,
    ) -> AppResult<OrderTrip> {
        if code.trim().is_empty() {
            return Err(bad_request_error("El código de carta de porte es requerido"));
        }

        let trip = self.published_trip(trip_id).await?;

        let mut images = trip.bill_of_lading_images.clone();
        for image in images_added {
            if !images.contains(&image) {
                images.push(image);
            }
        }
        images.retain(|image| !images_removed.contains(image));

        let received_at = match (received, trip.bill_of_lading_received) {
            (true, true) => trip.bill_of_lading_received_at,
            (true, false) => Some(Utc::now()),
            (false, _) => None,
        };

        let patch = TripPatch {
            bill_of_lading_code: Some(code),
            bill_of_lading_received: Some(received),
            bill_of_lading_received_at: Some(received_at),
            bill_of_lading_images: Some(images),
            updated_by: actor,
            ..TripPatch::default()
        };

        self.store.update_trip(trip_id, patch, None).await
    }

    /// Limpia el timestamp de notificación programada. Mutación de datos,
    /// no una transición de estado.
    pub async fn reset_notification_schedule(
        &self,
        trip_id: Uuid,
        actor: Option<Uuid>,
    ) -> AppResult<OrderTrip> {
        self.published_trip(trip_id).await?;

        let patch = TripPatch {
            notify_scheduled_at: Some(None),
            updated_by: actor,
            ..TripPatch::default()
        };

        self.store.update_trip(trip_id, patch, None).await
    }

    /// Re-aplica los defaults de ruta sobre cada viaje, descartando las
    /// líneas editadas a mano. El reemplazo es atómico por viaje: o se
    /// sustituye el juego completo de gastos o no se toca nada.
    pub async fn reset_expenses(&self, trip_ids: Vec<Uuid>) -> AppResult<Vec<OrderTrip>> {
        let mut updated = Vec::with_capacity(trip_ids.len());

        for trip_id in trip_ids {
            let trip = self.published_trip(trip_id).await?;

            let order = self
                .store
                .get_order(trip.order_id)
                .await?
                .ok_or_else(|| not_found_error("Order", &trip.order_id.to_string()))?;

            let plan = self.expense_plan_for(&order, trip.vehicle_id).await?;
            let trip = self.store.replace_trip_expenses(trip_id, &plan).await?;

            info!(trip_id = %trip.id, "trip expenses reset to route defaults");
            updated.push(trip);
        }

        Ok(updated)
    }

    /// Vista de detalle: viaje publicado con historial y líneas de gasto
    pub async fn get_trip_detail(&self, trip_id: Uuid) -> AppResult<TripDetail> {
        let trip = self.published_trip(trip_id).await?;
        let history = self.store.list_status_history(trip_id).await?;
        let expenses = self.store.list_trip_expenses(trip_id).await?;

        Ok(TripDetail {
            trip,
            history,
            expenses,
        })
    }

    /// Viajes publicados de un pedido para la vista de despacho
    pub async fn list_trips(&self, order_id: Uuid) -> AppResult<Vec<OrderTrip>> {
        self.store.list_trips_by_order(order_id).await
    }

    /// Los viajes despublicados se tratan como inexistentes
    async fn published_trip(&self, trip_id: Uuid) -> AppResult<OrderTrip> {
        let trip = self
            .store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| not_found_error("Trip", &trip_id.to_string()))?;

        if !trip.is_published {
            return Err(not_found_error("Trip", &trip_id.to_string()));
        }

        Ok(trip)
    }

    async fn stage_catalog(&self, company_id: Uuid) -> AppResult<StageCatalog> {
        let stages = self.reference.list_report_stages(company_id).await?;
        Ok(StageCatalog::new(stages))
    }

    /// Resuelve el plan de gastos de la ruta del pedido, prorrateado por la
    /// tasa del vehículo asignado. Sin vehículo los defaults se copian al
    /// 100%.
    async fn expense_plan_for(
        &self,
        order: &Order,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<ExpensePlan> {
        let route_id = order.route_id.ok_or_else(|| {
            bad_request_error("El pedido no tiene ruta asignada para copiar defaults")
        })?;

        let route = self
            .reference
            .get_route(route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))?;

        let rate = match vehicle_id {
            Some(vehicle_id) => {
                let vehicle = self
                    .reference
                    .get_vehicle(vehicle_id)
                    .await?
                    .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;
                vehicle.driver_expense_rate
            }
            None => Decimal::ONE_HUNDRED,
        };

        Ok(compute_from_route(&route, rate))
    }

    /// Un fallo de entrega jamás tumba la transacción de negocio que lo
    /// disparó; queda en el log y sigue.
    async fn notify(&self, intent: NotificationIntent) {
        if let Err(e) = self.notifier.emit(intent).await {
            warn!(error = %e, "notification emission failed");
        }
    }
}
