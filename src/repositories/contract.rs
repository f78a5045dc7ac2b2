//! Contratos de persistencia del motor
//!
//! Este módulo define las interfaces estrechas contra las que trabaja la
//! capa de servicios. Las operaciones mutantes compuestas (crear viaje,
//! avanzar estado, reemplazar gastos) son unit-of-work explícitos: la
//! implementación debe ejecutarlas en una sola transacción.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::expense::{ExpensePlan, PlannedExpenseLine, TripDriverExpense};
use crate::models::order::Order;
use crate::models::report_stage::DriverReport;
use crate::models::route::RouteWithExpenses;
use crate::models::trip::{NewTrip, OrderTrip, TripPatch, TripStatusEvent};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

/// Persistencia de viajes, eventos de estado y gastos
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>>;

    async fn get_trip(&self, id: Uuid) -> AppResult<Option<OrderTrip>>;

    async fn count_trips(&self, order_id: Uuid) -> AppResult<i64>;

    async fn trip_code_exists(&self, order_id: Uuid, code: &str) -> AppResult<bool>;

    /// Unit-of-work de creación: inserta el viaje, su evento NEW inicial y
    /// sus líneas de gasto, y promociona el pedido RECEIVED → IN_PROGRESS
    /// si este es su primer viaje. Devuelve el viaje y si hubo promoción.
    /// Una colisión de código dentro del pedido devuelve `Conflict`.
    async fn create_trip(
        &self,
        trip: NewTrip,
        lines: Vec<PlannedExpenseLine>,
    ) -> AppResult<(OrderTrip, bool)>;

    /// Aplica un patch parcial. Si `expected_updated_at` viene informado, la
    /// comparación se ejecuta dentro del mismo write (`Conflict` si no
    /// coincide); si no, se guarda contra el valor leído en la transacción.
    async fn update_trip(
        &self,
        id: Uuid,
        patch: TripPatch,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> AppResult<OrderTrip>;

    /// Chequeo optimista + evento + `last_status_type` en una transacción.
    /// El created_at del evento coincide con el nuevo updated_at del viaje,
    /// de modo que el último evento y el campo desnormalizado nunca divergen.
    async fn append_status(
        &self,
        trip_id: Uuid,
        status_type: &str,
        note: Option<String>,
        driver_report_id: Option<Uuid>,
        created_by: Option<Uuid>,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<(OrderTrip, TripStatusEvent)>;

    /// Historial completo ordenado por created_at ascendente
    async fn list_status_history(&self, trip_id: Uuid) -> AppResult<Vec<TripStatusEvent>>;

    /// Viajes publicados de un pedido, en orden de creación
    async fn list_trips_by_order(&self, order_id: Uuid) -> AppResult<Vec<OrderTrip>>;

    /// Viajes publicados asignados a un conductor de la empresa
    async fn list_trips_by_driver(
        &self,
        company_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<Vec<OrderTrip>>;

    async fn list_trip_expenses(&self, trip_id: Uuid) -> AppResult<Vec<TripDriverExpense>>;

    /// Reemplazo atómico por viaje: borra las líneas actuales, inserta las
    /// del plan y actualiza los campos de costo, todo o nada.
    async fn replace_trip_expenses(&self, trip_id: Uuid, plan: &ExpensePlan)
        -> AppResult<OrderTrip>;
}

/// Datos de referencia de la empresa: catálogo de etapas, rutas, vehículos
/// y settings clave→valor
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Catálogo de etapas ordenado por display_order ascendente
    async fn list_report_stages(&self, company_id: Uuid) -> AppResult<Vec<DriverReport>>;

    async fn get_route(&self, id: Uuid) -> AppResult<Option<RouteWithExpenses>>;

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn get_org_setting(&self, company_id: Uuid, key: &str) -> AppResult<Option<String>>;
}
