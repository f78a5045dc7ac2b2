//! Fakes en memoria para las suites de integración
//!
//! `InMemoryStore` implementa los dos contratos de persistencia con la misma
//! semántica que los repositorios de PostgreSQL: chequeo optimista dentro del
//! write, evento y campo desnormalizado en lockstep, reemplazo de gastos todo
//! o nada. El reloj es un contador monótono para que dos escrituras seguidas
//! nunca compartan timestamp.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use freight_dispatch::models::expense::{ExpensePlan, PlannedExpenseLine, TripDriverExpense};
use freight_dispatch::models::notification::NotificationIntent;
use freight_dispatch::models::order::{order_status, Order};
use freight_dispatch::models::report_stage::DriverReport;
use freight_dispatch::models::route::{Route, RouteDriverExpense, RouteWithExpenses};
use freight_dispatch::models::trip::{
    status_types, NewTrip, OrderTrip, TripPatch, TripStatusEvent,
};
use freight_dispatch::models::vehicle::Vehicle;
use freight_dispatch::repositories::contract::{ReferenceStore, TripStore};
use freight_dispatch::services::notification_service::NotificationSink;
use freight_dispatch::services::{PayrollService, TripService};
use freight_dispatch::utils::errors::{stale_update_error, AppError, AppResult};

struct Inner {
    orders: HashMap<Uuid, Order>,
    trips: HashMap<Uuid, OrderTrip>,
    events: Vec<TripStatusEvent>,
    expenses: Vec<TripDriverExpense>,
    stages: Vec<DriverReport>,
    routes: HashMap<Uuid, RouteWithExpenses>,
    vehicles: HashMap<Uuid, Vehicle>,
    settings: HashMap<(Uuid, String), String>,
    ticks: i64,
}

pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                orders: HashMap::new(),
                trips: HashMap::new(),
                events: Vec::new(),
                expenses: Vec::new(),
                stages: Vec::new(),
                routes: HashMap::new(),
                vehicles: HashMap::new(),
                settings: HashMap::new(),
                ticks: 0,
            }),
        }
    }

    pub fn seed_order(&self, company_id: Uuid, code: &str, route_id: Option<Uuid>) -> Order {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);
        let order = Order {
            id: Uuid::new_v4(),
            company_id,
            code: code.to_string(),
            status: order_status::RECEIVED.to_string(),
            route_id,
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order.id, order.clone());
        order
    }

    /// Pipeline por defecto: NEW 10 → PENDING_CONFIRMATION 20 → CONFIRMED 30
    /// → WAITING_FOR_PICKUP 40 → DELIVERED 50 → COMPLETED 60
    pub fn seed_default_stages(&self, company_id: Uuid) {
        let types = [
            (status_types::NEW, 10),
            (status_types::PENDING_CONFIRMATION, 20),
            (status_types::CONFIRMED, 30),
            (status_types::WAITING_FOR_PICKUP, 40),
            (status_types::DELIVERED, 50),
            (status_types::COMPLETED, 60),
        ];
        let mut inner = self.inner.lock().unwrap();
        for (report_type, display_order) in types {
            let now = tick(&mut inner);
            inner.stages.push(DriverReport {
                id: Uuid::new_v4(),
                company_id,
                report_type: report_type.to_string(),
                name: report_type.to_lowercase().replace('_', " "),
                display_order,
                photo_required: false,
                bill_of_lading_required: false,
                created_at: now,
            });
        }
    }

    pub fn seed_route(
        &self,
        company_id: Uuid,
        flat_driver_cost: Option<Decimal>,
        bridge_toll: Option<Decimal>,
        lines: Vec<(&str, bool, Decimal)>,
    ) -> Uuid {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);
        let route_id = Uuid::new_v4();
        let driver_expenses = lines
            .into_iter()
            .map(|(key, is_driver_cost, amount)| RouteDriverExpense {
                id: Uuid::new_v4(),
                route_id,
                expense_type_id: Uuid::new_v4(),
                expense_type_key: key.to_string(),
                is_driver_cost,
                amount,
            })
            .collect();
        inner.routes.insert(
            route_id,
            RouteWithExpenses {
                route: Route {
                    id: route_id,
                    company_id,
                    name: "Ruta de prueba".to_string(),
                    driver_cost: flat_driver_cost,
                    bridge_toll,
                    subcontractor_cost: None,
                    other_cost: None,
                    created_at: now,
                },
                driver_expenses,
            },
        );
        route_id
    }

    pub fn seed_vehicle(&self, company_id: Uuid, driver_expense_rate: Decimal) -> Uuid {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);
        let id = Uuid::new_v4();
        inner.vehicles.insert(
            id,
            Vehicle {
                id,
                company_id,
                license_plate: format!("TEST-{}", &id.to_string()[..8]),
                vehicle_type: "camión".to_string(),
                driver_expense_rate,
                created_at: now,
            },
        );
        id
    }

    pub fn set_setting(&self, company_id: Uuid, key: &str, value: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .settings
            .insert((company_id, key.to_string()), value.to_string());
    }

    /// Inserta un evento histórico con timestamp explícito y deja el campo
    /// desnormalizado del viaje en lockstep, como haría la transacción real.
    pub fn inject_event(&self, trip_id: Uuid, status_type: &str, created_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push(TripStatusEvent {
            id: Uuid::new_v4(),
            trip_id,
            status_type: status_type.to_string(),
            note: None,
            driver_report_id: None,
            created_at,
            created_by: None,
        });
        let latest = inner
            .events
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .max_by_key(|e| e.created_at)
            .map(|e| (e.status_type.clone(), e.created_at));
        if let Some((status_type, created_at)) = latest {
            if let Some(trip) = inner.trips.get_mut(&trip_id) {
                trip.last_status_type = status_type;
                trip.updated_at = created_at;
            }
        }
    }

    pub fn set_bill_of_lading_code(&self, trip_id: Uuid, code: &str) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(trip) = inner.trips.get_mut(&trip_id) {
            trip.bill_of_lading_code = Some(code.to_string());
        }
    }

    pub fn set_notify_scheduled_at(&self, trip_id: Uuid, at: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(trip) = inner.trips.get_mut(&trip_id) {
            trip.notify_scheduled_at = Some(at);
        }
    }

    pub fn unpublish(&self, trip_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(trip) = inner.trips.get_mut(&trip_id) {
            trip.is_published = false;
        }
    }

    pub fn event_count(&self, trip_id: Uuid) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.events.iter().filter(|e| e.trip_id == trip_id).count()
    }

    pub fn order(&self, order_id: Uuid) -> Order {
        let inner = self.inner.lock().unwrap();
        inner.orders.get(&order_id).cloned().unwrap()
    }
}

/// Reloj monótono del fake: milisegundos desde una época fija
fn tick(inner: &mut Inner) -> DateTime<Utc> {
    inner.ticks += 1;
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(inner.ticks)
}

#[async_trait]
impl TripStore for InMemoryStore {
    async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.inner.lock().unwrap().orders.get(&id).cloned())
    }

    async fn get_trip(&self, id: Uuid) -> AppResult<Option<OrderTrip>> {
        Ok(self.inner.lock().unwrap().trips.get(&id).cloned())
    }

    async fn count_trips(&self, order_id: Uuid) -> AppResult<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.trips.values().filter(|t| t.order_id == order_id).count() as i64)
    }

    async fn trip_code_exists(&self, order_id: Uuid, code: &str) -> AppResult<bool> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .trips
            .values()
            .any(|t| t.order_id == order_id && t.code == code))
    }

    async fn create_trip(
        &self,
        trip: NewTrip,
        lines: Vec<PlannedExpenseLine>,
    ) -> AppResult<(OrderTrip, bool)> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .trips
            .values()
            .any(|t| t.order_id == trip.order_id && t.code == trip.code)
        {
            return Err(AppError::Conflict(format!(
                "trip code '{}' already exists for this order",
                trip.code
            )));
        }

        let now = tick(&mut inner);
        let created = OrderTrip {
            id: Uuid::new_v4(),
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
            last_status_type: status_types::NEW.to_string(),
            bill_of_lading_code: None,
            bill_of_lading_received: false,
            bill_of_lading_received_at: None,
            bill_of_lading_images: vec![],
            notify_scheduled_at: None,
            is_published: true,
            created_at: now,
            created_by: trip.created_by,
            updated_at: now,
            updated_by: trip.created_by,
        };

        inner.events.push(TripStatusEvent {
            id: Uuid::new_v4(),
            trip_id: created.id,
            status_type: status_types::NEW.to_string(),
            note: None,
            driver_report_id: None,
            created_at: now,
            created_by: trip.created_by,
        });

        for line in &lines {
            inner.expenses.push(TripDriverExpense {
                id: Uuid::new_v4(),
                trip_id: created.id,
                expense_type_id: line.expense_type_id,
                expense_type_key: line.expense_type_key.clone(),
                is_driver_cost: line.is_driver_cost,
                amount: line.amount,
                created_at: now,
            });
        }

        let promoted = match inner.orders.get_mut(&created.order_id) {
            Some(order) if order.status == order_status::RECEIVED => {
                order.status = order_status::IN_PROGRESS.to_string();
                order.updated_at = now;
                true
            }
            _ => false,
        };

        inner.trips.insert(created.id, created.clone());
        Ok((created, promoted))
    }

    async fn update_trip(
        &self,
        id: Uuid,
        patch: TripPatch,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> AppResult<OrderTrip> {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);

        let trip = inner
            .trips
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Trip '{}' not found", id)))?;

        if let Some(expected) = expected_updated_at {
            if trip.updated_at != expected {
                return Err(stale_update_error("Trip", &id.to_string()));
            }
        }

        if let Some(code) = patch.bill_of_lading_code {
            trip.bill_of_lading_code = Some(code);
        }
        if let Some(received) = patch.bill_of_lading_received {
            trip.bill_of_lading_received = received;
        }
        if let Some(received_at) = patch.bill_of_lading_received_at {
            trip.bill_of_lading_received_at = received_at;
        }
        if let Some(images) = patch.bill_of_lading_images {
            trip.bill_of_lading_images = images;
        }
        if let Some(notify_scheduled_at) = patch.notify_scheduled_at {
            trip.notify_scheduled_at = notify_scheduled_at;
        }
        if patch.updated_by.is_some() {
            trip.updated_by = patch.updated_by;
        }
        trip.updated_at = now;

        Ok(trip.clone())
    }

    async fn append_status(
        &self,
        trip_id: Uuid,
        status_type: &str,
        note: Option<String>,
        driver_report_id: Option<Uuid>,
        created_by: Option<Uuid>,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<(OrderTrip, TripStatusEvent)> {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);

        let trip = inner
            .trips
            .get_mut(&trip_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip '{}' not found", trip_id)))?;

        // La comparación y la escritura ocurren bajo el mismo lock, igual
        // que el UPDATE condicional del repositorio real
        if trip.updated_at != expected_updated_at {
            return Err(stale_update_error("Trip", &trip_id.to_string()));
        }

        trip.last_status_type = status_type.to_string();
        trip.updated_at = now;
        trip.updated_by = created_by;
        let trip = trip.clone();

        let event = TripStatusEvent {
            id: Uuid::new_v4(),
            trip_id,
            status_type: status_type.to_string(),
            note,
            driver_report_id,
            created_at: now,
            created_by,
        };
        inner.events.push(event.clone());

        Ok((trip, event))
    }

    async fn list_status_history(&self, trip_id: Uuid) -> AppResult<Vec<TripStatusEvent>> {
        let inner = self.inner.lock().unwrap();
        let mut events: Vec<TripStatusEvent> = inner
            .events
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn list_trips_by_order(&self, order_id: Uuid) -> AppResult<Vec<OrderTrip>> {
        let inner = self.inner.lock().unwrap();
        let mut trips: Vec<OrderTrip> = inner
            .trips
            .values()
            .filter(|t| t.order_id == order_id && t.is_published)
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.created_at);
        Ok(trips)
    }

    async fn list_trips_by_driver(
        &self,
        company_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<Vec<OrderTrip>> {
        let inner = self.inner.lock().unwrap();
        let mut trips: Vec<OrderTrip> = inner
            .trips
            .values()
            .filter(|t| {
                t.company_id == company_id && t.driver_id == Some(driver_id) && t.is_published
            })
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.pickup_date);
        Ok(trips)
    }

    async fn list_trip_expenses(&self, trip_id: Uuid) -> AppResult<Vec<TripDriverExpense>> {
        let inner = self.inner.lock().unwrap();
        let mut expenses: Vec<TripDriverExpense> = inner
            .expenses
            .iter()
            .filter(|e| e.trip_id == trip_id)
            .cloned()
            .collect();
        expenses.sort_by_key(|e| e.created_at);
        Ok(expenses)
    }

    async fn replace_trip_expenses(
        &self,
        trip_id: Uuid,
        plan: &ExpensePlan,
    ) -> AppResult<OrderTrip> {
        let mut inner = self.inner.lock().unwrap();
        let now = tick(&mut inner);

        if !inner.trips.contains_key(&trip_id) {
            return Err(AppError::NotFound(format!("Trip '{}' not found", trip_id)));
        }

        inner.expenses.retain(|e| e.trip_id != trip_id);
        for line in &plan.lines {
            inner.expenses.push(TripDriverExpense {
                id: Uuid::new_v4(),
                trip_id,
                expense_type_id: line.expense_type_id,
                expense_type_key: line.expense_type_key.clone(),
                is_driver_cost: line.is_driver_cost,
                amount: line.amount,
                created_at: now,
            });
        }

        let trip = inner.trips.get_mut(&trip_id).unwrap();
        trip.driver_cost = plan.driver_cost;
        trip.bridge_toll = plan.bridge_toll;
        trip.subcontractor_cost = plan.subcontractor_cost;
        trip.other_cost = plan.other_cost;
        trip.updated_at = now;

        Ok(trip.clone())
    }
}

#[async_trait]
impl ReferenceStore for InMemoryStore {
    async fn list_report_stages(&self, company_id: Uuid) -> AppResult<Vec<DriverReport>> {
        let inner = self.inner.lock().unwrap();
        let mut stages: Vec<DriverReport> = inner
            .stages
            .iter()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect();
        stages.sort_by_key(|s| s.display_order);
        Ok(stages)
    }

    async fn get_route(&self, id: Uuid) -> AppResult<Option<RouteWithExpenses>> {
        Ok(self.inner.lock().unwrap().routes.get(&id).cloned())
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.inner.lock().unwrap().vehicles.get(&id).cloned())
    }

    async fn get_org_setting(&self, company_id: Uuid, key: &str) -> AppResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.settings.get(&(company_id, key.to_string())).cloned())
    }
}

/// Sink que graba las intenciones emitidas; puede forzarse a fallar para
/// verificar que un fallo de emisión nunca tumba la operación de negocio
pub struct RecordingSink {
    intents: Mutex<Vec<NotificationIntent>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            intents: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_next_emissions(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn intents(&self) -> Vec<NotificationIntent> {
        self.intents.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn emit(&self, intent: NotificationIntent) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("delivery pipeline unavailable"));
        }
        self.intents.lock().unwrap().push(intent);
        Ok(())
    }
}

/// Servicios cableados contra los fakes
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub trips: TripService,
    pub payroll: PayrollService,
    pub company_id: Uuid,
}

pub fn setup() -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let company_id = Uuid::new_v4();

    store.seed_default_stages(company_id);

    let trips = TripService::new(store.clone(), store.clone(), sink.clone());
    let payroll = PayrollService::new(store.clone(), store.clone());

    TestContext {
        store,
        sink,
        trips,
        payroll,
        company_id,
    }
}
