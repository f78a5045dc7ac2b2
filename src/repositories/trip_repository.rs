//! Repositorio de viajes sobre PostgreSQL
//!
//! Implementa el contrato `TripStore`. Las operaciones compuestas corren en
//! una transacción: el chequeo optimista se ejecuta como condición del
//! propio UPDATE (`WHERE updated_at = $expected`), nunca como lectura
//! separada previa al write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::expense::{ExpensePlan, PlannedExpenseLine, TripDriverExpense};
use crate::models::order::{order_status, Order};
use crate::models::trip::{status_types, NewTrip, OrderTrip, TripPatch, TripStatusEvent};
use crate::repositories::contract::TripStore;
use crate::utils::errors::{stale_update_error, AppError, AppResult};

/// Código de PostgreSQL para violación de restricción única
const PG_UNIQUE_VIOLATION: &str = "23505";

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_unique_violation(e: sqlx::Error, code: &str) -> AppError {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return AppError::Conflict(format!(
                    "trip code '{}' already exists for this order",
                    code
                ));
            }
        }
        AppError::Database(e)
    }
}

#[async_trait]
impl TripStore for PgTripRepository {
    async fn get_order(&self, id: Uuid) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn get_trip(&self, id: Uuid) -> AppResult<Option<OrderTrip>> {
        let trip = sqlx::query_as::<_, OrderTrip>("SELECT * FROM order_trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    async fn count_trips(&self, order_id: Uuid) -> AppResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM order_trips WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    async fn trip_code_exists(&self, order_id: Uuid, code: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM order_trips WHERE order_id = $1 AND code = $2)",
        )
        .bind(order_id)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn create_trip(
        &self,
        trip: NewTrip,
        lines: Vec<PlannedExpenseLine>,
    ) -> AppResult<(OrderTrip, bool)> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, OrderTrip>(
            r#"
            INSERT INTO order_trips (
                id, company_id, order_id, code, vehicle_id, driver_id, weight,
                pickup_date, delivery_date,
                driver_cost, subcontractor_cost, bridge_toll, other_cost,
                last_status_type,
                bill_of_lading_code, bill_of_lading_received, bill_of_lading_received_at,
                bill_of_lading_images, notify_scheduled_at, is_published,
                created_at, created_by, updated_at, updated_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    NULL, FALSE, NULL, '{}', NULL, TRUE, now(), $15, now(), $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(trip.company_id)
        .bind(trip.order_id)
        .bind(&trip.code)
        .bind(trip.vehicle_id)
        .bind(trip.driver_id)
        .bind(trip.weight)
        .bind(trip.pickup_date)
        .bind(trip.delivery_date)
        .bind(trip.driver_cost)
        .bind(trip.subcontractor_cost)
        .bind(trip.bridge_toll)
        .bind(trip.other_cost)
        .bind(status_types::NEW)
        .bind(trip.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_unique_violation(e, &trip.code))?;

        // Evento NEW inicial, mismo timestamp que el viaje
        sqlx::query(
            r#"
            INSERT INTO order_trip_statuses (id, trip_id, status_type, note, driver_report_id, created_at, created_by)
            VALUES ($1, $2, $3, NULL, NULL, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(created.id)
        .bind(status_types::NEW)
        .bind(created.created_at)
        .bind(trip.created_by)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO trip_driver_expenses (id, trip_id, expense_type_id, amount, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(created.id)
            .bind(line.expense_type_id)
            .bind(line.amount)
            .bind(created.created_at)
            .execute(&mut *tx)
            .await?;
        }

        // Primer viaje del pedido: RECEIVED → IN_PROGRESS. El predicado sobre
        // status garantiza que la promoción dispara una sola vez.
        let promoted = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 AND status = $3",
        )
        .bind(trip.order_id)
        .bind(order_status::IN_PROGRESS)
        .bind(order_status::RECEIVED)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        tx.commit().await?;

        Ok((created, promoted))
    }

    async fn update_trip(
        &self,
        id: Uuid,
        patch: TripPatch,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> AppResult<OrderTrip> {
        let mut tx = self.pool.begin().await?;

        let current =
            sqlx::query_as::<_, OrderTrip>("SELECT * FROM order_trips WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Trip '{}' not found", id)))?;

        let guard = expected_updated_at.unwrap_or(current.updated_at);

        let updated = sqlx::query_as::<_, OrderTrip>(
            r#"
            UPDATE order_trips
            SET bill_of_lading_code = $3,
                bill_of_lading_received = $4,
                bill_of_lading_received_at = $5,
                bill_of_lading_images = $6,
                notify_scheduled_at = $7,
                updated_at = now(),
                updated_by = $8
            WHERE id = $1 AND updated_at = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(guard)
        .bind(
            patch
                .bill_of_lading_code
                .or(current.bill_of_lading_code),
        )
        .bind(
            patch
                .bill_of_lading_received
                .unwrap_or(current.bill_of_lading_received),
        )
        .bind(
            patch
                .bill_of_lading_received_at
                .unwrap_or(current.bill_of_lading_received_at),
        )
        .bind(
            patch
                .bill_of_lading_images
                .unwrap_or(current.bill_of_lading_images),
        )
        .bind(patch.notify_scheduled_at.unwrap_or(current.notify_scheduled_at))
        .bind(patch.updated_by.or(current.updated_by))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| stale_update_error("Trip", &id.to_string()))?;

        tx.commit().await?;

        Ok(updated)
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
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, OrderTrip>(
            r#"
            UPDATE order_trips
            SET last_status_type = $3, updated_at = now(), updated_by = $4
            WHERE id = $1 AND updated_at = $2
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(expected_updated_at)
        .bind(status_type)
        .bind(created_by)
        .fetch_optional(&mut *tx)
        .await?;

        let trip = match updated {
            Some(trip) => trip,
            None => {
                // Distinguir "no existe" de "cambió desde que lo leíste"
                let exists: (bool,) =
                    sqlx::query_as("SELECT EXISTS(SELECT 1 FROM order_trips WHERE id = $1)")
                        .bind(trip_id)
                        .fetch_one(&mut *tx)
                        .await?;

                return Err(if exists.0 {
                    stale_update_error("Trip", &trip_id.to_string())
                } else {
                    AppError::NotFound(format!("Trip '{}' not found", trip_id))
                });
            }
        };

        // El evento comparte timestamp con el updated_at recién escrito, así
        // el último evento y el campo desnormalizado nunca divergen
        let event = sqlx::query_as::<_, TripStatusEvent>(
            r#"
            INSERT INTO order_trip_statuses (id, trip_id, status_type, note, driver_report_id, created_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(trip_id)
        .bind(status_type)
        .bind(note)
        .bind(driver_report_id)
        .bind(trip.updated_at)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((trip, event))
    }

    async fn list_status_history(&self, trip_id: Uuid) -> AppResult<Vec<TripStatusEvent>> {
        let events = sqlx::query_as::<_, TripStatusEvent>(
            "SELECT * FROM order_trip_statuses WHERE trip_id = $1 ORDER BY created_at ASC",
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn list_trips_by_order(&self, order_id: Uuid) -> AppResult<Vec<OrderTrip>> {
        let trips = sqlx::query_as::<_, OrderTrip>(
            "SELECT * FROM order_trips WHERE order_id = $1 AND is_published = TRUE ORDER BY created_at ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    async fn list_trips_by_driver(
        &self,
        company_id: Uuid,
        driver_id: Uuid,
    ) -> AppResult<Vec<OrderTrip>> {
        let trips = sqlx::query_as::<_, OrderTrip>(
            r#"
            SELECT * FROM order_trips
            WHERE company_id = $1 AND driver_id = $2 AND is_published = TRUE
            ORDER BY pickup_date ASC
            "#,
        )
        .bind(company_id)
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    async fn list_trip_expenses(&self, trip_id: Uuid) -> AppResult<Vec<TripDriverExpense>> {
        let expenses = sqlx::query_as::<_, TripDriverExpense>(
            r#"
            SELECT e.id, e.trip_id, e.expense_type_id,
                   t.key AS expense_type_key, t.is_driver_cost, e.amount, e.created_at
            FROM trip_driver_expenses e
            JOIN expense_types t ON t.id = e.expense_type_id
            WHERE e.trip_id = $1
            ORDER BY e.created_at ASC
            "#,
        )
        .bind(trip_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    async fn replace_trip_expenses(
        &self,
        trip_id: Uuid,
        plan: &ExpensePlan,
    ) -> AppResult<OrderTrip> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM trip_driver_expenses WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        for line in &plan.lines {
            sqlx::query(
                r#"
                INSERT INTO trip_driver_expenses (id, trip_id, expense_type_id, amount, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(line.expense_type_id)
            .bind(line.amount)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, OrderTrip>(
            r#"
            UPDATE order_trips
            SET driver_cost = $2, bridge_toll = $3, subcontractor_cost = $4,
                other_cost = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(trip_id)
        .bind(plan.driver_cost)
        .bind(plan.bridge_toll)
        .bind(plan.subcontractor_cost)
        .bind(plan.other_cost)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trip '{}' not found", trip_id)))?;

        tx.commit().await?;

        Ok(updated)
    }
}
