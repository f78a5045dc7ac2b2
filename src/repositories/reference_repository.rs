//! Repositorio de datos de referencia sobre PostgreSQL
//!
//! Catálogo de etapas, rutas con sus líneas de gasto, vehículos y settings
//! de empresa. Todo de solo lectura para este motor.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::report_stage::DriverReport;
use crate::models::route::{Route, RouteDriverExpense, RouteWithExpenses};
use crate::models::vehicle::Vehicle;
use crate::repositories::contract::ReferenceStore;
use crate::utils::errors::AppResult;

pub struct PgReferenceRepository {
    pool: PgPool,
}

impl PgReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceStore for PgReferenceRepository {
    async fn list_report_stages(&self, company_id: Uuid) -> AppResult<Vec<DriverReport>> {
        let stages = sqlx::query_as::<_, DriverReport>(
            "SELECT * FROM driver_reports WHERE company_id = $1 ORDER BY display_order ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stages)
    }

    async fn get_route(&self, id: Uuid) -> AppResult<Option<RouteWithExpenses>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let route = match route {
            Some(route) => route,
            None => return Ok(None),
        };

        let driver_expenses = sqlx::query_as::<_, RouteDriverExpense>(
            r#"
            SELECT e.id, e.route_id, e.expense_type_id,
                   t.key AS expense_type_key, t.is_driver_cost, e.amount
            FROM route_driver_expenses e
            JOIN expense_types t ON t.id = e.expense_type_id
            WHERE e.route_id = $1
            ORDER BY t.key ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RouteWithExpenses {
            route,
            driver_expenses,
        }))
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.id, v.company_id, v.license_plate,
                   t.name AS vehicle_type, t.driver_expense_rate, v.created_at
            FROM vehicles v
            JOIN vehicle_types t ON t.id = v.vehicle_type_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn get_org_setting(&self, company_id: Uuid, key: &str) -> AppResult<Option<String>> {
        let value: Option<(String,)> = sqlx::query_as(
            "SELECT value FROM org_settings WHERE company_id = $1 AND key = $2",
        )
        .bind(company_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        if value.is_none() {
            log::debug!("Setting '{}' sin valor para empresa {}, usando default", key, company_id);
        }

        Ok(value.map(|v| v.0))
    }
}
