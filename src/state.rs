//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: el pool de conexiones, la configuración y
//! los servicios de negocio ya cableados contra PostgreSQL.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::reference_repository::PgReferenceRepository;
use crate::repositories::trip_repository::PgTripRepository;
use crate::services::{PayrollService, TracingNotificationSink, TripService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub trips: Arc<TripService>,
    pub payroll: Arc<PayrollService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let store = Arc::new(PgTripRepository::new(pool.clone()));
        let reference = Arc::new(PgReferenceRepository::new(pool.clone()));
        let notifier = Arc::new(TracingNotificationSink);

        let trips = Arc::new(TripService::new(
            store.clone(),
            reference.clone(),
            notifier,
        ));
        let payroll = Arc::new(PayrollService::new(store, reference));

        Self {
            pool,
            config,
            trips,
            payroll,
        }
    }
}
