//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el ciclo de
//! vida del viaje, el cálculo de gastos de conductor, la resolución de
//! ventanas de nómina y la emisión de intenciones de notificación.

pub mod expense_calculator;
pub mod notification_service;
pub mod payroll_service;
pub mod report_stage_catalog;
pub mod trip_service;

pub use notification_service::{NotificationSink, TracingNotificationSink};
pub use payroll_service::PayrollService;
pub use trip_service::TripService;
