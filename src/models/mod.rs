//! Modelos del sistema

pub mod expense;
pub mod notification;
pub mod order;
pub mod report_stage;
pub mod route;
pub mod settlement;
pub mod trip;
pub mod vehicle;
