//! DTOs de la API
//!
//! Requests y responses serializables de la capa HTTP. Los modelos de
//! dominio nunca se exponen directamente.

pub mod common_dto;
pub mod payroll_dto;
pub mod trip_dto;
