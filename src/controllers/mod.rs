//! Controllers de la API
//!
//! Traducen requests HTTP a comandos de servicio y modelos a DTOs.

pub mod payroll_controller;
pub mod trip_controller;
