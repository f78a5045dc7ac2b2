//! Repositorios de persistencia

pub mod contract;
pub mod reference_repository;
pub mod trip_repository;
