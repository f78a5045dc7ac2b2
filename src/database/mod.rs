//! Módulo de base de datos
//!
//! Ciclo de vida del pool de conexiones a PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;
