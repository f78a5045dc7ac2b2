//! Catálogo de etapas de reporte del conductor
//!
//! El pipeline de entrega es configurable por empresa: cada etapa tiene un
//! `display_order` que define la secuencia total. Este módulo carga el
//! catálogo como lista ordenada y resuelve posiciones por tipo de etapa;
//! nunca se asume una secuencia fija en código.

use crate::models::report_stage::DriverReport;

/// Catálogo ordenado de etapas de una empresa
#[derive(Debug, Clone)]
pub struct StageCatalog {
    stages: Vec<DriverReport>,
}

impl StageCatalog {
    /// Construye el catálogo a partir de las filas de la empresa.
    /// Se re-ordena por `display_order` por si la fuente no lo garantiza.
    pub fn new(mut stages: Vec<DriverReport>) -> Self {
        stages.sort_by_key(|s| s.display_order);
        Self { stages }
    }

    /// Posición configurada de un tipo de etapa, si está en el catálogo.
    /// Si una empresa repite el tipo, gana la primera aparición en orden.
    pub fn display_order(&self, report_type: &str) -> Option<i32> {
        self.stages
            .iter()
            .find(|s| s.report_type == report_type)
            .map(|s| s.display_order)
    }

    pub fn contains(&self, report_type: &str) -> bool {
        self.display_order(report_type).is_some()
    }

    /// Entrada completa del catálogo (flags de foto / carta de porte)
    pub fn get(&self, report_type: &str) -> Option<&DriverReport> {
        self.stages.iter().find(|s| s.report_type == report_type)
    }

    pub fn stages(&self) -> &[DriverReport] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
